// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CadScene Viewer - x3dom page generation for CadScene X3D documents
//!
//! [`X3domRenderer`] collects shapes as scene fragments, then writes a
//! randomly named X3D document and an `index.html` that inlines it into an
//! x3dom canvas. Clicking a shape highlights it; `t` hides or shows the
//! current selection.
//!
//! # Example
//!
//! ```ignore
//! use cadscene_viewer::{RendererConfig, X3domRenderer};
//! use cadscene_x3d::FragmentStyle;
//!
//! let mut renderer = X3domRenderer::new(&kernel, &kernel, RendererConfig::default())?;
//! renderer.display_shape(&shape, &FragmentStyle::default())?;
//! let rendered = renderer.render()?;
//! println!("serve {}", rendered.dir.display());
//! ```

pub mod config;
pub mod renderer;
pub mod template;

pub use config::RendererConfig;
pub use renderer::{RenderedScene, X3domRenderer};
pub use template::{render_page, HIGHLIGHT_COLOR};
