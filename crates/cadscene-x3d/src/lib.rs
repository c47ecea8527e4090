// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CadScene X3D - Scene fragments and documents for x3dom viewing
//!
//! A [`FragmentBuilder`] tessellates one shape and renders it as a
//! self-contained X3D fragment with a fresh unique id. A [`SceneDocument`]
//! collects fragments in insertion order and writes them into one X3D 4.0
//! document with a random file name.
//!
//! # Example
//!
//! ```ignore
//! use cadscene_x3d::{FragmentBuilder, FragmentStyle, SceneDocument};
//!
//! let builder = FragmentBuilder::new(&kernel, &kernel);
//! let fragment = builder.build(&shape, &FragmentStyle::default())?;
//! let path = SceneDocument::new().add(fragment).serialize(&out_dir)?;
//! ```

pub mod fragment;
pub mod numeric;
pub mod scene;
pub mod style;

pub use fragment::{ExportStrategy, FragmentBuilder, SceneFragment};
pub use numeric::{format_general, NumericEncoder, NumericPrecision};
pub use scene::{SceneDocument, GENERATOR_VERSION};
pub use style::{FragmentStyle, ShaderProgram};
