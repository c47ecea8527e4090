// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CadScene Exchange - Import/export policy around native format collaborators
//!
//! The byte layout of STEP, IGES, STL and friends belongs to the reader and
//! writer collaborators. [`Exchange`] adds the checks around them:
//!
//! - missing input files fail with `NotFound` before any reader runs
//! - null shapes and unknown option values fail with `InvalidInput` before
//!   any writer runs
//! - an existing destination produces one [`ExchangeWarning`] and is replaced
//! - a non-`Done` status fails with `Collaborator`
//! - a writer that reports success but leaves no file fails with
//!   `Postcondition`
//!
//! # Example
//!
//! ```ignore
//! use cadscene_exchange::Exchange;
//!
//! let exchange = Exchange::new(&kernel);
//! let report = exchange.read_step(&step_reader, "part.stp", true)?;
//! exchange.write_stl(&kernel, &stl_writer, &shape, "part.stl", "binary", MeshQuality::stl_default())?;
//! ```

mod assembly;
mod exchange;
mod iges;
mod report;
mod roots;
mod step;
mod stl;
mod svg;
mod x3d;

pub use exchange::Exchange;
pub use report::{ExchangeWarning, Imported, ReadReport, WriteReport};
pub use svg::{SvgExport, SvgOptions};
