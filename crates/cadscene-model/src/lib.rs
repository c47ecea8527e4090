// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CadScene Model - Trait definitions and shared types for CAD scene export
//!
//! This crate provides the abstractions the export pipeline is written against.
//! The geometry kernel, the tessellation engine and the native exchange-format
//! readers/writers are external collaborators; they are described here as
//! traits so the pipeline can work with any backend that implements them.
//!
//! # Architecture
//!
//! - [`GeometryKernel`] - Opaque shape handles, transforms, equality, compounds
//! - [`Tessellator`] - Triangulation and curve discretization
//! - [`EdgeProjector`] - Hidden-line projection for 2D drawings
//! - [`AssemblyDocument`] - Labelled assembly tree and its color tool
//! - [`ShapeReader`] / [`ShapeWriter`] / [`DocumentReader`] - Native format I/O
//!
//! # Example
//!
//! ```ignore
//! use cadscene_model::{GeometryKernel, Transform};
//!
//! fn place<K: GeometryKernel>(kernel: &K, shape: &K::Shape) -> K::Shape {
//!     kernel.apply_transform(shape, &Transform::from_translation(10.0, 0.0, 0.0))
//! }
//! ```

pub mod document;
pub mod error;
pub mod exchange;
pub mod kernel;
pub mod transform;
pub mod types;

// Re-export all public types
pub use document::*;
pub use error::*;
pub use exchange::*;
pub use kernel::*;
pub use transform::*;
pub use types::*;
