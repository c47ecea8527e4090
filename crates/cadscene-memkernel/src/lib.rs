// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CadScene MemKernel - In-memory reference implementation of the collaborator traits
//!
//! A small B-rep stand-in: boxes, cylinders, polylines and triangle meshes
//! grouped into compounds and placed with rigid locations. It implements
//! every trait of `cadscene-model` so the export pipeline can be exercised
//! end to end without a native CAD kernel.
//!
//! # Example
//!
//! ```ignore
//! use cadscene_memkernel::{MemKernel, MemShape};
//! use cadscene_model::{GeometryKernel, Transform};
//!
//! let kernel = MemKernel::new();
//! let boxed = MemShape::make_box(10.0, 20.0, 30.0);
//! let moved = kernel.apply_transform(&boxed, &Transform::from_translation(0.0, 0.0, 10.0));
//! assert!(!kernel.same_shape(&boxed, &moved));
//! ```

pub mod document;
pub mod kernel;
pub mod mesh;
pub mod native;
pub mod shape;
pub mod stl;

pub use document::MemDocument;
pub use kernel::MemKernel;
pub use native::{NativeExchange, NativeFormat};
pub use shape::{Geometry, MemShape, TShape};
pub use stl::StlExchange;
