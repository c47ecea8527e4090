// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CadScene Assembly - Flatten labelled assemblies into placed, colored shapes
//!
//! Walks the free labels of an [`AssemblyDocument`] depth-first, composes the
//! placements of reference components from the root down, applies the
//! composed placement to every simple shape exactly once and resolves its
//! color (instance color, then definition color, then gray).
//!
//! # Example
//!
//! ```ignore
//! use cadscene_assembly::AssemblyFlattener;
//!
//! let flattener = AssemblyFlattener::new(&kernel);
//! let flat = flattener.flatten(&mut document);
//! for instance in flat.iter() {
//!     println!("{} -> {:?}", instance.name, instance.color);
//! }
//! ```
//!
//! [`AssemblyDocument`]: cadscene_model::AssemblyDocument

mod color;
mod flatten;
mod instances;

pub use color::{resolve_color, ColorSource, ResolvedColor};
pub use flatten::AssemblyFlattener;
pub use instances::{FlattenedAssembly, FlattenedInstance, InsertOutcome};
