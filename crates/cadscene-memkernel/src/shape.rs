// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape handles
//!
//! A [`MemShape`] is a shared topological definition ([`TShape`]) plus a
//! location. Placing a shape never copies its definition, so every placed
//! instance of one part points at the same `Arc<TShape>`.

use cadscene_model::{MeshData, ShapeType, Transform};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Underlying geometry of a topological definition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    /// Pure container (compounds)
    Empty,
    /// Axis-aligned box with one corner at the origin
    Box { dx: f64, dy: f64, dz: f64 },
    /// Cylinder along +Z with its base centered on the origin
    Cylinder { radius: f64, height: f64 },
    /// Connected line segments
    Polyline { points: Vec<[f64; 3]> },
    /// Triangle mesh (STL import)
    Mesh { mesh: MeshData },
}

/// Topological definition shared between placed instances
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TShape {
    pub kind: ShapeType,
    pub geometry: Geometry,
    /// Sub-shapes with locations relative to this definition
    #[serde(default)]
    pub children: Vec<MemShape>,
}

/// Placed shape handle
///
/// A handle without a definition is null.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemShape {
    tshape: Option<Arc<TShape>>,
    #[serde(default)]
    location: Transform,
}

impl MemShape {
    /// The null handle
    pub fn null() -> Self {
        Self::default()
    }

    /// Wrap a definition at the identity location
    pub fn from_tshape(tshape: TShape) -> Self {
        Self {
            tshape: Some(Arc::new(tshape)),
            location: Transform::identity(),
        }
    }

    fn primitive(kind: ShapeType, geometry: Geometry) -> Self {
        Self::from_tshape(TShape {
            kind,
            geometry,
            children: Vec::new(),
        })
    }

    /// Solid box spanning `[0, dx] x [0, dy] x [0, dz]`
    pub fn make_box(dx: f64, dy: f64, dz: f64) -> Self {
        Self::primitive(ShapeType::Solid, Geometry::Box { dx, dy, dz })
    }

    /// Solid cylinder along +Z
    pub fn make_cylinder(radius: f64, height: f64) -> Self {
        Self::primitive(ShapeType::Solid, Geometry::Cylinder { radius, height })
    }

    /// Straight edge between two points
    pub fn make_edge(start: [f64; 3], end: [f64; 3]) -> Self {
        Self::primitive(
            ShapeType::Edge,
            Geometry::Polyline {
                points: vec![start, end],
            },
        )
    }

    /// Wire through a sequence of points
    pub fn make_wire(points: Vec<[f64; 3]>) -> Self {
        Self::primitive(ShapeType::Wire, Geometry::Polyline { points })
    }

    /// Shell made of a triangle mesh
    pub fn make_mesh(mesh: MeshData) -> Self {
        Self::primitive(ShapeType::Shell, Geometry::Mesh { mesh })
    }

    /// Compound of shapes, in order
    pub fn make_compound(children: Vec<MemShape>) -> Self {
        Self::from_tshape(TShape {
            kind: ShapeType::Compound,
            geometry: Geometry::Empty,
            children,
        })
    }

    pub fn is_null(&self) -> bool {
        self.tshape.is_none()
    }

    /// Shared definition, `None` for the null handle
    pub fn tshape(&self) -> Option<&Arc<TShape>> {
        self.tshape.as_ref()
    }

    pub fn location(&self) -> &Transform {
        &self.location
    }

    /// Copy of this handle moved by `transform` on top of its current location
    pub fn moved(&self, transform: &Transform) -> Self {
        Self {
            tshape: self.tshape.clone(),
            location: transform.multiplied(&self.location),
        }
    }

    /// Whether both handles share a definition (by pointer or by value)
    pub fn same_definition(&self, other: &MemShape) -> bool {
        match (&self.tshape, &other.tshape) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || **a == **b,
            _ => false,
        }
    }
}
