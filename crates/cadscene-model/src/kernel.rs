// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry kernel and tessellation traits
//!
//! Shapes are opaque handles owned by the kernel. The pipeline never mutates
//! a handle; it only asks for transformed copies and compares handles through
//! [`GeometryKernel::same_shape`].

use crate::{BoundingBox, MeshData, ShapeType, Transform};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Default linear (chordal) deflection used for scene tessellation
pub const DEFAULT_LINEAR_DEFLECTION: f64 = 0.1;

/// Default angular deflection (radians) used for scene tessellation
pub const DEFAULT_ANGULAR_DEFLECTION: f64 = 0.5;

/// Default linear deflection applied before STL export
pub const STL_LINEAR_DEFLECTION: f64 = 0.9;

/// Default angular deflection applied before STL export
pub const STL_ANGULAR_DEFLECTION: f64 = 0.5;

/// Opaque shape handle operations
///
/// # Example
///
/// ```ignore
/// use cadscene_model::{GeometryKernel, Transform};
///
/// let moved = kernel.apply_transform(&shape, &Transform::from_translation(0.0, 0.0, 10.0));
/// assert!(!kernel.same_shape(&moved, &shape));
/// ```
pub trait GeometryKernel {
    /// Shape handle type
    type Shape: Clone + Debug;

    /// Return a transformed copy of `shape`
    ///
    /// The transform is applied on top of any location the handle already
    /// carries.
    fn apply_transform(&self, shape: &Self::Shape, transform: &Transform) -> Self::Shape;

    /// Topological kind of the shape
    fn shape_type(&self, shape: &Self::Shape) -> ShapeType;

    /// Whether the handle refers to nothing
    fn is_null(&self, shape: &Self::Shape) -> bool;

    /// Kernel-defined equality
    ///
    /// Implementations may use a tolerance, so two handles built
    /// independently can compare equal.
    fn same_shape(&self, a: &Self::Shape, b: &Self::Shape) -> bool;

    /// Group shapes into a single compound, preserving order
    fn make_compound(&self, shapes: &[Self::Shape]) -> Self::Shape;

    /// Direct sub-shapes of a compound (empty for other kinds)
    fn children(&self, shape: &Self::Shape) -> Vec<Self::Shape>;
}

/// Mesh coarseness parameters
///
/// Smaller values produce finer meshes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshQuality {
    /// Maximum chordal distance between the mesh and the surface
    pub linear_deflection: f64,
    /// Maximum angle (radians) between adjacent facet normals
    pub angular_deflection: f64,
}

impl Default for MeshQuality {
    fn default() -> Self {
        Self {
            linear_deflection: DEFAULT_LINEAR_DEFLECTION,
            angular_deflection: DEFAULT_ANGULAR_DEFLECTION,
        }
    }
}

impl MeshQuality {
    /// Create quality parameters
    pub fn new(linear_deflection: f64, angular_deflection: f64) -> Self {
        Self {
            linear_deflection,
            angular_deflection,
        }
    }

    /// Coarser settings used before STL export
    pub fn stl_default() -> Self {
        Self::new(STL_LINEAR_DEFLECTION, STL_ANGULAR_DEFLECTION)
    }

    /// Scale both deflections (factor > 1 is coarser)
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.linear_deflection * factor,
            self.angular_deflection * factor,
        )
    }
}

/// What the tessellator should compute
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TessellationRequest {
    pub quality: MeshQuality,
    /// Emit per-vertex normals
    pub compute_normals: bool,
    /// Emit per-edge vertex index groups
    pub compute_edges: bool,
}

impl TessellationRequest {
    /// Request with the given quality and no normals or edges
    pub fn new(quality: MeshQuality) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }

    pub fn with_normals(mut self, enabled: bool) -> Self {
        self.compute_normals = enabled;
        self
    }

    pub fn with_edges(mut self, enabled: bool) -> Self {
        self.compute_edges = enabled;
        self
    }
}

/// Tessellation result
///
/// Positions are in the shape's local frame; `placement` maps them to the
/// global frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tessellation {
    pub mesh: MeshData,
    /// Per-edge vertex index groups into `mesh.positions`
    pub edges: Vec<Vec<u32>>,
    /// Translation and rotation of the local frame
    pub placement: Transform,
    /// Bounding box in the local frame, if known
    pub bounding_box: Option<BoundingBox>,
}

impl Tessellation {
    /// Whether the vertex buffer is empty
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}

/// A discretized curve as a sequence of 3D points
pub type Polyline = Vec<[f64; 3]>;

/// Triangulation engine
pub trait Tessellator {
    /// Shape handle type
    type Shape;

    /// Triangulate a shape
    fn tessellate(&self, shape: &Self::Shape, request: &TessellationRequest) -> Tessellation;

    /// Discretize every edge of a shape into polylines (global frame)
    fn discretize_curves(&self, shape: &Self::Shape, quality: &MeshQuality) -> Vec<Polyline>;

    /// Pre-mesh a shape in place for mesh-based writers
    ///
    /// Returns `false` when meshing did not complete.
    fn incremental_mesh(&self, shape: &Self::Shape, quality: &MeshQuality) -> bool;
}

/// Viewpoint for hidden-line projection
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionView {
    /// Look-at point
    pub origin: [f64; 3],
    /// Projection direction
    pub direction: [f64; 3],
    /// Discretization tolerance for projected edges
    pub tolerance: f64,
}

impl Default for ProjectionView {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0, 0.0],
            direction: [1.0, 1.0, 1.0],
            tolerance: 0.1,
        }
    }
}

/// Projected edges split by visibility, discretized in the view plane
///
/// Points are `[x, y, 0]` in projection coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectedEdges {
    pub visible: Vec<Polyline>,
    pub hidden: Vec<Polyline>,
}

/// Hidden-line removal
pub trait EdgeProjector {
    /// Shape handle type
    type Shape;

    /// Project the edges of a shape onto the view plane
    ///
    /// When `include_hidden` is false the `hidden` list is left empty.
    fn project_edges(
        &self,
        shape: &Self::Shape,
        view: &ProjectionView,
        include_hidden: bool,
    ) -> ProjectedEdges;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_defaults_are_documented_constants() {
        let quality = MeshQuality::default();
        assert_eq!(quality.linear_deflection, DEFAULT_LINEAR_DEFLECTION);
        assert_eq!(quality.angular_deflection, DEFAULT_ANGULAR_DEFLECTION);

        let stl = MeshQuality::stl_default();
        assert_eq!(stl.linear_deflection, 0.9);
        assert_eq!(stl.angular_deflection, 0.5);
    }

    #[test]
    fn test_quality_from_partial_json() {
        let quality: MeshQuality = serde_json::from_str(r#"{"linear_deflection": 0.01}"#).unwrap();
        assert_eq!(quality.linear_deflection, 0.01);
        assert_eq!(quality.angular_deflection, DEFAULT_ANGULAR_DEFLECTION);
    }

    #[test]
    fn test_request_builder() {
        let request = TessellationRequest::new(MeshQuality::default())
            .with_normals(true)
            .with_edges(true);
        assert!(request.compute_normals);
        assert!(request.compute_edges);
    }
}
