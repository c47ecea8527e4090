// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for shape and scene data
//!
//! This module defines the fundamental value types passed between the
//! collaborators and the export pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe assembly label identifier
///
/// Wraps the document's label tag (e.g., label 0:1:1:3 is stored by its
/// document-local index).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
pub struct LabelId(pub u32);

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl From<u32> for LabelId {
    fn from(id: u32) -> Self {
        LabelId(id)
    }
}

impl From<LabelId> for u32 {
    fn from(id: LabelId) -> Self {
        id.0
    }
}

/// Topological kind of a shape as reported by the kernel
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Compound,
    CompSolid,
    Solid,
    Shell,
    Face,
    Wire,
    Edge,
    Vertex,
}

impl ShapeType {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Compound => "Compound",
            ShapeType::CompSolid => "CompSolid",
            ShapeType::Solid => "Solid",
            ShapeType::Shell => "Shell",
            ShapeType::Face => "Face",
            ShapeType::Wire => "Wire",
            ShapeType::Edge => "Edge",
            ShapeType::Vertex => "Vertex",
        }
    }

    /// One-dimensional topology (edges and wires)
    pub fn is_curve(&self) -> bool {
        matches!(self, ShapeType::Edge | ShapeType::Wire)
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// RGB color, components in 0.0-1.0
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Fallback color when no instance or definition color resolves
    pub const DEFAULT_GRAY: Color = Color::rgb(0.5, 0.5, 0.5);

    /// Default shaded color for exported shapes
    pub const DEFAULT_SHAPE: Color = Color::rgb(0.65, 0.65, 0.7);

    /// Default specular color
    pub const DEFAULT_SPECULAR: Color = Color::rgb(0.2, 0.2, 0.2);

    /// Black
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Create a color from RGB components
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::DEFAULT_GRAY
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Compute the bounding box of flattened [x, y, z, ...] positions
    ///
    /// Returns `None` for an empty buffer.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let mut chunks = positions.chunks_exact(3);
        let first = chunks.next()?;
        let start = [first[0] as f64, first[1] as f64, first[2] as f64];
        let mut bbox = BoundingBox {
            min: start,
            max: start,
        };
        for p in chunks {
            bbox.add_point([p[0] as f64, p[1] as f64, p[2] as f64]);
        }
        Some(bbox)
    }

    /// Grow the box to include a point
    pub fn add_point(&mut self, p: [f64; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    /// Extent along each axis
    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Center point
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }
}

/// Triangle mesh data
///
/// Contains flattened vertex data as produced by the tessellator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Vertex positions as flattened [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals as flattened [nx, ny, nz, nx, ny, nz, ...] (may be empty)
    #[serde(default)]
    pub normals: Vec<f32>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create mesh with pre-allocated capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Check if mesh has no vertices
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get normal count
    pub fn normal_count(&self) -> usize {
        self.normals.len() / 3
    }

    /// Merge another mesh into this one
    pub fn merge(&mut self, other: &MeshData) {
        let vertex_offset = self.vertex_count() as u32;

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|i| i + vertex_offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_merge_offsets_indices() {
        let mut a = MeshData {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: Vec::new(),
            indices: vec![0, 1, 2],
        };
        let b = a.clone();
        a.merge(&b);

        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.triangle_count(), 2);
        assert_eq!(&a.indices[3..], &[3, 4, 5]);
    }

    #[test]
    fn test_bounding_box() {
        let bbox =
            BoundingBox::from_positions(&[0.0, 0.0, 0.0, 10.0, 20.0, 30.0, 5.0, -2.0, 1.0])
                .unwrap();
        assert_eq!(bbox.size(), [10.0, 22.0, 30.0]);
        assert_relative_eq!(bbox.center()[1], 9.0);
        assert!(BoundingBox::from_positions(&[]).is_none());
    }

    #[test]
    fn test_default_color_is_gray() {
        assert_eq!(Color::default(), Color::rgb(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_curve_kinds() {
        assert!(ShapeType::Edge.is_curve());
        assert!(ShapeType::Wire.is_curve());
        assert!(!ShapeType::Solid.is_curve());
        assert!(!ShapeType::Compound.is_curve());
    }
}
