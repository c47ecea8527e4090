// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellation, curve discretization and edge projection
//!
//! Triangles are produced in the frame of the tessellated handle's
//! definition; children of compounds are baked in through their relative
//! locations. The handle's own location is returned as the placement.

use crate::{Geometry, MemKernel, MemShape, TShape};
use cadscene_model::{
    BoundingBox, EdgeProjector, MeshData, MeshQuality, Polyline, ProjectedEdges, ProjectionView,
    Tessellation, TessellationRequest, Tessellator, Transform,
};
use nalgebra::Vector3;
use std::f64::consts::TAU;

/// Minimum number of segments around a cylinder
const MIN_SEGMENTS: usize = 3;

/// Maximum number of segments around a cylinder
const MAX_SEGMENTS: usize = 1024;

/// Box faces: outward normal and corner indices (bit 0 = x, bit 1 = y, bit 2 = z)
const BOX_FACES: [([f32; 3], [usize; 4]); 6] = [
    ([0.0, 0.0, -1.0], [0, 2, 3, 1]),
    ([0.0, 0.0, 1.0], [4, 5, 7, 6]),
    ([0.0, -1.0, 0.0], [0, 1, 5, 4]),
    ([0.0, 1.0, 0.0], [2, 6, 7, 3]),
    ([-1.0, 0.0, 0.0], [0, 4, 6, 2]),
    ([1.0, 0.0, 0.0], [1, 3, 7, 5]),
];

/// Number of segments needed to honor both deflections on a circle
pub fn segment_count(radius: f64, quality: &MeshQuality) -> usize {
    let mut count = if quality.angular_deflection > 0.0 {
        (TAU / quality.angular_deflection).ceil()
    } else {
        MAX_SEGMENTS as f64
    };
    let linear = quality.linear_deflection;
    if linear > 0.0 && linear < radius {
        let step = 2.0 * (1.0 - linear / radius).acos();
        count = count.max((TAU / step).ceil());
    }
    (count as usize).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

fn box_corner(corner: usize, dx: f64, dy: f64, dz: f64) -> [f64; 3] {
    [
        if corner & 1 != 0 { dx } else { 0.0 },
        if corner & 2 != 0 { dy } else { 0.0 },
        if corner & 4 != 0 { dz } else { 0.0 },
    ]
}

/// Box mesh: four vertices per face, twelve edge groups
fn box_mesh(dx: f64, dy: f64, dz: f64) -> (MeshData, Vec<Vec<u32>>) {
    let mut mesh = MeshData::with_capacity(24, 36);
    let mut corner_vertex = [0u32; 8];

    for (face, (normal, corners)) in BOX_FACES.iter().enumerate() {
        let base = (face * 4) as u32;
        for (k, &corner) in corners.iter().enumerate() {
            let p = box_corner(corner, dx, dy, dz);
            mesh.positions
                .extend_from_slice(&[p[0] as f32, p[1] as f32, p[2] as f32]);
            mesh.normals.extend_from_slice(normal);
            if face_first_use(corner, face) {
                corner_vertex[corner] = base + k as u32;
            }
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let mut edges = Vec::with_capacity(12);
    for corner in 0..8 {
        for bit in [1, 2, 4] {
            if corner & bit == 0 {
                edges.push(vec![corner_vertex[corner], corner_vertex[corner | bit]]);
            }
        }
    }
    (mesh, edges)
}

/// Whether `face` is the first face in [`BOX_FACES`] that uses `corner`
fn face_first_use(corner: usize, face: usize) -> bool {
    BOX_FACES
        .iter()
        .position(|(_, corners)| corners.contains(&corner))
        == Some(face)
}

/// Cylinder mesh: side rings, two fans, circle and seam edge groups
fn cylinder_mesh(radius: f64, height: f64, quality: &MeshQuality) -> (MeshData, Vec<Vec<u32>>) {
    let n = segment_count(radius, quality);
    let mut mesh = MeshData::with_capacity(4 * n + 2, 12 * n);

    let ring = |z: f64, normal: Option<[f32; 3]>, mesh: &mut MeshData| {
        for i in 0..n {
            let angle = TAU * i as f64 / n as f64;
            let (sin, cos) = angle.sin_cos();
            mesh.positions.extend_from_slice(&[
                (radius * cos) as f32,
                (radius * sin) as f32,
                z as f32,
            ]);
            let nrm = normal.unwrap_or([cos as f32, sin as f32, 0.0]);
            mesh.normals.extend_from_slice(&nrm);
        }
    };

    // Side: bottom ring [0, n), top ring [n, 2n)
    ring(0.0, None, &mut mesh);
    ring(height, None, &mut mesh);
    let n32 = n as u32;
    for i in 0..n32 {
        let j = (i + 1) % n32;
        mesh.indices
            .extend_from_slice(&[i, j, n32 + j, i, n32 + j, n32 + i]);
    }

    // Caps: center followed by a flat-shaded ring
    for (bottom, z, normal) in [
        (true, 0.0, [0.0, 0.0, -1.0f32]),
        (false, height, [0.0, 0.0, 1.0f32]),
    ] {
        let center = mesh.vertex_count() as u32;
        mesh.positions.extend_from_slice(&[0.0, 0.0, z as f32]);
        mesh.normals.extend_from_slice(&normal);
        ring(z, Some(normal), &mut mesh);
        for i in 0..n32 {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % n32;
            if bottom {
                mesh.indices.extend_from_slice(&[center, b, a]);
            } else {
                mesh.indices.extend_from_slice(&[center, a, b]);
            }
        }
    }

    let bottom: Vec<u32> = (0..n32).chain(std::iter::once(0)).collect();
    let top: Vec<u32> = (n32..2 * n32).chain(std::iter::once(n32)).collect();
    let seam = vec![0, n32];
    (mesh, vec![bottom, top, seam])
}

/// Append `part` transformed by `to_root`, offsetting indices
fn append_transformed(
    out: &mut MeshData,
    edges_out: &mut Vec<Vec<u32>>,
    part: &MeshData,
    part_edges: &[Vec<u32>],
    to_root: &Transform,
) {
    let offset = out.vertex_count() as u32;
    edges_out.extend(
        part_edges
            .iter()
            .map(|group| group.iter().map(|i| i + offset).collect::<Vec<_>>()),
    );

    if to_root.is_identity(0.0) {
        out.merge(part);
        return;
    }

    let mut placed = MeshData::with_capacity(part.vertex_count(), 0);
    for p in part.positions.chunks_exact(3) {
        let q = to_root.transform_point([p[0] as f64, p[1] as f64, p[2] as f64]);
        placed
            .positions
            .extend_from_slice(&[q[0] as f32, q[1] as f32, q[2] as f32]);
    }
    for n in part.normals.chunks_exact(3) {
        let m = to_root.transform_vector([n[0] as f64, n[1] as f64, n[2] as f64]);
        placed
            .normals
            .extend_from_slice(&[m[0] as f32, m[1] as f32, m[2] as f32]);
    }
    placed.indices.extend_from_slice(&part.indices);
    out.merge(&placed);
}

fn collect_triangles(
    tshape: &TShape,
    to_root: &Transform,
    quality: &MeshQuality,
    mesh: &mut MeshData,
    edges: &mut Vec<Vec<u32>>,
) {
    match &tshape.geometry {
        Geometry::Box { dx, dy, dz } => {
            let (part, part_edges) = box_mesh(*dx, *dy, *dz);
            append_transformed(mesh, edges, &part, &part_edges, to_root);
        }
        Geometry::Cylinder { radius, height } => {
            let (part, part_edges) = cylinder_mesh(*radius, *height, quality);
            append_transformed(mesh, edges, &part, &part_edges, to_root);
        }
        Geometry::Mesh { mesh: part } => {
            append_transformed(mesh, edges, part, &[], to_root);
        }
        Geometry::Polyline { .. } | Geometry::Empty => {}
    }

    for child in &tshape.children {
        if let Some(child_tshape) = child.tshape() {
            let child_to_root = to_root.multiplied(child.location());
            collect_triangles(child_tshape, &child_to_root, quality, mesh, edges);
        }
    }
}

fn circle(radius: f64, z: f64, n: usize, to_global: &Transform) -> Polyline {
    (0..=n)
        .map(|i| {
            let angle = TAU * (i % n) as f64 / n as f64;
            to_global.transform_point([radius * angle.cos(), radius * angle.sin(), z])
        })
        .collect()
}

fn collect_curves(
    tshape: &TShape,
    to_global: &Transform,
    quality: &MeshQuality,
    out: &mut Vec<Polyline>,
) {
    match &tshape.geometry {
        Geometry::Polyline { points } => {
            out.push(points.iter().map(|p| to_global.transform_point(*p)).collect());
        }
        Geometry::Box { dx, dy, dz } => {
            for corner in 0..8 {
                for bit in [1, 2, 4] {
                    if corner & bit == 0 {
                        out.push(vec![
                            to_global.transform_point(box_corner(corner, *dx, *dy, *dz)),
                            to_global.transform_point(box_corner(corner | bit, *dx, *dy, *dz)),
                        ]);
                    }
                }
            }
        }
        Geometry::Cylinder { radius, height } => {
            let n = segment_count(*radius, quality);
            out.push(circle(*radius, 0.0, n, to_global));
            out.push(circle(*radius, *height, n, to_global));
            out.push(vec![
                to_global.transform_point([*radius, 0.0, 0.0]),
                to_global.transform_point([*radius, 0.0, *height]),
            ]);
        }
        Geometry::Mesh { .. } | Geometry::Empty => {}
    }

    for child in &tshape.children {
        if let Some(child_tshape) = child.tshape() {
            collect_curves(child_tshape, &to_global.multiplied(child.location()), quality, out);
        }
    }
}

impl Tessellator for MemKernel {
    type Shape = MemShape;

    fn tessellate(&self, shape: &MemShape, request: &TessellationRequest) -> Tessellation {
        let Some(tshape) = shape.tshape() else {
            return Tessellation::default();
        };

        let mut mesh = MeshData::new();
        let mut edges = Vec::new();
        collect_triangles(tshape, &Transform::identity(), &request.quality, &mut mesh, &mut edges);

        if !request.compute_normals {
            mesh.normals.clear();
        }
        if !request.compute_edges {
            edges.clear();
        }
        let bounding_box = BoundingBox::from_positions(&mesh.positions);

        log::debug!(
            "tessellated {} into {} triangles, {} edges",
            tshape.kind,
            mesh.triangle_count(),
            edges.len()
        );

        Tessellation {
            mesh,
            edges,
            placement: *shape.location(),
            bounding_box,
        }
    }

    fn discretize_curves(&self, shape: &MemShape, quality: &MeshQuality) -> Vec<Polyline> {
        let mut out = Vec::new();
        if let Some(tshape) = shape.tshape() {
            collect_curves(tshape, shape.location(), quality, &mut out);
        }
        out
    }

    fn incremental_mesh(&self, shape: &MemShape, quality: &MeshQuality) -> bool {
        !shape.is_null() && quality.linear_deflection > 0.0 && quality.angular_deflection > 0.0
    }
}

/// Orthonormal basis of the view plane for a projection direction
fn view_basis(direction: [f64; 3]) -> (Vector3<f64>, Vector3<f64>) {
    let d = Vector3::from(direction)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::z);
    let up = if d.dot(&Vector3::z()).abs() > 0.999 {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let x_axis = up.cross(&d).normalize();
    let y_axis = d.cross(&x_axis);
    (x_axis, y_axis)
}

impl EdgeProjector for MemKernel {
    type Shape = MemShape;

    /// Orthographic projection without occlusion: every edge is reported
    /// visible and `hidden` stays empty.
    fn project_edges(
        &self,
        shape: &MemShape,
        view: &ProjectionView,
        _include_hidden: bool,
    ) -> ProjectedEdges {
        let quality = MeshQuality {
            linear_deflection: view.tolerance,
            ..MeshQuality::default()
        };
        let (x_axis, y_axis) = view_basis(view.direction);
        let origin = Vector3::from(view.origin);

        let visible = self
            .discretize_curves(shape, &quality)
            .into_iter()
            .map(|polyline| {
                polyline
                    .into_iter()
                    .map(|p| {
                        let v = Vector3::from(p) - origin;
                        [v.dot(&x_axis), v.dot(&y_axis), 0.0]
                    })
                    .collect()
            })
            .collect();

        ProjectedEdges {
            visible,
            hidden: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cadscene_model::GeometryKernel;

    fn full_request(quality: MeshQuality) -> TessellationRequest {
        TessellationRequest::new(quality)
            .with_normals(true)
            .with_edges(true)
    }

    #[test]
    fn test_box_tessellation_counts() {
        let kernel = MemKernel::new();
        let result = kernel.tessellate(
            &MemShape::make_box(10.0, 20.0, 30.0),
            &full_request(MeshQuality::default()),
        );

        assert_eq!(result.mesh.vertex_count(), 24);
        assert_eq!(result.mesh.triangle_count(), 12);
        assert_eq!(result.mesh.normal_count(), 24);
        assert_eq!(result.edges.len(), 12);
        assert!(result.edges.iter().all(|e| e.len() == 2));

        let bbox = result.bounding_box.unwrap();
        assert_eq!(bbox.size(), [10.0, 20.0, 30.0]);
        assert_eq!(bbox.center(), [5.0, 10.0, 15.0]);
    }

    #[test]
    fn test_edges_reference_mesh_vertices() {
        let kernel = MemKernel::new();
        let result = kernel.tessellate(
            &MemShape::make_cylinder(2.0, 5.0),
            &full_request(MeshQuality::default()),
        );
        let count = result.mesh.vertex_count() as u32;
        assert!(result.edges.iter().flatten().all(|&i| i < count));
    }

    #[test]
    fn test_finer_quality_gives_more_triangles() {
        let kernel = MemKernel::new();
        let cylinder = MemShape::make_cylinder(5.0, 1.0);
        let coarse = kernel.tessellate(&cylinder, &TessellationRequest::new(MeshQuality::new(1.0, 1.0)));
        let fine = kernel.tessellate(&cylinder, &TessellationRequest::new(MeshQuality::new(0.01, 0.1)));
        assert!(fine.mesh.triangle_count() > coarse.mesh.triangle_count());
    }

    #[test]
    fn test_segment_count_bounds() {
        assert_eq!(segment_count(1.0, &MeshQuality::new(10.0, 10.0)), MIN_SEGMENTS);
        assert_eq!(segment_count(1.0, &MeshQuality::new(0.1, 0.5)), 13);
        assert_eq!(segment_count(1.0, &MeshQuality::new(0.0, 0.0)), MAX_SEGMENTS);
    }

    #[test]
    fn test_placement_is_shape_location() {
        let kernel = MemKernel::new();
        let placed = kernel.apply_transform(
            &MemShape::make_box(1.0, 1.0, 1.0),
            &Transform::from_translation(0.0, 0.0, 10.0),
        );
        let result = kernel.tessellate(&placed, &TessellationRequest::default());
        assert_eq!(result.placement.translation(), [0.0, 0.0, 10.0]);
        // Positions stay local
        assert_eq!(result.bounding_box.unwrap().max, [1.0, 1.0, 1.0]);
        assert!(result.mesh.normals.is_empty());
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_compound_children_are_baked_in() {
        let kernel = MemKernel::new();
        let moved = kernel.apply_transform(
            &MemShape::make_box(1.0, 1.0, 1.0),
            &Transform::from_translation(5.0, 0.0, 0.0),
        );
        let compound = kernel.make_compound(&[MemShape::make_box(1.0, 1.0, 1.0), moved]);
        let result = kernel.tessellate(&compound, &TessellationRequest::default());

        assert_eq!(result.mesh.triangle_count(), 24);
        assert_eq!(result.bounding_box.unwrap().max[0], 6.0);
        // Second child indices are offset past the first child's vertices
        assert_eq!(result.mesh.vertex_count(), 48);
        assert!(result.mesh.indices[36..].iter().all(|&i| (24..48).contains(&i)));
    }

    #[test]
    fn test_null_and_curve_tessellate_empty() {
        let kernel = MemKernel::new();
        let request = TessellationRequest::default();
        assert!(kernel.tessellate(&MemShape::null(), &request).is_empty());
        let edge = MemShape::make_edge([0.0; 3], [1.0, 0.0, 0.0]);
        assert!(kernel.tessellate(&edge, &request).is_empty());
    }

    #[test]
    fn test_discretized_curves_are_global() {
        let kernel = MemKernel::new();
        let wire = kernel.apply_transform(
            &MemShape::make_wire(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]),
            &Transform::from_translation(0.0, 0.0, 2.0),
        );
        let curves = kernel.discretize_curves(&wire, &MeshQuality::default());
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0][2], [1.0, 1.0, 2.0]);

        let boxed = MemShape::make_box(1.0, 1.0, 1.0);
        assert_eq!(kernel.discretize_curves(&boxed, &MeshQuality::default()).len(), 12);
    }

    #[test]
    fn test_incremental_mesh() {
        let kernel = MemKernel::new();
        let shape = MemShape::make_box(1.0, 1.0, 1.0);
        assert!(kernel.incremental_mesh(&shape, &MeshQuality::stl_default()));
        assert!(!kernel.incremental_mesh(&shape, &MeshQuality::new(0.0, 0.5)));
        assert!(!kernel.incremental_mesh(&MemShape::null(), &MeshQuality::default()));
    }

    #[test]
    fn test_top_view_projection() {
        let kernel = MemKernel::new();
        let edge = MemShape::make_edge([0.0, 0.0, 0.0], [3.0, 4.0, 7.0]);
        let view = ProjectionView {
            direction: [0.0, 0.0, 1.0],
            ..ProjectionView::default()
        };
        let projected = kernel.project_edges(&edge, &view, true);

        assert!(projected.hidden.is_empty());
        let end = projected.visible[0][1];
        assert_relative_eq!(end[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(end[1], 4.0, epsilon = 1e-12);
        assert_eq!(end[2], 0.0);
    }
}
