// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STL reader and writer (ASCII and binary)

use crate::{MemKernel, MemShape};
use cadscene_model::{
    FormatOptions, MeshData, MeshQuality, ReadOptions, RootTransfer, ShapeReader, ShapeWriter,
    StlMode, TessellationRequest, Tessellator, TransferStatus,
};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Binary header size
const HEADER_LEN: usize = 80;

/// Bytes per binary facet record
const FACET_LEN: usize = 50;

/// Global-frame triangles of a shape
fn triangles(kernel: &MemKernel, shape: &MemShape, quality: MeshQuality) -> Vec<[[f32; 3]; 3]> {
    let tess = kernel.tessellate(shape, &TessellationRequest::new(quality));
    let point = |i: u32| {
        let base = i as usize * 3;
        let p = &tess.mesh.positions[base..base + 3];
        let q = tess
            .placement
            .transform_point([p[0] as f64, p[1] as f64, p[2] as f64]);
        [q[0] as f32, q[1] as f32, q[2] as f32]
    };
    tess.mesh
        .indices
        .chunks_exact(3)
        .map(|t| [point(t[0]), point(t[1]), point(t[2])])
        .collect()
}

fn facet_normal(tri: &[[f32; 3]; 3]) -> [f32; 3] {
    let u = [tri[1][0] - tri[0][0], tri[1][1] - tri[0][1], tri[1][2] - tri[0][2]];
    let v = [tri[2][0] - tri[0][0], tri[2][1] - tri[0][1], tri[2][2] - tri[0][2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 0.0 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 0.0]
    }
}

fn encode_ascii(tris: &[[[f32; 3]; 3]]) -> String {
    let mut out = String::from("solid shape\n");
    for tri in tris {
        let n = facet_normal(tri);
        let _ = writeln!(out, "  facet normal {:e} {:e} {:e}", n[0], n[1], n[2]);
        out.push_str("    outer loop\n");
        for p in tri {
            let _ = writeln!(out, "      vertex {:e} {:e} {:e}", p[0], p[1], p[2]);
        }
        out.push_str("    endloop\n  endfacet\n");
    }
    out.push_str("endsolid shape\n");
    out
}

fn encode_binary(tris: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 4 + FACET_LEN * tris.len());
    let mut header = [0u8; HEADER_LEN];
    let tag = b"cadscene binary stl";
    header[..tag.len()].copy_from_slice(tag);
    out.extend_from_slice(&header);
    out.extend_from_slice(&(tris.len() as u32).to_le_bytes());
    for tri in tris {
        for value in facet_normal(tri).iter().chain(tri.iter().flatten()) {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    out
}

fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let mut count = [0u8; 4];
    count.copy_from_slice(&bytes[HEADER_LEN..HEADER_LEN + 4]);
    let expected = HEADER_LEN + 4 + FACET_LEN * u32::from_le_bytes(count) as usize;
    expected == bytes.len()
}

fn parse_binary(bytes: &[u8]) -> Vec<[f32; 3]> {
    let f = |offset: usize| {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[offset..offset + 4]);
        f32::from_le_bytes(raw)
    };
    let mut points = Vec::new();
    let mut record = HEADER_LEN + 4;
    while record + FACET_LEN <= bytes.len() {
        for vertex in 0..3 {
            let base = record + 12 + vertex * 12;
            points.push([f(base), f(base + 4), f(base + 8)]);
        }
        record += FACET_LEN;
    }
    points
}

fn parse_ascii(text: &str) -> Option<Vec<[f32; 3]>> {
    let mut points = Vec::new();
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }
        let mut p = [0f32; 3];
        for slot in &mut p {
            *slot = tokens.next()?.parse().ok()?;
        }
        points.push(p);
    }
    Some(points)
}

/// Weld identical points into an indexed mesh
fn weld(points: &[[f32; 3]]) -> MeshData {
    let mut mesh = MeshData::with_capacity(points.len(), points.len());
    let mut seen: FxHashMap<[u32; 3], u32> = FxHashMap::default();
    for p in points {
        let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
        let next = seen.len() as u32;
        let index = *seen.entry(key).or_insert_with(|| {
            mesh.positions.extend_from_slice(p);
            next
        });
        mesh.indices.push(index);
    }
    mesh
}

/// Mesh-format exchange backed by [`MemKernel`] tessellation
#[derive(Clone, Copy, Debug, Default)]
pub struct StlExchange {
    kernel: MemKernel,
}

impl StlExchange {
    pub fn new(kernel: MemKernel) -> Self {
        Self { kernel }
    }
}

impl ShapeWriter for StlExchange {
    type Shape = MemShape;

    fn write_shape(&self, shape: &MemShape, path: &Path, options: &FormatOptions) -> TransferStatus {
        let FormatOptions::Stl { mode, quality } = options else {
            log::error!("STL writer needs STL options, got {:?}", options);
            return TransferStatus::Fail;
        };
        if shape.is_null() {
            return TransferStatus::Void;
        }
        let tris = triangles(&self.kernel, shape, *quality);
        let written = match mode {
            StlMode::Ascii => fs::write(path, encode_ascii(&tris)),
            StlMode::Binary => fs::write(path, encode_binary(&tris)),
        };
        match written {
            Ok(()) => TransferStatus::Done,
            Err(e) => {
                log::error!("cannot write {}: {}", path.display(), e);
                TransferStatus::Error
            }
        }
    }
}

impl ShapeReader for StlExchange {
    type Shape = MemShape;

    /// Always yields one root: a shell, or a null handle when the file holds
    /// no facets.
    fn read_roots(&self, path: &Path, _options: &ReadOptions) -> RootTransfer<MemShape> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("cannot read {}: {}", path.display(), e);
                return RootTransfer::failed(TransferStatus::Error);
            }
        };
        let points = if is_binary(&bytes) {
            parse_binary(&bytes)
        } else {
            match std::str::from_utf8(&bytes).ok().and_then(parse_ascii) {
                Some(points) => points,
                None => return RootTransfer::failed(TransferStatus::Fail),
            }
        };
        if points.is_empty() {
            return RootTransfer::done(vec![MemShape::null()]);
        }
        RootTransfer::done(vec![MemShape::make_mesh(weld(&points))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadscene_model::{GeometryKernel, ShapeType, Transform};
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cadscene-stl-{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn options(mode: StlMode) -> FormatOptions {
        FormatOptions::Stl {
            mode,
            quality: MeshQuality::stl_default(),
        }
    }

    #[test]
    fn test_ascii_roundtrip_welds_box_corners() {
        let path = scratch("box.stl");
        let stl = StlExchange::default();
        let status = stl.write_shape(&MemShape::make_box(1.0, 2.0, 3.0), &path, &options(StlMode::Ascii));
        assert_eq!(status, TransferStatus::Done);
        assert!(fs::read_to_string(&path).unwrap().starts_with("solid"));

        let transfer = stl.read_roots(&path, &ReadOptions::default());
        assert_eq!(transfer.status, TransferStatus::Done);
        let kernel = MemKernel::new();
        let shape = &transfer.roots[0];
        assert_eq!(kernel.shape_type(shape), ShapeType::Shell);

        let tess = kernel.tessellate(shape, &TessellationRequest::default());
        assert_eq!(tess.mesh.triangle_count(), 12);
        assert_eq!(tess.mesh.vertex_count(), 8);
    }

    #[test]
    fn test_binary_layout_and_placement() {
        let path = scratch("box.stl");
        let kernel = MemKernel::new();
        let placed = kernel.apply_transform(
            &MemShape::make_box(1.0, 1.0, 1.0),
            &Transform::from_translation(10.0, 0.0, 0.0),
        );
        let stl = StlExchange::new(kernel);
        assert_eq!(stl.write_shape(&placed, &path, &options(StlMode::Binary)), TransferStatus::Done);

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 4 + 12 * FACET_LEN);
        assert!(is_binary(&bytes));

        let transfer = stl.read_roots(&path, &ReadOptions::default());
        let tess = kernel.tessellate(&transfer.roots[0], &TessellationRequest::default());
        assert_eq!(tess.bounding_box.unwrap().min[0], 10.0);
    }

    #[test]
    fn test_wrong_options_fail() {
        let path = scratch("box.stl");
        let status = StlExchange::default().write_shape(
            &MemShape::make_box(1.0, 1.0, 1.0),
            &path,
            &FormatOptions::Native,
        );
        assert_eq!(status, TransferStatus::Fail);
    }

    #[test]
    fn test_empty_solid_reads_as_null() {
        let path = scratch("empty.stl");
        fs::write(&path, "solid empty\nendsolid empty\n").unwrap();
        let transfer = StlExchange::default().read_roots(&path, &ReadOptions::default());
        assert_eq!(transfer.status, TransferStatus::Done);
        assert!(transfer.roots[0].is_null());
    }
}
