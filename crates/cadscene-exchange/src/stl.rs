// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STL import and export

use crate::exchange::ensure_exists;
use crate::roots::classify_roots;
use crate::{Exchange, ReadReport, WriteReport};
use cadscene_model::{
    CadError, FormatOptions, GeometryKernel, MeshQuality, ReadOptions, Result, ShapeReader,
    ShapeWriter, StlMode, Tessellator,
};
use std::path::Path;

impl<'k, K: GeometryKernel> Exchange<'k, K> {
    /// Read an STL file into a single shape
    pub fn read_stl<R>(&self, reader: &R, path: impl AsRef<Path>) -> Result<ReadReport<K::Shape>>
    where
        R: ShapeReader<Shape = K::Shape>,
    {
        let path = path.as_ref();
        ensure_exists(path)?;
        let transfer = reader.read_roots(path, &ReadOptions::default());
        classify_roots(self.kernel, transfer, true, path)
    }

    /// Mesh a shape and write it to an STL file
    ///
    /// `mode` is `ascii` or `binary`. The shape is pre-meshed with `quality`
    /// (see [`MeshQuality::stl_default`]) and meshing must complete before
    /// the writer is called.
    pub fn write_stl<T, W>(
        &self,
        tessellator: &T,
        writer: &W,
        shape: &K::Shape,
        path: impl AsRef<Path>,
        mode: &str,
        quality: MeshQuality,
    ) -> Result<WriteReport>
    where
        T: Tessellator<Shape = K::Shape>,
        W: ShapeWriter<Shape = K::Shape>,
    {
        let path = path.as_ref();
        self.require_shape(shape)?;
        let mode: StlMode = mode.parse()?;
        if !(quality.linear_deflection > 0.0 && quality.angular_deflection > 0.0) {
            return Err(CadError::invalid_input(format!(
                "deflections must be positive, got linear {} and angular {}",
                quality.linear_deflection, quality.angular_deflection
            )));
        }
        if !tessellator.incremental_mesh(shape, &quality) {
            return Err(CadError::collaborator("mesh is not done"));
        }
        self.write_checked(writer, shape, path, &FormatOptions::Stl { mode, quality }, "STL")
    }
}
