// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IGES import and export

use crate::exchange::ensure_exists;
use crate::roots::classify_roots;
use crate::{Exchange, ReadReport, WriteReport};
use cadscene_model::{FormatOptions, GeometryKernel, ReadOptions, Result, ShapeReader, ShapeWriter};
use std::path::Path;

impl<'k, K: GeometryKernel> Exchange<'k, K> {
    /// Read an IGES file
    ///
    /// Several roots come back as one compound unless `return_as_shapes` is
    /// set. `visible_only` is forwarded to the reader.
    pub fn read_iges<R>(
        &self,
        reader: &R,
        path: impl AsRef<Path>,
        return_as_shapes: bool,
        visible_only: bool,
    ) -> Result<ReadReport<K::Shape>>
    where
        R: ShapeReader<Shape = K::Shape>,
    {
        let path = path.as_ref();
        ensure_exists(path)?;
        let transfer = reader.read_roots(path, &ReadOptions { visible_only });
        classify_roots(self.kernel, transfer, !return_as_shapes, path)
    }

    /// Write a shape to an IGES file
    pub fn write_iges<W>(&self, writer: &W, shape: &K::Shape, path: impl AsRef<Path>) -> Result<WriteReport>
    where
        W: ShapeWriter<Shape = K::Shape>,
    {
        let path = path.as_ref();
        self.require_shape(shape)?;
        self.write_checked(writer, shape, path, &FormatOptions::Iges, "IGES")
    }
}
