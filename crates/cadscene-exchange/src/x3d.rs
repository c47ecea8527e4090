// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-shape X3D export

use crate::exchange::{check_overwrite, ensure_written};
use crate::{Exchange, WriteReport};
use cadscene_model::{GeometryKernel, Result, Tessellator};
use cadscene_x3d::{FragmentBuilder, FragmentStyle, SceneDocument};
use std::path::Path;

impl<'k, K: GeometryKernel> Exchange<'k, K> {
    /// Write one shape as a complete X3D document
    pub fn write_x3d<T>(
        &self,
        tessellator: &T,
        shape: &K::Shape,
        path: impl AsRef<Path>,
        style: &FragmentStyle,
    ) -> Result<WriteReport>
    where
        T: Tessellator<Shape = K::Shape>,
    {
        let path = path.as_ref();
        self.require_shape(shape)?;
        let fragment = FragmentBuilder::new(self.kernel, tessellator).build(shape, style)?;

        let warnings = check_overwrite(path);
        SceneDocument::new().add(fragment).write_to(path)?;
        ensure_written(path)?;
        Ok(WriteReport {
            path: path.to_path_buf(),
            warnings,
        })
    }
}
