// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orchestrator and the checks shared by every format

use crate::{ExchangeWarning, WriteReport};
use cadscene_model::{CadError, FormatOptions, GeometryKernel, Result, ShapeWriter};
use std::path::Path;

/// Import/export policy around native format collaborators
///
/// Holds the geometry kernel used for null checks and compound building.
/// Readers and writers are passed per call so one orchestrator can drive
/// any number of format backends.
pub struct Exchange<'k, K: GeometryKernel> {
    pub(crate) kernel: &'k K,
}

impl<'k, K: GeometryKernel> Exchange<'k, K> {
    pub fn new(kernel: &'k K) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &'k K {
        self.kernel
    }

    pub(crate) fn require_shape(&self, shape: &K::Shape) -> Result<()> {
        if self.kernel.is_null(shape) {
            return Err(CadError::invalid_input("shape is null"));
        }
        Ok(())
    }

    /// Hand a validated shape to a writer and check the result
    ///
    /// Preconditions on the shape and options must already hold.
    pub(crate) fn write_checked<W>(
        &self,
        writer: &W,
        shape: &K::Shape,
        path: &Path,
        options: &FormatOptions,
        format: &str,
    ) -> Result<WriteReport>
    where
        W: ShapeWriter<Shape = K::Shape>,
    {
        let warnings = check_overwrite(path);
        let status = writer.write_shape(shape, path, options);
        if !status.is_done() {
            return Err(CadError::collaborator(format!(
                "error while writing shape to {} file {}: writer status {}",
                format,
                path.display(),
                status
            )));
        }
        ensure_written(path)?;
        log::info!("shape exported to {}", path.display());
        Ok(WriteReport {
            path: path.to_path_buf(),
            warnings,
        })
    }
}

/// Fail with `NotFound` unless `path` is an existing file
pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(CadError::not_found(path));
    }
    Ok(())
}

/// One warning when the destination is about to be replaced
pub(crate) fn check_overwrite(path: &Path) -> Vec<ExchangeWarning> {
    if path.exists() {
        let warning = ExchangeWarning::OverwritingFile(path.to_path_buf());
        log::warn!("{}", warning);
        vec![warning]
    } else {
        Vec::new()
    }
}

/// Fail with `Postcondition` unless the writer left a file behind
pub(crate) fn ensure_written(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(CadError::postcondition(format!(
            "file {} not written to disk",
            path.display()
        )));
    }
    Ok(())
}
