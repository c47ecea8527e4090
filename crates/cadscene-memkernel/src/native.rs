// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON-backed native exchange format
//!
//! Stands in for B-rep exchange formats (STEP, IGES). A file holds the
//! format tag, the schema it was written with and the ordered list of root
//! shapes, null roots included. Document files carry a whole
//! [`MemDocument`] instead of roots.

use crate::{MemDocument, MemShape};
use cadscene_model::{
    DocumentReader, DocumentTransfer, FormatOptions, ReadOptions, Result, RootTransfer,
    ShapeReader, ShapeWriter, TransferStatus,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Format tag written into native files
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeFormat {
    Step,
    Iges,
}

#[derive(Debug, Serialize, Deserialize)]
struct NativeFile {
    format: NativeFormat,
    #[serde(default)]
    schema: Option<String>,
    #[serde(default)]
    roots: Vec<MemShape>,
    #[serde(default)]
    document: Option<MemDocument>,
}

/// Native reader and writer for one format tag
#[derive(Clone, Copy, Debug)]
pub struct NativeExchange {
    format: NativeFormat,
}

impl NativeExchange {
    pub fn new(format: NativeFormat) -> Self {
        Self { format }
    }

    /// STEP stand-in
    pub fn step() -> Self {
        Self::new(NativeFormat::Step)
    }

    /// IGES stand-in
    pub fn iges() -> Self {
        Self::new(NativeFormat::Iges)
    }

    pub fn format(&self) -> NativeFormat {
        self.format
    }

    fn write_file(&self, file: &NativeFile, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(file)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Write several roots (null handles allowed) to one file
    pub fn write_roots(&self, roots: &[MemShape], path: &Path) -> Result<()> {
        let file = NativeFile {
            format: self.format,
            schema: None,
            roots: roots.to_vec(),
            document: None,
        };
        self.write_file(&file, path)
    }

    /// Write an assembly document
    pub fn write_document(&self, document: &MemDocument, path: &Path) -> Result<()> {
        let file = NativeFile {
            format: self.format,
            schema: None,
            roots: Vec::new(),
            document: Some(document.clone()),
        };
        self.write_file(&file, path)
    }

    /// Read and check the format tag
    fn load(&self, path: &Path) -> std::result::Result<NativeFile, TransferStatus> {
        let content = fs::read_to_string(path).map_err(|e| {
            log::error!("cannot read {}: {}", path.display(), e);
            TransferStatus::Error
        })?;
        let file: NativeFile = serde_json::from_str(&content).map_err(|e| {
            log::error!("malformed native file {}: {}", path.display(), e);
            TransferStatus::Fail
        })?;
        if file.format != self.format {
            log::error!(
                "{} holds {:?} data, expected {:?}",
                path.display(),
                file.format,
                self.format
            );
            return Err(TransferStatus::Fail);
        }
        Ok(file)
    }

    /// Schema recorded in a native file, if any
    pub fn schema_of(&self, path: &Path) -> Option<String> {
        self.load(path).ok().and_then(|file| file.schema)
    }
}

impl ShapeReader for NativeExchange {
    type Shape = MemShape;

    /// Entity visibility is not modelled; `visible_only` has no effect.
    fn read_roots(&self, path: &Path, _options: &ReadOptions) -> RootTransfer<MemShape> {
        match self.load(path) {
            Ok(file) => RootTransfer::done(file.roots),
            Err(status) => RootTransfer::failed(status),
        }
    }
}

impl ShapeWriter for NativeExchange {
    type Shape = MemShape;

    fn write_shape(&self, shape: &MemShape, path: &Path, options: &FormatOptions) -> TransferStatus {
        if shape.is_null() {
            return TransferStatus::Void;
        }
        let schema = match (self.format, options) {
            (NativeFormat::Step, FormatOptions::Step { schema }) => Some(schema.to_string()),
            (NativeFormat::Iges, FormatOptions::Iges) => None,
            (_, FormatOptions::Native) => None,
            (format, other) => {
                log::error!("{:?} writer cannot honor {:?}", format, other);
                return TransferStatus::Fail;
            }
        };
        let file = NativeFile {
            format: self.format,
            schema,
            roots: vec![shape.clone()],
            document: None,
        };
        match self.write_file(&file, path) {
            Ok(()) => TransferStatus::Done,
            Err(e) => {
                log::error!("cannot write {}: {}", path.display(), e);
                TransferStatus::Error
            }
        }
    }
}

impl DocumentReader for NativeExchange {
    type Document = MemDocument;

    fn read_document(&self, path: &Path) -> DocumentTransfer<MemDocument> {
        match self.load(path) {
            Ok(NativeFile {
                document: Some(document),
                ..
            }) => DocumentTransfer {
                status: TransferStatus::Done,
                document: Some(document),
            },
            Ok(_) => DocumentTransfer {
                status: TransferStatus::Fail,
                document: None,
            },
            Err(status) => DocumentTransfer {
                status,
                document: None,
            },
        }
    }
}
