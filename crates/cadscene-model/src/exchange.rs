// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Native exchange-format reader and writer traits
//!
//! The byte-level layout of each format belongs to the collaborator that
//! implements these traits; the orchestration policy around them lives in
//! `cadscene-exchange`.

use crate::{CadError, MeshQuality};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Status reported by a native reader or writer
///
/// Only [`TransferStatus::Done`] counts as success.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TransferStatus {
    /// Nothing was done
    Void,
    Done,
    Error,
    Fail,
    Stop,
}

impl TransferStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, TransferStatus::Done)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferStatus::Void => "Void",
            TransferStatus::Done => "Done",
            TransferStatus::Error => "Error",
            TransferStatus::Fail => "Fail",
            TransferStatus::Stop => "Stop",
        };
        f.write_str(name)
    }
}

/// Raw result of a root transfer
#[derive(Clone, Debug)]
pub struct RootTransfer<S> {
    pub status: TransferStatus,
    /// Transferred roots in file order; may contain null handles
    pub roots: Vec<S>,
}

impl<S> RootTransfer<S> {
    pub fn done(roots: Vec<S>) -> Self {
        Self {
            status: TransferStatus::Done,
            roots,
        }
    }

    pub fn failed(status: TransferStatus) -> Self {
        Self {
            status,
            roots: Vec::new(),
        }
    }
}

/// Reader flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Transfer only entities flagged visible (IGES)
    pub visible_only: bool,
}

/// STEP application protocol
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum StepSchema {
    #[default]
    AP203,
    AP214IS,
    AP242DIS,
}

impl StepSchema {
    /// Accepted protocol names
    pub const ALLOWED: [&'static str; 3] = ["AP203", "AP214IS", "AP242DIS"];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepSchema::AP203 => "AP203",
            StepSchema::AP214IS => "AP214IS",
            StepSchema::AP242DIS => "AP242DIS",
        }
    }
}

impl FromStr for StepSchema {
    type Err = CadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AP203" => Ok(StepSchema::AP203),
            "AP214IS" => Ok(StepSchema::AP214IS),
            "AP242DIS" => Ok(StepSchema::AP242DIS),
            other => Err(CadError::invalid_input(format!(
                "application protocol must be one of {}, got '{}'",
                Self::ALLOWED.join(", "),
                other
            ))),
        }
    }
}

impl fmt::Display for StepSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// STL output encoding
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlMode {
    #[default]
    Ascii,
    Binary,
}

impl FromStr for StlMode {
    type Err = CadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(StlMode::Ascii),
            "binary" => Ok(StlMode::Binary),
            other => Err(CadError::invalid_input(format!(
                "mode should be either ascii or binary, got '{}'",
                other
            ))),
        }
    }
}

/// Length unit for 2D drawings
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Mm,
    M,
}

impl LengthUnit {
    /// Scale applied to model coordinates
    pub fn factor(&self) -> f64 {
        match self {
            LengthUnit::Mm => 1.0,
            LengthUnit::M => 1e3,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = CadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mm" => Ok(LengthUnit::Mm),
            "m" => Ok(LengthUnit::M),
            other => Err(CadError::invalid_input(format!(
                "unit should be either mm or m, got '{}'",
                other
            ))),
        }
    }
}

/// Format-specific writer options
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormatOptions {
    Step { schema: StepSchema },
    Iges,
    Stl { mode: StlMode, quality: MeshQuality },
    /// Collaborator's own format, no options
    Native,
}

/// Native root reader
pub trait ShapeReader {
    /// Shape handle type
    type Shape;

    /// Read a file and transfer its root shapes
    fn read_roots(&self, path: &Path, options: &ReadOptions) -> RootTransfer<Self::Shape>;
}

/// Native shape writer
pub trait ShapeWriter {
    /// Shape handle type
    type Shape;

    /// Transfer and write a shape
    fn write_shape(&self, shape: &Self::Shape, path: &Path, options: &FormatOptions)
        -> TransferStatus;
}

/// Raw result of a document transfer
#[derive(Clone, Debug)]
pub struct DocumentTransfer<D> {
    pub status: TransferStatus,
    pub document: Option<D>,
}

/// Reader producing a labelled assembly document with names and colors
pub trait DocumentReader {
    type Document;

    fn read_document(&self, path: &Path) -> DocumentTransfer<Self::Document>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_schema_allow_list() {
        assert_eq!("AP214IS".parse::<StepSchema>().unwrap(), StepSchema::AP214IS);
        assert_eq!("AP242DIS".parse::<StepSchema>().unwrap(), StepSchema::AP242DIS);
        let err = "AP214".parse::<StepSchema>().unwrap_err();
        assert!(matches!(err, CadError::InvalidInput(_)));
    }

    #[test]
    fn test_stl_mode_parse() {
        assert_eq!("binary".parse::<StlMode>().unwrap(), StlMode::Binary);
        assert!("BINARY".parse::<StlMode>().is_err());
    }

    #[test]
    fn test_only_done_is_success() {
        assert!(TransferStatus::Done.is_done());
        for status in [
            TransferStatus::Void,
            TransferStatus::Error,
            TransferStatus::Fail,
            TransferStatus::Stop,
        ] {
            assert!(!status.is_done());
        }
    }

    #[test]
    fn test_unit_factor() {
        assert_eq!("m".parse::<LengthUnit>().unwrap().factor(), 1e3);
        assert_eq!(LengthUnit::default().factor(), 1.0);
    }
}
