// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types shared by the export pipeline

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, CadError>;

/// Errors that can occur while flattening, encoding or exchanging shapes
///
/// `NotFound` and `InvalidInput` are raised before any collaborator is
/// invoked. `Collaborator` and `Postcondition` are detected after the call.
#[derive(Error, Debug)]
pub enum CadError {
    /// Referenced input file is absent
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    /// Null or empty shape handle, unrecognized option value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Kernel, tessellator or format collaborator reported a non-success status
    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    /// Collaborator reported success but the expected artifact is missing
    #[error("Postcondition failed: {0}")]
    Postcondition(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or native file (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CadError {
    /// Create a not-found error for a path
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        CadError::NotFound(path.as_ref().to_path_buf())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CadError::InvalidInput(msg.into())
    }

    /// Create a collaborator failure
    pub fn collaborator(msg: impl Into<String>) -> Self {
        CadError::Collaborator(msg.into())
    }

    /// Create a postcondition failure
    pub fn postcondition(msg: impl Into<String>) -> Self {
        CadError::Postcondition(msg.into())
    }

    /// Whether the error was raised before any collaborator call
    pub fn is_precondition(&self) -> bool {
        matches!(self, CadError::NotFound(_) | CadError::InvalidInput(_))
    }
}

impl From<serde_json::Error> for CadError {
    fn from(err: serde_json::Error) -> Self {
        CadError::Serialization(err.to_string())
    }
}
