// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Results and non-fatal warnings of exchange operations

use std::fmt;
use std::path::PathBuf;

/// Non-fatal condition met while reading or writing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeWarning {
    /// A transferred root was a null handle and was left out
    NullRootDropped { index: usize },
    /// The destination existed and was replaced
    OverwritingFile(PathBuf),
}

impl fmt::Display for ExchangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeWarning::NullRootDropped { index } => {
                write!(f, "root #{} cannot be transferred and was dropped", index)
            }
            ExchangeWarning::OverwritingFile(path) => {
                write!(f, "{} already exists and will be replaced", path.display())
            }
        }
    }
}

/// Imported shapes
#[derive(Clone, Debug)]
pub enum Imported<S> {
    /// One root, or several combined into a compound
    Single(S),
    /// Several roots in file order
    Many(Vec<S>),
}

impl<S> Imported<S> {
    /// Number of shape handles
    pub fn len(&self) -> usize {
        match self {
            Imported::Single(_) => 1,
            Imported::Many(shapes) => shapes.len(),
        }
    }

    /// Never true for a successful import
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_single(&self) -> Option<&S> {
        match self {
            Imported::Single(shape) => Some(shape),
            Imported::Many(_) => None,
        }
    }

    /// All handles as a list
    pub fn into_shapes(self) -> Vec<S> {
        match self {
            Imported::Single(shape) => vec![shape],
            Imported::Many(shapes) => shapes,
        }
    }
}

/// Successful import
#[derive(Clone, Debug)]
pub struct ReadReport<S> {
    pub imported: Imported<S>,
    pub warnings: Vec<ExchangeWarning>,
}

/// Successful export
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteReport {
    /// File that now exists on disk
    pub path: PathBuf,
    pub warnings: Vec<ExchangeWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imported_accessors() {
        let single = Imported::Single(7);
        assert_eq!(single.len(), 1);
        assert_eq!(single.as_single(), Some(&7));

        let many = Imported::Many(vec![1, 2, 3]);
        assert_eq!(many.len(), 3);
        assert!(many.as_single().is_none());
        assert_eq!(many.into_shapes(), vec![1, 2, 3]);
    }

    #[test]
    fn test_warning_messages() {
        let w = ExchangeWarning::NullRootDropped { index: 2 };
        assert_eq!(w.to_string(), "root #2 cannot be transferred and was dropped");
        let w = ExchangeWarning::OverwritingFile(PathBuf::from("/tmp/a.stp"));
        assert!(w.to_string().starts_with("/tmp/a.stp already exists"));
    }
}
