use std::path::PathBuf;

use crate::grid::GridSize;

/// The resource does not have the event layout the grid is stored in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed structure at `{location}`: expected {expected}")]
    MalformedStructure { location: String, expected: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("no document loaded")]
    NoDocumentLoaded,
    #[error(transparent)]
    MalformedStructure(#[from] DecodeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cell ({col}, {row}) is outside the active {size} grid")]
    OutOfRange { col: usize, row: usize, size: GridSize },
    #[error("unsupported grid size {0} (expected 3, 5 or 10)")]
    UnsupportedSize(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("reading {path:?}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error(transparent)]
    Malformed(#[from] DecodeError),
}
