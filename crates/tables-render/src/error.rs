//! Error types for table generation.
//!
//! Only malformed input documents abort a render. Everything else (unknown
//! theme, unknown datatype, bad numeric cells...) degrades with a warning
//! and never surfaces here.

use std::path::PathBuf;

use thiserror::Error;

/// Which of the two input documents an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Document {
    Layout,
    Data,
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Document::Layout => write!(f, "layout"),
            Document::Data => write!(f, "data"),
        }
    }
}

/// Fatal errors that abort table generation.
#[derive(Debug, Error)]
pub enum TableError {
    /// The document could not be read from disk.
    #[error("cannot read {document} file {}: {source}", path.display())]
    Read {
        document: Document,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document exists but contains nothing but whitespace.
    #[error("{document} document is empty")]
    EmptyDocument { document: Document },

    /// The document is not valid JSON or does not match the expected shape.
    #[error("invalid {document} document: {source}")]
    Json {
        document: Document,
        #[source]
        source: serde_json::Error,
    },

    /// The layout has no `columns` array, or the array is empty.
    #[error("layout defines no columns")]
    NoColumns,

    /// A column was declared without a header.
    #[error("column {index} has an empty header")]
    EmptyHeader { index: usize },

    /// The data document is not an array of flat objects.
    #[error("invalid data document: {0}")]
    InvalidData(String),
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
