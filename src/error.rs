//! Error types for bed-index

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bed-index operations
pub type Result<T> = std::result::Result<T, BedIndexError>;

/// Error types that can occur while building, persisting or querying an index
#[derive(Debug, Error)]
pub enum BedIndexError {
    /// Source or index file does not exist
    #[error("no file {}", path.display())]
    NotFound {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrong number of fields, or a field that is not a valid integer
    #[error("malformed line {line}:\n{content}")]
    MalformedLine {
        /// 0-based line number where the error occurred
        line: u64,
        /// Raw line content
        content: String,
    },

    /// Interval with `end <= start`
    #[error("incorrect block in line {line}:\n{content}")]
    InvalidInterval {
        /// 0-based line number where the error occurred
        line: u64,
        /// Raw line content
        content: String,
    },

    /// Negative position in a persisted index
    #[error("incorrect position in line {line}:\n{content}")]
    InvalidPosition {
        /// 0-based line number where the error occurred
        line: u64,
        /// Raw line content
        content: String,
    },

    /// Query against a chromosome with no entries
    #[error("no such chromosome: {0}")]
    UnknownChromosome(String),

    /// Persisted index whose entries violate the (start, end, position) order
    #[error("index entries for chromosome {chrom} are not sorted")]
    UnsortedIndex {
        /// Chromosome whose bucket is out of order
        chrom: String,
    },
}
