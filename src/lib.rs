//! Positional index over BED-style genomic interval files.
//!
//! A [`BedIndex`] maps each chromosome to its intervals together with their
//! 0-based line numbers in the source file. Once built (or loaded from its
//! flat text representation), a half-open window query returns the line
//! positions of the matching intervals, and [`find_with_index`] resolves
//! those positions back to full records in a single pass over the source
//! file.

pub mod bed;
pub mod error;
pub mod index;
pub mod reader;

pub use self::bed::BedRecord;
pub use self::error::{BedIndexError, Result};
pub use self::index::{BedIndex, IndexEntry};
pub use self::reader::{create_index, find_with_index, load_index};
