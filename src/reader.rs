//! Resolver operations tying an index back to its source BED file.

use std::path::Path;

use crate::bed::{io, BedRecord};
use crate::error::Result;
use crate::index::{self, BedIndex};

/// Builds an index from `bed_path` and persists it to `index_path`.
pub fn create_index<P, Q>(bed_path: P, index_path: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let index = BedIndex::from_bed_file(bed_path)?;
    index::io::save(&index, index_path)
}

/// Loads a previously persisted index from `index_path`.
pub fn load_index<P: AsRef<Path>>(index_path: P) -> Result<BedIndex> {
    index::io::load(index_path)
}

/// Returns the fully parsed records on `chrom` whose interval satisfies
/// `start >= query start` and `end < query end`, in source-file order.
///
/// Queries the index for the matching line positions, then makes a single
/// sequential pass over `bed_path`, parsing exactly the matching lines and
/// stopping as soon as the last one has been seen. A window matching
/// nothing yields an empty result; a chromosome absent from the index
/// fails the same way the underlying query does.
pub fn find_with_index<P: AsRef<Path>>(
    index: &BedIndex,
    bed_path: P,
    chrom: &str,
    start: u64,
    end: u64,
) -> Result<Vec<BedRecord>> {
    let positions = index.positions(chrom, start, end)?;
    let mut records = Vec::with_capacity(positions.len());
    let mut wanted = positions.iter().copied().peekable();

    let mut reader = io::open(bed_path)?;
    for (line_num, line) in reader.lines().enumerate() {
        let next = match wanted.peek() {
            None => break,
            Some(&p) => p,
        };
        let line = line?;
        let line_num = line_num as u64;
        if line_num == next {
            records.push(BedRecord::parse(&line, line_num)?);
            wanted.next();
        }
    }
    Ok(records)
}
