//! Persistence of a [`BedIndex`](super::BedIndex) as tab-separated text,
//! one entry per line: `chrom_key, chromosome, start, end, position`. The
//! first column is a human-readable diagnostic; the loader buckets by the
//! chromosome string and never reads it.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::bed;
use crate::error::{BedIndexError, Result};
use crate::index::{chrom_key, BedIndex, IndexEntry};

/// Number of fields an index line must carry.
const INDEX_FIELDS: usize = 5;

/// Writes the index, bucket by bucket, in each bucket's current entry order.
pub fn write_index<W: Write>(index: &BedIndex, mut writer: W) -> Result<()> {
    for (chrom, bucket) in index.iter() {
        let key = chrom_key(chrom);
        for entry in bucket {
            writeln!(writer, "{}\t{}", key, entry)?;
        }
    }
    Ok(())
}

/// Persists the index to `path`, replacing any existing file.
pub fn save<P: AsRef<Path>>(index: &BedIndex, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_index(index, &mut writer)?;
    writer.flush()?;
    debug!("wrote {} index entries to {}", index.num_entries(), path.as_ref().display());
    Ok(())
}

/// Reads a persisted index. Entries are appended in file order and no sort
/// is performed; instead every bucket is verified against the
/// (start, end, position) order and an out-of-order bucket is rejected,
/// since query correctness depends on it.
pub fn read_index<R: BufRead>(reader: R) -> Result<BedIndex> {
    read_index_from(bed::io::Reader::new(reader))
}

/// Loads a persisted index from `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<BedIndex> {
    let index = read_index_from(bed::io::open(path.as_ref())?)?;
    debug!("loaded {} index entries from {}", index.num_entries(), path.as_ref().display());
    Ok(index)
}

fn read_index_from<R: BufRead>(mut reader: bed::io::Reader<R>) -> Result<BedIndex> {
    let mut index = BedIndex::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = line_num as u64;
        index.insert(parse_index_line(&line, line_num)?);
    }
    if let Some(chrom) = first_unsorted_chrom(&index) {
        return Err(BedIndexError::UnsortedIndex { chrom });
    }
    Ok(index)
}

fn parse_index_line(line: &str, line_num: u64) -> Result<IndexEntry> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < INDEX_FIELDS {
        return Err(BedIndexError::MalformedLine {
            line: line_num,
            content: line.to_string(),
        });
    }
    // fields[0] is the stored chrom_key, kept only for readability.
    let chrom = fields[1];
    let start = bed::parse_coord(fields[2], line, line_num)?;
    let end = bed::parse_coord(fields[3], line, line_num)?;
    if end <= start {
        return Err(BedIndexError::InvalidInterval {
            line: line_num,
            content: line.to_string(),
        });
    }
    let position: i64 = lexical::parse(fields[4]).map_err(|_| BedIndexError::MalformedLine {
        line: line_num,
        content: line.to_string(),
    })?;
    if position < 0 {
        return Err(BedIndexError::InvalidPosition {
            line: line_num,
            content: line.to_string(),
        });
    }
    Ok(IndexEntry::new(chrom, start, end, position as u64))
}

fn first_unsorted_chrom(index: &BedIndex) -> Option<String> {
    index
        .iter()
        .find(|(_, bucket)| bucket.windows(2).any(|w| w[0].sort_key() > w[1].sort_key()))
        .map(|(chrom, _)| chrom.to_string())
}

#[cfg(test)]
mod index_io_tests {
    use super::*;

    #[test]
    fn test_write_index_format() {
        let data = b"chr11\t5246919\t5246920\nchr11\t5255660\t5255661\n\
chr11\t5247945\t5247946\nchr11\t5255415\t5255416\nchr11\t5248234\t5248235\n"
            as &[u8];
        let index = BedIndex::from_bed_reader(data).unwrap();

        let mut out = Vec::new();
        write_index(&index, &mut out).unwrap();

        let key = chrom_key("chr11");
        let expected = format!(
            "{key}\tchr11\t5246919\t5246920\t0\n\
             {key}\tchr11\t5247945\t5247946\t2\n\
             {key}\tchr11\t5248234\t5248235\t4\n\
             {key}\tchr11\t5255415\t5255416\t3\n\
             {key}\tchr11\t5255660\t5255661\t1\n"
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_round_trip() {
        let data = b"c1\t1\t3\nc4\t100\t1000\nc2\t1\t10\nc1\t1\t3\n" as &[u8];
        let built = BedIndex::from_bed_reader(data).unwrap();

        let mut out = Vec::new();
        write_index(&built, &mut out).unwrap();
        let loaded = read_index(out.as_slice()).unwrap();

        assert_eq!(built, loaded);
    }

    #[test]
    fn test_read_index_empty() {
        let index = read_index(b"" as &[u8]).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_read_index_ignores_stored_key() {
        // The key column is stale on purpose; bucketing must follow the
        // chromosome string.
        let data = b"0\tchr1\t100\t200\t0\n0\tchr2\t100\t200\t1\n" as &[u8];
        let index = read_index(data).unwrap();
        assert_eq!(index.bucket("chr1").unwrap(), &[IndexEntry::new("chr1", 100, 200, 0)]);
        assert_eq!(index.bucket("chr2").unwrap(), &[IndexEntry::new("chr2", 100, 200, 1)]);
    }

    #[test]
    fn test_read_index_rejects_not_enough_fields() {
        let data = b"123\tchr1\t100\t200\n" as &[u8];
        let err = read_index(data).unwrap_err();
        assert!(matches!(err, BedIndexError::MalformedLine { line: 0, .. }));
    }

    #[test]
    fn test_read_index_rejects_negative_position() {
        let data = b"123\tchr1\t100\t200\t-1\n" as &[u8];
        let err = read_index(data).unwrap_err();
        assert!(matches!(err, BedIndexError::InvalidPosition { line: 0, .. }));
    }

    #[test]
    fn test_read_index_rejects_inverted_interval() {
        let data = b"123\tchr1\t200\t100\t0\n" as &[u8];
        let err = read_index(data).unwrap_err();
        assert!(matches!(err, BedIndexError::InvalidInterval { line: 0, .. }));
    }

    #[test]
    fn test_read_index_rejects_unsorted_bucket() {
        let data = b"123\tchr1\t500\t600\t0\n123\tchr1\t100\t200\t1\n" as &[u8];
        let err = read_index(data).unwrap_err();
        assert!(matches!(err, BedIndexError::UnsortedIndex { chrom } if chrom == "chr1"));
    }

    #[test]
    fn test_read_index_does_not_sort() {
        // Sorted within each bucket, interleaved across buckets: loads fine
        // and keeps file order inside the buckets.
        let data = b"1\tchr1\t100\t200\t3\n2\tchr2\t50\t80\t0\n1\tchr1\t400\t500\t1\n" as &[u8];
        let index = read_index(data).unwrap();
        assert_eq!(
            index.bucket("chr1").unwrap(),
            &[IndexEntry::new("chr1", 100, 200, 3), IndexEntry::new("chr1", 400, 500, 1)]
        );
    }
}
