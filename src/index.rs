pub mod io;

use std::fmt;
use std::io::BufRead;
use std::path::Path;

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, warn};

use crate::bed;
use crate::error::{BedIndexError, Result};

/// Derives a numeric id from a chromosome name: a 31-based polynomial
/// rolling hash with wrapping arithmetic. Written to the index file as a
/// human-readable diagnostic column; never used to place entries.
pub fn chrom_key(chrom: &str) -> i32 {
    chrom
        .bytes()
        .fold(0i32, |h, b| h.wrapping_mul(31).wrapping_add(b as i32))
}

/// One indexed interval: the coordinates of a BED line plus its 0-based
/// line number in the source file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexEntry {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub position: u64,
}

impl IndexEntry {
    pub fn new<C>(chrom: C, start: u64, end: u64, position: u64) -> Self
    where
        C: Into<String>,
    {
        Self { chrom: chrom.into(), start, end, position }
    }

    fn sort_key(&self) -> (u64, u64, u64) {
        (self.start, self.end, self.position)
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}\t{}", self.chrom, self.start, self.end, self.position)
    }
}

/// A positional index over a BED file: per-chromosome buckets of entries,
/// each bucket kept in (start, end, position) order once sorted.
///
/// Buckets are keyed by the chromosome string itself, so two chromosome
/// names can never share a bucket. Buckets preserve first-seen chromosome
/// order, which makes the persisted output deterministic.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct BedIndex {
    buckets: IndexMap<String, Vec<IndexEntry>>,
}

impl BedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the bucket of its chromosome.
    pub fn insert(&mut self, entry: IndexEntry) {
        self.buckets.entry(entry.chrom.clone()).or_default().push(entry);
    }

    /// Sorts every bucket by (start, end, position). Stable, so sorting an
    /// already-sorted bucket leaves it byte-identical.
    pub fn sort(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.sort_by_key(|e| e.sort_key());
        }
    }

    /// Whether every bucket satisfies the (start, end, position) order.
    pub fn is_sorted(&self) -> bool {
        self.buckets
            .values()
            .all(|bucket| bucket.iter().tuple_windows().all(|(a, b)| a.sort_key() <= b.sort_key()))
    }

    /// Returns the entries indexed under `chrom`, if any.
    pub fn bucket(&self, chrom: &str) -> Option<&[IndexEntry]> {
        self.buckets.get(chrom).map(|b| b.as_slice())
    }

    /// Iterates over `(chromosome, entries)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[IndexEntry])> {
        self.buckets.iter().map(|(chrom, bucket)| (chrom.as_str(), bucket.as_slice()))
    }

    pub fn num_chroms(&self) -> usize {
        self.buckets.len()
    }

    pub fn num_entries(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns the smallest index `i` in the bucket of `chrom` such that
    /// `entry[i].start >= start`, or the bucket length if no entry
    /// qualifies. Fails if the chromosome has no bucket.
    pub fn lower_bound(&self, chrom: &str, start: u64) -> Result<usize> {
        let bucket = self
            .buckets
            .get(chrom)
            .ok_or_else(|| BedIndexError::UnknownChromosome(chrom.to_string()))?;
        Ok(bucket.partition_point(|e| e.start < start))
    }

    /// Returns the ascending line positions of all entries on `chrom`
    /// whose interval satisfies `entry.start >= start` (inclusive) and
    /// `entry.end < end` (exclusive).
    ///
    /// Scans forward from the lower bound and stops at the first entry
    /// whose end reaches `end`. The stop is strict: given the bucket's
    /// (start, end) order, no later entry can qualify once it fires.
    pub fn positions(&self, chrom: &str, start: u64, end: u64) -> Result<Vec<u64>> {
        let i = self.lower_bound(chrom, start)?;
        let bucket = &self.buckets[chrom];
        let mut positions: Vec<u64> = bucket[i..]
            .iter()
            .take_while(|e| e.end < end)
            .map(|e| e.position)
            .collect();
        // Scan order follows (start, end), not position.
        positions.sort_unstable();
        Ok(positions)
    }

    /// Builds an index from raw BED lines. Every line advances the 0-based
    /// position counter; any invalid line aborts the whole build, so a
    /// partially populated index is never returned. Buckets are sorted
    /// before the index is handed back.
    pub fn from_bed_reader<R>(reader: R) -> Result<Self>
    where
        R: BufRead,
    {
        Self::build(bed::io::Reader::new(reader))
    }

    /// Builds an index from a BED file. Files ending in `.gz` are
    /// decompressed transparently.
    pub fn from_bed_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(bed::io::open(path)?)
    }

    fn build<R>(mut reader: bed::io::Reader<R>) -> Result<Self>
    where
        R: BufRead,
    {
        let mut index = Self::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = line_num as u64;
            let fields = bed::split_line(&line, line_num)?;
            let (start, end) = bed::parse_interval(&fields, &line, line_num)?;
            index.insert(IndexEntry::new(fields[0], start, end, line_num));
        }
        index.sort();
        if index.is_empty() {
            warn!("no records indexed: input was empty");
        } else {
            debug!(
                "indexed {} entries across {} chromosomes",
                index.num_entries(),
                index.num_chroms()
            );
        }
        Ok(index)
    }
}

impl fmt::Display for BedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (chrom, bucket) in self.buckets.iter() {
            for entry in bucket {
                writeln!(f, "{}\t{}", chrom_key(chrom), entry)?;
            }
        }
        Ok(())
    }
}
