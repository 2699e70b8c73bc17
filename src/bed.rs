pub mod io;

use std::fmt::{self, Write};

use crate::error::{BedIndexError, Result};

pub(crate) const DELIMITER: char = '\t';

/// Minimum number of tab-separated fields in a BED line.
pub const MIN_FIELDS: usize = 3;
/// Maximum number of tab-separated fields in a BED line.
pub const MAX_FIELDS: usize = 12;

/// A fully parsed BED record: the three mandatory coordinate fields plus
/// any optional annotation columns kept verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BedRecord {
    chrom: String,
    start: u64,
    end: u64,
    extra: Vec<String>,
}

impl BedRecord {
    pub fn new<C>(chrom: C, start: u64, end: u64, extra: Vec<String>) -> Self
    where
        C: Into<String>,
    {
        Self { chrom: chrom.into(), start, end, extra }
    }

    /// Return the chromosome name of the record
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Return the 0-based start position (inclusive) of the record
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Return the end position (exclusive) of the record
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Return the optional annotation columns of the record
    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    /// Parses one raw BED line into a record. `line_num` is the 0-based
    /// line number used for error reporting only.
    pub fn parse(line: &str, line_num: u64) -> Result<Self> {
        let fields = split_line(line, line_num)?;
        let (start, end) = parse_interval(&fields, line, line_num)?;
        let extra = fields[MIN_FIELDS..].iter().map(|s| s.to_string()).collect();
        Ok(Self::new(fields[0], start, end, extra))
    }
}

impl fmt::Display for BedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}{}", self.chrom, DELIMITER, self.start, DELIMITER, self.end)?;
        for field in &self.extra {
            f.write_char(DELIMITER)?;
            f.write_str(field)?;
        }
        Ok(())
    }
}

/// Splits a BED line on tabs and checks the field count is within [3, 12].
pub(crate) fn split_line(line: &str, line_num: u64) -> Result<Vec<&str>> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() < MIN_FIELDS || fields.len() > MAX_FIELDS {
        return Err(BedIndexError::MalformedLine {
            line: line_num,
            content: line.to_string(),
        });
    }
    Ok(fields)
}

/// Parses fields 1 and 2 as the half-open interval and checks `end > start`.
pub(crate) fn parse_interval(fields: &[&str], line: &str, line_num: u64) -> Result<(u64, u64)> {
    let start = parse_coord(fields[1], line, line_num)?;
    let end = parse_coord(fields[2], line, line_num)?;
    if end <= start {
        return Err(BedIndexError::InvalidInterval {
            line: line_num,
            content: line.to_string(),
        });
    }
    Ok((start, end))
}

pub(crate) fn parse_coord(field: &str, line: &str, line_num: u64) -> Result<u64> {
    lexical::parse(field).map_err(|_| BedIndexError::MalformedLine {
        line: line_num,
        content: line.to_string(),
    })
}
