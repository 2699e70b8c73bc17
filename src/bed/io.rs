use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{BedIndexError, Result};

/// A line-oriented reader over BED-style text.
pub struct Reader<R> {
    inner: R,
}

impl<R> std::fmt::Debug for Reader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader").finish_non_exhaustive()
    }
}

impl<R> Reader<R>
where
    R: BufRead,
{
    /// Creates a reader over any buffered source.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Reads a single raw line into `buf`, stripping the line ending.
    /// Returns the number of bytes consumed, 0 at end of input.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        read_line(&mut self.inner, buf)
    }

    /// Returns an iterator over the remaining lines.
    pub fn lines(&mut self) -> Lines<'_, R> {
        Lines { inner: self, buf: String::new() }
    }
}

/// An iterator over raw lines, created by [`Reader::lines`].
pub struct Lines<'a, R> {
    inner: &'a mut Reader<R>,
    buf: String,
}

impl<'a, R> Iterator for Lines<'a, R>
where
    R: BufRead,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.inner.read_line(&mut self.buf) {
            Ok(0) => None,
            Ok(_) => Some(Ok(self.buf.clone())),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Opens a BED or index file for reading. Files ending in `.gz` are
/// decompressed on the fly. A missing file is reported with its path.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Reader<Box<dyn BufRead>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| BedIndexError::NotFound {
        path: path.to_path_buf(),
        source: e,
    })?;
    let inner: Box<dyn BufRead> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(Reader::new(inner))
}

fn read_line<R>(reader: &mut R, buf: &mut String) -> io::Result<usize>
where
    R: BufRead,
{
    const LINE_FEED: char = '\n';
    const CARRIAGE_RETURN: char = '\r';

    match reader.read_line(buf) {
        Ok(0) => Ok(0),
        Ok(n) => {
            if buf.ends_with(LINE_FEED) {
                buf.pop();
                if buf.ends_with(CARRIAGE_RETURN) {
                    buf.pop();
                }
            }
            Ok(n)
        }
        Err(e) => Err(e),
    }
}
