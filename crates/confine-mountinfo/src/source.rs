//! Line-oriented reading of a mount table.
//!
//! Lines may be arbitrarily long; the read buffer grows as needed and is
//! reused between calls.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use confine_common::error::{ConfineError, Result};

/// Reads a text source one line at a time.
///
/// End of input is reported as `Ok(None)`, distinct from a read failure.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl LineSource<BufReader<File>> {
    /// Opens `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfineError::Io`] if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ConfineError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "opened mount table");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineSource<R> {
    /// Wraps an already-open buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    /// Returns the next line, including its trailing newline if present.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the read fails.
    pub fn read_line(&mut self) -> io::Result<Option<&[u8]>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some(&self.buf))
    }

    /// 1-based number of the line most recently returned, or 0 before the first.
    pub const fn line_no(&self) -> usize {
        self.line_no
    }
}
