//! Loading a whole mount table with all-or-nothing semantics.

use std::io::BufRead;
use std::path::Path;

use confine_common::error::{ConfineError, Result};

use crate::entry::{MountEntry, parse_entry};
use crate::source::LineSource;

/// Every entry of one mount table, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountTable {
    entries: Vec<MountEntry>,
}

impl MountTable {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, MountEntry> {
        self.entries.iter()
    }

    /// Entry at `index`, counting from the first line.
    pub fn get(&self, index: usize) -> Option<&MountEntry> {
        self.entries.get(index)
    }

    /// Last entry mounted at `dir`; later entries shadow earlier ones.
    pub fn find_by_mount_dir(&self, dir: impl AsRef<Path>) -> Option<&MountEntry> {
        let dir = dir.as_ref();
        self.entries.iter().rev().find(|e| e.mount_point() == dir)
    }

    /// Consumes the table, returning its entries.
    pub fn into_entries(self) -> Vec<MountEntry> {
        self.entries
    }

    /// Releases the table and every buffer it owns.
    pub fn release(self) {
        tracing::trace!(entries = self.entries.len(), "releasing mount table");
        drop(self);
    }
}

impl<'a> IntoIterator for &'a MountTable {
    type Item = &'a MountEntry;
    type IntoIter = std::slice::Iter<'a, MountEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for MountTable {
    type Item = MountEntry;
    type IntoIter = std::vec::IntoIter<MountEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Parses every line of `reader` into a table.
///
/// `origin` only labels errors. Nothing is returned unless every line
/// parses and the reader reaches a clean end of input.
///
/// # Errors
///
/// Returns [`ConfineError::Io`] if a read fails and
/// [`ConfineError::Format`] for the first malformed line.
pub fn load_from_reader<R: BufRead>(reader: R, origin: &Path) -> Result<MountTable> {
    build(LineSource::new(reader), origin)
}

/// Opens `path` and parses it into a table.
///
/// # Errors
///
/// Returns [`ConfineError::Io`] if the file cannot be opened or read and
/// [`ConfineError::Format`] for the first malformed line.
pub fn load_path(path: &Path) -> Result<MountTable> {
    build(LineSource::open(path)?, path)
}

fn build<R: BufRead>(mut source: LineSource<R>, origin: &Path) -> Result<MountTable> {
    let mut entries = Vec::new();
    loop {
        let line = match source.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(
                    path = %origin.display(),
                    after_line = source.line_no(),
                    error = %e,
                    "mount table read failed"
                );
                return Err(ConfineError::Io {
                    path: origin.to_path_buf(),
                    source: e,
                });
            }
        };
        let entry = parse_entry(line).map_err(|e| {
            tracing::warn!(
                path = %origin.display(),
                line = source.line_no(),
                error = %e,
                "malformed mount entry"
            );
            ConfineError::Format {
                path: origin.to_path_buf(),
                line: source.line_no(),
                reason: e.to_string(),
            }
        })?;
        entries.push(entry);
    }
    tracing::debug!(path = %origin.display(), entries = entries.len(), "mount table loaded");
    Ok(MountTable { entries })
}
