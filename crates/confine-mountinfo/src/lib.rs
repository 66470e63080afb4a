//! # confine-mountinfo
//!
//! Parser for the Linux per-process mount table (`/proc/<pid>/mountinfo`).
//!
//! A load either yields a [`MountTable`] holding one [`MountEntry`] per
//! line, in file order, or fails without producing anything:
//! - **Source**: line-at-a-time reading with distinct end-of-file and
//!   read-error outcomes.
//! - **Field**: whitespace-delimited tokenizer writing into one backing
//!   buffer per entry.
//! - **Entry**: the mountinfo line grammar.
//! - **Table**: the ordered, owned result of a load.
//!
//! Parsing emits `trace`-level [`tracing`] events describing each scanned
//! field. They have no effect on the outcome.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod entry;
pub mod field;
pub mod source;
pub mod table;

use std::path::Path;

use confine_common::config::MountinfoConfig;
use confine_common::constants::DEFAULT_MOUNTINFO_PATH;
use confine_common::error::Result;

pub use entry::{EntryError, MountEntry, OptionalField, parse_entry};
pub use table::{MountTable, load_from_reader, load_path};

/// Loads the mount table at `path`, or the calling process's own table
/// when `path` is `None`.
///
/// # Errors
///
/// Returns [`ConfineError::Io`](confine_common::error::ConfineError::Io)
/// if the file cannot be opened or read, and
/// [`ConfineError::Format`](confine_common::error::ConfineError::Format)
/// if any line is malformed.
pub fn load(path: Option<&Path>) -> Result<MountTable> {
    load_path(path.unwrap_or_else(|| Path::new(DEFAULT_MOUNTINFO_PATH)))
}

/// Loads the mount table described by `config`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, or as for [`load`].
pub fn load_with(config: &MountinfoConfig) -> Result<MountTable> {
    config.validate()?;
    load_path(&config.path)
}
