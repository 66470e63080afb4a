//! Parsing of a single mountinfo line into a [`MountEntry`].
//!
//! ```text
//! 36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
//! (1)(2)(3)   (4)   (5)      (6)      (7)   (8) (9)   (10)         (11)
//! ```
//!
//! 1. mount ID, 2. parent ID, 3. `major:minor` of `st_dev`, 4. root of the
//! mount within the filesystem, 5. mount point, 6. per-mount options,
//! 7. zero or more optional `tag[:value]` fields, 8. the `-` separator,
//! 9. filesystem type, 10. mount source, 11. per-superblock options.

use std::ffi::OsStr;
use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use confine_common::constants::{
    OPTIONAL_FIELDS_SEPARATOR, TAG_MASTER, TAG_PROPAGATE_FROM, TAG_SHARED, TAG_UNBINDABLE,
};
use confine_common::types::DeviceNumber;
use nom::{
    IResult, Parser,
    character::complete::{self as ch, char, multispace0},
};
use thiserror::Error;

use crate::field::{FieldBuffer, Span};

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The `mount_id parent_id major:minor` prefix could not be read.
    #[error("invalid numeric header")]
    InvalidHeader,
    /// The line ended before the named field.
    #[error("missing {0} field")]
    MissingField(&'static str),
    /// The line ended before the `-` separator.
    #[error("missing optional fields separator")]
    MissingSeparator,
}

/// One parsed mount record.
///
/// All string fields live in a single buffer owned by the entry.
#[derive(Clone, PartialEq, Eq)]
pub struct MountEntry {
    mount_id: i32,
    parent_id: i32,
    device: DeviceNumber,
    buf: FieldBuffer,
    root: Span,
    mount_dir: Span,
    mount_opts: Span,
    optional_fields: Span,
    fs_type: Span,
    mount_source: Span,
    super_opts: Span,
}

struct Header {
    mount_id: i32,
    parent_id: i32,
    device: DeviceNumber,
}

fn header(input: &[u8]) -> IResult<&[u8], Header> {
    let (rest, (_, mount_id, _, parent_id, _, major, _, _, minor, _)) = (
        multispace0,
        ch::i32,
        multispace0,
        ch::i32,
        multispace0,
        ch::u32,
        char(':'),
        multispace0,
        ch::u32,
        multispace0,
    )
        .parse(input)?;
    Ok((
        rest,
        Header {
            mount_id,
            parent_id,
            device: DeviceNumber::new(major, minor),
        },
    ))
}

fn required(
    buf: &mut FieldBuffer,
    line: &[u8],
    offset: &mut usize,
    name: &'static str,
) -> Result<Span, EntryError> {
    buf.next_field(line, offset).ok_or(EntryError::MissingField(name))
}

/// Parses one mountinfo line.
///
/// A trailing newline is allowed. Tokens after the superblock options are
/// ignored.
///
/// # Errors
///
/// Returns an [`EntryError`] if the line does not follow the grammar.
pub fn parse_entry(line: &[u8]) -> Result<MountEntry, EntryError> {
    let (rest, head) = header(line).map_err(|_| EntryError::InvalidHeader)?;
    let mut offset = line.len() - rest.len();
    let mut buf = FieldBuffer::for_line(line);

    let root = required(&mut buf, line, &mut offset, "root")?;
    let mount_dir = required(&mut buf, line, &mut offset, "mount point")?;
    let mount_opts = required(&mut buf, line, &mut offset, "mount options")?;

    let mut optional_fields = Span::empty(offset);
    let mut first = true;
    loop {
        let field = buf
            .next_field(line, &mut offset)
            .ok_or(EntryError::MissingSeparator)?;
        if buf.get(field) == OPTIONAL_FIELDS_SEPARATOR {
            break;
        }
        buf.append_joined(&mut optional_fields, field, first);
        first = false;
    }

    let fs_type = required(&mut buf, line, &mut offset, "filesystem type")?;
    let mount_source = required(&mut buf, line, &mut offset, "mount source")?;
    let super_opts = required(&mut buf, line, &mut offset, "super options")?;

    let entry = MountEntry {
        mount_id: head.mount_id,
        parent_id: head.parent_id,
        device: head.device,
        buf,
        root,
        mount_dir,
        mount_opts,
        optional_fields,
        fs_type,
        mount_source,
        super_opts,
    };
    tracing::trace!(entry = %entry, "parsed mount entry");
    Ok(entry)
}

impl MountEntry {
    /// Unique identifier of the mount (may be reused after unmount).
    pub const fn mount_id(&self) -> i32 {
        self.mount_id
    }

    /// Identifier of the parent mount, or of itself at the top of the tree.
    pub const fn parent_id(&self) -> i32 {
        self.parent_id
    }

    /// Major device number.
    pub const fn dev_major(&self) -> u32 {
        self.device.major
    }

    /// Minor device number.
    pub const fn dev_minor(&self) -> u32 {
        self.device.minor
    }

    /// `st_dev` of files on this filesystem.
    pub const fn device(&self) -> DeviceNumber {
        self.device
    }

    fn field(&self, span: Span) -> &OsStr {
        OsStr::from_bytes(self.buf.get(span))
    }

    /// Root of the mount within its filesystem.
    pub fn root(&self) -> &OsStr {
        self.field(self.root)
    }

    /// Mount point relative to the process root.
    pub fn mount_dir(&self) -> &OsStr {
        self.field(self.mount_dir)
    }

    /// [`mount_dir`](Self::mount_dir) as a path.
    pub fn mount_point(&self) -> &Path {
        Path::new(self.mount_dir())
    }

    /// Per-mount options.
    pub fn mount_opts(&self) -> &OsStr {
        self.field(self.mount_opts)
    }

    /// Optional fields joined by single spaces; empty when there are none.
    pub fn optional_fields(&self) -> &OsStr {
        self.field(self.optional_fields)
    }

    /// Filesystem type, `type[.subtype]`.
    pub fn fs_type(&self) -> &OsStr {
        self.field(self.fs_type)
    }

    /// Filesystem-specific source, or `none`.
    pub fn mount_source(&self) -> &OsStr {
        self.field(self.mount_source)
    }

    /// Per-superblock options.
    pub fn super_opts(&self) -> &OsStr {
        self.field(self.super_opts)
    }

    /// Iterates the optional fields as `tag[:value]` pairs.
    pub fn optional_fields_iter(&self) -> impl Iterator<Item = OptionalField<'_>> {
        self.buf
            .get(self.optional_fields)
            .split(|&b| b == b' ')
            .filter(|raw| !raw.is_empty())
            .map(OptionalField::parse)
    }

    fn tag_value(&self, tag: &str) -> Option<&OsStr> {
        self.optional_fields_iter()
            .find(|f| f.tag == OsStr::new(tag))
            .and_then(|f| f.value)
    }

    /// Peer group id if the mount is shared.
    pub fn peer_group(&self) -> Option<&OsStr> {
        self.tag_value(TAG_SHARED)
    }

    /// Whether the mount propagates events to a peer group.
    pub fn is_shared(&self) -> bool {
        self.peer_group().is_some()
    }

    /// Peer group this mount is a slave of.
    pub fn master(&self) -> Option<&OsStr> {
        self.tag_value(TAG_MASTER)
    }

    /// Closest dominant peer group, when it differs from the master.
    pub fn propagate_from(&self) -> Option<&OsStr> {
        self.tag_value(TAG_PROPAGATE_FROM)
    }

    /// Whether the mount is unbindable.
    pub fn is_unbindable(&self) -> bool {
        self.optional_fields_iter()
            .any(|f| f.tag == OsStr::new(TAG_UNBINDABLE))
    }
}

/// One `tag[:value]` optional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalField<'a> {
    /// Tag name such as `shared` or `master`.
    pub tag: &'a OsStr,
    /// Text after the first `:`, if any.
    pub value: Option<&'a OsStr>,
}

impl<'a> OptionalField<'a> {
    fn parse(raw: &'a [u8]) -> Self {
        match raw.iter().position(|&b| b == b':') {
            Some(colon) => Self {
                tag: OsStr::from_bytes(&raw[..colon]),
                value: Some(OsStr::from_bytes(&raw[colon + 1..])),
            },
            None => Self {
                tag: OsStr::from_bytes(raw),
                value: None,
            },
        }
    }
}

impl fmt::Display for MountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} ",
            self.mount_id,
            self.parent_id,
            self.device,
            self.root().to_string_lossy(),
            self.mount_dir().to_string_lossy(),
            self.mount_opts().to_string_lossy(),
        )?;
        if !self.optional_fields.is_empty() {
            write!(f, "{} ", self.optional_fields().to_string_lossy())?;
        }
        write!(
            f,
            "- {} {} {}",
            self.fs_type().to_string_lossy(),
            self.mount_source().to_string_lossy(),
            self.super_opts().to_string_lossy(),
        )
    }
}

impl fmt::Debug for MountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountEntry")
            .field("mount_id", &self.mount_id)
            .field("parent_id", &self.parent_id)
            .field("device", &self.device)
            .field("root", &self.root())
            .field("mount_dir", &self.mount_dir())
            .field("mount_opts", &self.mount_opts())
            .field("optional_fields", &self.optional_fields())
            .field("fs_type", &self.fs_type())
            .field("mount_source", &self.mount_source())
            .field("super_opts", &self.super_opts())
            .finish()
    }
}
