//! End-to-end tests for loading mount tables.
//!
//! Covers on-disk loading through the public entry points, atomic failure
//! on malformed lines and read errors, and the live table of the test
//! process itself.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::ffi::OsStr;
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

use confine_common::config::MountinfoConfig;
use confine_common::error::ConfineError;
use confine_mountinfo::{MountEntry, load, load_from_reader, load_with};

const SNAPSHOT: &str = "\
22 1 8:2 / / rw,relatime shared:1 - ext4 /dev/sda2 rw,errors=remount-ro
23 22 0:21 / /proc rw,nosuid,nodev,noexec,relatime shared:13 - proc proc rw
24 22 0:22 / /sys rw,nosuid,nodev,noexec,relatime shared:2 - sysfs sysfs rw
36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
70 22 7:4 / /snap/core/1234 ro,nodev,relatime shared:30 - squashfs /dev/loop4 ro
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_fixture(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mountinfo");
    std::fs::write(&path, contents).expect("write fixture");
    (dir, path)
}

/// Serves `data`, then fails every read after it is exhausted.
struct FailAfter {
    data: Cursor<Vec<u8>>,
}

impl Read for FailAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::other("simulated read failure")),
            n => Ok(n),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────────

#[test]
fn load_snapshot_from_disk() {
    init_tracing();
    let (_dir, path) = write_fixture(SNAPSHOT);
    let table = load(Some(path.as_path())).expect("should load");

    assert_eq!(table.len(), 5);
    let ids: Vec<i32> = table.iter().map(MountEntry::mount_id).collect();
    assert_eq!(ids, vec![22, 23, 24, 36, 70]);

    let doc = table.get(3).expect("fourth entry");
    assert_eq!(doc.parent_id(), 35);
    assert_eq!(doc.dev_major(), 98);
    assert_eq!(doc.dev_minor(), 0);
    assert_eq!(doc.root(), "/mnt1");
    assert_eq!(doc.mount_dir(), "/mnt2");
    assert_eq!(doc.mount_opts(), "rw,noatime");
    assert_eq!(doc.optional_fields(), "master:1");
    assert_eq!(doc.fs_type(), "ext3");
    assert_eq!(doc.mount_source(), "/dev/root");
    assert_eq!(doc.super_opts(), "rw,errors=continue");

    let snap = table.find_by_mount_dir("/snap/core/1234").expect("snap mount");
    assert_eq!(snap.fs_type(), "squashfs");
    assert_eq!(snap.peer_group(), Some(OsStr::new("30")));
}

#[test]
fn load_with_config_path() {
    init_tracing();
    let (_dir, path) = write_fixture(SNAPSHOT);
    let table = load_with(&MountinfoConfig::with_path(&path)).expect("should load");
    assert_eq!(table.len(), 5);
}

#[test]
fn load_with_empty_path_is_config_error() {
    let err = load_with(&MountinfoConfig::with_path("")).unwrap_err();
    assert!(matches!(err, ConfineError::Config { .. }));
}

#[test]
fn load_empty_file_gives_empty_table() {
    let (_dir, path) = write_fixture("");
    let table = load(Some(path.as_path())).expect("should load");
    assert!(table.is_empty());
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load(Some(dir.path().join("nope").as_path())).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn load_own_mount_table() {
    init_tracing();
    if !Path::new("/proc/self/mountinfo").exists() {
        return;
    }
    let table = load(None).expect("own mount table should parse");
    assert!(!table.is_empty());
    for entry in &table {
        assert!(!entry.fs_type().is_empty());
    }
}

// ── Atomic failure ───────────────────────────────────────────────────

#[test]
fn malformed_line_yields_no_table() {
    init_tracing();
    let broken = SNAPSHOT.replace("master:1 - ext3", "master:1 ext3");
    let (_dir, path) = write_fixture(&broken);
    let err = load(Some(path.as_path())).unwrap_err();
    match err {
        ConfineError::Format { line, path: at, .. } => {
            assert_eq!(line, 4);
            assert_eq!(at, path);
        }
        other => panic!("expected format error, got {other}"),
    }
}

#[test]
fn non_numeric_first_field_yields_no_table() {
    let input = format!("{SNAPSHOT}id 22 0:1 / /x rw - tmpfs tmpfs rw\n");
    let err = load_from_reader(Cursor::new(input), Path::new("mem")).unwrap_err();
    assert!(err.is_format());
}

#[test]
fn read_error_midway_yields_no_table() {
    init_tracing();
    let reader = BufReader::with_capacity(
        64,
        FailAfter {
            data: Cursor::new(SNAPSHOT.as_bytes().to_vec()),
        },
    );
    let err = load_from_reader(reader, Path::new("mem")).unwrap_err();
    match err {
        ConfineError::Io { source, .. } => {
            assert_eq!(source.to_string(), "simulated read failure");
        }
        other => panic!("expected I/O error, got {other}"),
    }
}

#[test]
fn display_reproduces_canonical_lines() {
    let table = load_from_reader(Cursor::new(SNAPSHOT), Path::new("mem")).expect("load");
    let rendered: String = table.iter().map(|e| format!("{e}\n")).collect();
    assert_eq!(rendered, SNAPSHOT);
}
