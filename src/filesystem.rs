//! In-memory view of listed filesystem entries.
//!
//! A [`FileEntry`] decodes its EXIF tags at most once, on first metadata
//! access, and only if it is classified as an image. Entries live for a
//! single traversal pass; nothing is invalidated or recomputed.

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use once_cell::unsync::OnceCell;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::categories::{BaseType, classify};
use crate::exif_source::decode_file;
use crate::metadata::{DatePolicy, Metadata};

/// A listed directory.
#[derive(Debug)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    /// Metadata of the link target when the entry is a symlink.
    pub stat: fs::Metadata,
    pub is_symlink: bool,
}

/// A listed regular file.
#[derive(Debug)]
pub struct FileEntry {
    pub path: PathBuf,
    pub stat: fs::Metadata,
    pub base_type: BaseType,
    date_policy: DatePolicy,
    metadata: OnceCell<Metadata>,
}

/// Either kind of listed entry.
#[derive(Debug)]
pub enum Entry {
    Directory(DirectoryEntry),
    File(FileEntry),
}

impl DirectoryEntry {
    pub fn new(path: PathBuf, stat: fs::Metadata) -> Self {
        Self {
            path,
            stat,
            is_symlink: false,
        }
    }

    pub fn with_symlink(mut self, is_symlink: bool) -> Self {
        self.is_symlink = is_symlink;
        self
    }

    pub fn name(&self) -> String {
        entry_name(&self.path)
    }

    pub fn base_type_label(&self) -> &'static str {
        "<DIR>"
    }

    pub fn modification_date(&self) -> Option<NaiveDateTime> {
        modification_date(&self.stat)
    }
}

impl FileEntry {
    pub fn new(path: PathBuf, stat: fs::Metadata, date_policy: DatePolicy) -> Self {
        let base_type = classify(&path);
        Self {
            path,
            stat,
            base_type,
            date_policy,
            metadata: OnceCell::new(),
        }
    }

    pub fn name(&self) -> String {
        entry_name(&self.path)
    }

    pub fn size(&self) -> u64 {
        self.stat.len()
    }

    pub fn modification_date(&self) -> Option<NaiveDateTime> {
        modification_date(&self.stat)
    }

    /// EXIF-derived metadata, decoded on first access.
    ///
    /// Non-images never touch the file. A file that cannot be decoded yields
    /// empty metadata with the decode error recorded as an issue; skipped
    /// malformed entries are recorded ahead of the derivation issues.
    pub fn metadata(&self) -> &Metadata {
        self.metadata.get_or_init(|| {
            if self.base_type != BaseType::Image {
                return Metadata::absent();
            }
            match decode_file(&self.path) {
                Ok(decoded) => {
                    let mut metadata = Metadata::derive(&decoded.tags, self.date_policy);
                    metadata.issues.splice(0..0, decoded.skipped);
                    metadata
                }
                Err(e) => Metadata::failed(e.to_string()),
            }
        })
    }

    /// Whether metadata has already been computed.
    pub fn is_decoded(&self) -> bool {
        self.metadata.get().is_some()
    }
}

impl Entry {
    pub fn name(&self) -> String {
        match self {
            Entry::Directory(d) => d.name(),
            Entry::File(f) => f.name(),
        }
    }

}

/// Listing order: directories before files, then by name.
pub fn listing_order(a: &Entry, b: &Entry) -> Ordering {
    match (a, b) {
        (Entry::Directory(_), Entry::File(_)) => Ordering::Less,
        (Entry::File(_), Entry::Directory(_)) => Ordering::Greater,
        _ => a.name().cmp(&b.name()),
    }
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn modification_date(stat: &fs::Metadata) -> Option<NaiveDateTime> {
    let modified = stat.modified().ok()?;
    let local: DateTime<Local> = modified.into();
    let naive = local.naive_local();
    Some(naive.with_nanosecond(0).unwrap_or(naive))
}
