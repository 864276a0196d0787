//! Directory traversal.
//!
//! Lists one directory level at a time, hands each sorted level to a
//! callback, and optionally descends into subdirectories afterwards.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::filesystem::{DirectoryEntry, Entry, FileEntry, listing_order};
use crate::metadata::DatePolicy;

/// Options controlling a traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    pub recursive: bool,
    pub show_hidden: bool,
    pub date_policy: DatePolicy,
}

/// The contents of a single directory level.
#[derive(Debug)]
pub struct DirectoryListing {
    /// The listed directory as given to the walker.
    pub path: PathBuf,
    /// Path relative to the traversal start (empty for the start itself).
    pub relative: PathBuf,
    pub directories: Vec<DirectoryEntry>,
    pub files: Vec<FileEntry>,
    /// Entries that could not be listed.
    pub errors: Vec<String>,
}

impl DirectoryListing {
    fn new(path: &Path, start: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            relative: path.strip_prefix(start).unwrap_or(path).to_path_buf(),
            directories: Vec::new(),
            files: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }
}

/// Totals collected over a whole traversal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    pub directories_listed: usize,
    pub total_files: usize,
    pub total_size: u64,
    pub errors: Vec<String>,
}

/// Lists `path` and invokes `callback` for it, then for each subdirectory
/// when `options.recursive` is set. Symlinked directories are listed but
/// never descended into.
///
/// Unreadable entries are recorded on the listing and never abort the walk.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ls_exif::scanner::{walk_directory, WalkOptions};
///
/// let start = Path::new(".");
/// let stats = walk_directory(start, start, WalkOptions::default(), |listing| {
///     for file in &listing.files {
///         println!("{} {:?}", file.name(), file.metadata().camera);
///     }
/// });
/// println!("{} files", stats.total_files);
/// ```
pub fn walk_directory<F>(start: &Path, path: &Path, options: WalkOptions, mut callback: F) -> WalkStats
where
    F: FnMut(&DirectoryListing),
{
    let mut stats = WalkStats::default();
    walk_level(start, path, options, &mut callback, &mut stats);
    stats
}

fn walk_level<F>(start: &Path, path: &Path, options: WalkOptions, callback: &mut F, stats: &mut WalkStats)
where
    F: FnMut(&DirectoryListing),
{
    let listing = list_directory(start, path, options);

    stats.directories_listed += 1;
    stats.total_files += listing.files.len();
    stats.total_size += listing.files.iter().map(FileEntry::size).sum::<u64>();
    stats.errors.extend(listing.errors.iter().cloned());

    callback(&listing);

    if options.recursive {
        for directory in listing.directories.iter().filter(|d| !d.is_symlink) {
            walk_level(start, &directory.path, options, callback, stats);
        }
    }
}

/// Lists the immediate children of `path`, directories first, each group
/// sorted by name.
pub fn list_directory(start: &Path, path: &Path, options: WalkOptions) -> DirectoryListing {
    let mut listing = DirectoryListing::new(path, start);
    let mut entries = Vec::new();

    let walker = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || options.show_hidden
                || !e.file_name().to_string_lossy().starts_with('.')
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                listing.add_error(format!("Error reading directory {}: {}", path.display(), e));
                continue;
            }
        };

        // Follow symlinks so a link to a directory lists like one.
        let entry_path = entry.path().to_path_buf();
        match std::fs::metadata(&entry_path) {
            Ok(stat) if stat.is_dir() => {
                let directory =
                    DirectoryEntry::new(entry_path, stat).with_symlink(entry.path_is_symlink());
                entries.push(Entry::Directory(directory));
            }
            Ok(stat) if stat.is_file() => {
                entries.push(Entry::File(FileEntry::new(entry_path, stat, options.date_policy)));
            }
            Ok(_) => {
                listing.add_error(format!(
                    "Skipping {}: not a regular file or directory",
                    entry_path.display()
                ));
            }
            Err(e) => {
                listing.add_error(format!("Error reading {}: {}", entry_path.display(), e));
            }
        }
    }

    entries.sort_by(listing_order);
    for entry in entries {
        match entry {
            Entry::Directory(d) => listing.directories.push(d),
            Entry::File(f) => listing.files.push(f),
        }
    }

    listing
}
