//! # ls-exif - an `ls` companion for photo directories
//!
//! Lists directory contents like `ls -l`, adding three columns for images:
//! the date the picture was taken, its resolution and the camera that took
//! it. The values come from the EXIF tags embedded in the file.
//!
//! ## Command Line Usage
//!
//! ```bash
//! # Long listing of the current directory
//! ls-exif
//!
//! # Table layout, descending into subdirectories
//! ls-exif ~/Pictures --tabular --recursive
//!
//! # Also write a log of every unreadable file
//! ls-exif ~/Pictures -R --log
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use ls_exif::exif_source::decode_file;
//! use ls_exif::metadata::{DatePolicy, Metadata};
//! use std::path::Path;
//!
//! let decoded = decode_file(Path::new("IMG_0001.JPG"))?;
//! let metadata = Metadata::derive(&decoded.tags, DatePolicy::Absent);
//! println!("{:?} {:?}", metadata.camera, metadata.taken_date_display());
//! # Ok::<(), ls_exif::exif_source::DecodeError>(())
//! ```
//!
//! ## Configuration
//!
//! `~/.config/ls-exif/config.toml` is created with defaults on first run.
//! It holds the color theme, whether hidden entries and human-readable sizes
//! are shown by default, and how mislabeled date tags are treated.
//!
//! ## Module Organization
//!
//! - [`categories`]: Extension-based file classification
//! - [`cli`]: Command-line argument parsing
//! - [`config`]: Configuration management
//! - [`exif_source`]: EXIF decoding into raw tags
//! - [`filesystem`]: Listed entries and their lazily decoded metadata
//! - [`listing`]: Table and long-listing rendering
//! - [`log`]: Log file generation
//! - [`metadata`]: Taken date, resolution and camera derivation
//! - [`normalize`]: Typed reads of raw tags
//! - [`scanner`]: Directory traversal
//! - [`tags`]: Raw tag model

pub mod categories;
pub mod cli;
pub mod config;
pub mod exif_source;
pub mod filesystem;
pub mod listing;
pub mod log;
pub mod metadata;
pub mod normalize;
pub mod scanner;
pub mod tags;

// Re-export commonly used types
pub use config::Config;
pub use metadata::Metadata;
pub use scanner::{DirectoryListing, WalkStats};
pub use tags::{RawTag, TagSet};
