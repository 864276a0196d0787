//! Log file generation.
//!
//! With `--log`, a plain-text record of the run is written next to where the
//! tool was started: totals, one line per listed directory, and every
//! metadata issue and scan error met along the way.

use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::categories::BaseType;
use crate::listing::format_size;
use crate::scanner::{DirectoryListing, WalkStats};

/// Per-directory summary kept for the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub directory: PathBuf,
    pub directories: usize,
    pub files: usize,
    pub images: usize,
    pub issues: Vec<String>,
}

impl LogEntry {
    /// Summarizes a listing. Issues are only collected from files whose
    /// metadata has already been derived; nothing is decoded here.
    pub fn from_listing(listing: &DirectoryListing) -> Self {
        let mut issues = Vec::new();
        for f in listing.files.iter().filter(|f| f.is_decoded()) {
            for issue in &f.metadata().issues {
                issues.push(format!("{}: {}", f.path.display(), issue));
            }
        }

        Self {
            directory: listing.path.clone(),
            directories: listing.directories.len(),
            files: listing.files.len(),
            images: listing
                .files
                .iter()
                .filter(|f| f.base_type == BaseType::Image)
                .count(),
            issues,
        }
    }
}

/// Builds the log text.
pub fn render_log(
    source: &Path,
    stats: &WalkStats,
    entries: &[LogEntry],
    timestamp: &str,
) -> String {
    let mut content = String::new();
    content.push_str("LS-EXIF LOG\n");
    content.push_str(&"═".repeat(70));
    content.push_str("\n\n");

    content.push_str(&format!("Source: {}\n", source.display()));
    content.push_str(&format!("Timestamp: {}\n\n", timestamp));

    content.push_str(&format!(
        "Directories listed: {}\n",
        stats.directories_listed
    ));
    content.push_str(&format!("Files listed: {}\n", stats.total_files));
    content.push_str(&format!(
        "Total size: {}\n\n",
        format_size(stats.total_size)
    ));

    content.push_str("DIRECTORIES\n");
    content.push_str(&"─".repeat(70));
    content.push('\n');
    for entry in entries {
        content.push_str(&format!(
            "{}: {} directories, {} files ({} images)\n",
            entry.directory.display(),
            entry.directories,
            entry.files,
            entry.images
        ));
    }

    let issues: Vec<&String> = entries.iter().flat_map(|e| e.issues.iter()).collect();
    if !issues.is_empty() {
        content.push_str("\nMETADATA ISSUES\n");
        content.push_str(&"─".repeat(70));
        content.push('\n');
        for issue in issues {
            content.push_str(&format!("{}\n", issue));
        }
    }

    if !stats.errors.is_empty() {
        content.push_str("\nSCAN ERRORS\n");
        content.push_str(&"─".repeat(70));
        content.push('\n');
        for error in &stats.errors {
            content.push_str(&format!("{}\n", error));
        }
    }

    content.push('\n');
    content.push_str(&"═".repeat(70));
    content.push_str("\nEnd of log\n");
    content
}

/// Writes a log of the run into `dest_dir`.
///
/// # Returns
///
/// The path where the log file was written
pub async fn write_listing_log(
    dest_dir: &Path,
    source: &Path,
    stats: &WalkStats,
    entries: &[LogEntry],
) -> color_eyre::Result<PathBuf> {
    let now = chrono::Local::now();
    let source_name = source
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unknown".to_string());
    let log_filename = format!(
        "ls_exif_{}_{}.txt",
        source_name,
        now.format("%Y%m%d_%H%M%S")
    );
    let log_path = dest_dir.join(log_filename);

    let content = render_log(
        source,
        stats,
        entries,
        &now.format("%Y-%m-%d %H:%M:%S").to_string(),
    );

    let mut file = tokio::fs::File::create(&log_path).await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;
    Ok(log_path)
}
