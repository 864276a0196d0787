//! Terminal rendering of directory listings.
//!
//! Two layouts are supported: a titled table with one column per attribute,
//! and an `ls -l` style long listing with the EXIF columns appended. Status
//! messages (warnings for files whose metadata could not be read, errors
//! for entries that could not be listed) go to stderr so the listing itself
//! stays clean for piping.

use console::{Alignment, Style, Term, measure_text_width, pad_str};
use std::fs;
use std::io;

use crate::filesystem::{DirectoryEntry, FileEntry};
use crate::metadata::DATE_DISPLAY_FORMAT;
use crate::scanner::DirectoryListing;

/// Table column headers, in display order.
pub const HEADERS: [&str; 7] = [
    "Name",
    "Base Type",
    "Size",
    "Modification Date",
    "Taken Date",
    "Resolution",
    "Camera",
];

/// How a listing is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Table,
    Long,
}

struct Cell {
    text: String,
    style: Style,
    right: bool,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::new(),
            right: false,
        }
    }

    fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            right: false,
        }
    }

    fn right(mut self) -> Self {
        self.right = true;
        self
    }
}

pub struct UI {
    pub term: Term,
    pub err_term: Term,
    pub color_theme: String,
    pub human_sizes: bool,
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            err_term: Term::stderr(),
            color_theme: "default".to_string(),
            human_sizes: false,
        }
    }

    pub fn with_color_theme(mut self, theme: String) -> Self {
        self.color_theme = theme;
        self
    }

    pub fn with_human_sizes(mut self, human_sizes: bool) -> Self {
        self.human_sizes = human_sizes;
        self
    }

    /// Get the console::Style for the configured theme
    fn get_style(&self) -> Style {
        match self.color_theme.as_str() {
            "cyan" => Style::new().cyan(),
            "magenta" => Style::new().magenta(),
            "yellow" => Style::new().yellow(),
            "green" => Style::new().green(),
            "red" => Style::new().red(),
            "blue" => Style::new().blue(),
            "white" => Style::new().white(),
            _ => Style::new().white(),
        }
    }

    /// Get different shades for status codes based on theme
    /// Returns (warning_style, error_style, success_style)
    fn get_status_styles(&self) -> (Style, Style, Style) {
        match self.color_theme.as_str() {
            "cyan" => (
                Style::new().color256(51),
                Style::new().color256(87),
                Style::new().color256(123),
            ),
            "magenta" => (
                Style::new().color256(201),
                Style::new().color256(126),
                Style::new().color256(213),
            ),
            "yellow" => (
                Style::new().color256(226),
                Style::new().color256(178),
                Style::new().color256(227),
            ),
            "green" => (
                Style::new().color256(46),
                Style::new().color256(28),
                Style::new().color256(120),
            ),
            "red" => (
                Style::new().color256(196),
                Style::new().color256(124),
                Style::new().color256(210),
            ),
            "blue" => (
                Style::new().color256(39),
                Style::new().color256(25),
                Style::new().color256(117),
            ),
            _ => (
                Style::new().color256(255),
                Style::new().color256(250),
                Style::new().color256(255),
            ),
        }
    }

    /// Renders a directory listing in the requested layout.
    pub fn render(&self, listing: &DirectoryListing, layout: Layout) -> Vec<String> {
        match layout {
            Layout::Table => self.render_table(listing),
            Layout::Long => self.render_long(listing),
        }
    }

    /// Renders a titled table: directories first, then files.
    pub fn render_table(&self, listing: &DirectoryListing) -> Vec<String> {
        let style = self.get_style();
        let header_style = style.clone().bold();

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        rows.push(
            HEADERS
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let cell = Cell::styled(*h, header_style.clone());
                    if i == 2 { cell.right() } else { cell }
                })
                .collect(),
        );
        for d in &listing.directories {
            rows.push(self.directory_table_row(d));
        }
        for f in &listing.files {
            rows.push(self.file_table_row(f));
        }

        let title = fs::canonicalize(&listing.path)
            .unwrap_or_else(|_| listing.path.clone())
            .display()
            .to_string();

        let mut body = align_rows(&rows);
        let width = body
            .iter()
            .map(|line| measure_text_width(line))
            .max()
            .unwrap_or(0)
            .max(measure_text_width(&title));
        let rule = Style::new().white().bold().apply_to("=".repeat(width)).to_string();

        let mut lines = vec![style.apply_to(title).bold().to_string(), rule.clone()];
        let header = body.remove(0);
        lines.push(header);
        lines.push(rule.clone());
        lines.extend(body);
        lines.push(rule);
        lines
    }

    /// Renders an `ls -l` style listing with the EXIF columns appended.
    pub fn render_long(&self, listing: &DirectoryListing) -> Vec<String> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for d in &listing.directories {
            rows.push(vec![
                Cell::plain(permissions(&d.stat)),
                Cell::plain(owner(&d.stat)),
                Cell::plain(group(&d.stat)),
                Cell::plain(self.size_label(d.stat.len())).right(),
                Cell::plain(date_label(d.modification_date())),
                Cell::styled(d.name(), Style::new().blue().bold()),
            ]);
        }
        for f in &listing.files {
            let metadata = f.metadata();
            rows.push(vec![
                Cell::plain(permissions(&f.stat)),
                Cell::plain(owner(&f.stat)),
                Cell::plain(group(&f.stat)),
                Cell::plain(self.size_label(f.size())).right(),
                Cell::plain(date_label(f.modification_date())),
                Cell::styled(f.name(), Style::new().green()),
                Cell::styled(
                    metadata.resolution.clone().unwrap_or_default(),
                    Style::new().yellow(),
                ),
                Cell::styled(metadata.camera.clone().unwrap_or_default(), Style::new().magenta()),
                Cell::plain(metadata.taken_date_display().unwrap_or_default()),
            ]);
        }

        let mut lines = vec![format!(
            "{}:",
            self.get_style().apply_to(listing.path.display()).bold()
        )];
        lines.extend(align_rows(&rows));
        lines
    }

    fn directory_table_row(&self, d: &DirectoryEntry) -> Vec<Cell> {
        vec![
            Cell::styled(d.name(), Style::new().blue().bold()),
            Cell::plain(d.base_type_label()),
            Cell::plain("-").right(),
            Cell::plain(date_label(d.modification_date())),
            Cell::plain(""),
            Cell::plain(""),
            Cell::plain(""),
        ]
    }

    fn file_table_row(&self, f: &FileEntry) -> Vec<Cell> {
        let metadata = f.metadata();
        vec![
            Cell::plain(f.name()),
            Cell::plain(f.base_type.as_str()),
            Cell::plain(self.size_label(f.size())).right(),
            Cell::plain(date_label(f.modification_date())),
            Cell::styled(
                metadata.taken_date_display().unwrap_or_default(),
                Style::new().green(),
            ),
            Cell::styled(
                metadata.resolution.clone().unwrap_or_default(),
                Style::new().yellow(),
            ),
            Cell::styled(metadata.camera.clone().unwrap_or_default(), Style::new().magenta()),
        ]
    }

    fn size_label(&self, bytes: u64) -> String {
        if self.human_sizes {
            format_size(bytes)
        } else {
            bytes.to_string()
        }
    }

    /// Problems found while listing: one line per file issue or scan error.
    pub fn diagnostics(&self, listing: &DirectoryListing) -> Vec<(Severity, String)> {
        let mut out: Vec<(Severity, String)> = listing
            .errors
            .iter()
            .map(|e| (Severity::Error, e.clone()))
            .collect();

        for f in &listing.files {
            if !f.is_decoded() {
                continue;
            }
            for issue in &f.metadata().issues {
                out.push((Severity::Warning, format!("{}: {}", f.path.display(), issue)));
            }
        }
        out
    }

    /// Prints a listing followed by its diagnostics.
    pub fn print_listing(&self, listing: &DirectoryListing, layout: Layout) -> io::Result<()> {
        for line in self.render(listing, layout) {
            self.term.write_line(&line)?;
        }
        self.term.write_line("")?;

        for (severity, message) in self.diagnostics(listing) {
            match severity {
                Severity::Warning => self.print_warning(&message)?,
                Severity::Error => self.print_error(&message)?,
            }
        }
        Ok(())
    }

    /// Print an error message
    pub fn print_error(&self, message: &str) -> io::Result<()> {
        let (_, error_style, _) = self.get_status_styles();
        let white_bold = Style::new().white().bold();
        self.err_term.write_line(&format!(
            "{} {}",
            error_style.apply_to("[!] ERROR:").bold(),
            white_bold.apply_to(message)
        ))
    }

    /// Print a success message
    pub fn print_success(&self, message: &str) -> io::Result<()> {
        let (_, _, success_style) = self.get_status_styles();
        let white_bold = Style::new().white().bold();
        self.err_term.write_line(&format!(
            "{} {}",
            success_style.apply_to("[✓]").bold(),
            white_bold.apply_to(message)
        ))
    }

    /// Print a warning message
    pub fn print_warning(&self, message: &str) -> io::Result<()> {
        let (warning_style, _, _) = self.get_status_styles();
        let white_bold = Style::new().white().bold();
        self.err_term.write_line(&format!(
            "{} {}",
            warning_style.apply_to("[!] WARNING:").bold(),
            white_bold.apply_to(message)
        ))
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Pads every column to its widest cell. The last column is left unpadded.
fn align_rows(rows: &[Vec<Cell>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(measure_text_width(&cell.text));
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    let text = if cell.right {
                        pad_str(&cell.text, widths[i], Alignment::Right, None).into_owned()
                    } else if i + 1 == row.len() {
                        cell.text.clone()
                    } else {
                        pad_str(&cell.text, widths[i], Alignment::Left, None).into_owned()
                    };
                    cell.style.apply_to(text).to_string()
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

fn date_label(date: Option<chrono::NaiveDateTime>) -> String {
    date.map(|d| d.format(DATE_DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(unix)]
fn permissions(stat: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = stat.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(if stat.is_dir() { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn permissions(stat: &fs::Metadata) -> String {
    let kind = if stat.is_dir() { 'd' } else { '-' };
    let write = if stat.permissions().readonly() { '-' } else { 'w' };
    format!("{}r{}-r{}-r{}-", kind, write, write, write)
}

#[cfg(unix)]
fn owner(stat: &fs::Metadata) -> String {
    use std::os::unix::fs::MetadataExt;
    stat.uid().to_string()
}

#[cfg(not(unix))]
fn owner(_stat: &fs::Metadata) -> String {
    "-".to_string()
}

#[cfg(unix)]
fn group(stat: &fs::Metadata) -> String {
    use std::os::unix::fs::MetadataExt;
    stat.gid().to_string()
}

#[cfg(not(unix))]
fn group(_stat: &fs::Metadata) -> String {
    "-".to_string()
}

/// Formats a byte count with binary units.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif_source::fixtures::*;
    use crate::scanner::{WalkOptions, list_directory};
    use console::strip_ansi_codes;

    fn plain(lines: &[String]) -> Vec<String> {
        lines.iter().map(|l| strip_ansi_codes(l).into_owned()).collect()
    }

    fn photo_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let bytes = jpeg(&tiff(
            vec![
                (MAKE, Fixture::Ascii("Canon")),
                (MODEL, Fixture::Ascii("Canon IXUS 105")),
                (DATE_TIME, Fixture::Ascii("2010:05:01 12:00:00")),
            ],
            vec![
                (PIXEL_X_DIMENSION, Fixture::Long(4000)),
                (PIXEL_Y_DIMENSION, Fixture::Long(3000)),
            ],
        ));
        fs::write(dir.path().join("IMG_0001.jpg"), bytes).unwrap();
        fs::write(dir.path().join("broken.jpg"), b"nope").unwrap();
        fs::write(dir.path().join("readme.txt"), b"hello").unwrap();
        fs::create_dir(dir.path().join("albums")).unwrap();
        dir
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024 * 5), "5.00 MB");
    }

    #[test]
    fn test_align_rows_pads_columns() {
        let rows = vec![
            vec![Cell::plain("a"), Cell::plain("1").right(), Cell::plain("x")],
            vec![Cell::plain("longer"), Cell::plain("100").right(), Cell::plain("")],
        ];

        let lines = plain(&align_rows(&rows));

        assert_eq!(lines, vec!["a         1  x", "longer  100"]);
    }

    #[test]
    fn test_render_table_contents() {
        let dir = photo_dir();
        let listing = list_directory(dir.path(), dir.path(), WalkOptions::default());
        let ui = UI::new();

        let lines = plain(&ui.render_table(&listing));

        assert!(lines[2].starts_with("Name"));
        assert!(lines[2].contains("Modification Date"));
        let albums = lines.iter().position(|l| l.starts_with("albums")).unwrap();
        let photo = lines.iter().position(|l| l.starts_with("IMG_0001.jpg")).unwrap();
        assert!(albums < photo);
        assert!(lines[albums].contains("<DIR>"));

        let row = &lines[photo];
        assert!(row.contains("image"));
        assert!(row.contains("2010-05-01T12:00:00"));
        assert!(row.contains("4000 x 3000"));
        assert!(row.ends_with("Canon IXUS 105"));

        let readme = lines.iter().find(|l| l.starts_with("readme.txt")).unwrap();
        assert!(readme.contains("other"));
    }

    #[test]
    fn test_render_long_contents() {
        let dir = photo_dir();
        let listing = list_directory(dir.path(), dir.path(), WalkOptions::default());
        let ui = UI::new().with_human_sizes(true);

        let lines = plain(&ui.render_long(&listing));

        assert!(lines[0].ends_with(':'));
        let photo = lines.iter().find(|l| l.contains("IMG_0001.jpg")).unwrap();
        assert!(photo.ends_with("4000 x 3000  Canon IXUS 105  2010-05-01T12:00:00"));
        let readme = lines.iter().find(|l| l.contains("readme.txt")).unwrap();
        assert!(readme.contains("5.00 B"));
        assert!(readme.ends_with("readme.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions_string() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file");
        fs::write(&path, b"x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        assert_eq!(permissions(&fs::metadata(&path).unwrap()), "-rw-r-----");
        assert!(permissions(&fs::metadata(dir.path()).unwrap()).starts_with('d'));
    }

    #[test]
    fn test_diagnostics_only_for_decoded_files() {
        let dir = photo_dir();
        let listing = list_directory(dir.path(), dir.path(), WalkOptions::default());
        let ui = UI::new();

        assert!(ui.diagnostics(&listing).is_empty());

        let _ = ui.render_table(&listing);
        let diagnostics = ui.diagnostics(&listing);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].0, Severity::Warning);
        assert!(diagnostics[0].1.contains("broken.jpg"));
    }
}
