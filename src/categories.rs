//! File classification by extension.
//!
//! Only files classified as [`BaseType::Image`] are ever opened for EXIF
//! decoding. Videos are recognized for display purposes only.

use std::fmt;
use std::path::Path;

/// Coarse kind of a regular file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Image,
    Video,
    Other,
}

impl BaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseType::Image => "image",
            BaseType::Video => "video",
            BaseType::Other => "other",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Extension table, checked in order.
const EXTENSIONS: &[(BaseType, &[&str])] = &[
    (BaseType::Image, &[".jpeg", ".jpg"]),
    (BaseType::Video, &[".mp4"]),
];

/// Classifies a file by its lower-cased extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ls_exif::categories::{classify, BaseType};
///
/// assert_eq!(classify(Path::new("photo.JPG")), BaseType::Image);
/// assert_eq!(classify(Path::new("clip.mp4")), BaseType::Video);
/// assert_eq!(classify(Path::new("notes.txt")), BaseType::Other);
/// ```
pub fn classify(path: &Path) -> BaseType {
    let extension = get_extension(path);

    EXTENSIONS
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension.as_str()))
        .map(|(base_type, _)| *base_type)
        .unwrap_or(BaseType::Other)
}

/// Extracts the file extension from a path, lower-cased with a leading dot.
///
/// Returns an empty string if the path has no extension.
///
/// ```
/// use std::path::Path;
/// use ls_exif::categories::get_extension;
///
/// assert_eq!(get_extension(Path::new("/home/user/IMG_0001.JPEG")), ".jpeg");
/// assert_eq!(get_extension(Path::new("/home/user/README")), "");
/// ```
pub fn get_extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| format!(".{}", s.to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_images() {
        assert_eq!(classify(Path::new("photo.jpg")), BaseType::Image);
        assert_eq!(classify(Path::new("photo.jpeg")), BaseType::Image);
        assert_eq!(classify(Path::new("/a/b/photo.JPG")), BaseType::Image);
        assert_eq!(classify(Path::new("photo.JpEg")), BaseType::Image);
    }

    #[test]
    fn test_classify_videos() {
        assert_eq!(classify(Path::new("clip.mp4")), BaseType::Video);
        assert_eq!(classify(Path::new("clip.MP4")), BaseType::Video);
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(classify(Path::new("notes.txt")), BaseType::Other);
        assert_eq!(classify(Path::new("photo.png")), BaseType::Other);
        assert_eq!(classify(Path::new("Makefile")), BaseType::Other);
        assert_eq!(classify(Path::new(".jpg")), BaseType::Other);
    }

    #[test]
    fn test_get_extension_multiple_dots() {
        assert_eq!(get_extension(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(get_extension(Path::new("holiday.2019.JPG")), ".jpg");
    }

    #[test]
    fn test_base_type_display() {
        assert_eq!(BaseType::Image.to_string(), "image");
        assert_eq!(format!("{:<6}|", BaseType::Video), "video |");
    }
}
