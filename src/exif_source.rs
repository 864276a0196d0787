//! Raw tag source backed by kamadak-exif.
//!
//! Reads the metadata segments of an image container and flattens every
//! field into a [`TagSet`] keyed by namespaced tag name. Only the container
//! segments that hold metadata are read, never the full image data.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::{Path, PathBuf};

use exif::{Context, Field, In, Value};
use thiserror::Error;

use crate::tags::{RawTag, TagSet, TagValue, TypeCode};

/// Errors raised while decoding an image container.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no readable EXIF data: {0}")]
    Exif(#[from] exif::Error),
}

/// Tag names that are exposed under their conventional aliases.
const TAG_ALIASES: &[(&str, &str)] = &[
    ("PixelXDimension", "ExifImageWidth"),
    ("PixelYDimension", "ExifImageLength"),
];

/// The fields read from one container.
#[derive(Debug, Default)]
pub struct Decoded {
    pub tags: TagSet,
    /// Malformed entries that were skipped while the rest were kept.
    pub skipped: Vec<String>,
}

/// Decodes every EXIF field reachable from `reader`.
///
/// A malformed entry is skipped and noted in [`Decoded::skipped`]; only a
/// container with no usable EXIF structure is an error.
pub fn decode<R: BufRead + Seek>(reader: &mut R) -> Result<Decoded, DecodeError> {
    let (exif, errors) = match exif::Reader::new()
        .continue_on_error(true)
        .read_from_container(reader)
    {
        Ok(exif) => (exif, Vec::new()),
        Err(exif::Error::PartialResult(partial)) => partial.into_inner(),
        Err(e) => return Err(e.into()),
    };

    let mut tags = TagSet::new();
    for field in exif.fields() {
        tags.insert_first(tag_name(field), raw_tag(field));
    }

    Ok(Decoded {
        tags,
        skipped: errors
            .iter()
            .map(|e| format!("skipped malformed EXIF entry: {}", e))
            .collect(),
    })
}

/// Opens `path` and decodes its EXIF fields. The file handle is dropped
/// before returning, whether decoding succeeded or not.
pub fn decode_file(path: &Path) -> Result<Decoded, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    decode(&mut reader)
}

fn tag_name(field: &Field) -> String {
    let namespace = if field.ifd_num != In::PRIMARY {
        "Thumbnail"
    } else {
        namespace_for(field.tag.context())
    };

    let name = field.tag.to_string();
    let name = TAG_ALIASES
        .iter()
        .find(|(original, _)| *original == name)
        .map(|(_, alias)| alias.to_string())
        .unwrap_or(name);

    format!("{} {}", namespace, name)
}

#[allow(unreachable_patterns)]
fn namespace_for(context: Context) -> &'static str {
    match context {
        Context::Tiff => "Image",
        Context::Exif => "EXIF",
        Context::Gps => "GPS",
        Context::Interop => "Interoperability",
        _ => "Unknown",
    }
}

fn raw_tag(field: &Field) -> RawTag {
    let (type_code, values) = match &field.value {
        Value::Ascii(strings) => (
            TypeCode::Ascii,
            strings
                .iter()
                .map(|s| {
                    let text = String::from_utf8_lossy(s);
                    TagValue::Text(text.trim_end_matches('\0').to_string())
                })
                .collect(),
        ),
        Value::Short(values) => (
            TypeCode::Short,
            values.iter().map(|v| TagValue::Integer(u32::from(*v))).collect(),
        ),
        Value::Long(values) => (
            TypeCode::Long,
            values.iter().map(|v| TagValue::Integer(*v)).collect(),
        ),
        other => (other_type_code(other), vec![display_text(field)]),
    };

    RawTag { type_code, values }
}

#[allow(unreachable_patterns)]
fn other_type_code(value: &Value) -> TypeCode {
    match value {
        Value::Byte(_) => TypeCode::Byte,
        Value::Rational(_) => TypeCode::Rational,
        Value::SByte(_) => TypeCode::SignedByte,
        Value::Undefined(..) => TypeCode::Undefined,
        Value::SShort(_) => TypeCode::SignedShort,
        Value::SLong(_) => TypeCode::SignedLong,
        Value::SRational(_) => TypeCode::SignedRational,
        Value::Float(_) => TypeCode::Float,
        Value::Double(_) => TypeCode::Double,
        Value::Unknown(code, _, _) => TypeCode::Unknown(*code),
        _ => TypeCode::Unknown(0),
    }
}

fn display_text(field: &Field) -> TagValue {
    TagValue::Text(field.display_value().to_string())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use std::io::Cursor;

    fn sample_jpeg() -> Vec<u8> {
        jpeg(&tiff(
            vec![
                (MAKE, Fixture::Ascii("Canon")),
                (MODEL, Fixture::Ascii("Canon IXUS 105")),
                (DATE_TIME, Fixture::Ascii("2010:05:01 12:00:00")),
                (IMAGE_WIDTH, Fixture::Short(4000)),
                (X_RESOLUTION, Fixture::Rational(180, 1)),
            ],
            vec![
                (DATE_TIME_ORIGINAL, Fixture::Ascii("2010:04:30 09:15:42")),
                (PIXEL_X_DIMENSION, Fixture::Long(4000)),
                (PIXEL_Y_DIMENSION, Fixture::Long(3000)),
            ],
        ))
    }

    #[test]
    fn test_decode_namespaces_primary_and_exif_tags() {
        let tags = decode(&mut Cursor::new(sample_jpeg())).unwrap().tags;

        assert_eq!(tags.get("Image Make"), Some(&RawTag::ascii("Canon")));
        assert_eq!(
            tags.get("Image Model"),
            Some(&RawTag::ascii("Canon IXUS 105"))
        );
        assert_eq!(
            tags.get("EXIF DateTimeOriginal"),
            Some(&RawTag::ascii("2010:04:30 09:15:42"))
        );
        assert_eq!(tags.get("Image ImageWidth"), Some(&RawTag::short(4000)));
    }

    #[test]
    fn test_decode_aliases_pixel_dimensions() {
        let tags = decode(&mut Cursor::new(sample_jpeg())).unwrap().tags;

        assert_eq!(tags.get("EXIF ExifImageWidth"), Some(&RawTag::long(4000)));
        assert_eq!(tags.get("EXIF ExifImageLength"), Some(&RawTag::long(3000)));
        assert!(!tags.contains("EXIF PixelXDimension"));
    }

    #[test]
    fn test_decode_keeps_other_types_with_their_code() {
        let tags = decode(&mut Cursor::new(sample_jpeg())).unwrap().tags;

        let x_resolution = tags.get("Image XResolution").unwrap();
        assert_eq!(x_resolution.type_code, TypeCode::Rational);
        assert_eq!(x_resolution.values.len(), 1);
        assert!(x_resolution.first_text().is_some());
    }

    #[test]
    fn test_decode_clean_file_skips_nothing() {
        let decoded = decode(&mut Cursor::new(sample_jpeg())).unwrap();
        assert!(decoded.skipped.is_empty());
    }

    #[test]
    fn test_decode_keeps_fields_around_a_corrupt_entry() {
        let mut payload = tiff(
            vec![
                (MAKE, Fixture::Ascii("Canon")),
                (MODEL, Fixture::Ascii("Canon IXUS 105")),
                (DATE_TIME, Fixture::Ascii("2010:05:01 12:00:00")),
            ],
            Vec::new(),
        );
        // Point the DateTime value far past the end of the payload.
        let value_offset = 8 + 2 + 12 * 2 + 8;
        payload[value_offset..value_offset + 4].copy_from_slice(&0xFFFF_0000u32.to_le_bytes());

        let decoded = decode(&mut Cursor::new(jpeg(&payload))).unwrap();

        assert_eq!(decoded.tags.get("Image Make"), Some(&RawTag::ascii("Canon")));
        assert_eq!(
            decoded.tags.get("Image Model"),
            Some(&RawTag::ascii("Canon IXUS 105"))
        );
        assert!(!decoded.tags.contains("Image DateTime"));
        assert_eq!(decoded.skipped.len(), 1);
        assert!(decoded.skipped[0].starts_with("skipped malformed EXIF entry"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode(&mut Cursor::new(b"definitely not a jpeg".to_vec()));
        assert!(matches!(result, Err(DecodeError::Exif(_))));
    }

    #[test]
    fn test_decode_jpeg_without_exif_segment() {
        let bare = vec![0xFF, 0xD8, 0xFF, 0xD9];
        assert!(decode(&mut Cursor::new(bare)).is_err());
    }

    #[test]
    fn test_decode_file_missing_path() {
        let result = decode_file(Path::new("/nonexistent/ls-exif/photo.jpg"));
        match result {
            Err(DecodeError::Io { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/ls-exif/photo.jpg"));
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, sample_jpeg()).unwrap();

        let tags = decode_file(&path).unwrap().tags;
        assert!(tags.contains("Image DateTime"));
    }
}
