//! Tag normalization.
//!
//! Converts raw tags into typed scalars. [`read`] is the only place where a
//! stored value is converted, and it refuses to cross type boundaries: a
//! string tag only becomes a date when it looks like one, and a numeric tag
//! only answers integer requests.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::tags::{TagSet, TypeCode};

/// EXIF-style datetime prefix, with `/` or `:` as date separator.
///
/// Minutes and seconds may carry a space instead of a leading zero, which
/// some camera firmware writes (`"2006:11:09 10:54: 1"`).
static EXIF_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}[/:]\d\d[/:]\d\d \d\d:[ \d]\d:[ \d]\d").expect("valid datetime pattern")
});

const LEGACY_DATE_FORMAT: &str = "%Y-%m-%d %H-%M-%S";
const DATE_PREFIX_LEN: usize = 19;

/// The kind of value a caller wants out of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    DateTime,
    Integer,
    Text,
}

/// A typed value produced from a raw tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedValue {
    DateTime(NaiveDateTime),
    Integer(u32),
    Text(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The caller asked for a kind the stored tag can never produce.
    #[error("tag '{tag}' holds {found:?} data but {requested:?} was requested")]
    KindMismatch {
        tag: String,
        requested: Expected,
        found: Expected,
    },

    /// A date was requested from a string that does not look like one.
    #[error("tag '{tag}' does not hold a date: {value:?}")]
    NotADate { tag: String, value: String },

    #[error("tag '{tag}' has unsupported encoding {type_code}")]
    UnsupportedType { tag: String, type_code: TypeCode },

    #[error("could not parse date {value:?} (cleaned to {cleaned:?})")]
    DateParse { value: String, cleaned: String },
}

/// Returns true iff every named tag is present.
pub fn has_all(tags: &TagSet, names: &[&str]) -> bool {
    names.iter().all(|name| tags.contains(name))
}

/// Reads `name` from `tags` as the `expected` kind.
///
/// Returns `Ok(None)` when the tag is missing.
pub fn read(
    tags: &TagSet,
    name: &str,
    expected: Expected,
) -> Result<Option<NormalizedValue>, NormalizeError> {
    let Some(tag) = tags.get(name) else {
        return Ok(None);
    };

    match tag.type_code {
        TypeCode::Ascii => {
            let value = tag.first_text().unwrap_or_default();

            if looks_like_date(value) {
                if expected != Expected::DateTime {
                    return Err(mismatch(name, expected, Expected::DateTime));
                }
                return parse_legacy_date_string(value)
                    .map(|date| Some(NormalizedValue::DateTime(date)));
            }

            match expected {
                Expected::DateTime => Err(NormalizeError::NotADate {
                    tag: name.to_string(),
                    value: value.to_string(),
                }),
                Expected::Integer => Err(mismatch(name, expected, Expected::Text)),
                Expected::Text => Ok(Some(NormalizedValue::Text(value.to_string()))),
            }
        }
        TypeCode::Short | TypeCode::Long => {
            if expected != Expected::Integer {
                return Err(mismatch(name, expected, Expected::Integer));
            }
            Ok(tag.first_integer().map(NormalizedValue::Integer))
        }
        type_code => Err(NormalizeError::UnsupportedType {
            tag: name.to_string(),
            type_code,
        }),
    }
}

/// Reads the first of `names` that yields a value, in order.
///
/// A candidate that is present but unreadable is pushed onto `skipped` and
/// the next one is tried. A [`NormalizeError::KindMismatch`] stops the search.
pub fn read_first(
    tags: &TagSet,
    names: &[&str],
    expected: Expected,
    skipped: &mut Vec<NormalizeError>,
) -> Result<Option<NormalizedValue>, NormalizeError> {
    for name in names {
        match read(tags, name, expected) {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) => {}
            Err(err @ NormalizeError::KindMismatch { .. }) => return Err(err),
            Err(err) => skipped.push(err),
        }
    }
    Ok(None)
}

/// Parses the loosely formatted date strings found in EXIF data.
///
/// Accepts `/`, `:`, `.` and `\` as separators, repairs the space-padded
/// minute/second bug (`": 1"` becomes `":01"`) and ignores anything after
/// the first 19 characters.
pub fn parse_legacy_date_string(value: &str) -> Result<NaiveDateTime, NormalizeError> {
    let cleaned: String = value
        .replace(": ", ":0")
        .replace(['/', ':', '.', '\\'], "-")
        .chars()
        .take(DATE_PREFIX_LEN)
        .collect();

    NaiveDateTime::parse_from_str(&cleaned, LEGACY_DATE_FORMAT).map_err(|_| {
        NormalizeError::DateParse {
            value: value.to_string(),
            cleaned,
        }
    })
}

fn looks_like_date(value: &str) -> bool {
    let prefix: String = value.chars().take(DATE_PREFIX_LEN).collect();
    EXIF_DATE_PATTERN.is_match(&prefix)
}

fn mismatch(tag: &str, requested: Expected, found: Expected) -> NormalizeError {
    NormalizeError::KindMismatch {
        tag: tag.to_string(),
        requested,
        found,
    }
}
