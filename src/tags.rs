//! Raw EXIF tag model.
//!
//! A [`TagSet`] is what the decoder hands back for one file: tag names in the
//! conventional namespaced form (`"Image Make"`, `"EXIF DateTimeOriginal"`)
//! mapped to the wire type and the values that were stored.

use std::collections::HashMap;
use std::fmt;

/// Wire-level type of a stored EXIF value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SignedByte,
    Undefined,
    SignedShort,
    SignedLong,
    SignedRational,
    Float,
    Double,
    Unknown(u16),
}

impl TypeCode {
    /// Returns the numeric type code used in TIFF/EXIF directories.
    pub fn wire_code(&self) -> u16 {
        match self {
            TypeCode::Byte => 1,
            TypeCode::Ascii => 2,
            TypeCode::Short => 3,
            TypeCode::Long => 4,
            TypeCode::Rational => 5,
            TypeCode::SignedByte => 6,
            TypeCode::Undefined => 7,
            TypeCode::SignedShort => 8,
            TypeCode::SignedLong => 9,
            TypeCode::SignedRational => 10,
            TypeCode::Float => 11,
            TypeCode::Double => 12,
            TypeCode::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCode::Unknown(code) => write!(f, "unknown type {}", code),
            other => write!(f, "{:?} (type {})", other, other.wire_code()),
        }
    }
}

/// A single stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Text(String),
    Integer(u32),
}

/// One decoded tag: its wire type plus every stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    pub type_code: TypeCode,
    pub values: Vec<TagValue>,
}

impl RawTag {
    pub fn ascii(value: impl Into<String>) -> Self {
        Self {
            type_code: TypeCode::Ascii,
            values: vec![TagValue::Text(value.into())],
        }
    }

    pub fn short(value: u16) -> Self {
        Self {
            type_code: TypeCode::Short,
            values: vec![TagValue::Integer(u32::from(value))],
        }
    }

    pub fn long(value: u32) -> Self {
        Self {
            type_code: TypeCode::Long,
            values: vec![TagValue::Integer(value)],
        }
    }

    /// First stored string, if the first value is textual.
    pub fn first_text(&self) -> Option<&str> {
        match self.values.first() {
            Some(TagValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// First stored integer, if the first value is numeric.
    pub fn first_integer(&self) -> Option<u32> {
        match self.values.first() {
            Some(TagValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }
}

/// All tags decoded from one file, keyed by namespaced tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: HashMap<String, RawTag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tag unless one with the same name is already present.
    ///
    /// Returns `true` when the tag was stored.
    pub fn insert_first(&mut self, name: impl Into<String>, tag: RawTag) -> bool {
        let mut stored = false;
        self.tags.entry(name.into()).or_insert_with(|| {
            stored = true;
            tag
        });
        stored
    }

    pub fn get(&self, name: &str) -> Option<&RawTag> {
        self.tags.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, RawTag)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (N, RawTag)>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for (name, tag) in iter {
            set.insert_first(name, tag);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_first_keeps_earliest() {
        let mut set = TagSet::new();

        assert!(set.insert_first("Image Make", RawTag::ascii("Canon")));
        assert!(!set.insert_first("Image Make", RawTag::ascii("Nikon")));

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("Image Make").unwrap().first_text(), Some("Canon"));
    }

    #[test]
    fn test_from_iter_collects_tags() {
        let set: TagSet = vec![
            ("Image Model", RawTag::ascii("A7")),
            ("EXIF ExifImageWidth", RawTag::long(6000)),
            ("Image Make", RawTag::ascii("Sony")),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 3);
        assert!(set.contains("Image Make"));
        assert!(!set.contains("Image DateTime"));
    }

    #[test]
    fn test_first_value_accessors() {
        let short = RawTag::short(4000);
        assert_eq!(short.type_code, TypeCode::Short);
        assert_eq!(short.first_integer(), Some(4000));
        assert_eq!(short.first_text(), None);

        let empty = RawTag {
            type_code: TypeCode::Long,
            values: Vec::new(),
        };
        assert_eq!(empty.first_integer(), None);
    }

    #[test]
    fn test_type_code_display() {
        assert_eq!(TypeCode::Rational.to_string(), "Rational (type 5)");
        assert_eq!(TypeCode::Unknown(42).to_string(), "unknown type 42");
        assert_eq!(TypeCode::Ascii.wire_code(), 2);
    }
}
