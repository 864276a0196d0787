//! Presentation values derived from a file's EXIF tags.
//!
//! Each field has a fixed precedence of source tags. A problem with one field
//! is recorded as an issue and leaves that field empty; it never prevents the
//! other fields from being derived.

use chrono::{Local, NaiveDateTime, Timelike};

use crate::normalize::{self, Expected, NormalizeError, NormalizedValue};
use crate::tags::TagSet;

/// Taken date candidates, most specific first.
pub const TAKEN_DATE_TAGS: &[&str] = &["EXIF DateTimeOriginal", "Image DateTime"];

/// Width/height pairs, consulted in order; the first complete pair wins.
pub const RESOLUTION_TAGS: &[(&str, &str)] = &[
    ("Image ImageWidth", "Image ImageLength"),
    ("EXIF ExifImageWidth", "EXIF ExifImageLength"),
];

pub const MAKE_TAG: &str = "Image Make";
pub const MODEL_TAG: &str = "Image Model";

/// Display format for taken dates.
pub const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// What to do with a date tag that holds a non-date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePolicy {
    /// Treat the date as absent.
    #[default]
    Absent,
    /// Substitute the current local time.
    Now,
}

/// Presentation-ready metadata for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub taken_date: Option<NaiveDateTime>,
    pub resolution: Option<String>,
    pub camera: Option<String>,
    /// Problems met while deriving the fields above.
    pub issues: Vec<String>,
}

impl Metadata {
    /// Metadata with every field empty.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Metadata with every field empty and a single recorded issue.
    pub fn failed(issue: impl Into<String>) -> Self {
        Self {
            issues: vec![issue.into()],
            ..Self::default()
        }
    }

    pub fn derive(tags: &TagSet, policy: DatePolicy) -> Self {
        let mut issues = Vec::new();
        let taken_date = taken_date(tags, policy, &mut issues);
        let resolution = resolution(tags, &mut issues);
        let camera = camera(tags, &mut issues);

        Self {
            taken_date,
            resolution,
            camera,
            issues,
        }
    }

    /// Taken date in its display form.
    pub fn taken_date_display(&self) -> Option<String> {
        self.taken_date
            .map(|date| date.format(DATE_DISPLAY_FORMAT).to_string())
    }
}

/// Capture date: `EXIF DateTimeOriginal`, falling back to `Image DateTime`.
///
/// A candidate that cannot be read is reported and the next one is tried.
/// Under [`DatePolicy::Now`] a mislabeled candidate stands in for the
/// current time when no other candidate gives a date.
pub fn taken_date(
    tags: &TagSet,
    policy: DatePolicy,
    issues: &mut Vec<String>,
) -> Option<NaiveDateTime> {
    let mut skipped = Vec::new();
    let date = match normalize::read_first(tags, TAKEN_DATE_TAGS, Expected::DateTime, &mut skipped) {
        Ok(Some(NormalizedValue::DateTime(date))) => Some(date),
        Ok(_) => None,
        Err(err) => {
            skipped.push(err);
            None
        }
    };

    let substitute = date.is_none()
        && policy == DatePolicy::Now
        && skipped
            .iter()
            .any(|err| matches!(err, NormalizeError::NotADate { .. }));

    for err in &skipped {
        match err {
            NormalizeError::NotADate { .. } if substitute => {
                issues.push(format!("{}; using current time", err));
            }
            _ => issues.push(describe(err)),
        }
    }

    if substitute {
        Some(now_to_the_second())
    } else {
        date
    }
}

/// Resolution as `"<width> x <height>"` from the first complete tag pair.
pub fn resolution(tags: &TagSet, issues: &mut Vec<String>) -> Option<String> {
    let (width_tag, height_tag) = RESOLUTION_TAGS
        .iter()
        .find(|(width, height)| normalize::has_all(tags, &[*width, *height]))?;

    let width = read_integer(tags, width_tag, issues)?;
    let height = read_integer(tags, height_tag, issues)?;
    Some(format!("{} x {}", width, height))
}

/// Camera label from make and model.
///
/// The make is dropped when the model already starts with it, ignoring case
/// (`"Canon"` + `"Canon IXUS 105"` gives `"Canon IXUS 105"`).
pub fn camera(tags: &TagSet, issues: &mut Vec<String>) -> Option<String> {
    if !normalize::has_all(tags, &[MAKE_TAG, MODEL_TAG]) {
        return None;
    }

    let make = read_text(tags, MAKE_TAG, issues)?;
    let model = read_text(tags, MODEL_TAG, issues)?;
    Some(camera_label(&make, &model))
}

fn camera_label(make: &str, model: &str) -> String {
    if model.to_lowercase().starts_with(&make.to_lowercase()) {
        model.to_string()
    } else {
        format!("{} {}", make, model)
    }
}

fn read_integer(tags: &TagSet, name: &str, issues: &mut Vec<String>) -> Option<u32> {
    match normalize::read(tags, name, Expected::Integer) {
        Ok(Some(NormalizedValue::Integer(value))) => Some(value),
        Ok(_) => None,
        Err(err) => {
            issues.push(describe(&err));
            None
        }
    }
}

fn read_text(tags: &TagSet, name: &str, issues: &mut Vec<String>) -> Option<String> {
    match normalize::read(tags, name, Expected::Text) {
        Ok(Some(NormalizedValue::Text(value))) => Some(value),
        Ok(_) => None,
        Err(err) => {
            issues.push(describe(&err));
            None
        }
    }
}

fn describe(err: &NormalizeError) -> String {
    match err {
        NormalizeError::KindMismatch { .. } => format!("internal error: {}", err),
        _ => err.to_string(),
    }
}

fn now_to_the_second() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
