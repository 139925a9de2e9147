//! Timestamp parsing and display formatting
//!
//! Backends hand out two flavours of timestamp: EXIF-style
//! `yyyy:MM:dd HH:mm:ss` and ISO-8601 (with or without offset, or a bare date).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// EXIF `DateTimeOriginal` layout
pub const EXIF_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Display layout (`dd/MM/yyyy`)
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

const NAIVE_FORMATS: &[&str] = &[
    EXIF_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a source timestamp. Offsets are normalized to UTC.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a source timestamp for display, or an empty string when it cannot be parsed
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => {
            tracing::debug!(date = raw, "unparseable date, leaving display date empty");
            String::new()
        }
    }
}
