use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::stat::Stat;
use crate::dates::format_date;

/// Kind of a media item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    #[serde(alias = "image")]
    Photo,
    Video,
}

/// Capture metadata embedded by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exif {
    /// Capture timestamp (`yyyy:MM:dd HH:mm:ss`)
    #[serde(default, alias = "DateTimeOriginal", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Derived display date, filled during normalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single photo or video of a story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Relative path, e.g. `/medias/IMG_0042.jpg`
    pub src: String,

    #[serde(rename = "type", default)]
    pub kind: MediaKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif: Option<Exif>,
}

impl Media {
    pub fn photo(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            kind: MediaKind::Photo,
            exif: None,
        }
    }

    pub fn video(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            kind: MediaKind::Video,
            exif: None,
        }
    }

    pub fn with_capture_date(mut self, date: impl Into<String>) -> Self {
        self.exif.get_or_insert_with(Exif::default).date = Some(date.into());
        self
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    pub fn formatted_date(&self) -> Option<&str> {
        self.exif.as_ref().and_then(|e| e.formatted_date.as_deref())
    }

    /// Derive the display date from the capture timestamp, if any
    fn derive_display_date(&mut self) {
        if let Some(exif) = self.exif.as_mut() {
            exif.formatted_date = exif
                .date
                .as_deref()
                .map(format_date)
                .filter(|formatted| !formatted.is_empty());
        }
    }
}

/// Full payload of one story
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryDetail {
    #[serde(default)]
    pub medias: Vec<Media>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<Stat>,
}

impl StoryDetail {
    pub fn new(medias: Vec<Media>) -> Self {
        Self {
            medias,
            stats: Vec::new(),
        }
    }

    pub fn with_stats(mut self, stats: Vec<Stat>) -> Self {
        self.stats = stats;
        self
    }

    pub fn media_count(&self) -> usize {
        self.medias.len()
    }

    /// Derive display dates and restore the filename sequence of the media list
    pub fn normalize(&mut self) {
        for media in &mut self.medias {
            media.derive_display_date();
        }
        self.medias
            .sort_by(|a, b| compare_sequence(sequence_key(&a.src), sequence_key(&b.src)));
    }

    /// Indices of stats that reference a track resource
    pub fn track_indices(&self) -> Vec<usize> {
        self.stats
            .iter()
            .enumerate()
            .filter(|(_, stat)| stat.path_json.is_some())
            .map(|(i, _)| i)
            .collect()
    }
}

/// First run of ASCII digits in `src`, or `""` when there is none
pub fn sequence_key(src: &str) -> &str {
    let Some(start) = src.find(|c: char| c.is_ascii_digit()) else {
        return "";
    };
    let rest = &src[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Compare two digit runs by numeric value; the empty key sorts first
pub fn compare_sequence(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    // Arbitrary length runs: strip leading zeros, then longer means larger
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn srcs(detail: &StoryDetail) -> Vec<&str> {
        detail.medias.iter().map(|m| m.src.as_str()).collect()
    }

    #[test]
    fn test_sequence_key() {
        assert_eq!(sequence_key("/medias/IMG_0042.jpg"), "0042");
        assert_eq!(sequence_key("img10.jpg"), "10");
        assert_eq!(sequence_key("2024/clip3.mp4"), "2024");
        assert_eq!(sequence_key("cover.jpg"), "");
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        let mut detail = StoryDetail::new(vec![
            Media::photo("img2.jpg"),
            Media::photo("img10.jpg"),
            Media::photo("img1.jpg"),
        ]);
        detail.normalize();
        assert_eq!(srcs(&detail), vec!["img1.jpg", "img2.jpg", "img10.jpg"]);
    }

    #[test]
    fn test_items_without_digits_sort_first() {
        let mut detail = StoryDetail::new(vec![
            Media::photo("b3.jpg"),
            Media::photo("intro.jpg"),
            Media::video("a1.mp4"),
            Media::photo("outro.jpg"),
        ]);
        detail.normalize();
        assert_eq!(srcs(&detail), vec!["intro.jpg", "outro.jpg", "a1.mp4", "b3.jpg"]);
    }

    #[test]
    fn test_leading_zeros_and_long_runs() {
        assert_eq!(compare_sequence("007", "7"), Ordering::Equal);
        assert_eq!(compare_sequence("0010", "9"), Ordering::Greater);
        assert_eq!(
            compare_sequence("123456789012345678901234567890", "99"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_normalize_derives_display_dates() {
        let mut detail = StoryDetail::new(vec![
            Media::photo("1.jpg").with_capture_date("2025:08:04 13:34:43"),
            Media::photo("2.jpg"),
            Media::photo("3.jpg").with_capture_date("garbage"),
        ]);
        detail.normalize();

        assert_eq!(detail.medias[0].formatted_date(), Some("04/08/2025"));
        assert_eq!(detail.medias[1].formatted_date(), None);
        assert_eq!(detail.medias[2].formatted_date(), None);
    }

    #[test]
    fn test_deserialize_detail_payload() {
        let detail: StoryDetail = serde_json::from_value(serde_json::json!({
            "medias": [
                {"src": "/v/clip2.mp4", "type": "video"},
                {"src": "/p/IMG_1.jpg", "type": "photo", "exif": {"date": "2024:01:01 10:00:00", "Make": "Fuji"}}
            ],
            "stats": [{"pathJson": "/tracks/day1.json", "distance": 12.5}]
        }))
        .unwrap();

        assert_eq!(detail.medias.len(), 2);
        assert!(detail.medias[0].is_video());
        assert_eq!(
            detail.medias[1].exif.as_ref().and_then(|e| e.extra.get("Make")),
            Some(&serde_json::json!("Fuji"))
        );
        assert_eq!(detail.track_indices(), vec![0]);
    }

    #[test]
    fn test_deserialize_without_stats() {
        let detail: StoryDetail =
            serde_json::from_value(serde_json::json!({"medias": [{"src": "a1.jpg"}]})).unwrap();
        assert!(detail.stats.is_empty());
        assert_eq!(detail.medias[0].kind, MediaKind::Photo);
    }

    proptest! {
        #[test]
        fn prop_media_sort_is_numeric(numbers in prop::collection::vec(0u32..100_000, 0..30)) {
            let mut detail = StoryDetail::new(
                numbers.iter().map(|n| Media::photo(format!("IMG_{}.jpg", n))).collect(),
            );
            detail.normalize();

            let sorted: Vec<u32> = detail
                .medias
                .iter()
                .map(|m| sequence_key(&m.src).parse().unwrap())
                .collect();
            let mut expected = numbers.clone();
            expected.sort();
            prop_assert_eq!(sorted, expected);
        }
    }
}
