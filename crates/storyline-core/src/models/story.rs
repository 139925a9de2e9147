use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

use crate::dates::{format_date, parse_date};

/// Cache-busting token attached to a story; backends send either a string or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Revision {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Number(n) => write!(f, "{}", n),
            Revision::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Revision {
    fn from(value: &str) -> Self {
        Revision::Text(value.to_string())
    }
}

impl From<u64> for Revision {
    fn from(value: u64) -> Self {
        Revision::Number(value.into())
    }
}

/// Catalog entry for one photo/video essay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Unique, stable identifier; used in URLs and as the fragment value
    pub id: String,

    /// Source timestamp, EXIF-style or ISO-8601
    #[serde(default)]
    pub date: String,

    /// Display date derived once at catalog load
    #[serde(default)]
    pub formatted_date: String,

    /// Relative path of the cover image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<Revision>,

    /// Fields the viewer does not interpret (title, description, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Story {
    pub fn new(id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            formatted_date: String::new(),
            cover: None,
            last_update: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    pub fn with_last_update(mut self, revision: impl Into<Revision>) -> Self {
        self.last_update = Some(revision.into());
        self
    }

    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }

    /// Fill the derived display date
    pub fn annotate(&mut self) {
        self.formatted_date = format_date(&self.date);
    }

    /// Free-form title if the backend sent one
    pub fn title(&self) -> Option<&str> {
        self.extra.get("title").and_then(|v| v.as_str())
    }
}

/// Sorted story list plus the story to load first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub stories: Vec<Story>,

    /// `None` only when the catalog is empty
    pub priority: Option<usize>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    pub fn priority_story(&self) -> Option<&Story> {
        self.priority.and_then(|i| self.stories.get(i))
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.stories.iter().position(|s| s.id == id)
    }
}

/// Sort newest first. Unparseable dates go last and keep their input order.
pub fn sort_newest_first(stories: &mut [Story]) {
    // sort_by_cached_key is stable, so equal keys keep their relative order
    stories.sort_by_cached_key(|story| {
        let parsed = story.parsed_date();
        (parsed.is_none(), Reverse(parsed))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(stories: &[Story]) -> Vec<&str> {
        stories.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_sort_newest_first() {
        let mut stories = vec![
            Story::new("jan", "2024-01-01"),
            Story::new("mar", "2024-03-01"),
            Story::new("feb", "2024-02-01"),
        ];
        sort_newest_first(&mut stories);
        assert_eq!(ids(&stories), vec!["mar", "feb", "jan"]);
    }

    #[test]
    fn test_unparseable_dates_go_last_in_input_order() {
        let mut stories = vec![
            Story::new("bad-1", "someday"),
            Story::new("old", "2020:05:01 10:00:00"),
            Story::new("bad-2", ""),
            Story::new("new", "2023-06-01T08:00:00Z"),
        ];
        sort_newest_first(&mut stories);
        assert_eq!(ids(&stories), vec!["new", "old", "bad-1", "bad-2"]);
    }

    #[test]
    fn test_deserialize_catalog_entry() {
        let story: Story = serde_json::from_value(serde_json::json!({
            "id": "lisbon",
            "date": "2024:05:02 09:00:00",
            "cover": "/cover.jpg",
            "lastUpdate": 1714640000,
            "title": "Lisbon"
        }))
        .unwrap();

        assert_eq!(story.id, "lisbon");
        assert_eq!(story.cover.as_deref(), Some("/cover.jpg"));
        assert_eq!(story.last_update.as_ref().map(|r| r.to_string()).as_deref(), Some("1714640000"));
        assert_eq!(story.title(), Some("Lisbon"));
        assert!(story.formatted_date.is_empty());
    }

    #[test]
    fn test_revision_accepts_text() {
        let story: Story =
            serde_json::from_value(serde_json::json!({"id": "a", "lastUpdate": "abc123"})).unwrap();
        assert_eq!(story.last_update, Some(Revision::Text("abc123".to_string())));
    }

    #[test]
    fn test_annotate() {
        let mut story = Story::new("a", "2025:08:04 13:34:43");
        story.annotate();
        assert_eq!(story.formatted_date, "04/08/2025");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog {
            stories: vec![Story::new("a", "2024-01-02"), Story::new("b", "2024-01-01")],
            priority: Some(1),
        };
        assert_eq!(catalog.position("b"), Some(1));
        assert_eq!(catalog.position("zzz"), None);
        assert_eq!(catalog.priority_story().map(|s| s.id.as_str()), Some("b"));
    }

    fn date_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (2000i32..2030, 1u32..13, 1u32..29)
                .prop_map(|(y, m, d)| format!("{:04}-{:02}-{:02}", y, m, d)),
            (2000i32..2030, 1u32..13, 1u32..29, 0u32..24)
                .prop_map(|(y, m, d, h)| format!("{:04}:{:02}:{:02} {:02}:00:00", y, m, d, h)),
            "[a-z]{0,6}",
        ]
    }

    proptest! {
        #[test]
        fn prop_sort_is_descending_with_unparseable_tail(dates in prop::collection::vec(date_strategy(), 0..24)) {
            let mut stories: Vec<Story> = dates
                .iter()
                .enumerate()
                .map(|(i, d)| Story::new(i.to_string(), d.clone()))
                .collect();
            let unparseable_in_input: Vec<String> = stories
                .iter()
                .filter(|s| s.parsed_date().is_none())
                .map(|s| s.id.clone())
                .collect();

            sort_newest_first(&mut stories);

            let parsed: Vec<_> = stories.iter().map(|s| s.parsed_date()).collect();
            let first_none = parsed.iter().position(|p| p.is_none()).unwrap_or(parsed.len());
            prop_assert!(parsed[first_none..].iter().all(|p| p.is_none()));
            for pair in parsed[..first_none].windows(2) {
                prop_assert!(pair[0] >= pair[1]);
            }

            let tail: Vec<String> = stories[first_none..].iter().map(|s| s.id.clone()).collect();
            prop_assert_eq!(tail, unparseable_in_input);
        }

        #[test]
        fn prop_equal_dates_keep_input_order(n in 1usize..12) {
            let mut stories: Vec<Story> =
                (0..n).map(|i| Story::new(i.to_string(), "2024-01-01")).collect();
            sort_newest_first(&mut stories);
            let order: Vec<String> = stories.iter().map(|s| s.id.clone()).collect();
            let expected: Vec<String> = (0..n).map(|i| i.to_string()).collect();
            prop_assert_eq!(order, expected);
        }
    }
}
