use serde::Serialize;
use storyline_core::config::ConfigSource;
use storyline_core::models::{Media, MediaKind, Stat, Story};
use storyline_core::tracks::TrackSummary;
use tabled::Tabled;

const NONE: &str = "-";

/// One line of the `list` table
#[derive(Debug, Serialize, Tabled)]
pub struct StoryRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Cover")]
    pub cover: String,
}

impl StoryRow {
    pub fn new(index: usize, story: &Story) -> Self {
        Self {
            index,
            id: story.id.clone(),
            date: or_none(&story.formatted_date),
            title: story.title().unwrap_or(NONE).to_string(),
            cover: story.cover.clone().unwrap_or_else(|| NONE.to_string()),
        }
    }
}

/// Output for list command
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub total: usize,
    pub stories: Vec<StoryRow>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct MediaRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Source")]
    pub src: String,
    #[tabled(rename = "Captured")]
    pub captured: String,
}

impl MediaRow {
    pub fn new(index: usize, media: &Media) -> Self {
        let kind = match media.kind {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        };
        Self {
            index,
            kind: kind.to_string(),
            src: media.src.clone(),
            captured: media.formatted_date().map(or_none).unwrap_or_else(|| NONE.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct TrackRow {
    #[tabled(rename = "Stat")]
    pub stat: usize,
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Points")]
    pub points: usize,
    #[tabled(rename = "Length (km)")]
    pub length_km: String,
}

impl TrackRow {
    /// `None` for stats without a track reference
    pub fn new(index: usize, stat: &Stat) -> Option<Self> {
        let path = stat.path_json.clone()?;
        let summary: Option<TrackSummary> = stat.track_summary();

        let status = match (&stat.path, &summary) {
            (None, _) => "not loaded",
            (Some(_), None) => "loaded",
            (Some(_), Some(_)) => "GeoJSON",
        };

        Some(Self {
            stat: index,
            path,
            status: status.to_string(),
            points: summary.map(|s| s.positions).unwrap_or(0),
            length_km: summary
                .map(|s| format!("{:.2}", s.length_km()))
                .unwrap_or_else(|| NONE.to_string()),
        })
    }
}

/// Output for show command
#[derive(Debug, Serialize)]
pub struct ShowOutput<'a> {
    pub story: &'a Story,
    pub medias: Vec<MediaRow>,
    pub tracks: Vec<TrackRow>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl ConfigRow {
    pub fn new(key: String, value: String, source: ConfigSource) -> Self {
        Self {
            key,
            value,
            source: format!("{:?}", source),
        }
    }
}

fn or_none(value: &str) -> String {
    if value.is_empty() {
        NONE.to_string()
    } else {
        value.to_string()
    }
}
