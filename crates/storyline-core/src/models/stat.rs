use serde::{Deserialize, Serialize};

use crate::tracks::TrackSummary;

/// Statistics block of a story, optionally pointing at a GPS track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    /// Relative path of the track geometry resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_json: Option<String>,

    /// Fetched geometry; stays `None` when the fetch failed or was skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Stat {
    pub fn with_path_json(path_json: impl Into<String>) -> Self {
        Self {
            path_json: Some(path_json.into()),
            ..Self::default()
        }
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    /// Summary of the fetched path when it is GeoJSON
    pub fn track_summary(&self) -> Option<TrackSummary> {
        self.path.as_ref().and_then(TrackSummary::from_json)
    }
}
