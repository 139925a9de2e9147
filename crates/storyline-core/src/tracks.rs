//! Summaries of fetched GPS tracks
//!
//! Track payloads are opaque to loading. When one happens to be GeoJSON, the
//! line geometries it carries can be measured for display.

use geo::{Distance, Haversine, Point};
use serde::Serialize;

/// Size of a GPS track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackSummary {
    /// Number of positions across all line parts
    pub positions: usize,

    /// Great-circle length in metres
    pub length_m: f64,
}

impl TrackSummary {
    /// Summarize a GeoJSON value. Returns `None` for non-GeoJSON payloads or
    /// payloads without any line geometry.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let geojson = geojson::GeoJson::from_json_value(value.clone()).ok()?;

        let mut lines: Vec<Vec<Point<f64>>> = Vec::new();
        match &geojson {
            geojson::GeoJson::Geometry(geometry) => collect_lines(geometry, &mut lines),
            geojson::GeoJson::Feature(feature) => {
                if let Some(geometry) = &feature.geometry {
                    collect_lines(geometry, &mut lines);
                }
            }
            geojson::GeoJson::FeatureCollection(fc) => {
                for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                    collect_lines(geometry, &mut lines);
                }
            }
        }

        let positions: usize = lines.iter().map(Vec::len).sum();
        if positions == 0 {
            return None;
        }

        let length_m = lines
            .iter()
            .flat_map(|line| line.windows(2))
            .map(|pair| Haversine.distance(pair[0], pair[1]))
            .sum();

        Some(Self {
            positions,
            length_m,
        })
    }

    pub fn length_km(&self) -> f64 {
        self.length_m / 1000.0
    }
}

fn collect_lines(geometry: &geojson::Geometry, lines: &mut Vec<Vec<Point<f64>>>) {
    match &geometry.value {
        geojson::Value::LineString(coords) => lines.push(to_points(coords)),
        geojson::Value::MultiLineString(parts) => {
            lines.extend(parts.iter().map(|coords| to_points(coords)));
        }
        geojson::Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_lines(geometry, lines);
            }
        }
        _ => {}
    }
}

fn to_points(coords: &[Vec<f64>]) -> Vec<Point<f64>> {
    coords
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| Point::new(position[0], position[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_string_geometry() {
        // one degree of longitude along the equator
        let summary = TrackSummary::from_json(&json!({
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [0.5, 0.0], [1.0, 0.0]]
        }))
        .unwrap();

        assert_eq!(summary.positions, 3);
        assert!((summary.length_km() - 111.2).abs() < 0.5, "got {}", summary.length_km());
    }

    #[test]
    fn test_feature_collection_with_multiline() {
        let summary = TrackSummary::from_json(&json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {
                        "type": "MultiLineString",
                        "coordinates": [[[0.0, 0.0], [0.0, 1.0]], [[10.0, 10.0], [10.0, 10.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "Point", "coordinates": [3.0, 3.0]}
                }
            ]
        }))
        .unwrap();

        assert_eq!(summary.positions, 4);
        assert!(summary.length_m > 110_000.0 && summary.length_m < 112_500.0);
    }

    #[test]
    fn test_non_track_payloads() {
        assert!(TrackSummary::from_json(&json!({"type": "Point", "coordinates": [1.0, 2.0]})).is_none());
        assert!(TrackSummary::from_json(&json!({"elevation": [1, 2, 3]})).is_none());
        assert!(TrackSummary::from_json(&json!([1, 2, 3])).is_none());
    }
}
