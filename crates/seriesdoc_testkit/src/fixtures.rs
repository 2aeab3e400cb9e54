//! Test fixtures and input helpers.
//!
//! Sample points are shaped like the series a GitHub activity exporter
//! produces: tag points describing repositories and field points carrying
//! per-period counters.

use chrono::{Duration, NaiveDateTime};
use seriesdoc_core::{time, FieldValue, TimeSeriesPoint};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Parses a `yyyy-MM-dd HH:mm:ss` timestamp.
pub fn ts(input: &str) -> NaiveDateTime {
    time::parse(input).expect("Invalid fixture timestamp")
}

/// A point with two tags and no fields.
pub fn tag_point(series: &str, t: &str) -> TimeSeriesPoint {
    TimeSeriesPoint::new(series, ts(t), ts(t))
        .with_tag("repo", "kubernetes/kubernetes")
        .with_tag("org", "kubernetes")
}

/// A point with three fields (integer, float, text) in period `d`.
pub fn field_point(series: &str, t: &str) -> TimeSeriesPoint {
    TimeSeriesPoint::new(series, ts(t), ts(t))
        .with_period("d")
        .with_field("opened", 12i64)
        .with_field("ratio", 0.75)
        .with_field("top_author", "alice")
}

/// A point carrying both tags and fields.
pub fn mixed_point(series: &str, t: &str) -> TimeSeriesPoint {
    let mut point = field_point(series, t);
    point.tags = tag_point(series, t).tags;
    point
}

/// A point with a field that cannot be stored.
pub fn invalid_point(series: &str, t: &str) -> TimeSeriesPoint {
    field_point(series, t).with_field("merged", FieldValue::Boolean(true))
}

/// `days` consecutive daily field points starting at `start`.
pub fn daily_points(series: &str, start: &str, days: u32) -> Vec<TimeSeriesPoint> {
    let start = ts(start);
    (0..days)
        .map(|d| {
            let t = start + Duration::days(i64::from(d));
            TimeSeriesPoint::new(series, t, t)
                .with_period("d")
                .with_field("opened", i64::from(d))
        })
        .collect()
}

/// A JSON points file in a temporary directory.
pub struct PointsFile {
    path: PathBuf,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl PointsFile {
    /// Writes `points` as a JSON array.
    pub fn new(points: &[TimeSeriesPoint]) -> Self {
        let body = serde_json::to_string_pretty(points).expect("Failed to encode points");
        Self::raw(&body)
    }

    /// Writes `body` verbatim.
    pub fn raw(body: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("points.json");
        std::fs::write(&path, body).expect("Failed to write points file");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_have_expected_shape() {
        let tags = tag_point("prs", "2019-01-01 00:00:00");
        assert_eq!(tags.present_tags().unwrap().len(), 2);
        assert!(tags.present_fields().is_none());

        let mixed = mixed_point("prs", "2019-01-01 00:00:00");
        assert!(mixed.present_tags().is_some());
        assert_eq!(mixed.present_fields().unwrap().len(), 3);
    }

    #[test]
    fn daily_points_advance() {
        let points = daily_points("prs", "2019-01-30 00:00:00", 3);
        assert_eq!(points[2].t, ts("2019-02-01 00:00:00"));
    }

    #[test]
    fn points_file_round_trip() {
        let points = vec![mixed_point("prs", "2019-01-01 00:00:00")];
        let file = PointsFile::new(&points);
        let text = std::fs::read_to_string(file.path()).unwrap();
        let back: Vec<TimeSeriesPoint> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, points);
    }
}
