//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use seriesdoc_core::TimeSeriesPoint;

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Generate `count` hourly points of one series, each with `tags` tags and
/// `fields` numeric fields.
pub fn synthetic_points(
    series: &str,
    count: usize,
    tags: usize,
    fields: usize,
) -> Vec<TimeSeriesPoint> {
    let start = base_time();
    (0..count)
        .map(|i| {
            let t = start + Duration::hours(i as i64);
            let mut point = TimeSeriesPoint::new(series, t, t).with_period("h");
            for k in 0..tags {
                point = point.with_tag(format!("tag_{}", k), format!("value_{}_{}", k, i));
            }
            for k in 0..fields {
                point = point.with_field(format!("field_{}", k), (i * k) as i64);
            }
            point
        })
        .collect()
}
