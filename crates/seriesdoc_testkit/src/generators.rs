//! Property-based test generators using proptest.
//!
//! Provides strategies for generating points that satisfy the builder's
//! preconditions: non-empty series names, a period whenever fields are
//! present, and storable field values.

use chrono::{DateTime, NaiveDateTime};
use proptest::prelude::*;
use seriesdoc_core::{FieldValue, OutputModes, TimeSeriesPoint};
use std::collections::BTreeMap;

/// Strategy for generating series names.
pub fn series_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for generating tag and field names, dots included.
pub fn attribute_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_.]{0,11}").expect("Invalid regex")
}

/// Strategy for generating whole-second timestamps between 2015 and 2030.
pub fn timestamp_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (1_420_070_400i64..1_893_456_000i64).prop_filter_map("Out of range timestamp", |secs| {
        DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
    })
}

/// Strategy for generating storable field values.
pub fn field_value_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<i64>().prop_map(FieldValue::Integer),
        (-1.0e12f64..1.0e12f64).prop_map(FieldValue::Float),
        "[a-zA-Z0-9 ]{0,16}".prop_map(FieldValue::Text),
    ]
}

/// Strategy for generating tag sets.
pub fn tags_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(attribute_name_strategy(), "[a-zA-Z0-9/]{0,16}", 0..5)
}

/// Strategy for generating field sets.
pub fn fields_strategy() -> impl Strategy<Value = BTreeMap<String, FieldValue>> {
    prop::collection::btree_map(attribute_name_strategy(), field_value_strategy(), 0..5)
}

/// Strategy for generating points.
pub fn point_strategy() -> impl Strategy<Value = TimeSeriesPoint> {
    (
        series_name_strategy(),
        timestamp_strategy(),
        timestamp_strategy(),
        prop::option::of(tags_strategy()),
        prop::option::of(fields_strategy()),
        prop::sample::select(vec!["h", "d", "w", "m", "q", "y"]),
    )
        .prop_map(|(name, t, added, tags, fields, period)| {
            let mut point = TimeSeriesPoint::new(name, t, added).with_period(period);
            point.tags = tags;
            point.fields = fields;
            point
        })
}

/// Strategy for generating non-empty output modes.
pub fn output_modes_strategy() -> impl Strategy<Value = OutputModes> {
    (any::<bool>(), any::<bool>(), any::<bool>())
        .prop_filter("At least one mode", |(w, a, f)| *w || *a || *f)
        .prop_map(|(wide, array, flat)| {
            OutputModes::none()
                .with_wide(wide)
                .with_array(array)
                .with_flat(flat)
        })
}
