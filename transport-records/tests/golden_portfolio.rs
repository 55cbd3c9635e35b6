use std::fs;

use chrono::{DateTime, Utc};
use serde_json::Value;
use transport_core::{FixedClock, InternalStatus, TransportConfig};
use transport_records::{summarize_portfolio_str, translate_bookings_value};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture should be readable")
}

fn clock() -> FixedClock {
    FixedClock(
        DateTime::parse_from_rfc3339("2025-06-01T00:00:00Z")
            .expect("valid instant")
            .with_timezone(&Utc),
    )
}

#[test]
fn portfolio_matches_golden() {
    let summary = summarize_portfolio_str(
        &fixture("bookings.json"),
        &fixture("hospitals.json"),
        &TransportConfig::default(),
        &clock(),
    )
    .expect("summary should build");

    let mut actual = serde_json::to_value(summary).expect("summary should serialize");
    normalize_dynamic_fields(&mut actual);

    let mut expected: Value =
        serde_json::from_str(&fixture("portfolio_summary.json")).expect("golden should be valid");
    normalize_dynamic_fields(&mut expected);

    assert_eq!(actual, expected);
}

#[test]
fn total_does_not_depend_on_row_order() {
    let hospitals = fixture("hospitals.json");
    let mut rows: Value = serde_json::from_str(&fixture("bookings.json")).expect("valid json");
    let forward = summarize_portfolio_str(
        &rows.to_string(),
        &hospitals,
        &TransportConfig::default(),
        &clock(),
    )
    .expect("summary should build");

    if let Some(array) = rows.as_array_mut() {
        array.reverse();
    }
    let reversed = summarize_portfolio_str(
        &rows.to_string(),
        &hospitals,
        &TransportConfig::default(),
        &clock(),
    )
    .expect("summary should build");

    assert_eq!(forward.total_value, reversed.total_value);
}

#[test]
fn fixture_pickups_are_reconciled() {
    let rows: Value = serde_json::from_str(&fixture("bookings.json")).expect("valid json");
    let bookings = translate_bookings_value(&rows, &TransportConfig::default(), &clock())
        .expect("rows should translate");

    let pickups: Vec<(String, String)> = bookings
        .iter()
        .map(|booking| (booking.id.clone(), booking.pickup_at.to_rfc3339()))
        .collect();

    assert_eq!(
        pickups,
        vec![
            ("b-001".to_string(), "2025-06-01T08:30:00+00:00".to_string()),
            ("b-002".to_string(), "2025-06-03T00:00:00+00:00".to_string()),
            ("b-003".to_string(), "2025-05-12T14:00:00+00:00".to_string()),
            ("b-004".to_string(), "2025-06-01T00:00:00+00:00".to_string()),
            ("b-005".to_string(), "2025-06-04T06:15:00+00:00".to_string()),
            ("b-006".to_string(), "2025-06-05T23:00:00+00:00".to_string()),
        ]
    );
    assert_eq!(bookings[5].status, InternalStatus::Other("on_hold".to_string()));
}

fn normalize_dynamic_fields(value: &mut Value) {
    if let Some(obj) = value.as_object_mut() {
        if obj.contains_key("generated_at") {
            obj.insert(
                "generated_at".to_string(),
                Value::String("__DYNAMIC_TIMESTAMP__".to_string()),
            );
        }
    }
}
