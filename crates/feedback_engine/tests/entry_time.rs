use chrono::{TimeZone, Utc};
use feedback_engine::{EntryTime, FeedbackEntry, StatsSnapshot};
use pretty_assertions::assert_eq;

#[test]
fn iso_text_converts_to_utc() {
    let time = EntryTime::Text("2025-06-01T12:00:00+02:00".to_string());
    assert_eq!(
        time.to_utc(),
        Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap())
    );
}

#[test]
fn structured_server_timestamp_converts() {
    let time = EntryTime::Structured {
        seconds: 1_717_243_200,
        nanos: 0,
    };
    assert_eq!(
        time.to_utc(),
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    );
}

#[test]
fn epoch_millis_convert() {
    let time = EntryTime::Millis(1_717_243_200_000);
    assert_eq!(
        time.to_utc(),
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    );
}

#[test]
fn garbage_text_converts_to_none_but_keeps_raw() {
    let time = EntryTime::Text("yesterday-ish".to_string());
    assert_eq!(time.to_utc(), None);
    assert_eq!(time.raw_text(), Some("yesterday-ish"));
}

#[test]
fn created_at_takes_precedence_over_client_time() {
    let entry: FeedbackEntry = serde_json::from_value(serde_json::json!({
        "name": "Ada",
        "message": "hello",
        "createdAt": "2025-06-01T12:00:00Z",
        "time": "2020-01-01T00:00:00Z"
    }))
    .unwrap();

    assert_eq!(
        entry.timestamp(),
        Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
    );
}

#[test]
fn wire_shapes_deserialize_with_absent_fields() {
    let entry: FeedbackEntry =
        serde_json::from_value(serde_json::json!({ "message": "bare" })).unwrap();

    assert_eq!(entry.name, None);
    assert_eq!(entry.timestamp(), None);
    assert!(entry.tags.is_empty());
    assert!(!entry.is_local_fallback());
}

#[test]
fn structured_timestamp_deserializes_inside_an_entry() {
    let entry: FeedbackEntry = serde_json::from_value(serde_json::json!({
        "message": "hello",
        "createdAt": { "seconds": 1_717_243_200 }
    }))
    .unwrap();

    assert_eq!(
        entry.timestamp(),
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    );
}

#[test]
fn stats_snapshot_tolerates_extra_fields() {
    let stats: StatsSnapshot = serde_json::from_value(serde_json::json!({
        "total": 9,
        "averageRating": 4.5
    }))
    .unwrap();
    assert_eq!(stats.total, 9);

    let empty: StatsSnapshot = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(empty.total, 0);
}
