use std::fs;

use chrono::{TimeZone, Utc};
use feedback_engine::{
    FeedbackDraft, FeedbackEntry, FeedbackStore, StatsSnapshot, Theme, FEEDBACK_KEY,
    MAX_CACHED_ENTRIES,
};
use tempfile::TempDir;

fn entry(label: &str) -> FeedbackEntry {
    FeedbackEntry {
        name: Some(label.to_string()),
        email: None,
        message: format!("message {label}"),
        created_at: None,
        time: None,
        status: None,
        tags: Vec::new(),
        priority: None,
    }
}

#[test]
fn initialize_creates_an_empty_feed_key() {
    let temp = TempDir::new().unwrap();
    let store = FeedbackStore::new(temp.path().to_path_buf());

    store.initialize();

    let path = temp.path().join(format!("{FEEDBACK_KEY}.json"));
    assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    assert!(store.read_feed().is_empty());
}

#[test]
fn initialize_preserves_an_existing_feed() {
    let temp = TempDir::new().unwrap();
    let store = FeedbackStore::new(temp.path().to_path_buf());
    store.append(entry("kept"));

    store.initialize();

    assert_eq!(store.read_feed().len(), 1);
}

#[test]
fn append_keeps_the_most_recent_twenty_head_first() {
    let temp = TempDir::new().unwrap();
    let store = FeedbackStore::new(temp.path().to_path_buf());

    for index in 0..25 {
        store.append(entry(&format!("{index}")));
    }

    let feed = store.read_feed();
    assert_eq!(feed.len(), MAX_CACHED_ENTRIES);
    assert_eq!(feed[0].name.as_deref(), Some("24"));
    assert_eq!(feed[19].name.as_deref(), Some("5"));
}

#[test]
fn write_feed_replaces_wholesale_and_truncates() {
    let temp = TempDir::new().unwrap();
    let store = FeedbackStore::new(temp.path().to_path_buf());
    store.append(entry("old"));

    let many: Vec<FeedbackEntry> = (0..30).map(|index| entry(&format!("{index}"))).collect();
    store.write_feed(&many);

    let feed = store.read_feed();
    assert_eq!(feed.len(), MAX_CACHED_ENTRIES);
    assert_eq!(feed[0].name.as_deref(), Some("0"));
}

#[test]
fn corrupt_feed_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    let store = FeedbackStore::new(temp.path().to_path_buf());
    fs::write(
        temp.path().join(format!("{FEEDBACK_KEY}.json")),
        "{not json",
    )
    .unwrap();

    assert!(store.read_feed().is_empty());
}

#[test]
fn unavailable_store_degrades_silently() {
    let temp = TempDir::new().unwrap();
    // Point the store at a path occupied by a plain file.
    let blocked = temp.path().join("not_a_dir");
    fs::write(&blocked, "x").unwrap();
    let store = FeedbackStore::new(blocked);

    store.initialize();
    store.append(entry("lost"));
    store.write_stats(&StatsSnapshot { total: 5 });

    assert!(store.read_feed().is_empty());
    assert_eq!(store.read_stats(), None);
}

#[test]
fn fallback_entry_round_trips_with_status_and_time() {
    let temp = TempDir::new().unwrap();
    let store = FeedbackStore::new(temp.path().to_path_buf());
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let draft = FeedbackDraft {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        message: "Saved offline.".to_string(),
    };

    store.append(FeedbackEntry::local_fallback(&draft, at));

    let feed = store.read_feed();
    assert!(feed[0].is_local_fallback());
    assert_eq!(feed[0].timestamp(), Some(at));
}

#[test]
fn stats_snapshot_round_trips() {
    let temp = TempDir::new().unwrap();
    let store = FeedbackStore::new(temp.path().to_path_buf());

    assert_eq!(store.read_stats(), None);
    store.write_stats(&StatsSnapshot { total: 128 });
    assert_eq!(store.read_stats(), Some(StatsSnapshot { total: 128 }));
}

#[test]
fn theme_preference_round_trips() {
    let temp = TempDir::new().unwrap();
    let store = FeedbackStore::new(temp.path().to_path_buf());

    assert_eq!(store.theme(), None);
    store.set_theme(Theme::Dark);
    assert_eq!(store.theme(), Some(Theme::Dark));
    store.set_theme(Theme::Light);
    assert_eq!(store.theme(), Some(Theme::Light));
}
