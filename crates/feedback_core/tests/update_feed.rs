use std::sync::Once;

use feedback_core::{
    update, AppState, Effect, FeedEntry, FeedSource, FeedStats, Msg, FEED_CACHE_LIMIT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn entries(names: &[&str]) -> Vec<FeedEntry> {
    names
        .iter()
        .map(|name| FeedEntry::new(*name, format!("message from {name}")))
        .collect()
}

#[test]
fn remote_list_is_authoritative_and_overwrites_cache() {
    init_logging();
    let remote = entries(&["R1", "R2", "R3"]);
    let stats = FeedStats { total: 42 };

    let (state, effects) = update(
        AppState::new(),
        Msg::FeedLoaded {
            entries: Some(remote.clone()),
            stats: Some(stats),
        },
    );

    assert_eq!(state.feed(), remote.as_slice());
    assert_eq!(state.source(), Some(FeedSource::Remote));
    assert_eq!(state.stats(), Some(stats));
    assert_eq!(
        effects,
        vec![
            Effect::PersistStats { stats },
            Effect::PersistFeed {
                entries: remote.clone()
            },
        ]
    );

    // A later cache read must not clobber the authoritative remote list.
    let cached = entries(&["L1", "L2", "L3", "L4", "L5"]);
    let (state, effects) = update(state, Msg::CacheLoaded { entries: cached });
    assert!(effects.is_empty());
    assert_eq!(state.feed(), remote.as_slice());
    assert_eq!(state.source(), Some(FeedSource::Remote));
}

#[test]
fn failed_fetch_falls_back_to_cache_in_order() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::FeedLoaded {
            entries: None,
            stats: None,
        },
    );
    assert_eq!(effects, vec![Effect::ReadCache]);

    let cached = entries(&["A", "B"]);
    let (state, _) = update(
        state,
        Msg::CacheLoaded {
            entries: cached.clone(),
        },
    );
    assert_eq!(state.feed(), cached.as_slice());
    assert_eq!(state.source(), Some(FeedSource::Local));
}

#[test]
fn empty_remote_list_also_falls_back() {
    init_logging();
    let (_, effects) = update(
        AppState::new(),
        Msg::FeedLoaded {
            entries: Some(Vec::new()),
            stats: Some(FeedStats { total: 7 }),
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::PersistStats {
                stats: FeedStats { total: 7 }
            },
            Effect::ReadCache,
        ]
    );
}

#[test]
fn push_paints_only_an_empty_display() {
    init_logging();
    let pushed = entries(&["P1", "P2"]);

    let (state, effects) = update(
        AppState::new(),
        Msg::PushDelivered {
            entries: pushed.clone(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.feed(), pushed.as_slice());
    assert_eq!(state.source(), Some(FeedSource::Push));

    // Once anything has painted, push deliveries are ignored.
    let (state, _) = update(
        state,
        Msg::PushDelivered {
            entries: entries(&["P3"]),
        },
    );
    assert_eq!(state.feed(), pushed.as_slice());
}

#[test]
fn push_never_clobbers_remote_result() {
    init_logging();
    let remote = entries(&["R1"]);
    let (state, _) = update(
        AppState::new(),
        Msg::FeedLoaded {
            entries: Some(remote.clone()),
            stats: None,
        },
    );

    let (state, _) = update(
        state,
        Msg::PushDelivered {
            entries: entries(&["P1"]),
        },
    );
    assert_eq!(state.feed(), remote.as_slice());
    assert_eq!(state.source(), Some(FeedSource::Remote));
}

#[test]
fn cached_stats_paint_instantly_but_yield_to_fresh() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::CachedStatsLoaded {
            stats: FeedStats { total: 10 },
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.stats(), Some(FeedStats { total: 10 }));

    let (state, _) = update(
        state,
        Msg::FeedLoaded {
            entries: None,
            stats: Some(FeedStats { total: 11 }),
        },
    );
    assert_eq!(state.stats(), Some(FeedStats { total: 11 }));

    // A stale cached snapshot never overwrites a fresh one.
    let (state, _) = update(
        state,
        Msg::CachedStatsLoaded {
            stats: FeedStats { total: 10 },
        },
    );
    assert_eq!(state.stats(), Some(FeedStats { total: 11 }));
}

#[test]
fn repeated_fallbacks_keep_the_most_recent_twenty() {
    init_logging();
    use chrono::{TimeZone, Utc};
    use feedback_core::SubmitFailure;

    let mut state = AppState::new();
    for index in 0..25 {
        let (next, _) = update(
            state,
            Msg::SubmitRequested {
                name: format!("User {index}"),
                email: "user@example.com".to_string(),
                message: format!("message {index}"),
            },
        );
        let (next, _) = update(
            next,
            Msg::SubmitFailed {
                failure: SubmitFailure::Server,
                message: String::new(),
                at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, index).unwrap(),
            },
        );
        state = next;
    }

    assert_eq!(state.feed().len(), FEED_CACHE_LIMIT);
    assert_eq!(state.feed()[0].name.as_deref(), Some("User 24"));
    assert_eq!(state.feed()[19].name.as_deref(), Some("User 5"));
}
