use chrono::{DateTime, Utc};

use crate::state::{AppState, FeedEntry, FormNotice, FormPhase};

/// Priority value that is not visually flagged.
pub const DEFAULT_PRIORITY: &str = "medium";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedViewModel {
    pub rows: Vec<FeedRowView>,
    /// True when the feed is empty and the empty-state indicator shows.
    pub empty: bool,
    /// "N+" total, present once any stats snapshot has been seen.
    pub stats_label: Option<String>,
    pub sending: bool,
    pub notice: Option<FormNotice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRowView {
    pub who: String,
    pub quote: String,
    pub time_label: String,
    pub tags: Vec<String>,
    /// Uppercased priority, only when it differs from the default.
    pub priority_flag: Option<String>,
}

pub(crate) fn build_view(state: &AppState, now: DateTime<Utc>) -> FeedViewModel {
    let rows: Vec<FeedRowView> = state.feed().iter().map(|entry| row_view(entry, now)).collect();
    FeedViewModel {
        empty: rows.is_empty(),
        rows,
        stats_label: state.stats().map(|stats| format!("{}+", stats.total)),
        sending: state.form_phase() == FormPhase::Sending,
        notice: state.notice().cloned(),
    }
}

fn row_view(entry: &FeedEntry, now: DateTime<Utc>) -> FeedRowView {
    let who = entry
        .name
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Anonymous".to_string());

    let time_label = match entry.timestamp {
        Some(at) => time_ago_label(at, now),
        None => entry.raw_time.clone().unwrap_or_default(),
    };

    let priority_flag = entry
        .priority
        .as_deref()
        .filter(|priority| !priority.eq_ignore_ascii_case(DEFAULT_PRIORITY))
        .map(str::to_uppercase);

    FeedRowView {
        who,
        quote: format!("\"{}\"", entry.message),
        time_label,
        tags: entry.tags.clone(),
        priority_flag,
    }
}

/// Human-relative age of `at` as seen from `now`, falling back to an
/// absolute date once the entry is older than a week.
pub fn time_ago_label(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{} minute{} ago", minutes, plural(minutes));
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{} day{} ago", days, plural(days));
    }
    at.format("%Y-%m-%d").to_string()
}

fn plural(count: i64) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
