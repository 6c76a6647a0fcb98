use chrono::{DateTime, Utc};

use crate::view_model::{build_view, FeedViewModel};

/// Upper bound on entries kept in the durable local cache, most-recent first.
pub const FEED_CACHE_LIMIT: usize = 20;

/// A feedback entry as the core sees it: display-level fields with one
/// unified timestamp. The engine maps wire entries into this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: String,
    /// Unified creation time, when one could be derived from the source.
    pub timestamp: Option<DateTime<Utc>>,
    /// Raw time text kept for entries whose timestamp did not parse.
    pub raw_time: Option<String>,
    /// True when the entry exists only in the local cache because the
    /// remote submission failed.
    pub local_fallback: bool,
    pub tags: Vec<String>,
    pub priority: Option<String>,
}

impl FeedEntry {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: None,
            message: message.into(),
            timestamp: None,
            raw_time: None,
            local_fallback: false,
            tags: Vec::new(),
            priority: None,
        }
    }
}

/// Which source last painted the feed. Remote is authoritative for the
/// rest of the session; push never overwrites an already-painted feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Remote,
    Local,
    Push,
}

/// Aggregate stats from the remote service, cached for instant paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedStats {
    pub total: u64,
}

/// The trimmed fields of a submission attempt, held while the remote
/// call is in flight so a failure can build the fallback entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Classification of a failed remote submission. The core uses this to
/// pick a user-facing notice and to decide whether the draft is written
/// to the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitFailure {
    RateLimited,
    Duplicate,
    MessageTooShort,
    NameTooShort,
    InvalidEmail,
    Network,
    Timeout,
    Server,
    Unknown,
}

impl SubmitFailure {
    /// User-correctable failures never trigger the local fallback;
    /// transient and environmental ones do, so the input is not lost.
    pub fn should_fall_back(self) -> bool {
        match self {
            SubmitFailure::RateLimited
            | SubmitFailure::Duplicate
            | SubmitFailure::MessageTooShort
            | SubmitFailure::NameTooShort
            | SubmitFailure::InvalidEmail
            | SubmitFailure::Network => false,
            SubmitFailure::Timeout | SubmitFailure::Server | SubmitFailure::Unknown => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Success,
    Warning,
    Error,
}

/// A user-facing message shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormNotice {
    pub text: String,
    pub severity: NoticeSeverity,
}

impl FormNotice {
    pub(crate) fn new(text: impl Into<String>, severity: NoticeSeverity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    feed: Vec<FeedEntry>,
    source: Option<FeedSource>,
    stats: Option<FeedStats>,
    /// True once stats came from a live response rather than the cache.
    stats_fresh: bool,
    form: FormPhase,
    notice: Option<FormNotice>,
    pending: Option<SubmitDraft>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, now: DateTime<Utc>) -> FeedViewModel {
        build_view(self, now)
    }

    pub fn feed(&self) -> &[FeedEntry] {
        &self.feed
    }

    pub fn source(&self) -> Option<FeedSource> {
        self.source
    }

    pub fn stats(&self) -> Option<FeedStats> {
        self.stats
    }

    pub fn form_phase(&self) -> FormPhase {
        self.form
    }

    pub fn notice(&self) -> Option<&FormNotice> {
        self.notice.as_ref()
    }

    /// Returns and clears the dirty flag; the app loop repaints when set.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_feed(&mut self, entries: Vec<FeedEntry>, source: FeedSource) {
        self.feed = entries;
        self.source = Some(source);
        self.mark_dirty();
    }

    pub(crate) fn insert_fallback(&mut self, entry: FeedEntry) {
        self.feed.insert(0, entry);
        self.feed.truncate(FEED_CACHE_LIMIT);
        self.source = Some(FeedSource::Local);
        self.mark_dirty();
    }

    pub(crate) fn set_stats(&mut self, stats: FeedStats, fresh: bool) {
        self.stats = Some(stats);
        self.stats_fresh = fresh;
        self.mark_dirty();
    }

    pub(crate) fn stats_fresh(&self) -> bool {
        self.stats_fresh
    }

    pub(crate) fn set_form(&mut self, phase: FormPhase, notice: Option<FormNotice>) {
        self.form = phase;
        self.notice = notice;
        self.mark_dirty();
    }

    pub(crate) fn take_pending(&mut self) -> Option<SubmitDraft> {
        self.pending.take()
    }

    pub(crate) fn set_pending(&mut self, draft: SubmitDraft) {
        self.pending = Some(draft);
    }
}
