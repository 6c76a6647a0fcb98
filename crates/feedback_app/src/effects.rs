use chrono::Utc;
use client_logging::client_info;
use feedback_core::{Effect, FeedEntry, FeedStats, Msg, SubmitFailure};
use feedback_engine::{
    ClientHandle, EntryTime, FeedbackDraft, FeedbackEntry, FeedbackStore, StatsSnapshot,
    SubmitFailureKind, LOCAL_FALLBACK_STATUS,
};

/// Messages and bookkeeping produced by running a batch of effects.
pub struct RunOutcome {
    /// Follow-up messages to dispatch immediately (cache reads resolve
    /// synchronously).
    pub msgs: Vec<Msg>,
    /// Remote operations started; each will complete with one event.
    pub started: usize,
    pub navigate: bool,
}

/// Executes core effects against the engine handle and the local store.
pub struct EffectRunner {
    handle: ClientHandle,
    store: FeedbackStore,
}

impl EffectRunner {
    pub fn new(handle: ClientHandle, store: FeedbackStore) -> Self {
        Self { handle, store }
    }

    pub fn handle(&self) -> &ClientHandle {
        &self.handle
    }

    pub fn run(&self, effects: Vec<Effect>) -> RunOutcome {
        let mut outcome = RunOutcome {
            msgs: Vec::new(),
            started: 0,
            navigate: false,
        };
        for effect in effects {
            match effect {
                Effect::Submit { draft } => {
                    client_info!("Submitting feedback from {}", draft.name);
                    self.handle.submit(FeedbackDraft {
                        name: draft.name,
                        email: draft.email,
                        message: draft.message,
                    });
                    outcome.started += 1;
                }
                Effect::LoadFeed => {
                    self.handle.load_feed();
                    outcome.started += 1;
                }
                Effect::ReadCache => {
                    let entries = self
                        .store
                        .read_feed()
                        .into_iter()
                        .map(entry_to_core)
                        .collect();
                    outcome.msgs.push(Msg::CacheLoaded { entries });
                }
                Effect::PersistFeed { entries } => {
                    let wire: Vec<FeedbackEntry> =
                        entries.into_iter().map(entry_to_wire).collect();
                    self.store.write_feed(&wire);
                }
                Effect::AppendFallback { entry } => {
                    self.store.append(entry_to_wire(entry));
                }
                Effect::PersistStats { stats } => {
                    self.store.write_stats(&StatsSnapshot { total: stats.total });
                }
                Effect::NavigateToFeed => outcome.navigate = true,
            }
        }
        outcome
    }

    /// Cached snapshots for instant paint before any network result.
    pub fn startup_msgs(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        if let Some(stats) = self.store.read_stats() {
            msgs.push(Msg::CachedStatsLoaded {
                stats: FeedStats { total: stats.total },
            });
        }
        msgs
    }
}

/// Wire entry to the core's display shape, converting the time value once.
pub fn entry_to_core(entry: FeedbackEntry) -> FeedEntry {
    let timestamp = entry.timestamp();
    let raw_time = if timestamp.is_none() {
        entry
            .best_time()
            .and_then(EntryTime::raw_text)
            .map(str::to_string)
    } else {
        None
    };
    let local_fallback = entry.is_local_fallback();
    FeedEntry {
        name: entry.name,
        email: entry.email,
        message: entry.message,
        timestamp,
        raw_time,
        local_fallback,
        tags: entry.tags,
        priority: entry.priority,
    }
}

/// Core entry back to the wire shape for the durable cache.
pub fn entry_to_wire(entry: FeedEntry) -> FeedbackEntry {
    let stamp = entry.timestamp.map(|at| EntryTime::Text(at.to_rfc3339()));
    let (created_at, time) = if entry.local_fallback {
        (None, stamp)
    } else {
        (stamp, entry.raw_time.map(EntryTime::Text))
    };
    FeedbackEntry {
        name: entry.name,
        email: entry.email,
        message: entry.message,
        created_at,
        time,
        status: entry
            .local_fallback
            .then(|| LOCAL_FALLBACK_STATUS.to_string()),
        tags: entry.tags,
        priority: entry.priority,
    }
}

/// Engine failure classification to the core's taxonomy.
pub fn map_failure(kind: SubmitFailureKind) -> SubmitFailure {
    match kind {
        SubmitFailureKind::RateLimited => SubmitFailure::RateLimited,
        SubmitFailureKind::Duplicate => SubmitFailure::Duplicate,
        SubmitFailureKind::MessageTooShort => SubmitFailure::MessageTooShort,
        SubmitFailureKind::NameTooShort => SubmitFailure::NameTooShort,
        SubmitFailureKind::InvalidEmail => SubmitFailure::InvalidEmail,
        SubmitFailureKind::Network => SubmitFailure::Network,
        SubmitFailureKind::Timeout => SubmitFailure::Timeout,
        SubmitFailureKind::Server(_) => SubmitFailure::Server,
        // The core gates empty drafts itself, so this only appears when
        // the gateway is driven directly.
        SubmitFailureKind::MissingFields | SubmitFailureKind::Unknown => SubmitFailure::Unknown,
    }
}

pub fn submit_event_msg(
    result: Result<Option<FeedbackEntry>, feedback_engine::SubmitError>,
) -> Msg {
    match result {
        Ok(_) => Msg::SubmitSucceeded,
        Err(err) => Msg::SubmitFailed {
            failure: map_failure(err.kind),
            message: err.message,
            at: Utc::now(),
        },
    }
}
