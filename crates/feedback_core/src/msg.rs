use chrono::{DateTime, Utc};

use crate::{FeedEntry, FeedStats, SubmitFailure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the contact form with the raw field values.
    SubmitRequested {
        name: String,
        email: String,
        message: String,
    },
    /// Remote submission accepted.
    SubmitSucceeded,
    /// Remote submission failed; `at` is the client time of the failure,
    /// used as the fallback entry's timestamp.
    SubmitFailed {
        failure: SubmitFailure,
        message: String,
        at: DateTime<Utc>,
    },
    /// Parallel recent+stats load finished. `entries` is `None` when the
    /// recent fetch failed; an empty list means it succeeded empty.
    FeedLoaded {
        entries: Option<Vec<FeedEntry>>,
        stats: Option<FeedStats>,
    },
    /// Local cache contents, in response to `Effect::ReadCache`.
    CacheLoaded { entries: Vec<FeedEntry> },
    /// Cached stats snapshot for instant paint before any network result.
    CachedStatsLoaded { stats: FeedStats },
    /// Real-time push delivered an updated list (supplementary source).
    PushDelivered { entries: Vec<FeedEntry> },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
