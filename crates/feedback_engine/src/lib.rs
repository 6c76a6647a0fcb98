//! Feedback engine: remote API client, durable local store, and the
//! command/event bridge the app loop drives.
mod client;
mod engine;
mod push;
mod store;
mod types;

pub use client::{
    select_base_url, ApiSettings, FeedbackApi, ReqwestFeedbackApi, LOCAL_BASE_URL,
    PRODUCTION_BASE_URL,
};
pub use engine::{ClientEvent, ClientHandle};
pub use push::{ChannelPushFeed, PushFeed, PushSink, PushSubscription};
pub use store::{FeedbackStore, Theme, FEEDBACK_KEY, MAX_CACHED_ENTRIES, STATS_KEY, THEME_KEY};
pub use types::{
    ApiError, EntryTime, FeedbackDraft, FeedbackEntry, StatsSnapshot, SubmitError,
    SubmitFailureKind, LOCAL_FALLBACK_STATUS,
};
