//! Feedback core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, FeedEntry, FeedSource, FeedStats, FormNotice, FormPhase, NoticeSeverity,
    SubmitDraft, SubmitFailure, FEED_CACHE_LIMIT,
};
pub use update::update;
pub use view_model::{time_ago_label, FeedRowView, FeedViewModel, DEFAULT_PRIORITY};
