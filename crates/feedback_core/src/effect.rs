use crate::{FeedEntry, FeedStats, SubmitDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the draft to the remote service.
    Submit { draft: SubmitDraft },
    /// Fetch the recent feed and the stats snapshot in parallel.
    LoadFeed,
    /// Read the cached feed list; answered with `Msg::CacheLoaded`.
    ReadCache,
    /// Overwrite the cached feed with an authoritative remote list.
    PersistFeed { entries: Vec<FeedEntry> },
    /// Append one fallback entry at the head of the cached feed.
    AppendFallback { entry: FeedEntry },
    /// Overwrite the cached stats snapshot.
    PersistStats { stats: FeedStats },
    /// Scroll/navigate the view to the feedback section.
    NavigateToFeed,
}
