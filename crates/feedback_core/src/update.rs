use crate::state::{FormNotice, FormPhase, NoticeSeverity};
use crate::{AppState, Effect, FeedEntry, FeedSource, Msg, SubmitDraft, SubmitFailure};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SubmitRequested {
            name,
            email,
            message,
        } => {
            // Validation gate: incomplete drafts never reach the network.
            let draft = SubmitDraft {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                message: message.trim().to_string(),
            };
            if draft.name.is_empty() || draft.email.is_empty() || draft.message.is_empty() {
                state.set_form(
                    FormPhase::Failed,
                    Some(FormNotice::new(
                        "Please fill in all required fields.",
                        NoticeSeverity::Error,
                    )),
                );
                return (state, Vec::new());
            }
            state.set_pending(draft.clone());
            state.set_form(FormPhase::Sending, None);
            vec![Effect::Submit { draft }]
        }
        Msg::SubmitSucceeded => {
            state.take_pending();
            state.set_form(
                FormPhase::Sent,
                Some(FormNotice::new(
                    "Thank you for your feedback! We'll review it soon.",
                    NoticeSeverity::Success,
                )),
            );
            // Re-fetch the canonical remote list and bring the feed into view.
            vec![Effect::LoadFeed, Effect::NavigateToFeed]
        }
        Msg::SubmitFailed {
            failure,
            message,
            at,
        } => {
            state.set_form(FormPhase::Failed, Some(failure_notice(failure, &message)));
            let pending = state.take_pending();
            if failure.should_fall_back() {
                if let Some(draft) = pending {
                    let entry = fallback_entry(draft, at);
                    state.insert_fallback(entry.clone());
                    return (state, vec![Effect::AppendFallback { entry }]);
                }
            }
            Vec::new()
        }
        Msg::FeedLoaded { entries, stats } => {
            let mut effects = Vec::new();
            if let Some(stats) = stats {
                state.set_stats(stats, true);
                effects.push(Effect::PersistStats { stats });
            }
            match entries {
                Some(entries) if !entries.is_empty() => {
                    // Authoritative: paint it and overwrite the cache so it
                    // survives a later failed fetch.
                    effects.push(Effect::PersistFeed {
                        entries: entries.clone(),
                    });
                    state.set_feed(entries, FeedSource::Remote);
                }
                _ => effects.push(Effect::ReadCache),
            }
            effects
        }
        Msg::CacheLoaded { entries } => {
            // The remote list supersedes the cache for the whole session.
            if state.source() != Some(FeedSource::Remote) {
                state.set_feed(entries, FeedSource::Local);
            }
            Vec::new()
        }
        Msg::CachedStatsLoaded { stats } => {
            if !state.stats_fresh() {
                state.set_stats(stats, false);
            }
            Vec::new()
        }
        Msg::PushDelivered { entries } => {
            // Supplementary only: never clobber an already-painted feed.
            if state.feed().is_empty() && !entries.is_empty() {
                state.set_feed(entries, FeedSource::Push);
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn fallback_entry(draft: SubmitDraft, at: chrono::DateTime<chrono::Utc>) -> FeedEntry {
    FeedEntry {
        name: Some(draft.name),
        email: Some(draft.email),
        message: draft.message,
        timestamp: Some(at),
        raw_time: None,
        local_fallback: true,
        tags: Vec::new(),
        priority: None,
    }
}

fn failure_notice(failure: SubmitFailure, message: &str) -> FormNotice {
    match failure {
        SubmitFailure::RateLimited => FormNotice::new(
            "Too many submissions from your network. Please wait a moment before trying again.",
            NoticeSeverity::Warning,
        ),
        SubmitFailure::Duplicate => FormNotice::new(
            "You've already submitted feedback recently. Please wait at least 1 hour before submitting again.",
            NoticeSeverity::Warning,
        ),
        SubmitFailure::MessageTooShort => FormNotice::new(
            "Your message must be at least 10 characters long.",
            NoticeSeverity::Error,
        ),
        SubmitFailure::NameTooShort => FormNotice::new(
            "Your name must be at least 2 characters long.",
            NoticeSeverity::Error,
        ),
        SubmitFailure::InvalidEmail => FormNotice::new(
            "Please provide a valid email address.",
            NoticeSeverity::Error,
        ),
        SubmitFailure::Network => FormNotice::new(
            "Network error: Please check your internet connection and try again.",
            NoticeSeverity::Error,
        ),
        SubmitFailure::Timeout => FormNotice::new(
            "Request timeout: The server took too long to respond. Your feedback has been saved locally.",
            NoticeSeverity::Warning,
        ),
        SubmitFailure::Server => FormNotice::new(
            "Server error: The backend is temporarily unavailable. Your feedback has been saved locally and will be submitted when the server is available.",
            NoticeSeverity::Warning,
        ),
        SubmitFailure::Unknown => FormNotice::new(
            format!(
                "Failed to submit: {}",
                if message.is_empty() {
                    "Please try again later or check your input."
                } else {
                    message
                }
            ),
            NoticeSeverity::Error,
        ),
    }
}
