use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel status for entries that exist only in the local cache.
pub const LOCAL_FALLBACK_STATUS: &str = "local_fallback";

/// The trimmed fields posted to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// The one time-value abstraction over every shape the sources produce:
/// a structured server timestamp, epoch milliseconds, or ISO-8601 text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryTime {
    Structured {
        seconds: i64,
        #[serde(default)]
        nanos: u32,
    },
    Millis(i64),
    Text(String),
}

impl EntryTime {
    /// The single conversion point; render code never format-sniffs.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            EntryTime::Structured { seconds, nanos } => {
                Utc.timestamp_opt(*seconds, *nanos).single()
            }
            EntryTime::Millis(millis) => Utc.timestamp_millis_opt(*millis).single(),
            EntryTime::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
        }
    }

    /// Raw text form, shown verbatim when conversion fails.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            EntryTime::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A feedback entry as it crosses the wire and the local cache.
/// Append-only: never mutated after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Server-assigned creation time.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<EntryTime>,
    /// Client-assigned time on locally-originated fallback entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<EntryTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl FeedbackEntry {
    /// Builds the cache-only entry written when a remote submission fails.
    pub fn local_fallback(draft: &FeedbackDraft, at: DateTime<Utc>) -> Self {
        Self {
            name: Some(draft.name.clone()),
            email: Some(draft.email.clone()),
            message: draft.message.clone(),
            created_at: None,
            time: Some(EntryTime::Text(at.to_rfc3339())),
            status: Some(LOCAL_FALLBACK_STATUS.to_string()),
            tags: Vec::new(),
            priority: None,
        }
    }

    /// Server-assigned time takes precedence over the client-assigned one.
    pub fn best_time(&self) -> Option<&EntryTime> {
        self.created_at.as_ref().or(self.time.as_ref())
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.best_time().and_then(EntryTime::to_utc)
    }

    pub fn is_local_fallback(&self) -> bool {
        self.status.as_deref() == Some(LOCAL_FALLBACK_STATUS)
    }
}

/// Aggregate stats from `/api/feedback/stats`, cached verbatim for
/// instant paint on the next load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total: u64,
}

/// Response envelope shared by all feedback endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Machine-readable classification; preferred over message matching.
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub kind: SubmitFailureKind,
    pub message: String,
}

impl SubmitError {
    pub(crate) fn new(kind: SubmitFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for SubmitError {}

/// Classification of a failed submission. User-correctable kinds never
/// trigger the local fallback; transient kinds do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitFailureKind {
    /// A required field was empty after trimming; no network call issued.
    MissingFields,
    RateLimited,
    Duplicate,
    MessageTooShort,
    NameTooShort,
    InvalidEmail,
    Network,
    Timeout,
    Server(u16),
    Unknown,
}

impl fmt::Display for SubmitFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitFailureKind::MissingFields => write!(f, "missing required fields"),
            SubmitFailureKind::RateLimited => write!(f, "rate limited"),
            SubmitFailureKind::Duplicate => write!(f, "duplicate submission"),
            SubmitFailureKind::MessageTooShort => write!(f, "message too short"),
            SubmitFailureKind::NameTooShort => write!(f, "name too short"),
            SubmitFailureKind::InvalidEmail => write!(f, "invalid email"),
            SubmitFailureKind::Network => write!(f, "network error"),
            SubmitFailureKind::Timeout => write!(f, "timeout"),
            SubmitFailureKind::Server(code) => write!(f, "server error {code}"),
            SubmitFailureKind::Unknown => write!(f, "unknown error"),
        }
    }
}

/// Failures of the read-only endpoints. The caller only decides whether
/// to fall back to the local cache, so no finer taxonomy is needed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("http status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("malformed response: {0}")]
    Malformed(String),
}
