use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::types::ApiEnvelope;
use crate::{
    ApiError, FeedbackDraft, FeedbackEntry, StatsSnapshot, SubmitError, SubmitFailureKind,
};

/// Fixed production endpoint of the feedback backend.
pub const PRODUCTION_BASE_URL: &str = "https://buzzguard-backend.onrender.com";
/// Local-development endpoint, selected when running against a loopback host.
pub const LOCAL_BASE_URL: &str = "http://localhost:5000";

/// Picks the API base URL from the host name the client is running on.
pub fn select_base_url(hostname: &str) -> &'static str {
    if hostname == "localhost" || hostname == "127.0.0.1" {
        LOCAL_BASE_URL
    } else {
        PRODUCTION_BASE_URL
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// `?limit=N` on the recent-feed endpoint.
    pub recent_limit: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(PRODUCTION_BASE_URL).expect("constant base url"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(15),
            recent_limit: 10,
        }
    }
}

impl ApiSettings {
    /// Settings for a given host name, using the loopback selection rule.
    pub fn for_host(hostname: &str) -> Self {
        Self {
            base_url: Url::parse(select_base_url(hostname)).expect("constant base url"),
            ..Self::default()
        }
    }

    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }
}

/// The remote feedback service, behind a trait so the app and tests can
/// inject their own collaborator.
#[async_trait::async_trait]
pub trait FeedbackApi: Send + Sync {
    /// Validates and forwards a draft; returns the server's echo of the
    /// created entry when it provides one.
    async fn submit(&self, draft: &FeedbackDraft) -> Result<Option<FeedbackEntry>, SubmitError>;
    /// The most recent entries, newest first.
    async fn recent(&self) -> Result<Vec<FeedbackEntry>, ApiError>;
    async fn stats(&self) -> Result<StatsSnapshot, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFeedbackApi {
    settings: ApiSettings,
}

impl ReqwestFeedbackApi {
    pub fn new(settings: ApiSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, ApiError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| ApiError::Malformed(err.to_string()))
    }
}

#[async_trait::async_trait]
impl FeedbackApi for ReqwestFeedbackApi {
    async fn submit(&self, draft: &FeedbackDraft) -> Result<Option<FeedbackEntry>, SubmitError> {
        let trimmed = FeedbackDraft {
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            message: draft.message.trim().to_string(),
        };
        // Precondition: incomplete drafts fail fast, no network round-trip.
        if trimmed.name.is_empty() || trimmed.email.is_empty() || trimmed.message.is_empty() {
            return Err(SubmitError::new(
                SubmitFailureKind::MissingFields,
                "name, email and message are required",
            ));
        }

        let client = self.build_client().map_err(api_to_submit_error)?;
        let url = self.endpoint("api/feedback").map_err(api_to_submit_error)?;

        let response = client
            .post(url)
            .json(&trimmed)
            .send()
            .await
            .map_err(map_submit_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_http_failure(status, response).await);
        }

        let envelope: ApiEnvelope<FeedbackEntry> = response
            .json()
            .await
            .map_err(|err| SubmitError::new(SubmitFailureKind::Unknown, err.to_string()))?;
        if envelope.success {
            Ok(envelope.data)
        } else {
            let message = envelope
                .message
                .or(envelope.error)
                .unwrap_or_else(|| "Failed to submit feedback".to_string());
            Err(SubmitError::new(
                classify_failure(status.as_u16(), envelope.code.as_deref(), &message),
                message,
            ))
        }
    }

    async fn recent(&self) -> Result<Vec<FeedbackEntry>, ApiError> {
        let client = self.build_client()?;
        let url = self.endpoint("api/feedback/recent")?;

        let response = client
            .get(url)
            .query(&[("limit", self.settings.recent_limit)])
            .send()
            .await
            .map_err(map_api_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let envelope: ApiEnvelope<Vec<FeedbackEntry>> = response
            .json()
            .await
            .map_err(|err| ApiError::Malformed(err.to_string()))?;
        // An unsuccessful envelope is treated like an empty feed: the
        // caller falls back to the local cache either way.
        let success = envelope.success;
        Ok(envelope.data.filter(|_| success).unwrap_or_default())
    }

    async fn stats(&self) -> Result<StatsSnapshot, ApiError> {
        let client = self.build_client()?;
        let url = self.endpoint("api/feedback/stats")?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(map_api_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let envelope: ApiEnvelope<StatsSnapshot> = response
            .json()
            .await
            .map_err(|err| ApiError::Malformed(err.to_string()))?;
        match envelope.data {
            Some(stats) if envelope.success => Ok(stats),
            _ => Err(ApiError::Malformed("stats envelope unsuccessful".into())),
        }
    }
}

/// Classifies a non-2xx submission response, preferring a parseable
/// structured error body over the bare status line.
async fn classify_http_failure(status: StatusCode, response: reqwest::Response) -> SubmitError {
    let status_code = status.as_u16();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body) {
        Ok(envelope) => {
            let message = envelope
                .message
                .or(envelope.error)
                .unwrap_or_else(|| format!("HTTP {status_code}: request failed"));
            SubmitError::new(
                classify_failure(status_code, envelope.code.as_deref(), &message),
                message,
            )
        }
        Err(_) => {
            // Not JSON: synthesize from the numeric status and status text.
            let reason = status.canonical_reason().unwrap_or("request failed");
            SubmitError::new(
                classify_failure(status_code, None, ""),
                format!("Server error ({status_code}): {reason}"),
            )
        }
    }
}

/// Machine-readable `code` first, then the HTTP status, then the legacy
/// message-substring rules the old frontend relied on.
fn classify_failure(status: u16, code: Option<&str>, message: &str) -> SubmitFailureKind {
    if let Some(kind) = classify_code(code) {
        return kind;
    }
    if status == 429 {
        return SubmitFailureKind::RateLimited;
    }
    if (500..600).contains(&status) {
        return SubmitFailureKind::Server(status);
    }
    classify_message_legacy(message).unwrap_or(SubmitFailureKind::Unknown)
}

fn classify_code(code: Option<&str>) -> Option<SubmitFailureKind> {
    match code? {
        "RATE_LIMITED" => Some(SubmitFailureKind::RateLimited),
        "DUPLICATE_SUBMISSION" => Some(SubmitFailureKind::Duplicate),
        "MESSAGE_TOO_SHORT" => Some(SubmitFailureKind::MessageTooShort),
        "NAME_TOO_SHORT" => Some(SubmitFailureKind::NameTooShort),
        "INVALID_EMAIL" => Some(SubmitFailureKind::InvalidEmail),
        _ => None,
    }
}

/// Substring matching is fragile and only kept for servers that predate
/// the `code` field.
fn classify_message_legacy(message: &str) -> Option<SubmitFailureKind> {
    if message.contains("Too many") || message.contains("rate limit") {
        Some(SubmitFailureKind::RateLimited)
    } else if message.contains("Duplicate") || message.contains("already submitted") {
        Some(SubmitFailureKind::Duplicate)
    } else if message.contains("at least 10 characters") {
        Some(SubmitFailureKind::MessageTooShort)
    } else if message.contains("at least 2 characters") {
        Some(SubmitFailureKind::NameTooShort)
    } else if message.contains("valid email") {
        Some(SubmitFailureKind::InvalidEmail)
    } else {
        None
    }
}

fn map_submit_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(SubmitFailureKind::Timeout, err.to_string());
    }
    SubmitError::new(SubmitFailureKind::Network, err.to_string())
}

fn map_api_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}

fn api_to_submit_error(err: ApiError) -> SubmitError {
    match err {
        ApiError::Timeout => SubmitError::new(SubmitFailureKind::Timeout, "timeout"),
        other => SubmitError::new(SubmitFailureKind::Network, other.to_string()),
    }
}
