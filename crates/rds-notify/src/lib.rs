//! Teams channel notifications.
//!
//! Delivery is best-effort: a failed post is logged and reported back as a
//! message, never as an error that would stop the run.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Kind of alert, which sets the card title and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
}

impl AlertKind {
    pub fn color(self) -> &'static str {
        match self {
            Self::Error => "#C21807",
            Self::Success => "#52a447",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        }
    }
}

/// Build the MessageCard payload. `error` is added as its own section.
pub fn message_card(
    kind: AlertKind,
    summary: &str,
    message: &str,
    error: Option<&str>,
) -> Value {
    let mut sections = vec![json!({
        "activityTitle": kind.title(),
        "text": message,
    })];
    if let Some(error) = error {
        sections.push(json!({
            "activityTitle": "Details",
            "text": error,
        }));
    }
    json!({
        "@type": "MessageCard",
        "@context": "http://schema.org/extensions",
        "themeColor": kind.color(),
        "summary": summary,
        "sections": sections,
    })
}

/// Posts cards to one incoming-webhook URL.
pub struct TeamsNotifier {
    webhook: String,
    client: Client,
}

impl TeamsNotifier {
    pub fn new(webhook: impl Into<String>) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(NotifyError::Client)?;
        Ok(Self {
            webhook: webhook.into(),
            client,
        })
    }

    /// Send a notification. Returns a description of the failure when the
    /// card was not delivered.
    pub fn notify(
        &self,
        kind: AlertKind,
        summary: &str,
        message: &str,
        error: Option<&str>,
    ) -> Option<String> {
        let payload = message_card(kind, summary, message, error);
        let failure = match self.client.post(&self.webhook).json(&payload).send() {
            Ok(response) if response.status().is_success() => {
                debug!(summary, "notification delivered");
                return None;
            }
            Ok(response) => format!(
                "failed to submit notification to {}: HTTP {}",
                self.webhook,
                response.status().as_u16()
            ),
            Err(err) => format!("failed to submit notification to {}: {err}", self.webhook),
        };
        warn!(summary, "{failure}");
        Some(failure)
    }
}
