//! Shared HTTP plumbing for Web API methods
//!
//! Every Web API method answers with an `{"ok": bool, "error": "..."}`
//! envelope, usually with HTTP 200 even on failure. `decode()` checks the
//! HTTP status first, then the envelope, then the method-specific payload.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::constants::SLACK_API_BASE;
use crate::error::{Error, Result};

/// Web API client. Cheap to clone; the inner `reqwest::Client` is shared.
///
/// Timeouts are configured on the `reqwest::Client` handed in, so every call
/// made through this client is bounded by the same limit.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
}

impl SlackClient {
    /// Create a client against a custom base URL (tests point this at a mock server).
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http, base_url }
    }

    /// Create a client against the public Slack API.
    pub fn with_default_base(http: reqwest::Client) -> Self {
        Self::new(http, SLACK_API_BASE)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }
}

#[derive(Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Turn a Web API response into the method payload `T`.
pub(crate) async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Transport(format!("reading response body: {e}")))?;

    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            body,
        });
    }

    let envelope: Envelope =
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))?;
    if !envelope.ok {
        return Err(Error::Api(
            envelope.error.unwrap_or_else(|| "unknown_error".into()),
        ));
    }

    serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
}
