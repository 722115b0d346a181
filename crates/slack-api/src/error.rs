//! Error types for Slack Web API calls

/// Errors from Slack Web API calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Slack returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The call reached Slack but `ok` was false. Carries Slack's error code
    /// (e.g. `invalid_code`, `invalid_auth`).
    #[error("Slack API error: {0}")]
    Api(String),

    #[error("invalid Slack response: {0}")]
    Decode(String),
}

/// Result alias for Slack operations.
pub type Result<T> = std::result::Result<T, Error>;
