//! Error types for credential storage

/// Errors from credential store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend could not be reached (unconfigured, refused, timed out).
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    /// The backend was reached but rejected the command.
    #[error("credential store command failed: {0}")]
    Backend(String),

    /// The store is reachable but holds no usable token for the team.
    #[error("no credentials stored for team {0}")]
    NotFound(String),

    #[error("credential field {field} is empty")]
    Validation { field: &'static str },

    /// A record exists with a token but another required field is missing.
    #[error("stored credential for team {team_id} is missing field {field}")]
    Corrupt {
        team_id: String,
        field: &'static str,
    },
}

impl Error {
    /// Whether the failure means the backend could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;
