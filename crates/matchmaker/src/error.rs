//! Error types for matchmaking and authorization

/// Failures of `Matchmaker::find_match`. "Nobody to match" is not an error;
/// it is `MatchOutcome::NoCandidateAvailable`.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("credential lookup failed: {0}")]
    CredentialLookupFailed(#[source] team_store::Error),

    #[error("directory fetch failed: {0}")]
    DirectoryFetchFailed(#[source] slack_api::Error),
}

/// Failures of `Authorizer::complete_authorization`.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing code")]
    MissingCode,

    #[error("token exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Missing {field} in response")]
    InvalidResponse { field: &'static str },

    #[error("failed to store credentials: {0}")]
    PersistFailed(#[source] team_store::Error),
}
