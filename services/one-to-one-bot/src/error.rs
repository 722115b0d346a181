//! HTTP-boundary error type
//!
//! Library errors stay typed until a handler returns; `ApiError` picks the
//! status code and renders the plain-text `Error: {message}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use matchmaker::{AuthError, MatchError};
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required request parameter was absent or empty.
    #[error("Missing {0}")]
    MissingParam(&'static str),

    /// The request could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    /// The user declined the install on Slack's consent screen.
    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_)
            | ApiError::BadRequest(_)
            | ApiError::AuthorizationDenied(_) => StatusCode::BAD_REQUEST,
            ApiError::Match(MatchError::DirectoryFetchFailed(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Match(MatchError::CredentialLookupFailed(e)) => store_status(e),
            ApiError::Auth(AuthError::MissingCode) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::ExchangeFailed(_) | AuthError::InvalidResponse { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Auth(AuthError::PersistFailed(e)) => store_status(e),
        }
    }
}

fn store_status(e: &team_store::Error) -> StatusCode {
    if e.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, format!("Error: {self}")).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_request() {
        assert_eq!(
            ApiError::MissingParam("team_id").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Auth(AuthError::MissingCode).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::AuthorizationDenied("access_denied".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BadRequest("Failed to deserialize form body".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_failures_are_bad_gateway() {
        let directory = ApiError::Match(MatchError::DirectoryFetchFailed(slack_api::Error::Api(
            "invalid_auth".into(),
        )));
        assert_eq!(directory.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::Auth(AuthError::ExchangeFailed("invalid_code".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Auth(AuthError::InvalidResponse { field: "scope" }).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn store_failures_split_on_reachability() {
        let unreachable = ApiError::Match(MatchError::CredentialLookupFailed(
            team_store::Error::Unavailable("refused".into()),
        ));
        assert_eq!(unreachable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let missing = ApiError::Match(MatchError::CredentialLookupFailed(
            team_store::Error::NotFound("T1".into()),
        ));
        assert_eq!(missing.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let rejected = ApiError::Auth(AuthError::PersistFailed(team_store::Error::Backend(
            "READONLY".into(),
        )));
        assert_eq!(rejected.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let persist_unreachable = ApiError::Auth(AuthError::PersistFailed(
            team_store::Error::Unavailable("timeout".into()),
        ));
        assert_eq!(persist_unreachable.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn body_is_plain_text_with_error_prefix() {
        let response = ApiError::MissingParam("team_id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Error: Missing team_id");
    }
}
