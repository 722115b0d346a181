//! Slack-facing request handlers
//!
//! - `GET /` landing page with the "Add to Slack" install link
//! - `POST /1:1` slash command: suggest a teammate to meet
//! - `GET /oauth` install callback: store the team's bot token

use std::time::Instant;

use axum::Json;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use matchmaker::{AuthError, MatchOutcome};
use serde::Deserialize;
use tracing::{Instrument, info, info_span};

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

const NO_CANDIDATE_TEXT: &str = "There's no one in your team to talk to!";

/// Slash command payload. Slack sends many more fields; only these are read.
#[derive(Debug, Default, Deserialize)]
pub struct CommandForm {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub user_name: String,
}

/// OAuth redirect query. Slack sends `error` instead of `code` when the user
/// cancels the install.
#[derive(Debug, Default, Deserialize)]
pub struct OAuthParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn request_id() -> String {
    format!("req_{}", uuid::Uuid::new_v4().as_simple())
}

/// Count the request and turn the handler result into a response.
fn finish(
    state: &AppState,
    route: &'static str,
    started: Instant,
    result: Result<Response, ApiError>,
) -> Response {
    let response = result.unwrap_or_else(IntoResponse::into_response);
    let status = response.status();
    state
        .metrics
        .finish(status.is_client_error() || status.is_server_error());
    metrics::record_request(route, status.as_u16(), started.elapsed().as_secs_f64());
    response
}

/// Reply text for a matchmaking outcome.
pub fn reply_text(outcome: &MatchOutcome) -> String {
    match outcome {
        MatchOutcome::Found(result) if result.is_fallback => format!(
            "There's no one around right now, but why not have a 1:1 with @{} when they're back?",
            result.candidate_name
        ),
        MatchOutcome::Found(result) => {
            format!("Why not have a 1:1 with @{}?", result.candidate_name)
        }
        MatchOutcome::NoCandidateAvailable => NO_CANDIDATE_TEXT.to_owned(),
    }
}

/// Malformed payloads (wrong content type, undecodable body) are answered
/// here rather than by axum, so they are counted and use the same error body.
pub async fn command_handler(
    State(state): State<AppState>,
    form: Result<Form<CommandForm>, FormRejection>,
) -> Response {
    let started = Instant::now();
    let _in_flight = state.metrics.track();
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let err = ApiError::BadRequest(rejection.body_text());
            return finish(&state, "command", started, Err(err));
        }
    };
    let span = info_span!(
        "command",
        request_id = %request_id(),
        team_id = %form.team_id,
        user = %form.user_name
    );
    let result = run_command(&state, form).instrument(span).await;
    finish(&state, "command", started, result)
}

async fn run_command(state: &AppState, form: CommandForm) -> Result<Response, ApiError> {
    if form.team_id.is_empty() {
        return Err(ApiError::MissingParam("team_id"));
    }

    let outcome = state
        .matchmaker
        .find_match(&form.team_id, &form.user_name)
        .await?;

    metrics::record_match(match &outcome {
        MatchOutcome::Found(r) if r.is_fallback => "fallback",
        MatchOutcome::Found(_) => "active",
        MatchOutcome::NoCandidateAvailable => "none",
    });

    let body = serde_json::json!({
        "response_type": "in_channel",
        "text": reply_text(&outcome),
    });
    Ok(Json(body).into_response())
}

pub async fn oauth_handler(
    State(state): State<AppState>,
    params: Result<Query<OAuthParams>, QueryRejection>,
) -> Response {
    let started = Instant::now();
    let _in_flight = state.metrics.track();
    let result = match params {
        Ok(Query(params)) => {
            let span = info_span!("oauth", request_id = %request_id());
            run_oauth(&state, params).instrument(span).await
        }
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    };

    metrics::record_authorization(match &result {
        Ok(_) => "success",
        Err(ApiError::AuthorizationDenied(_)) => "denied",
        Err(ApiError::BadRequest(_)) => "bad_request",
        Err(ApiError::Auth(AuthError::MissingCode)) => "missing_code",
        Err(ApiError::Auth(AuthError::ExchangeFailed(_))) => "exchange_failed",
        Err(ApiError::Auth(AuthError::InvalidResponse { .. })) => "invalid_response",
        Err(ApiError::Auth(AuthError::PersistFailed(_))) => "persist_failed",
        Err(_) => "error",
    });
    finish(&state, "oauth", started, result)
}

async fn run_oauth(state: &AppState, params: OAuthParams) -> Result<Response, ApiError> {
    if let Some(reason) = params.error.filter(|e| !e.is_empty()) {
        return Err(ApiError::AuthorizationDenied(reason));
    }

    let code = params.code.unwrap_or_default();
    let credential = state.authorizer.complete_authorization(&code).await?;

    info!(team_id = %credential.team_id, "install complete");
    Ok(format!(
        "Great success! Stored all creds for {}.\nGo forth and 1:1!",
        credential.team_name
    )
    .into_response())
}

/// Landing page with the install link for this app's client id.
pub async fn landing_handler(State(state): State<AppState>) -> impl IntoResponse {
    let url = slack_api::authorize_url(&state.client_id, state.redirect_uri.as_deref());
    let href = url.replace('&', "&amp;");
    (
        [(header::CACHE_CONTROL, "no-cache")],
        Html(format!(
            r#"<!DOCTYPE html>
<html>
<head><title>1:1 bot</title></head>
<body>
<h1>1:1 bot</h1>
<p>Type <code>/1:1</code> in any channel and get a teammate to meet.</p>
<a href="{href}"><img alt="Add to Slack" height="40" width="139" src="https://platform.slack-edge.com/img/add_to_slack.png" srcset="https://platform.slack-edge.com/img/add_to_slack.png 1x, https://platform.slack-edge.com/img/add_to_slack@2x.png 2x"></a>
</body>
</html>
"#
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchmaker::MatchResult;

    #[test]
    fn active_match_suggests_teammate() {
        let outcome = MatchOutcome::Found(MatchResult {
            candidate_name: "carol".into(),
            is_fallback: false,
        });
        assert_eq!(reply_text(&outcome), "Why not have a 1:1 with @carol?");
    }

    #[test]
    fn fallback_match_mentions_absence() {
        let outcome = MatchOutcome::Found(MatchResult {
            candidate_name: "bob".into(),
            is_fallback: true,
        });
        assert_eq!(
            reply_text(&outcome),
            "There's no one around right now, but why not have a 1:1 with @bob when they're back?"
        );
    }

    #[test]
    fn empty_team_reply() {
        assert_eq!(
            reply_text(&MatchOutcome::NoCandidateAvailable),
            "There's no one in your team to talk to!"
        );
    }

    #[test]
    fn request_ids_are_prefixed_and_unique() {
        let a = request_id();
        let b = request_id();
        assert!(a.starts_with("req_"), "got: {a}");
        assert_eq!(a.len(), 4 + 32);
        assert_ne!(a, b);
    }
}
