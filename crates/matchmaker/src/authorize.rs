//! OAuth install completion
//!
//! Turns the one-time `code` from Slack's redirect into a stored team
//! credential: exchange, validate every field of the grant, persist.

use std::sync::Arc;

use common::Secret;
use slack_api::OAuthGrant;
use team_store::{CredentialStore, TeamCredential};
use tracing::{info, instrument, warn};

use crate::directory::TokenExchange;
use crate::error::AuthError;

/// The app's OAuth client registration.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub redirect_uri: Option<String>,
}

/// Completes the OAuth install flow for a team.
#[derive(Clone)]
pub struct Authorizer {
    client: OAuthClient,
    exchange: Arc<dyn TokenExchange>,
    store: CredentialStore,
}

impl Authorizer {
    pub fn new(
        client: OAuthClient,
        exchange: Arc<dyn TokenExchange>,
        store: CredentialStore,
    ) -> Self {
        Self {
            client,
            exchange,
            store,
        }
    }

    /// Exchange `code` for the team's bot token and store it.
    ///
    /// An empty code is rejected before any network call. A grant with any
    /// empty field is rejected before anything is written.
    #[instrument(skip_all)]
    pub async fn complete_authorization(&self, code: &str) -> Result<TeamCredential, AuthError> {
        if code.is_empty() {
            return Err(AuthError::MissingCode);
        }

        let grant = self
            .exchange
            .exchange(
                &self.client.client_id,
                self.client.client_secret.expose(),
                code,
                self.client.redirect_uri.as_deref(),
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "token exchange failed");
                AuthError::ExchangeFailed(e.to_string())
            })?;

        let credential = credential_from_grant(grant)?;

        self.store
            .put(&credential)
            .await
            .map_err(AuthError::PersistFailed)?;

        info!(
            team_id = %credential.team_id,
            team_name = %credential.team_name,
            "team authorized"
        );
        Ok(credential)
    }
}

fn credential_from_grant(grant: OAuthGrant) -> Result<TeamCredential, AuthError> {
    let required = [
        ("team_name", &grant.team_name),
        ("team_id", &grant.team_id),
        ("access_token", &grant.access_token),
        ("scope", &grant.scope),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(AuthError::InvalidResponse { field: *field });
    }

    Ok(TeamCredential::new(
        grant.team_id,
        grant.team_name,
        grant.access_token,
        grant.scope,
    ))
}
