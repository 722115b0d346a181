//! Outbound collaborators: roster lookup and OAuth code exchange
//!
//! Both are traits so `Matchmaker` and `Authorizer` can run against fakes.
//! `SlackClient` implements both against the real Web API.

use slack_api::{OAuthGrant, SlackClient};
use team_store::BoxFuture;

use crate::member::Member;

/// Source of a team's member roster.
pub trait Directory: Send + Sync {
    /// Every member of the workspace `token` belongs to, with presence.
    fn members<'a>(&'a self, token: &'a str) -> BoxFuture<'a, slack_api::Result<Vec<Member>>>;
}

/// Exchanges an OAuth authorization code for a team grant.
pub trait TokenExchange: Send + Sync {
    fn exchange<'a>(
        &'a self,
        client_id: &'a str,
        client_secret: &'a str,
        code: &'a str,
        redirect_uri: Option<&'a str>,
    ) -> BoxFuture<'a, slack_api::Result<OAuthGrant>>;
}

impl Directory for SlackClient {
    fn members<'a>(&'a self, token: &'a str) -> BoxFuture<'a, slack_api::Result<Vec<Member>>> {
        Box::pin(async move {
            let users = self.list_users(token).await?;
            Ok(users.into_iter().map(Member::from).collect())
        })
    }
}

impl TokenExchange for SlackClient {
    fn exchange<'a>(
        &'a self,
        client_id: &'a str,
        client_secret: &'a str,
        code: &'a str,
        redirect_uri: Option<&'a str>,
    ) -> BoxFuture<'a, slack_api::Result<OAuthGrant>> {
        Box::pin(self.exchange_code(client_id, client_secret, code, redirect_uri))
    }
}
