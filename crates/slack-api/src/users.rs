//! Workspace roster via `users.list`

use std::collections::HashSet;

use serde::Deserialize;
use tracing::debug;

use crate::client::{SlackClient, decode};
use crate::constants::{USERS_MAX_PAGES, USERS_PAGE_LIMIT};
use crate::error::{Error, Result};

/// One roster entry as Slack returns it.
///
/// `presence` is only populated when the request asks for it; it is
/// `"active"` or `"away"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub presence: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_restricted: bool,
    #[serde(default)]
    pub is_ultra_restricted: bool,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ListResponse {
    #[serde(default)]
    members: Vec<User>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

impl SlackClient {
    /// Fetch every member of the token's workspace, with presence.
    ///
    /// Follows `response_metadata.next_cursor` until Slack returns an empty
    /// cursor. Any page failing fails the whole fetch, as does a cursor Slack
    /// already returned or more than `USERS_MAX_PAGES` pages.
    pub async fn list_users(&self, token: &str) -> Result<Vec<User>> {
        let mut users = Vec::new();
        let mut cursor = String::new();
        let mut seen_cursors = HashSet::new();
        let limit = USERS_PAGE_LIMIT.to_string();

        for _ in 0..USERS_MAX_PAGES {
            let mut query = vec![("limit", limit.as_str()), ("presence", "true")];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.as_str()));
            }

            let response = self
                .http()
                .get(self.endpoint("users.list"))
                .bearer_auth(token)
                .query(&query)
                .send()
                .await
                .map_err(|e| Error::Transport(format!("users.list request failed: {e}")))?;

            let page: ListResponse = decode(response).await?;
            users.extend(page.members);

            cursor = page
                .response_metadata
                .map(|m| m.next_cursor)
                .unwrap_or_default();
            if cursor.is_empty() {
                debug!(members = users.len(), "fetched workspace roster");
                return Ok(users);
            }
            if !seen_cursors.insert(cursor.clone()) {
                return Err(Error::Decode(format!(
                    "users.list repeated cursor {cursor}"
                )));
            }
        }

        Err(Error::Decode(format!(
            "users.list did not finish within {USERS_MAX_PAGES} pages"
        )))
    }
}
