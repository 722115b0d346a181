//! The per-team credential record and its hash-field layout

use std::collections::HashMap;

use common::Secret;

use crate::error::{Error, Result};

/// Hash field names. These match records written by earlier deployments,
/// so they must not change.
pub const FIELD_TEAM_NAME: &str = "name";
pub const FIELD_TEAM_ID: &str = "ID";
pub const FIELD_TOKEN: &str = "token";
pub const FIELD_SCOPE: &str = "scope";

/// A team's bot credential, as obtained from the OAuth install flow.
///
/// All four fields must be non-empty before the record is persisted.
#[derive(Debug, Clone)]
pub struct TeamCredential {
    pub team_id: String,
    pub team_name: String,
    pub access_token: Secret<String>,
    pub scope: String,
}

impl TeamCredential {
    pub fn new(
        team_id: impl Into<String>,
        team_name: impl Into<String>,
        access_token: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            team_name: team_name.into(),
            access_token: Secret::new(access_token.into()),
            scope: scope.into(),
        }
    }

    /// Check that every field is non-empty, naming the first empty one.
    pub fn validate(&self) -> Result<()> {
        if self.team_id.is_empty() {
            return Err(Error::Validation { field: "team_id" });
        }
        if self.team_name.is_empty() {
            return Err(Error::Validation { field: "team_name" });
        }
        if self.access_token.is_empty() {
            return Err(Error::Validation {
                field: "access_token",
            });
        }
        if self.scope.is_empty() {
            return Err(Error::Validation { field: "scope" });
        }
        Ok(())
    }

    /// The full field set written on every put.
    pub(crate) fn to_fields(&self) -> [(&'static str, &str); 4] {
        [
            (FIELD_TEAM_NAME, self.team_name.as_str()),
            (FIELD_TEAM_ID, self.team_id.as_str()),
            (FIELD_TOKEN, self.access_token.expose().as_str()),
            (FIELD_SCOPE, self.scope.as_str()),
        ]
    }

    /// Rebuild a credential from a stored hash.
    ///
    /// An empty hash or a missing/empty token means the team never completed
    /// authorization (`NotFound`). A token without the other fields is
    /// reported as `Corrupt`.
    pub(crate) fn from_fields(team_id: &str, mut fields: HashMap<String, String>) -> Result<Self> {
        let token = fields
            .remove(FIELD_TOKEN)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::NotFound(team_id.to_owned()))?;

        let mut take = |field: &'static str| {
            fields
                .remove(field)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Corrupt {
                    team_id: team_id.to_owned(),
                    field,
                })
        };

        Ok(Self {
            team_id: take(FIELD_TEAM_ID)?,
            team_name: take(FIELD_TEAM_NAME)?,
            access_token: Secret::new(token),
            scope: take(FIELD_SCOPE)?,
        })
    }
}
