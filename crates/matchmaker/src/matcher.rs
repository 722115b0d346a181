//! Teammate selection
//!
//! Selection prefers members who are active right now. When nobody eligible
//! is active, it falls back to the whole eligible pool (active or not) and
//! flags the pick so the reply can say the person may be away.

use std::sync::Arc;

use rand::Rng;
use rand::seq::IndexedRandom;
use team_store::CredentialStore;
use tracing::{debug, info, instrument};

use crate::directory::Directory;
use crate::eligibility::is_eligible;
use crate::error::MatchError;
use crate::member::Member;

/// A chosen teammate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub candidate_name: String,
    /// True when nobody eligible was active and the pick may be offline.
    pub is_fallback: bool,
}

/// Result of a matchmaking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Found(MatchResult),
    /// The team has nobody the requester could be matched with.
    NoCandidateAvailable,
}

/// Pick a teammate for `requester` from `roster`.
///
/// Picks uniformly among active eligible members; if there are none, among
/// all eligible members with `is_fallback` set.
pub fn select<R: Rng + ?Sized>(roster: &[Member], requester: &str, rng: &mut R) -> MatchOutcome {
    let active: Vec<&Member> = roster
        .iter()
        .filter(|m| is_eligible(m, requester, true))
        .collect();
    let all: Vec<&Member> = roster
        .iter()
        .filter(|m| is_eligible(m, requester, false))
        .collect();

    debug!(
        roster = roster.len(),
        active = active.len(),
        eligible = all.len(),
        "partitioned roster"
    );

    if let Some(member) = active.choose(rng) {
        return MatchOutcome::Found(MatchResult {
            candidate_name: member.display_name.clone(),
            is_fallback: false,
        });
    }

    match all.choose(rng) {
        Some(member) => MatchOutcome::Found(MatchResult {
            candidate_name: member.display_name.clone(),
            is_fallback: true,
        }),
        None => MatchOutcome::NoCandidateAvailable,
    }
}

/// Resolves a team's token, fetches its roster and selects a teammate.
#[derive(Clone)]
pub struct Matchmaker {
    store: CredentialStore,
    directory: Arc<dyn Directory>,
}

impl Matchmaker {
    pub fn new(store: CredentialStore, directory: Arc<dyn Directory>) -> Self {
        Self { store, directory }
    }

    /// Find someone in `team_id` for `requester` to meet.
    #[instrument(skip_all, fields(team_id = %team_id))]
    pub async fn find_match(
        &self,
        team_id: &str,
        requester: &str,
    ) -> Result<MatchOutcome, MatchError> {
        let credential = self
            .store
            .get(team_id)
            .await
            .map_err(MatchError::CredentialLookupFailed)?;

        let roster = self
            .directory
            .members(credential.access_token.expose())
            .await
            .map_err(MatchError::DirectoryFetchFailed)?;

        // ThreadRng is !Send; keep it out of any await point
        let outcome = select(&roster, requester, &mut rand::rng());

        match &outcome {
            MatchOutcome::Found(result) => info!(
                fallback = result.is_fallback,
                roster = roster.len(),
                "matched teammate"
            ),
            MatchOutcome::NoCandidateAvailable => {
                info!(roster = roster.len(), "no eligible teammate")
            }
        }
        Ok(outcome)
    }
}
