//! Teammate matchmaking and team authorization
//!
//! Request flow for a slash command:
//! 1. `Matchmaker::find_match()` loads the team's bot token from the
//!    `CredentialStore`
//! 2. The `Directory` returns the live roster for that token
//! 3. `eligibility::is_eligible()` filters out bots, guests, deactivated
//!    accounts, the system bot and the requester
//! 4. `select()` picks uniformly among active candidates, falling back to
//!    any eligible candidate when nobody is active
//!
//! Install flow: `Authorizer::complete_authorization()` exchanges the OAuth
//! code via a `TokenExchange`, validates the grant and persists it.

pub mod authorize;
pub mod directory;
pub mod eligibility;
pub mod error;
pub mod matcher;
pub mod member;

pub use authorize::{Authorizer, OAuthClient};
pub use directory::{Directory, TokenExchange};
pub use eligibility::is_eligible;
pub use error::{AuthError, MatchError};
pub use matcher::{MatchOutcome, MatchResult, Matchmaker, select};
pub use member::{Member, Presence};
