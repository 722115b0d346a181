//! Minimal Slack Web API client
//!
//! Covers the two Web API methods the bot needs plus the install link:
//! 1. `oauth.v2.access` exchanges an authorization code for a bot token
//! 2. `users.list` fetches the workspace roster with presence, following
//!    cursor pagination
//! 3. `authorize_url()` builds the "Add to Slack" link for the landing page
//!
//! Wire types are kept close to Slack's JSON. Validation of required fields
//! belongs to the caller.

pub mod client;
pub mod constants;
pub mod error;
pub mod oauth;
pub mod users;

pub use client::SlackClient;
pub use constants::*;
pub use error::{Error, Result};
pub use oauth::{OAuthGrant, authorize_url};
pub use users::User;
