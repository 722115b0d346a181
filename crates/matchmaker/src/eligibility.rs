//! Candidate eligibility rules

use slack_api::SLACKBOT_USER_NAME;

use crate::member::{Member, Presence};

/// Whether `member` may be suggested to `requester`.
///
/// A candidate must be a full human member of the team, must not be the
/// requester or the system bot, and, when `require_active` is set, must be
/// currently active.
pub fn is_eligible(member: &Member, requester: &str, require_active: bool) -> bool {
    if require_active && member.presence != Presence::Active {
        return false;
    }

    if member.is_bot || member.is_restricted || member.is_ultra_restricted || member.is_deleted {
        return false;
    }

    member.display_name != requester && member.display_name != SLACKBOT_USER_NAME
}
