//! Roster member as seen by the matchmaker

use slack_api::User;

/// Real-time availability marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Active,
    Other,
}

impl Presence {
    pub fn from_slack(presence: Option<&str>) -> Self {
        match presence {
            Some("active") => Presence::Active,
            _ => Presence::Other,
        }
    }
}

/// One workspace member, fetched fresh for each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    pub presence: Presence,
    pub is_bot: bool,
    pub is_restricted: bool,
    pub is_ultra_restricted: bool,
    pub is_deleted: bool,
}

impl Member {
    /// A member with every exclusion flag cleared: human, full member, not deleted.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, presence: Presence) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            presence,
            is_bot: false,
            is_restricted: false,
            is_ultra_restricted: false,
            is_deleted: false,
        }
    }
}

impl From<User> for Member {
    fn from(user: User) -> Self {
        Self {
            presence: Presence::from_slack(user.presence.as_deref()),
            id: user.id,
            display_name: user.name,
            is_bot: user.is_bot,
            is_restricted: user.is_restricted,
            is_ultra_restricted: user.is_ultra_restricted,
            is_deleted: user.deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_maps_to_active() {
        assert_eq!(Presence::from_slack(Some("active")), Presence::Active);
        assert_eq!(Presence::from_slack(Some("away")), Presence::Other);
        assert_eq!(Presence::from_slack(None), Presence::Other);
    }

    #[test]
    fn converts_slack_user_flags() {
        let user = User {
            id: "U1".into(),
            name: "alice".into(),
            presence: Some("active".into()),
            is_bot: false,
            is_restricted: true,
            is_ultra_restricted: false,
            deleted: true,
        };
        let member = Member::from(user);
        assert_eq!(member.id, "U1");
        assert_eq!(member.display_name, "alice");
        assert_eq!(member.presence, Presence::Active);
        assert!(member.is_restricted);
        assert!(member.is_deleted);
        assert!(!member.is_bot);
    }
}
