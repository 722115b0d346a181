//! Slack endpoints and fixed identifiers

/// Base URL for Web API methods (`{base}/{method}`)
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Browser-facing authorization page for the v2 OAuth flow
pub const AUTHORIZE_ENDPOINT: &str = "https://slack.com/oauth/v2/authorize";

/// Bot scopes needed to receive slash commands and read the roster.
pub const BOT_SCOPES: &str = "commands,users:read";

/// Username of the built-in system bot present in every workspace.
/// It is not flagged `is_bot`, so it has to be excluded by name.
pub const SLACKBOT_USER_NAME: &str = "slackbot";

/// Page size requested from `users.list`
pub const USERS_PAGE_LIMIT: u32 = 200;

/// Upper bound on `users.list` pages fetched for one roster
pub const USERS_MAX_PAGES: u32 = 200;
