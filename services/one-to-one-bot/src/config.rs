//! Configuration types and loading
//!
//! Config precedence: env vars > config file > defaults. The config file is
//! optional; a deployment can run purely from the environment:
//! `SLACK_CLIENT_ID`, `SLACK_CLIENT_SECRET`, `REDIS_URL` (all required) and
//! `PORT`, `SLACK_REDIRECT_URI` (optional).
//!
//! The client secret is never read from the TOML itself, only from
//! `SLACK_CLIENT_SECRET` or `slack.client_secret_file`.

use common::Secret;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Validated runtime configuration, built once at startup.
#[derive(Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub slack: SlackConfig,
    pub store: StoreConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Bound on every outbound call (Slack API, store)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

/// Slack app registration
#[derive(Debug)]
pub struct SlackConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub redirect_uri: Option<String>,
    pub api_base_url: String,
}

/// Credential store settings
#[derive(Debug)]
pub struct StoreConfig {
    /// `redis://...`, or `memory://` for a process-local store
    pub url: Secret<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: Option<ServerConfig>,
    #[serde(default)]
    slack: FileSlack,
    #[serde(default)]
    store: FileStore,
}

#[derive(Debug, Default, Deserialize)]
struct FileSlack {
    client_id: Option<String>,
    client_secret_file: Option<PathBuf>,
    redirect_uri: Option<String>,
    api_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileStore {
    redis_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            timeout_secs: default_timeout(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_timeout() -> u64 {
    10
}

fn default_max_connections() -> usize {
    1000
}

impl Config {
    /// Load from an optional TOML file, then overlay the process environment.
    pub fn load(path: Option<&Path>) -> common::Result<Self> {
        let contents = match path {
            Some(p) => Some(std::fs::read_to_string(p)?),
            None => None,
        };
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build config from TOML text (if any) and an environment lookup.
    ///
    /// Empty environment values count as unset.
    pub fn from_sources(
        toml_text: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> common::Result<Self> {
        let file: FileConfig = match toml_text {
            Some(text) => toml::from_str(text)?,
            None => FileConfig::default(),
        };
        let env = |key: &str| env(key).filter(|v| !v.is_empty());

        let mut server = file.server.unwrap_or_default();
        if let Some(port) = env("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| common::Error::Config(format!("PORT must be a port number, got: {port}")))?;
            server.listen_addr.set_port(port);
        }
        if server.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if server.max_connections == 0 {
            return Err(common::Error::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        let client_id = env("SLACK_CLIENT_ID")
            .or(file.slack.client_id.filter(|v| !v.is_empty()))
            .ok_or(common::Error::MissingSetting("SLACK_CLIENT_ID"))?;

        let client_secret = match env("SLACK_CLIENT_SECRET") {
            Some(secret) => secret,
            None => match &file.slack.client_secret_file {
                Some(secret_file) => std::fs::read_to_string(secret_file)
                    .map_err(|e| {
                        common::Error::Config(format!(
                            "failed to read client_secret_file {}: {e}",
                            secret_file.display()
                        ))
                    })?
                    .trim()
                    .to_owned(),
                None => String::new(),
            },
        };
        if client_secret.is_empty() {
            return Err(common::Error::MissingSetting("SLACK_CLIENT_SECRET"));
        }

        let api_base_url = file
            .slack
            .api_base_url
            .unwrap_or_else(|| slack_api::SLACK_API_BASE.to_owned());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "api_base_url must start with http:// or https://, got: {api_base_url}"
            )));
        }

        let redis_url = env("REDIS_URL")
            .or(file.store.redis_url.filter(|v| !v.is_empty()))
            .ok_or(common::Error::MissingSetting("REDIS_URL"))?;

        Ok(Self {
            server,
            slack: SlackConfig {
                client_id,
                client_secret: Secret::new(client_secret),
                redirect_uri: env("SLACK_REDIRECT_URI").or(file.slack.redirect_uri),
                api_base_url,
            },
            store: StoreConfig {
                url: Secret::new(redis_url),
            },
        })
    }

    /// Resolve the config file path from the CLI arg or CONFIG_PATH env var.
    ///
    /// Without either, falls back to `one-to-one-bot.toml` only if it exists;
    /// otherwise configuration comes from the environment alone.
    pub fn resolve_path(cli_path: Option<&str>) -> Option<PathBuf> {
        if let Some(p) = cli_path {
            return Some(PathBuf::from(p));
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return Some(PathBuf::from(p));
        }
        let default = PathBuf::from("one-to-one-bot.toml");
        default.exists().then_some(default)
    }

    /// Outbound call bound as a `Duration`.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.server.timeout_secs)
    }
}
