//! Configuration error types shared by every crate that reads settings

use thiserror::Error;

/// Startup/configuration failure.
///
/// A missing setting is fatal to the operation that needs it, so these are
/// surfaced before the listener binds rather than at request time.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("missing required setting {0}")]
    MissingSetting(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;
