//! Per-team bot credential storage
//!
//! Each authorized team owns one hash record under `team:{team_id}` holding
//! the team name, team id, bot token and granted scope. Records are written
//! whole on every (re-)authorization and read whole on every slash command.
//!
//! The storage engine sits behind `HashBackend` so the store logic can run
//! against Redis in production and an in-process map in tests.

pub mod backend;
pub mod credential;
pub mod error;
pub mod redis_backend;
pub mod store;

pub use backend::{BoxFuture, HashBackend, MemoryBackend};
pub use credential::TeamCredential;
pub use error::{Error, Result};
pub use redis_backend::RedisBackend;
pub use store::{CredentialStore, team_key};
