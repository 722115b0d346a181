//! Shared types for the one-to-one bot workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
