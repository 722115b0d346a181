//! Redis hash backend
//!
//! Opens one connection per call and drops it before returning, so no
//! connection outlives the request that needed it. Connect and command
//! together are bounded by `timeout`.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use redis::AsyncCommands;
use tracing::debug;

use crate::backend::{BoxFuture, HashBackend};
use crate::error::{Error, Result};

/// `HashBackend` over a Redis server.
#[derive(Clone)]
pub struct RedisBackend {
    client: redis::Client,
    timeout: Duration,
}

impl fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The connection URL may embed a password
        f.debug_struct("RedisBackend")
            .field("client", &"<redis::Client>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RedisBackend {
    /// Build a backend for `url` (e.g. `redis://:password@host:6379/0`).
    ///
    /// Only parses the URL; no connection is made until the first call.
    /// An empty or unparseable URL yields `Unavailable`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        if url.is_empty() {
            return Err(Error::Unavailable("store endpoint not configured".into()));
        }
        let client = redis::Client::open(url)
            .map_err(|e| Error::Unavailable(format!("invalid store URL: {e}")))?;
        Ok(Self { client, timeout })
    }

    async fn connect(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::Unavailable(format!("failed to connect: {e}")))
    }

    async fn bounded<T>(&self, op: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| {
                Error::Unavailable(format!(
                    "no response within {}ms",
                    self.timeout.as_millis()
                ))
            })?
    }
}

fn command_error(e: redis::RedisError) -> Error {
    if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() || e.is_io_error()
    {
        Error::Unavailable(e.to_string())
    } else {
        Error::Backend(e.to_string())
    }
}

impl HashBackend for RedisBackend {
    fn read_hash<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<HashMap<String, String>>> {
        Box::pin(self.bounded(async move {
            let mut conn = self.connect().await?;
            let fields: HashMap<String, String> = conn.hgetall(key).await.map_err(command_error)?;
            debug!(key, fields = fields.len(), "read hash");
            Ok(fields)
        }))
    }

    fn write_hash<'a>(
        &'a self,
        key: &'a str,
        fields: &'a [(&'a str, &'a str)],
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.bounded(async move {
            let mut conn = self.connect().await?;
            let _: () = conn
                .hset_multiple(key, fields)
                .await
                .map_err(command_error)?;
            debug!(key, fields = fields.len(), "wrote hash");
            Ok(())
        }))
    }
}
