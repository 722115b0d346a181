//! Hash-store abstraction and the in-process implementation

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};

/// Boxed future returned by `HashBackend` methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Key-value store holding one flat string hash per key.
///
/// Uses `Pin<Box<dyn Future>>` return types so the store can hold an
/// `Arc<dyn HashBackend>`.
pub trait HashBackend: Send + Sync {
    /// Read every field of the hash at `key`. A missing key yields an empty map.
    fn read_hash<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<HashMap<String, String>>>;

    /// Write `fields` into the hash at `key` in a single command.
    ///
    /// Fields present in `fields` replace stored values; fields not listed are
    /// left as they were.
    fn write_hash<'a>(
        &'a self,
        key: &'a str,
        fields: &'a [(&'a str, &'a str)],
    ) -> BoxFuture<'a, Result<()>>;
}

/// In-process backend for tests and `memory://` local runs.
///
/// Can be switched offline to simulate an unreachable store, and counts
/// writes so callers can assert that nothing was persisted.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    hashes: Mutex<HashMap<String, HashMap<String, String>>>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that fails every call with `Unavailable`.
    pub fn offline() -> Self {
        let backend = Self::default();
        backend.set_offline(true);
        backend
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Number of successful `write_hash` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(Error::Unavailable("memory backend is offline".into()));
        }
        Ok(())
    }
}

impl HashBackend for MemoryBackend {
    fn read_hash<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<HashMap<String, String>>> {
        Box::pin(async move {
            self.check_online()?;
            let hashes = self.hashes.lock().await;
            Ok(hashes.get(key).cloned().unwrap_or_default())
        })
    }

    fn write_hash<'a>(
        &'a self,
        key: &'a str,
        fields: &'a [(&'a str, &'a str)],
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.check_online()?;
            let mut hashes = self.hashes.lock().await;
            let hash = hashes.entry(key.to_owned()).or_default();
            for (field, value) in fields {
                hash.insert((*field).to_owned(), (*value).to_owned());
            }
            self.writes.fetch_add(1, Ordering::Relaxed);
            debug!(key, fields = fields.len(), "wrote hash");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reads_as_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.read_hash("team:nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_merges_fields_into_existing_hash() {
        let backend = MemoryBackend::new();
        backend
            .write_hash("k", &[("a", "1"), ("b", "2")])
            .await
            .unwrap();
        backend.write_hash("k", &[("a", "9")]).await.unwrap();

        let hash = backend.read_hash("k").await.unwrap();
        assert_eq!(hash["a"], "9");
        assert_eq!(hash["b"], "2", "unlisted fields are left in place");
        assert_eq!(backend.writes(), 2);
    }

    #[tokio::test]
    async fn offline_backend_fails_every_call() {
        let backend = MemoryBackend::offline();
        assert!(backend.read_hash("k").await.unwrap_err().is_unavailable());
        assert!(
            backend
                .write_hash("k", &[("a", "1")])
                .await
                .unwrap_err()
                .is_unavailable()
        );
        assert_eq!(backend.writes(), 0);

        backend.set_offline(false);
        assert!(backend.read_hash("k").await.is_ok());
    }
}
