//! Team credential store over a `HashBackend`

use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::HashBackend;
use crate::credential::TeamCredential;
use crate::error::Result;

/// Backend key for a team's record.
pub fn team_key(team_id: &str) -> String {
    format!("team:{team_id}")
}

/// Reads and writes `TeamCredential` records.
///
/// Holds no in-process state beyond the backend handle. Concurrent puts for
/// the same team are not ordered against each other; the last write the
/// backend applies wins.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn HashBackend>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn HashBackend>) -> Self {
        Self { backend }
    }

    /// Load the credential for `team_id`.
    ///
    /// Returns `NotFound` when the store answered but holds no token for the
    /// team, and `Unavailable` when the store could not be reached.
    pub async fn get(&self, team_id: &str) -> Result<TeamCredential> {
        let key = team_key(team_id);
        let fields = self.backend.read_hash(&key).await?;
        let credential = TeamCredential::from_fields(team_id, fields)?;
        debug!(team_id, "loaded team credential");
        Ok(credential)
    }

    /// Persist `credential`, replacing every field of any earlier record.
    ///
    /// Validation runs before the backend is touched, so an incomplete
    /// credential never produces a partial write.
    pub async fn put(&self, credential: &TeamCredential) -> Result<()> {
        credential.validate()?;
        let key = team_key(&credential.team_id);
        let fields = credential.to_fields();
        self.backend.write_hash(&key, &fields).await?;
        info!(
            team_id = %credential.team_id,
            team_name = %credential.team_name,
            "stored team credential"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::error::Error;

    fn store_with(backend: Arc<MemoryBackend>) -> CredentialStore {
        CredentialStore::new(backend)
    }

    #[test]
    fn key_is_prefixed_with_team() {
        assert_eq!(team_key("T024BE7LD"), "team:T024BE7LD");
    }

    #[tokio::test]
    async fn put_then_get_returns_identical_fields() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        let cred = TeamCredential::new("T1", "Acme", "xoxb-1", "commands,users:read");
        store.put(&cred).await.unwrap();

        let loaded = store.get("T1").await.unwrap();
        assert_eq!(loaded.team_id, "T1");
        assert_eq!(loaded.team_name, "Acme");
        assert_eq!(loaded.access_token.expose(), "xoxb-1");
        assert_eq!(loaded.scope, "commands,users:read");
    }

    #[tokio::test]
    async fn put_writes_under_team_key_with_stored_field_names() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());
        store
            .put(&TeamCredential::new("T1", "Acme", "xoxb-1", "commands"))
            .await
            .unwrap();

        let raw = backend.read_hash("team:T1").await.unwrap();
        assert_eq!(raw.len(), 4);
        assert_eq!(raw["name"], "Acme");
        assert_eq!(raw["ID"], "T1");
        assert_eq!(raw["token"], "xoxb-1");
        assert_eq!(raw["scope"], "commands");
    }

    #[tokio::test]
    async fn reauthorization_overwrites_every_field() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        store
            .put(&TeamCredential::new("T1", "Acme", "xoxb-old", "commands"))
            .await
            .unwrap();
        store
            .put(&TeamCredential::new("T1", "Acme Corp", "xoxb-new", "commands,users:read"))
            .await
            .unwrap();

        let loaded = store.get("T1").await.unwrap();
        assert_eq!(loaded.team_name, "Acme Corp");
        assert_eq!(loaded.access_token.expose(), "xoxb-new");
        assert_eq!(loaded.scope, "commands,users:read");
    }

    #[tokio::test]
    async fn put_rejects_empty_field_without_writing() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store_with(backend.clone());

        let err = store
            .put(&TeamCredential::new("T1", "Acme", "", "commands"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::Validation { field: "access_token" }),
            "got: {err:?}"
        );
        assert_eq!(backend.writes(), 0);
    }

    #[tokio::test]
    async fn put_validates_before_contacting_backend() {
        // An offline backend would report Unavailable; validation must win.
        let store = store_with(Arc::new(MemoryBackend::offline()));
        let err = store
            .put(&TeamCredential::new("T1", "", "xoxb", "commands"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::Validation { field: "team_name" }),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn get_unknown_team_is_not_found() {
        let store = store_with(Arc::new(MemoryBackend::new()));
        let err = store.get("T404").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref t) if t == "T404"), "got: {err:?}");
    }

    #[tokio::test]
    async fn get_distinguishes_unreachable_store_from_missing_team() {
        let store = store_with(Arc::new(MemoryBackend::offline()));
        let err = store.get("T1").await.unwrap_err();
        assert!(err.is_unavailable(), "got: {err:?}");
    }

    #[tokio::test]
    async fn put_surfaces_unreachable_store() {
        let store = store_with(Arc::new(MemoryBackend::offline()));
        let err = store
            .put(&TeamCredential::new("T1", "Acme", "xoxb", "commands"))
            .await
            .unwrap_err();
        assert!(err.is_unavailable(), "got: {err:?}");
    }
}
