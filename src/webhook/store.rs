//! Persisted subscription record
//!
//! One record per trigger instance: the remote webhook ID, if any. The
//! record survives restarts via a small JSON file written atomically
//! (temp file then rename); an in-memory mode backs tests.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The persisted shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SubscriptionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook_id: Option<String>,
}

/// Store for the per-trigger subscription record
#[derive(Debug)]
pub struct SubscriptionStore {
    /// Path to the record file; empty in in-memory mode
    path: PathBuf,
    record: Arc<RwLock<SubscriptionRecord>>,
}

impl SubscriptionStore {
    /// Open a store backed by the given file, loading an existing record.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let record = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read subscription file: {e}")))?;
            serde_json::from_str(&contents)
                .map_err(|e| Error::state(format!("Failed to parse subscription file: {e}")))?
        } else {
            SubscriptionRecord::default()
        };

        Ok(Self {
            path,
            record: Arc::new(RwLock::new(record)),
        })
    }

    /// Create a store with no file persistence.
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            record: Arc::new(RwLock::new(SubscriptionRecord::default())),
        }
    }

    /// The stored webhook ID, if a subscription is registered.
    pub async fn webhook_id(&self) -> Option<String> {
        self.record.read().await.webhook_id.clone()
    }

    /// Store the webhook ID and persist.
    pub async fn set_webhook_id(&self, webhook_id: impl Into<String>) -> Result<()> {
        {
            let mut record = self.record.write().await;
            record.webhook_id = Some(webhook_id.into());
        }
        self.save().await
    }

    /// Clear the webhook ID and persist.
    pub async fn clear_webhook_id(&self) -> Result<()> {
        {
            let mut record = self.record.write().await;
            record.webhook_id = None;
        }
        self.save().await
    }

    /// Whether this store persists to a file.
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }

    async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = {
            let record = self.record.read().await;
            serde_json::to_string_pretty(&*record)
                .map_err(|e| Error::state(format!("Failed to serialize subscription: {e}")))?
        };

        // Temp file then rename, so a crash never leaves a torn record.
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write subscription file: {e}")))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename subscription file: {e}")))?;

        Ok(())
    }
}

impl Clone for SubscriptionStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            record: Arc::clone(&self.record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = SubscriptionStore::in_memory();
        assert_eq!(store.webhook_id().await, None);

        store.set_webhook_id("w1").await.unwrap();
        assert_eq!(store.webhook_id().await, Some("w1".to_string()));

        store.clear_webhook_id().await.unwrap();
        assert_eq!(store.webhook_id().await, None);
    }

    #[tokio::test]
    async fn test_file_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subscription.json");

        let store = SubscriptionStore::from_file(&path).unwrap();
        store.set_webhook_id("w42").await.unwrap();

        // A fresh store sees the persisted record.
        let reopened = SubscriptionStore::from_file(&path).unwrap();
        assert_eq!(reopened.webhook_id().await, Some("w42".to_string()));

        // The atomic write leaves no temp residue.
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = SubscriptionStore::from_file(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.webhook_id().await, None);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_state_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subscription.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(SubscriptionStore::from_file(&path).is_err());
    }
}
