//! JSON-file `SavedStore`.
//!
//! The whole saved set lives in one JSON array on disk. Every operation
//! reads the file, and mutations rewrite it. A missing file is an empty
//! store; an unreadable or corrupt file is logged and treated as empty so
//! one bad write never locks the user out of saving again.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::pipeline::types::ProcessedMessage;

use super::traits::SavedStore;

pub struct JsonFileSavedStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileSavedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Vec<ProcessedMessage> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Saved items unreadable, starting empty");
                return Vec::new();
            }
        };
        if raw.trim().is_empty() {
            return Vec::new();
        }
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Saved items corrupt, starting empty");
                Vec::new()
            }
        }
    }

    async fn persist(&self, items: &[ProcessedMessage]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), count = items.len(), "Saved items written");
        Ok(())
    }
}

#[async_trait]
impl SavedStore for JsonFileSavedStore {
    async fn save(&self, message: &ProcessedMessage) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load().await;
        if items.iter().any(|p| p.id() == message.id()) {
            return Ok(false);
        }
        items.push(message.clone());
        self.persist(&items).await?;
        Ok(true)
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load().await;
        let before = items.len();
        items.retain(|p| p.id() != id);
        if items.len() == before {
            return Ok(false);
        }
        self.persist(&items).await?;
        Ok(true)
    }

    async fn list(&self) -> Result<Vec<ProcessedMessage>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await)
    }

    async fn contains(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await.iter().any(|p| p.id() == id))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.persist(&[]).await
    }
}
