//! In-memory `SavedStore`.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::pipeline::types::ProcessedMessage;

use super::traits::SavedStore;

#[derive(Debug, Default)]
pub struct MemorySavedStore {
    items: RwLock<Vec<ProcessedMessage>>,
}

impl MemorySavedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedStore for MemorySavedStore {
    async fn save(&self, message: &ProcessedMessage) -> Result<bool, StoreError> {
        let mut items = self.items.write().await;
        if items.iter().any(|p| p.id() == message.id()) {
            return Ok(false);
        }
        items.push(message.clone());
        debug!(id = %message.id(), "Message saved");
        Ok(true)
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|p| p.id() != id);
        Ok(items.len() != before)
    }

    async fn list(&self) -> Result<Vec<ProcessedMessage>, StoreError> {
        Ok(self.items.read().await.clone())
    }

    async fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.items.read().await.iter().any(|p| p.id() == id))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.items.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{Category, ExtractedData, Message};

    fn pm(id: &str, score: u8) -> ProcessedMessage {
        ProcessedMessage {
            message: Message::new(id, "a@b.com", id, ""),
            extracted: ExtractedData::default(),
            category: Category::Bills,
            score,
        }
    }

    #[tokio::test]
    async fn save_is_idempotent() {
        let store = MemorySavedStore::new();
        assert!(store.save(&pm("a", 5)).await.unwrap());
        assert!(!store.save(&pm("a", 9)).await.unwrap());
        let items = store.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].score, 5);
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let store = MemorySavedStore::new();
        store.save(&pm("a", 1)).await.unwrap();
        store.save(&pm("b", 1)).await.unwrap();
        assert!(store.remove("a").await.unwrap());
        assert!(!store.remove("a").await.unwrap());
        assert!(!store.contains("a").await.unwrap());
        assert!(store.contains("b").await.unwrap());
        store.clear().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
