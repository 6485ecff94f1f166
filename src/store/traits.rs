//! `SavedStore` trait: the persistence collaborator for starred messages.
//!
//! Only messages the user explicitly saves are persisted, as full
//! `ProcessedMessage` snapshots keyed by message id.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::pipeline::types::ProcessedMessage;

/// Backend-agnostic store for saved messages.
#[async_trait]
pub trait SavedStore: Send + Sync {
    /// Persist a snapshot. Saving an id that is already stored keeps the
    /// first snapshot and returns `false`.
    async fn save(&self, message: &ProcessedMessage) -> Result<bool, StoreError>;

    /// Remove by message id; `false` when nothing was stored under it.
    async fn remove(&self, id: &str) -> Result<bool, StoreError>;

    /// Every saved snapshot, in save order.
    async fn list(&self) -> Result<Vec<ProcessedMessage>, StoreError>;

    async fn contains(&self, id: &str) -> Result<bool, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

/// Fetched messages followed by saved snapshots that are not in the fetch.
///
/// Analytics that should also cover starred items run over this list.
pub fn saved_view(fetched: &[ProcessedMessage], saved: &[ProcessedMessage]) -> Vec<ProcessedMessage> {
    let mut view = fetched.to_vec();
    for item in saved {
        if !view.iter().any(|p| p.id() == item.id()) {
            view.push(item.clone());
        }
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{Category, ExtractedData, Message};

    fn pm(id: &str, score: u8) -> ProcessedMessage {
        ProcessedMessage {
            message: Message::new(id, "a@b.com", id, ""),
            extracted: ExtractedData::default(),
            category: Category::Other,
            score,
        }
    }

    #[test]
    fn saved_view_appends_missing_only() {
        let fetched = vec![pm("a", 5), pm("b", 5)];
        let saved = vec![pm("b", 1), pm("c", 9)];
        let view = saved_view(&fetched, &saved);
        let ids: Vec<&str> = view.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        // The fetched copy wins over the stale snapshot.
        assert_eq!(view[1].score, 5);
    }
}
