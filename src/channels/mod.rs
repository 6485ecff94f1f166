//! Message sources: where the planner's inbox comes from.
//!
//! A source hands over fully decoded `Message` records. Retries, backoff and
//! authentication belong to the source; the pipeline only sees the result.

pub mod eml_dir;
pub mod mail;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::pipeline::types::Message;

pub use eml_dir::EmlDirSource;
pub use mail::parse_rfc822;

/// Pull-based message retrieval.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Source name (for logging).
    fn name(&self) -> &str;

    /// Up to `limit` messages, newest first.
    async fn fetch(&self, limit: usize) -> Result<Vec<Message>, SourceError>;
}

/// Source over a fixed, in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    messages: Vec<Message>,
}

impl StaticSource {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl MessageSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, limit: usize) -> Result<Vec<Message>, SourceError> {
        Ok(self.messages.iter().take(limit).cloned().collect())
    }
}
