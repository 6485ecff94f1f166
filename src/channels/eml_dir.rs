//! Directory of `.eml` files as a message source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::pipeline::types::Message;

use super::MessageSource;
use super::mail::parse_rfc822;

pub struct EmlDirSource {
    dir: PathBuf,
}

impl EmlDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn eml_paths(&self) -> Result<Vec<PathBuf>, SourceError> {
        let read_err = |source: std::io::Error| SourceError::Read {
            path: self.dir.clone(),
            source,
        };
        let meta = fs::metadata(&self.dir).await.map_err(read_err)?;
        if !meta.is_dir() {
            return Err(SourceError::Unavailable {
                name: self.name().to_string(),
                reason: format!("{} is not a directory", self.dir.display()),
            });
        }
        let mut entries = fs::read_dir(&self.dir).await.map_err(read_err)?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
            let path = entry.path();
            let is_eml = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("eml"));
            if is_eml {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

#[async_trait]
impl MessageSource for EmlDirSource {
    fn name(&self) -> &str {
        "eml-dir"
    }

    /// Unparseable files are skipped; a missing directory is an error.
    async fn fetch(&self, limit: usize) -> Result<Vec<Message>, SourceError> {
        let mut messages = Vec::new();
        for path in self.eml_paths().await? {
            let raw = match fs::read(&path).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable message file");
                    continue;
                }
            };
            let fallback_id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            match parse_rfc822(&raw, &fallback_id) {
                Some(message) => messages.push(message),
                None => warn!(path = %path.display(), "Skipping unparseable message file"),
            }
        }

        // Newest first; ties keep file-name order.
        messages.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        messages.truncate(limit);
        debug!(dir = %self.dir.display(), count = messages.len(), "Messages loaded");
        Ok(messages)
    }
}
