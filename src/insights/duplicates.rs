//! Duplicate detection by sender + normalized subject.

use std::collections::HashSet;

use crate::pipeline::types::{ProcessedMessage, truncate_chars};

const SUBJECT_KEY_CHARS: usize = 50;
const REPLY_PREFIXES: &[&str] = &["re:", "fwd:", "fw:"];

/// Partition of a message list into first occurrences and repeats.
#[derive(Debug, Default)]
pub struct DuplicateReport<'a> {
    pub unique: Vec<&'a ProcessedMessage>,
    pub duplicates: Vec<&'a ProcessedMessage>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateDetector;

impl DuplicateDetector {
    pub fn new() -> Self {
        Self
    }

    /// Single stable pass; the first message with a key is unique.
    pub fn detect<'a>(&self, messages: &'a [ProcessedMessage]) -> DuplicateReport<'a> {
        let mut seen = HashSet::new();
        let mut report = DuplicateReport::default();
        for processed in messages {
            if seen.insert(duplicate_key(processed)) {
                report.unique.push(processed);
            } else {
                report.duplicates.push(processed);
            }
        }
        report
    }
}

/// `sender:subject`, lowercased, reply/forward prefixes removed.
pub fn duplicate_key(processed: &ProcessedMessage) -> String {
    let sender = processed.message.sender.trim().to_lowercase();
    let subject = strip_reply_prefixes(&processed.message.subject.to_lowercase());
    format!("{sender}:{}", truncate_chars(&subject, SUBJECT_KEY_CHARS))
}

fn strip_reply_prefixes(subject: &str) -> String {
    let mut rest = subject.trim();
    while let Some(stripped) = REPLY_PREFIXES
        .iter()
        .find_map(|prefix| rest.strip_prefix(prefix))
    {
        rest = stripped.trim_start();
    }
    rest.trim_end().to_string()
}
