//! Collects one-time codes from OTP messages, newest first.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::types::{Category, ProcessedMessage};

const MAX_SERVICE_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpEntry {
    pub service: String,
    pub code: String,
    pub timestamp: DateTime<Utc>,
    pub message_id: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OtpCenter;

impl OtpCenter {
    pub fn new() -> Self {
        Self
    }

    pub fn collect(&self, messages: &[ProcessedMessage]) -> Vec<OtpEntry> {
        let mut entries: Vec<OtpEntry> = messages
            .iter()
            .filter(|p| p.category == Category::Otp)
            .flat_map(|p| {
                let service = service_name(&p.message.sender);
                p.extracted.otp_codes.iter().map(move |code| OtpEntry {
                    service: service.clone(),
                    code: code.clone(),
                    timestamp: p.message.received_at,
                    message_id: p.id().to_string(),
                })
            })
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }
}

/// Display name (or local part) of the sender, else its domain label.
pub fn service_name(sender: &str) -> String {
    let head = sender.split(['<', '@']).next().unwrap_or_default().trim();
    if !head.is_empty() && head.chars().count() < MAX_SERVICE_CHARS {
        return head.trim_matches('"').to_string();
    }

    let domain_label = sender
        .split_once('@')
        .map(|(_, rest)| rest.split(['.', '>']).next().unwrap_or_default())
        .unwrap_or_default();
    let mut chars = domain_label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Unknown".to_string(),
    }
}
