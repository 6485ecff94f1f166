//! Log redaction policy.
//!
//! Message content (subjects, bodies, addresses) must not reach log output
//! in production. A `LogPolicy` is built once at startup and handed to every
//! component that logs message-derived values.

use std::str::FromStr;

use crate::pipeline::types::{Message, ProcessedMessage};

/// Marker substituted for redacted values.
pub const REDACTED: &str = "[REDACTED]";

/// Strings longer than this are treated as message content.
const MAX_PLAIN_LEN: usize = 100;

/// Field names that always carry message content.
const SENSITIVE_FIELDS: &[&str] = &[
    "body", "plain_text", "html_text", "snippet", "subject", "sender", "recipient", "from", "to",
    "data",
];

/// How log output treats message-derived values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// Redact sensitive fields and long strings.
    #[default]
    Redact,
    /// Log values as-is (local development only).
    Passthrough,
}

impl FromStr for LogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redact" => Ok(Self::Redact),
            "passthrough" | "dev" => Ok(Self::Passthrough),
            other => Err(format!("unknown log mode: {other}")),
        }
    }
}

/// Redaction capability injected into logging call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPolicy {
    mode: LogMode,
}

impl LogPolicy {
    pub fn new(mode: LogMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> LogMode {
        self.mode
    }

    /// Redact a free-standing value: long strings look like message content.
    pub fn redact<'a>(&self, value: &'a str) -> &'a str {
        match self.mode {
            LogMode::Passthrough => value,
            LogMode::Redact if value.chars().count() > MAX_PLAIN_LEN => "[REDACTED - long string]",
            LogMode::Redact => value,
        }
    }

    /// Redact a named field; sensitive field names are always masked.
    pub fn redact_field<'a>(&self, field: &str, value: &'a str) -> &'a str {
        if self.mode == LogMode::Redact && SENSITIVE_FIELDS.contains(&field) {
            return REDACTED;
        }
        self.redact(value)
    }

    /// One-line description of a message safe to put in a log record.
    pub fn describe(&self, message: &Message) -> String {
        format!(
            "id={} from={} subject={}",
            message.id,
            self.redact_field("sender", &message.sender),
            self.redact_field("subject", &message.subject),
        )
    }

    /// Describe a processed message, including its classification.
    pub fn describe_processed(&self, processed: &ProcessedMessage) -> String {
        format!(
            "{} category={} score={}",
            self.describe(&processed.message),
            processed.category.label(),
            processed.score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_values_pass_through() {
        let policy = LogPolicy::default();
        assert_eq!(policy.redact("42 messages"), "42 messages");
    }

    #[test]
    fn long_values_are_redacted() {
        let policy = LogPolicy::default();
        let long = "x".repeat(101);
        assert_eq!(policy.redact(&long), "[REDACTED - long string]");
    }

    #[test]
    fn sensitive_fields_always_masked() {
        let policy = LogPolicy::new(LogMode::Redact);
        assert_eq!(policy.redact_field("subject", "Hi"), REDACTED);
        assert_eq!(policy.redact_field("sender", "a@b.com"), REDACTED);
        assert_eq!(policy.redact_field("category", "Bills"), "Bills");
    }

    #[test]
    fn passthrough_logs_everything() {
        let policy = LogPolicy::new(LogMode::Passthrough);
        let long = "y".repeat(500);
        assert_eq!(policy.redact(&long), long);
        assert_eq!(policy.redact_field("body", "secret"), "secret");
    }

    #[test]
    fn describe_hides_content() {
        let policy = LogPolicy::default();
        let message = Message::new("m-1", "alice@example.com", "Salary details", "body");
        let line = policy.describe(&message);
        assert!(line.contains("id=m-1"));
        assert!(!line.contains("alice"));
        assert!(!line.contains("Salary"));
    }

    #[test]
    fn log_mode_parses() {
        assert_eq!("redact".parse::<LogMode>(), Ok(LogMode::Redact));
        assert_eq!("DEV".parse::<LogMode>(), Ok(LogMode::Passthrough));
        assert!("loud".parse::<LogMode>().is_err());
    }
}
