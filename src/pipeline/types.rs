//! Shared types for the rule-engine pipeline.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ── Inbound message ─────────────────────────────────────────────────

/// Attachment metadata (content is never loaded by the core).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// A decoded inbound message.
///
/// Produced once by a message source and never mutated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Provider message id.
    pub id: String,
    pub subject: String,
    /// Sender address, optionally with display name (`Name <addr>`).
    pub sender: String,
    pub recipient: String,
    /// When the message was received.
    pub received_at: DateTime<Utc>,
    /// Decoded plain-text body.
    pub plain_text: String,
    /// Decoded HTML body (may be empty).
    #[serde(default)]
    pub html_text: String,
    /// Short provider preview of the body.
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Create a message with the fields every caller has; the rest default.
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        subject: impl Into<String>,
        plain_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            sender: sender.into(),
            recipient: String::new(),
            received_at: Utc::now(),
            plain_text: plain_text.into(),
            html_text: String::new(),
            snippet: String::new(),
            attachments: Vec::new(),
        }
    }

    /// Builder: set recipient.
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = recipient.into();
        self
    }

    /// Builder: set receive time.
    pub fn with_received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = at;
        self
    }

    /// Builder: set snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Builder: set HTML body.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_text = html.into();
        self
    }

    /// Builder: add an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Body text used for analysis: the plain body, or the snippet when the
    /// plain body is blank.
    pub fn body_text(&self) -> &str {
        if self.plain_text.trim().is_empty() {
            &self.snippet
        } else {
            &self.plain_text
        }
    }

    /// Subject and body joined with a space.
    pub fn subject_and_body(&self) -> String {
        format!("{} {}", self.subject, self.body_text())
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}

// ── Category ────────────────────────────────────────────────────────

/// Task-relevant category. Every message gets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Bills,
    #[serde(rename = "Student Meetings")]
    StudentMeetings,
    #[serde(rename = "Job Meetings")]
    JobMeetings,
    #[serde(rename = "Internship Meetings")]
    InternshipMeetings,
    Meetings,
    Promotions,
    #[serde(rename = "OTP")]
    Otp,
    Jobs,
    Attachments,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 10] = [
        Category::Bills,
        Category::StudentMeetings,
        Category::JobMeetings,
        Category::InternshipMeetings,
        Category::Meetings,
        Category::Promotions,
        Category::Otp,
        Category::Jobs,
        Category::Attachments,
        Category::Other,
    ];

    /// Categories competing in weighted scoring; earlier entries win ties.
    pub const TIE_BREAK_ORDER: [Category; 8] = [
        Category::Bills,
        Category::StudentMeetings,
        Category::InternshipMeetings,
        Category::JobMeetings,
        Category::Jobs,
        Category::Meetings,
        Category::Promotions,
        Category::Attachments,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bills => "Bills",
            Category::StudentMeetings => "Student Meetings",
            Category::JobMeetings => "Job Meetings",
            Category::InternshipMeetings => "Internship Meetings",
            Category::Meetings => "Meetings",
            Category::Promotions => "Promotions",
            Category::Otp => "OTP",
            Category::Jobs => "Jobs",
            Category::Attachments => "Attachments",
            Category::Other => "Other",
        }
    }

    /// Any of the meeting categories.
    pub fn is_meeting(&self) -> bool {
        matches!(
            self,
            Category::Meetings
                | Category::StudentMeetings
                | Category::JobMeetings
                | Category::InternshipMeetings
        )
    }

    /// Categories whose score depends on an application/interview deadline.
    pub fn is_career(&self) -> bool {
        matches!(
            self,
            Category::Jobs | Category::JobMeetings | Category::InternshipMeetings
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Extracted data ──────────────────────────────────────────────────

/// Facts pulled out of message text. Lists keep first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedData {
    /// Currency amounts as written, e.g. `"$150"`, `"₹1,200.50"`.
    pub amounts: Vec<String>,
    /// Valid calendar dates found as `DD/MM/YYYY` or `DD-MM-YYYY`.
    pub due_dates: Vec<NaiveDate>,
    /// Clock times normalized to `"H:MM AM|PM"`.
    pub times: Vec<String>,
    pub urls: Vec<String>,
    /// Numeric one-time codes.
    pub otp_codes: Vec<String>,
}

impl ExtractedData {
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
            && self.due_dates.is_empty()
            && self.times.is_empty()
            && self.urls.is_empty()
            && self.otp_codes.is_empty()
    }
}

// ── Processed message ───────────────────────────────────────────────

/// A message after extraction, classification and scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedMessage {
    pub message: Message,
    pub extracted: ExtractedData,
    pub category: Category,
    /// Importance score, 0-100.
    pub score: u8,
}

impl ProcessedMessage {
    pub fn id(&self) -> &str {
        &self.message.id
    }

    pub fn subject(&self) -> &str {
        &self.message.subject
    }
}

/// First `max` characters of `s` (char-boundary safe).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
