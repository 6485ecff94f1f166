//! RFC 822 decoding into `Message` records.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use mail_parser::{MessageParser, MimeHeaders};
use regex::Regex;

use crate::pipeline::types::{Attachment, Message, truncate_chars};

const SNIPPET_CHARS: usize = 200;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Decode a raw message. `fallback_id` is used when there is no Message-ID.
///
/// Returns `None` only when the bytes are not a message at all.
pub fn parse_rfc822(raw: &[u8], fallback_id: &str) -> Option<Message> {
    let parsed = MessageParser::default().parse(raw)?;

    let id = parsed
        .message_id()
        .map(str::to_string)
        .unwrap_or_else(|| fallback_id.to_string());
    let subject = parsed.subject().unwrap_or_default().to_string();
    let sender = parsed
        .from()
        .and_then(|addr| addr.first())
        .map(|a| format_address(a.name(), a.address()))
        .unwrap_or_else(|| "unknown".into());
    let recipient = parsed
        .to()
        .and_then(|addr| addr.first())
        .and_then(|a| a.address())
        .unwrap_or_default()
        .to_string();
    let received_at = parsed
        .date()
        .and_then(|d| DateTime::<Utc>::from_timestamp(d.to_timestamp(), 0))
        .unwrap_or_else(Utc::now);

    let plain_text = parsed
        .body_text(0)
        .map(|t| t.to_string())
        .unwrap_or_default();
    let html_text = parsed
        .body_html(0)
        .map(|h| h.to_string())
        .unwrap_or_default();
    let readable = if plain_text.trim().is_empty() {
        strip_html(&html_text)
    } else {
        plain_text.split_whitespace().collect::<Vec<_>>().join(" ")
    };
    let snippet = truncate_chars(&readable, SNIPPET_CHARS).to_string();

    let attachments = parsed
        .attachments()
        .map(|part| {
            let filename = MimeHeaders::attachment_name(part).unwrap_or("attachment");
            let mime_type = MimeHeaders::content_type(part)
                .map(|ct| match ct.subtype() {
                    Some(sub) => format!("{}/{}", ct.ctype(), sub),
                    None => ct.ctype().to_string(),
                })
                .unwrap_or_else(|| "application/octet-stream".into());
            Attachment::new(filename, mime_type, part.contents().len() as u64)
        })
        .collect();

    Some(Message {
        id,
        subject,
        sender,
        recipient,
        received_at,
        plain_text,
        html_text,
        snippet,
        attachments,
    })
}

fn format_address(name: Option<&str>, address: Option<&str>) -> String {
    match (name.map(str::trim).filter(|n| !n.is_empty()), address) {
        (Some(name), Some(address)) => format!("{name} <{address}>"),
        (None, Some(address)) => address.to_string(),
        (Some(name), None) => name.to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// Replace each HTML tag with a space. Line breaks in the text survive.
pub fn strip_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, " ").into_owned()
}

/// Strip HTML tags and collapse all whitespace.
pub fn strip_html(html: &str) -> String {
    strip_tags(html).split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "From: Power Co <billing@power.com>\r\n\
To: me@example.com\r\n\
Subject: Invoice due\r\n\
Message-ID: <inv-1@power.com>\r\n\
Date: Mon, 15 Dec 2025 09:30:00 +0000\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Payment due 15/12/2025 of $150\r\n";

    #[test]
    fn decodes_headers_and_body() {
        let message = parse_rfc822(PLAIN.as_bytes(), "fallback").unwrap();
        assert_eq!(message.id, "inv-1@power.com");
        assert_eq!(message.sender, "Power Co <billing@power.com>");
        assert_eq!(message.recipient, "me@example.com");
        assert_eq!(message.subject, "Invoice due");
        assert!(message.plain_text.contains("$150"));
        assert_eq!(message.snippet, "Payment due 15/12/2025 of $150");
        assert_eq!(message.received_at.to_rfc3339(), "2025-12-15T09:30:00+00:00");
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn missing_message_id_uses_fallback() {
        let raw = "From: a@b.com\r\nSubject: hi\r\n\r\nhello\r\n";
        let message = parse_rfc822(raw.as_bytes(), "file-7").unwrap();
        assert_eq!(message.id, "file-7");
        assert_eq!(message.sender, "a@b.com");
    }

    #[test]
    fn html_only_body_feeds_snippet() {
        let raw = "From: a@b.com\r\nSubject: hi\r\nContent-Type: text/html\r\n\r\n<p>Join <b>meeting</b> at 3:00 PM</p>\r\n";
        let message = parse_rfc822(raw.as_bytes(), "x").unwrap();
        assert_eq!(message.snippet, "Join meeting at 3:00 PM");
    }

    #[test]
    fn attachment_metadata() {
        let raw = "From: a@b.com\r\n\
Subject: Files\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"XX\"\r\n\
\r\n\
--XX\r\n\
Content-Type: text/plain\r\n\
\r\n\
see attached\r\n\
--XX\r\n\
Content-Type: application/pdf\r\n\
Content-Disposition: attachment; filename=\"report.pdf\"\r\n\
\r\n\
PDFDATA\r\n\
--XX--\r\n";
        let message = parse_rfc822(raw.as_bytes(), "x").unwrap();
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].filename, "report.pdf");
        assert_eq!(message.attachments[0].mime_type, "application/pdf");
    }

    #[test]
    fn strip_html_basic() {
        assert_eq!(strip_html("<div><b>Bold</b> and <i>italic</i></div>"), "Bold and italic");
        assert_eq!(strip_html(r#"<a href="https://example.com">Link</a>"#), "Link");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn strip_tags_keeps_lines() {
        assert_eq!(strip_tags("<p>Pay rent</p>\nCall mom"), " Pay rent \nCall mom");
        assert_eq!(strip_tags("no markup"), "no markup");
    }
}
