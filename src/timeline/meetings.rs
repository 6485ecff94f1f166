//! Meeting timeline and clash detection.

use serde::Serialize;

use crate::pipeline::clock::ClockTime;
use crate::pipeline::types::{ProcessedMessage, truncate_chars};

const TITLE_CHARS: usize = 50;
const TITLE_KEY_CHARS: usize = 30;

/// One meeting at one clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingEvent {
    /// Minutes since midnight.
    pub minutes: u16,
    pub title: String,
    pub message_id: String,
    /// Time as extracted, e.g. `"2:30 PM"`.
    pub raw_time: String,
}

/// Two or more distinct meetings at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingConflict {
    pub minutes: u16,
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeetingTimeline;

impl MeetingTimeline {
    pub fn new() -> Self {
        Self
    }

    /// Events for every time in every meeting-category message, earliest first.
    ///
    /// The same title at the same time is kept once.
    pub fn events(&self, messages: &[ProcessedMessage]) -> Vec<MeetingEvent> {
        let mut seen: Vec<(u16, String)> = Vec::new();
        let mut events = Vec::new();

        for processed in messages.iter().filter(|p| p.category.is_meeting()) {
            let key = title_key(processed.subject());
            for raw in &processed.extracted.times {
                let Some(clock) = ClockTime::parse_12h(raw) else {
                    continue;
                };
                let minutes = clock.minutes();
                if seen.iter().any(|(m, k)| *m == minutes && *k == key) {
                    continue;
                }
                seen.push((minutes, key.clone()));
                events.push(MeetingEvent {
                    minutes,
                    title: truncate_chars(processed.subject(), TITLE_CHARS).to_string(),
                    message_id: processed.id().to_string(),
                    raw_time: raw.clone(),
                });
            }
        }

        events.sort_by_key(|e| e.minutes);
        events
    }

    /// Clashes in time order. Expects `events` from [`MeetingTimeline::events`].
    pub fn conflicts(&self, events: &[MeetingEvent]) -> Vec<MeetingConflict> {
        let mut buckets: Vec<MeetingConflict> = Vec::new();
        for event in events {
            match buckets.iter_mut().find(|b| b.minutes == event.minutes) {
                Some(bucket) => bucket.titles.push(event.title.clone()),
                None => buckets.push(MeetingConflict {
                    minutes: event.minutes,
                    titles: vec![event.title.clone()],
                }),
            }
        }
        buckets.retain(|b| b.titles.len() > 1);
        buckets.sort_by_key(|b| b.minutes);
        buckets
    }
}

/// `"HH:MM AM|PM"` for minutes since midnight.
pub fn format_time(minutes: u16) -> String {
    ClockTime::from_minutes(minutes % (24 * 60))
        .map(|t| t.padded_12h())
        .unwrap_or_default()
}

fn title_key(subject: &str) -> String {
    subject
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(TITLE_KEY_CHARS)
        .collect()
}
