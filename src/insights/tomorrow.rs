//! Preview of what tomorrow holds.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

use crate::pipeline::types::{Category, ProcessedMessage, truncate_chars};

const TITLE_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Meeting,
    Bill,
    Job,
    Task,
}

impl EventKind {
    fn for_due_date(category: Category) -> Self {
        match category {
            Category::Bills => EventKind::Bill,
            Category::Jobs => EventKind::Job,
            _ => EventKind::Task,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TomorrowEvent {
    pub kind: EventKind,
    pub title: String,
    /// First extracted time, meetings only.
    pub time: Option<String>,
    pub message_id: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TomorrowPredictor;

impl TomorrowPredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn predict(&self, messages: &[ProcessedMessage]) -> Vec<TomorrowEvent> {
        self.predict_at(messages, Local::now().date_naive())
    }

    /// Meetings plus anything due the day after `today`. Timed events come
    /// first; otherwise input order is kept.
    pub fn predict_at(&self, messages: &[ProcessedMessage], today: NaiveDate) -> Vec<TomorrowEvent> {
        let tomorrow = today + Duration::days(1);
        let mut events = Vec::new();

        for processed in messages {
            let title = truncate_chars(processed.subject(), TITLE_CHARS).to_string();
            if processed.category == Category::Meetings {
                events.push(TomorrowEvent {
                    kind: EventKind::Meeting,
                    title,
                    time: processed.extracted.times.first().cloned(),
                    message_id: processed.id().to_string(),
                });
                continue;
            }
            for _ in processed.extracted.due_dates.iter().filter(|d| **d == tomorrow) {
                events.push(TomorrowEvent {
                    kind: EventKind::for_due_date(processed.category),
                    title: title.clone(),
                    time: None,
                    message_id: processed.id().to_string(),
                });
            }
        }

        events.sort_by_key(|e| e.time.is_none());
        events
    }
}
