//! Deadline countdown over extracted due dates.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::pipeline::types::{ProcessedMessage, truncate_chars};

const TITLE_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineStatus {
    Overdue,
    Today,
    Tomorrow,
    Upcoming,
}

impl DeadlineStatus {
    pub fn from_days(days_remaining: i64) -> Self {
        match days_remaining {
            d if d < 0 => DeadlineStatus::Overdue,
            0 => DeadlineStatus::Today,
            1 => DeadlineStatus::Tomorrow,
            _ => DeadlineStatus::Upcoming,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineItem {
    pub title: String,
    pub due_date: NaiveDate,
    /// Whole days from today; negative when overdue.
    pub days_remaining: i64,
    pub status: DeadlineStatus,
    pub message_id: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeadlineCountdown;

impl DeadlineCountdown {
    pub fn new() -> Self {
        Self
    }

    pub fn deadlines(&self, messages: &[ProcessedMessage]) -> Vec<DeadlineItem> {
        self.deadlines_at(messages, Local::now().date_naive())
    }

    /// One item per extracted due date, earliest first.
    pub fn deadlines_at(&self, messages: &[ProcessedMessage], today: NaiveDate) -> Vec<DeadlineItem> {
        let mut items: Vec<DeadlineItem> = messages
            .iter()
            .flat_map(|processed| {
                processed.extracted.due_dates.iter().map(move |due| {
                    let days_remaining = (*due - today).num_days();
                    DeadlineItem {
                        title: truncate_chars(processed.subject(), TITLE_CHARS).to_string(),
                        due_date: *due,
                        days_remaining,
                        status: DeadlineStatus::from_days(days_remaining),
                        message_id: processed.id().to_string(),
                    }
                })
            })
            .collect();
        items.sort_by_key(|item| item.due_date);
        items
    }
}

/// Human countdown, e.g. "Due in 3 days" or "Overdue by 1 day".
pub fn format_countdown(item: &DeadlineItem) -> String {
    match item.status {
        DeadlineStatus::Overdue => {
            let days = item.days_remaining.unsigned_abs();
            let plural = if days == 1 { "" } else { "s" };
            format!("Overdue by {days} day{plural}")
        }
        DeadlineStatus::Today => "Due today".to_string(),
        DeadlineStatus::Tomorrow => "Due in 1 day".to_string(),
        DeadlineStatus::Upcoming => format!("Due in {} days", item.days_remaining),
    }
}
