//! Reminders: extraction from free text and the scheduling collaborator.

pub mod extractor;
pub mod scheduler;

pub use extractor::{Reminder, ReminderExtractor, Urgency, sort_reminders};
pub use scheduler::{MemoryReminderScheduler, ReminderRequest, ReminderScheduler, ScheduledReminder};
