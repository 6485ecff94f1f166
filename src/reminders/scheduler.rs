//! Reminder scheduling collaborator.
//!
//! The planner hands reminder data to a scheduler; delivery belongs to
//! whatever drains `pending_at`. Nothing here sends mail.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SchedulerError;

/// What the caller wants delivered, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub recipient: String,
    pub subject: String,
    /// Where the reminder came from, e.g. the sender of the original message.
    pub source: String,
    pub body: String,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub source: String,
    pub body: String,
    pub scheduled_at: DateTime<Utc>,
    pub sent: bool,
}

#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    /// Accept a reminder for later delivery.
    async fn schedule(&self, request: ReminderRequest) -> Result<ScheduledReminder, SchedulerError>;

    /// Unsent reminders whose time has come.
    async fn pending_at(&self, now: DateTime<Utc>) -> Vec<ScheduledReminder>;

    async fn mark_sent(&self, id: Uuid) -> Result<(), SchedulerError>;

    async fn cancel(&self, id: Uuid) -> Result<(), SchedulerError>;

    async fn list(&self) -> Vec<ScheduledReminder>;
}

/// In-process scheduler holding reminders in memory.
#[derive(Debug, Default)]
pub struct MemoryReminderScheduler {
    reminders: RwLock<Vec<ScheduledReminder>>,
}

impl MemoryReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReminderScheduler for MemoryReminderScheduler {
    async fn schedule(&self, request: ReminderRequest) -> Result<ScheduledReminder, SchedulerError> {
        if !is_plausible_address(&request.recipient) {
            return Err(SchedulerError::InvalidRecipient(request.recipient));
        }
        let reminder = ScheduledReminder {
            id: Uuid::new_v4(),
            recipient: request.recipient,
            subject: request.subject,
            source: request.source,
            body: request.body,
            scheduled_at: request.scheduled_at,
            sent: false,
        };
        info!(id = %reminder.id, at = %reminder.scheduled_at, "Reminder scheduled");
        self.reminders.write().await.push(reminder.clone());
        Ok(reminder)
    }

    async fn pending_at(&self, now: DateTime<Utc>) -> Vec<ScheduledReminder> {
        self.reminders
            .read()
            .await
            .iter()
            .filter(|r| !r.sent && r.scheduled_at <= now)
            .cloned()
            .collect()
    }

    async fn mark_sent(&self, id: Uuid) -> Result<(), SchedulerError> {
        let mut reminders = self.reminders.write().await;
        let reminder = reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(SchedulerError::NotFound { id })?;
        reminder.sent = true;
        debug!(%id, "Reminder marked sent");
        Ok(())
    }

    async fn cancel(&self, id: Uuid) -> Result<(), SchedulerError> {
        let mut reminders = self.reminders.write().await;
        let before = reminders.len();
        reminders.retain(|r| r.id != id);
        if reminders.len() == before {
            return Err(SchedulerError::NotFound { id });
        }
        debug!(%id, "Reminder cancelled");
        Ok(())
    }

    async fn list(&self) -> Vec<ScheduledReminder> {
        self.reminders.read().await.clone()
    }
}

fn is_plausible_address(address: &str) -> bool {
    let address = address.trim();
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !address.contains(char::is_whitespace)
        }
        None => false,
    }
}
