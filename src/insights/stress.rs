//! Workload ("stress") indicator for the current day.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::config::DEFAULT_IMPORTANCE_THRESHOLD;
use crate::pipeline::types::{Category, ProcessedMessage};

const URGENT_WEIGHT: u32 = 10;
const MEETING_WEIGHT: u32 = 8;
const DEADLINE_WEIGHT: u32 = 15;
const BILL_WEIGHT: u32 = 3;
const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StressLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl StressLevel {
    /// Level for a clamped score: 20 / 45 / 70 boundaries.
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => StressLevel::Critical,
            45.. => StressLevel::High,
            20.. => StressLevel::Medium,
            _ => StressLevel::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StressLevel::Low => "LOW",
            StressLevel::Medium => "MEDIUM",
            StressLevel::High => "HIGH",
            StressLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StressAnalysis {
    pub level: StressLevel,
    pub score: u8,
    pub urgent_tasks: u32,
    pub meetings_today: u32,
    pub deadlines_today: u32,
    pub financial_mails: u32,
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
pub struct StressIndicator {
    urgent_threshold: u8,
}

impl Default for StressIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_IMPORTANCE_THRESHOLD)
    }
}

impl StressIndicator {
    pub fn new(urgent_threshold: u8) -> Self {
        Self { urgent_threshold }
    }

    pub fn analyze(&self, messages: &[ProcessedMessage]) -> StressAnalysis {
        self.analyze_at(messages, Local::now().date_naive())
    }

    pub fn analyze_at(&self, messages: &[ProcessedMessage], today: NaiveDate) -> StressAnalysis {
        let mut urgent_tasks = 0;
        let mut meetings_today = 0;
        let mut deadlines_today = 0;
        let mut financial_mails = 0;

        for processed in messages {
            let extracted = &processed.extracted;
            if processed.score >= self.urgent_threshold {
                urgent_tasks += 1;
            }
            // A timed meeting counts unless its dates all point elsewhere.
            if processed.category.is_meeting()
                && !extracted.times.is_empty()
                && (extracted.due_dates.is_empty() || extracted.due_dates.contains(&today))
            {
                meetings_today += 1;
            }
            deadlines_today += extracted.due_dates.iter().filter(|d| **d == today).count() as u32;
            if processed.category == Category::Bills {
                financial_mails += 1;
            }
        }

        let raw = urgent_tasks * URGENT_WEIGHT
            + meetings_today * MEETING_WEIGHT
            + deadlines_today * DEADLINE_WEIGHT
            + financial_mails * BILL_WEIGHT;
        let score = raw.min(MAX_SCORE) as u8;
        let level = StressLevel::from_score(score);

        let message = match level {
            StressLevel::Critical => format!(
                "You have {urgent_tasks} urgent tasks, {meetings_today} meetings, and {deadlines_today} deadlines today."
            ),
            StressLevel::High => {
                format!("You have {urgent_tasks} urgent tasks and {meetings_today} meetings today.")
            }
            StressLevel::Medium => format!("Moderate workload with {urgent_tasks} important items."),
            StressLevel::Low => "Your inbox is under control today.".to_string(),
        };

        StressAnalysis {
            level,
            score,
            urgent_tasks,
            meetings_today,
            deadlines_today,
            financial_mails,
            message,
        }
    }
}
