//! Action items pulled from message text.
//!
//! Patterns run in table order against subject + body; every match adds a
//! task whose text is the first capture group. Messages with due dates in
//! Bills, Jobs or a meeting category also become a task titled by subject.
//! Tasks are deduplicated by the first 30 lowercased characters.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::pipeline::types::{Category, ProcessedMessage, truncate_chars};

const TASK_PATTERNS: &[&str] = &[
    r"please submit (?:.*?)(?:before|by) (.*?)(?:\.|$)",
    r"action required[:\s]+(.*?)(?:\.|$)",
    r"respond by (.*?)(?:\.|$)",
    r"complete (?:this )?task[:\s]+(.*?)(?:\.|$)",
    r"upload (?:your )?document[:\s]+(.*?)(?:\.|$)",
    r"(?:your )?assignment is due (.*?)(?:\.|$)",
    r"deadline[:\s]+(.*?)(?:\.|$)",
    r"due date[:\s]+(.*?)(?:\.|$)",
    r"submit (?:.*?)(?:before|by) (.*?)(?:\.|$)",
    r"apply (?:before|by) (.*?)(?:\.|$)",
    r"registration closes (?:on )?(.*?)(?:\.|$)",
    r"last date[:\s]+(.*?)(?:\.|$)",
    r"(?:must|should) (?:be )?(?:completed|submitted|done) (?:before|by) (.*?)(?:\.|$)",
    r"(?:payment|bill) due[:\s]+(.*?)(?:\.|$)",
];

static COMPILED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    TASK_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?im){p}")).unwrap())
        .collect()
});

static DATE_IN_TASK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{4}").unwrap());
static TODAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\btoday\b").unwrap());
static TOMORROW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\btomorrow\b").unwrap());

const MIN_TASK_CHARS: usize = 5;
const MAX_TASK_CHARS: usize = 100;
const SUBJECT_TASK_CHARS: usize = 60;
const SUBJECT_CHARS: usize = 30;
const DEDUPE_KEY_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedTask {
    pub task: String,
    /// `DD/MM/YYYY`, `"today"` or `"tomorrow"` when known.
    pub deadline: Option<String>,
    pub message_id: String,
    pub subject: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskExtractor;

impl TaskExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, messages: &[ProcessedMessage]) -> Vec<ExtractedTask> {
        let mut tasks = Vec::new();
        for processed in messages {
            self.extract_from(processed, &mut tasks);
        }
        dedupe(tasks)
    }

    fn extract_from(&self, processed: &ProcessedMessage, tasks: &mut Vec<ExtractedTask>) {
        let text = processed.message.subject_and_body();
        let first_due = processed
            .extracted
            .due_dates
            .first()
            .map(|d| d.format("%d/%m/%Y").to_string());
        let subject = truncate_chars(processed.subject(), SUBJECT_CHARS).to_string();

        for re in COMPILED.iter() {
            for caps in re.captures_iter(&text) {
                let Some(found) = caps.get(1) else { continue };
                let task = found.as_str().trim();
                let len = task.chars().count();
                if len <= MIN_TASK_CHARS || len >= MAX_TASK_CHARS {
                    continue;
                }
                tasks.push(ExtractedTask {
                    task: task.to_string(),
                    deadline: deadline_in(task).or_else(|| first_due.clone()),
                    message_id: processed.id().to_string(),
                    subject: subject.clone(),
                });
            }
        }

        let dated_category = matches!(processed.category, Category::Bills | Category::Jobs)
            || processed.category.is_meeting();
        if dated_category && let Some(deadline) = first_due {
            tasks.push(ExtractedTask {
                task: truncate_chars(processed.subject(), SUBJECT_TASK_CHARS).to_string(),
                deadline: Some(deadline),
                message_id: processed.id().to_string(),
                subject,
            });
        }
    }
}

fn deadline_in(task: &str) -> Option<String> {
    if let Some(m) = DATE_IN_TASK.find(task) {
        return Some(m.as_str().to_string());
    }
    if TODAY_RE.is_match(task) {
        return Some("today".to_string());
    }
    TOMORROW_RE.is_match(task).then(|| "tomorrow".to_string())
}

fn dedupe(tasks: Vec<ExtractedTask>) -> Vec<ExtractedTask> {
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter(|t| {
            let lower = t.task.to_lowercase();
            seen.insert(truncate_chars(&lower, DEDUPE_KEY_CHARS).to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{ExtractedData, Message};
    use chrono::NaiveDate;

    fn pm(id: &str, category: Category, subject: &str, body: &str, due: Option<NaiveDate>) -> ProcessedMessage {
        ProcessedMessage {
            message: Message::new(id, "a@b.com", subject, body),
            extracted: ExtractedData {
                due_dates: due.into_iter().collect(),
                ..Default::default()
            },
            category,
            score: 1,
        }
    }

    #[test]
    fn respond_by_pattern() {
        let messages = vec![pm("1", Category::Other, "Survey", "Please respond by Friday evening.", None)];
        let tasks = TaskExtractor::new().extract(&messages);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "Friday evening");
        assert_eq!(tasks[0].deadline, None);
    }

    #[test]
    fn deadline_from_task_text() {
        let messages = vec![
            pm("1", Category::Other, "Form", "Deadline: 20/12/2025 for the forms.", None),
            pm("2", Category::Other, "Essay", "Your assignment is due tomorrow morning.", None),
        ];
        let tasks = TaskExtractor::new().extract(&messages);
        let deadlines: Vec<Option<&str>> = tasks.iter().map(|t| t.deadline.as_deref()).collect();
        assert!(deadlines.contains(&Some("20/12/2025")));
        assert!(deadlines.contains(&Some("tomorrow")));
    }

    #[test]
    fn short_captures_are_dropped() {
        let messages = vec![pm("1", Category::Other, "x", "Respond by noon.", None)];
        assert!(TaskExtractor::new().extract(&messages).is_empty());
    }

    #[test]
    fn dated_bill_becomes_subject_task() {
        let due = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        let messages = vec![pm("1", Category::Bills, "Water bill for December", "Thanks", Some(due))];
        let tasks = TaskExtractor::new().extract(&messages);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "Water bill for December");
        assert_eq!(tasks[0].deadline.as_deref(), Some("20/12/2025"));
    }

    #[test]
    fn dated_promotion_is_not_a_task() {
        let due = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        let messages = vec![pm("1", Category::Promotions, "Sale ends", "Hurry", Some(due))];
        assert!(TaskExtractor::new().extract(&messages).is_empty());
    }

    #[test]
    fn overlapping_patterns_deduplicate() {
        // "please submit ... by" and "submit ... by" both match.
        let messages = vec![pm("1", Category::Other, "Docs", "Please submit the form by Monday noon.", None)];
        let tasks = TaskExtractor::new().extract(&messages);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "Monday noon");
    }
}
