//! Daily summary: processed messages bucketed by category, plus an
//! "important" bucket for anything at or above the score threshold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DEFAULT_IMPORTANCE_THRESHOLD;
use crate::pipeline::types::{Category, ProcessedMessage};

/// Snapshot grouping of one fetch. Every bucket is sorted by descending
/// score; ties keep their input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    pub bills: Vec<ProcessedMessage>,
    pub student_meetings: Vec<ProcessedMessage>,
    pub job_meetings: Vec<ProcessedMessage>,
    pub internship_meetings: Vec<ProcessedMessage>,
    pub meetings: Vec<ProcessedMessage>,
    pub promotions: Vec<ProcessedMessage>,
    pub jobs: Vec<ProcessedMessage>,
    pub otp: Vec<ProcessedMessage>,
    pub attachments: Vec<ProcessedMessage>,
    /// Messages at or above the importance threshold, any category.
    pub important: Vec<ProcessedMessage>,
    pub generated_at: DateTime<Utc>,
}

impl Summary {
    /// The bucket holding `category`. `Other` has no bucket.
    pub fn bucket(&self, category: Category) -> Option<&[ProcessedMessage]> {
        let bucket = match category {
            Category::Bills => &self.bills,
            Category::StudentMeetings => &self.student_meetings,
            Category::JobMeetings => &self.job_meetings,
            Category::InternshipMeetings => &self.internship_meetings,
            Category::Meetings => &self.meetings,
            Category::Promotions => &self.promotions,
            Category::Otp => &self.otp,
            Category::Jobs => &self.jobs,
            Category::Attachments => &self.attachments,
            Category::Other => return None,
        };
        Some(bucket)
    }

    fn bucket_mut(&mut self, category: Category) -> Option<&mut Vec<ProcessedMessage>> {
        match category {
            Category::Bills => Some(&mut self.bills),
            Category::StudentMeetings => Some(&mut self.student_meetings),
            Category::JobMeetings => Some(&mut self.job_meetings),
            Category::InternshipMeetings => Some(&mut self.internship_meetings),
            Category::Meetings => Some(&mut self.meetings),
            Category::Promotions => Some(&mut self.promotions),
            Category::Otp => Some(&mut self.otp),
            Category::Jobs => Some(&mut self.jobs),
            Category::Attachments => Some(&mut self.attachments),
            Category::Other => None,
        }
    }

    /// Number of messages across the category buckets.
    pub fn categorized_count(&self) -> usize {
        Category::ALL
            .iter()
            .filter_map(|c| self.bucket(*c))
            .map(<[ProcessedMessage]>::len)
            .sum()
    }
}

/// Builds a `Summary` in a single pass.
#[derive(Debug, Clone, Copy)]
pub struct SummaryGenerator {
    threshold: u8,
}

impl Default for SummaryGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_IMPORTANCE_THRESHOLD)
    }
}

impl SummaryGenerator {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn generate(&self, messages: &[ProcessedMessage]) -> Summary {
        let mut summary = Summary {
            generated_at: Utc::now(),
            ..Default::default()
        };

        for processed in messages {
            if let Some(bucket) = summary.bucket_mut(processed.category) {
                bucket.push(processed.clone());
            }
            if processed.score >= self.threshold {
                summary.important.push(processed.clone());
            }
        }

        for category in Category::ALL {
            if let Some(bucket) = summary.bucket_mut(category) {
                sort_by_score(bucket);
            }
        }
        sort_by_score(&mut summary.important);

        debug!(
            total = messages.len(),
            categorized = summary.categorized_count(),
            important = summary.important.len(),
            "Summary generated"
        );
        summary
    }
}

fn sort_by_score(bucket: &mut [ProcessedMessage]) {
    // `sort_by` is stable, so equal scores keep arrival order.
    bucket.sort_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{ExtractedData, Message};

    fn pm(id: &str, category: Category, score: u8) -> ProcessedMessage {
        ProcessedMessage {
            message: Message::new(id, "a@b.com", id, ""),
            extracted: ExtractedData::default(),
            category,
            score,
        }
    }

    fn ids(bucket: &[ProcessedMessage]) -> Vec<&str> {
        bucket.iter().map(|p| p.id()).collect()
    }

    #[test]
    fn buckets_by_category_sorted_desc() {
        let messages = vec![
            pm("b1", Category::Bills, 5),
            pm("m1", Category::Meetings, 10),
            pm("b2", Category::Bills, 15),
            pm("o1", Category::Other, 1),
        ];
        let summary = SummaryGenerator::default().generate(&messages);
        assert_eq!(ids(&summary.bills), vec!["b2", "b1"]);
        assert_eq!(ids(&summary.meetings), vec!["m1"]);
        assert!(summary.bucket(Category::Other).is_none());
        assert_eq!(summary.categorized_count(), 3);
    }

    #[test]
    fn important_bucket_uses_threshold() {
        let messages = vec![
            pm("a", Category::Jobs, 7),
            pm("b", Category::Other, 8),
            pm("c", Category::Bills, 15),
        ];
        let summary = SummaryGenerator::default().generate(&messages);
        assert_eq!(ids(&summary.important), vec!["c", "b"]);

        let strict = SummaryGenerator::new(10).generate(&messages);
        assert_eq!(ids(&strict.important), vec!["c"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let messages = vec![
            pm("first", Category::Promotions, 2),
            pm("second", Category::Promotions, 2),
            pm("third", Category::Promotions, 2),
        ];
        let summary = SummaryGenerator::default().generate(&messages);
        assert_eq!(ids(&summary.promotions), vec!["first", "second", "third"]);
    }

    #[test]
    fn each_message_in_at_most_one_category_bucket() {
        let messages: Vec<ProcessedMessage> = Category::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| pm(&format!("m{i}"), *c, (i * 3) as u8))
            .collect();
        let summary = SummaryGenerator::default().generate(&messages);
        for message in &messages {
            let hits = Category::ALL
                .iter()
                .filter_map(|c| summary.bucket(*c))
                .filter(|b| b.iter().any(|p| p.id() == message.id()))
                .count();
            let expected = usize::from(message.category != Category::Other);
            assert_eq!(hits, expected, "{}", message.id());
        }
    }

    #[test]
    fn empty_input() {
        let summary = SummaryGenerator::default().generate(&[]);
        assert_eq!(summary.categorized_count(), 0);
        assert!(summary.important.is_empty());
    }
}
