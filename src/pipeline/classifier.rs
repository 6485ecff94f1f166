//! Weighted keyword classifier.
//!
//! 1. OTP short-circuit (strong phrase, no digest/report exclusion) → `Otp`
//! 2. Category keywords scored by where they appear (subject > sender > body)
//! 3. Sender-domain heuristics and subject overrides from the rule table
//! 4. Highest score wins, ties broken by `Category::TIE_BREAK_ORDER`
//! 5. No positive score → `Attachments` if anything is attached, else `Other`

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::pipeline::rules::{BODY_WEIGHT, RuleInput, RuleSet, SENDER_WEIGHT, SUBJECT_WEIGHT};
use crate::pipeline::types::{Category, Message, truncate_chars};

/// Only the start of the body is considered; signatures and footers
/// otherwise dominate the keyword counts.
const BODY_SCAN_CHARS: usize = 500;

static BARE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[0-9]{6}\b").unwrap());

/// Deterministic, total message classifier.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: RuleSet,
}

impl Classifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Assign exactly one category.
    pub fn classify(&self, message: &Message) -> Category {
        let input = RuleInput {
            sender: message.sender.to_lowercase(),
            subject: message.subject.to_lowercase(),
            body: truncate_chars(message.body_text(), BODY_SCAN_CHARS).to_lowercase(),
        };

        if self.is_otp(&input) {
            trace!(id = %message.id, "OTP short-circuit");
            return Category::Otp;
        }

        let scores = self.score(&input);
        let (best, best_score) = Category::TIE_BREAK_ORDER
            .iter()
            .zip(scores)
            .fold((Category::Other, 0), |(best, best_score), (&category, score)| {
                if score > best_score {
                    (category, score)
                } else {
                    (best, best_score)
                }
            });

        if best_score > 0 {
            trace!(id = %message.id, category = best.label(), score = best_score, "Classified by score");
            best
        } else if message.has_attachments() {
            Category::Attachments
        } else {
            Category::Other
        }
    }

    /// Accumulated scores, indexed like `Category::TIE_BREAK_ORDER`.
    pub fn scores(&self, message: &Message) -> [i32; 8] {
        let input = RuleInput {
            sender: message.sender.to_lowercase(),
            subject: message.subject.to_lowercase(),
            body: truncate_chars(message.body_text(), BODY_SCAN_CHARS).to_lowercase(),
        };
        self.score(&input)
    }

    fn score(&self, input: &RuleInput) -> [i32; 8] {
        let mut scores = [0i32; 8];

        for (category, keywords) in &self.rules.keywords {
            let Some(slot) = slot_of(*category) else {
                continue;
            };
            for kw in keywords {
                let kw = kw.as_str();
                if input.subject.contains(kw) {
                    scores[slot] += SUBJECT_WEIGHT;
                }
                if input.body.contains(kw) {
                    scores[slot] += BODY_WEIGHT;
                }
                if input.sender.contains(kw) {
                    scores[slot] += SENDER_WEIGHT;
                }
            }
        }

        for rule in &self.rules.heuristics {
            if let Some(slot) = slot_of(rule.category)
                && rule.matches(input)
            {
                trace!(rule = rule.name, points = rule.points, "Heuristic matched");
                scores[slot] += rule.points;
            }
        }

        scores
    }

    fn is_otp(&self, input: &RuleInput) -> bool {
        let policy = &self.rules.otp;
        let text = input.text();

        if policy.is_excluded(&text) {
            return false;
        }
        if policy.has_strong_signal(&text) {
            return true;
        }
        policy.is_automated_sender(&input.sender)
            && (text.contains("code") || text.contains("verify"))
            && BARE_CODE_RE.is_match(&text)
    }
}

fn slot_of(category: Category) -> Option<usize> {
    Category::TIE_BREAK_ORDER.iter().position(|c| *c == category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::rules::{Condition, HeuristicRule, RuleField};
    use crate::pipeline::types::Attachment;

    fn msg(sender: &str, subject: &str, body: &str) -> Message {
        Message::new("t-1", sender, subject, body)
    }

    fn classify(sender: &str, subject: &str, body: &str) -> Category {
        Classifier::default().classify(&msg(sender, subject, body))
    }

    #[test]
    fn invoice_subject_is_bill() {
        assert_eq!(
            classify("alice@example.com", "Your invoice for December", ""),
            Category::Bills
        );
    }

    #[test]
    fn meeting_link_is_meeting() {
        assert_eq!(
            classify("bob@example.com", "", "Join meeting at https://meet.google.com/abc"),
            Category::Meetings
        );
    }

    #[test]
    fn hiring_body_is_job() {
        assert_eq!(
            classify("team@startup.io", "Backend role", "Acme is hiring. Apply now!"),
            Category::Jobs
        );
    }

    #[test]
    fn otp_short_circuits_other_signals() {
        assert_eq!(
            classify("billing@bank.com", "Invoice payment", "Your code is 987654"),
            Category::Otp
        );
    }

    #[test]
    fn digest_with_otp_falls_through() {
        let category = classify(
            "news@service.com",
            "Weekly digest",
            "Your OTP usage and a sale on upgrades",
        );
        assert_ne!(category, Category::Otp);
    }

    #[test]
    fn noreply_sender_with_bare_code_is_otp() {
        assert_eq!(
            classify("no-reply@accounts.io", "Sign in", "Enter code 554433 to verify"),
            Category::Otp
        );
    }

    #[test]
    fn intern_subject_beats_jobs() {
        assert_eq!(
            classify("careers@bigco.com", "Summer intern opportunity", "Apply now, position available"),
            Category::InternshipMeetings
        );
    }

    #[test]
    fn interview_subject_is_job_meeting() {
        assert_eq!(
            classify("hr@bigco.com", "Interview schedule", "Your interview with the hiring manager"),
            Category::JobMeetings
        );
    }

    #[test]
    fn internship_interview_tie_goes_to_internship() {
        assert_eq!(
            classify("hr@bigco.com", "Internship interview", ""),
            Category::InternshipMeetings
        );
    }

    #[test]
    fn shared_subject_beats_promotion_words() {
        assert_eq!(
            classify("drive@cloud.com", "Alice shared a doc: Sale plan", ""),
            Category::Attachments
        );
    }

    #[test]
    fn retail_sender_is_promotion() {
        assert_eq!(
            classify("deals@store.com", "Weekend", "Everything must go"),
            Category::Promotions
        );
    }

    #[test]
    fn no_signal_with_attachment_is_attachments() {
        let message = msg("friend@mail.com", "Photos", "see attached")
            .with_attachment(Attachment::new("a.jpg", "image/jpeg", 1200));
        assert_eq!(Classifier::default().classify(&message), Category::Attachments);
    }

    #[test]
    fn no_signal_is_other() {
        assert_eq!(
            classify("friend@mail.com", "Hello friend", "Just checking in"),
            Category::Other
        );
    }

    #[test]
    fn empty_message_is_other() {
        assert_eq!(classify("", "", ""), Category::Other);
    }

    #[test]
    fn ties_follow_priority_order() {
        let mut rules = RuleSet::empty();
        rules.add_keywords(Category::Promotions, &["zzz"]);
        rules.add_keywords(Category::Bills, &["zzz"]);
        let classifier = Classifier::new(rules);
        assert_eq!(classifier.classify(&msg("a@b.c", "zzz", "")), Category::Bills);
    }

    #[test]
    fn negative_scores_fall_back() {
        let mut rules = RuleSet::empty();
        rules.add_heuristic(HeuristicRule {
            when: vec![Condition::new(RuleField::Subject, &["hello"])],
            category: Category::Jobs,
            points: -4,
            name: "penalty",
        });
        let classifier = Classifier::new(rules);
        assert_eq!(classifier.classify(&msg("a@b.c", "hello", "")), Category::Other);
    }

    #[test]
    fn scores_are_exposed_in_priority_order() {
        let classifier = Classifier::default();
        let scores = classifier.scores(&msg("a@b.c", "invoice", ""));
        // keyword (5) + billing subject heuristic (8)
        assert_eq!(scores[0], 13);
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = Classifier::default();
        let message = msg("recruit@x.com", "Zoom interview", "meeting link inside");
        let first = classifier.classify(&message);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&message), first);
        }
    }
}
