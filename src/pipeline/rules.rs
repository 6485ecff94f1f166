//! Classification rule tables.
//!
//! Keyword lists, sender/subject heuristics and the OTP short-circuit policy
//! are plain data so they can be tested and swapped without touching the
//! classifier's scoring loop.

use crate::pipeline::types::Category;

/// Points for a category keyword found in the subject.
pub const SUBJECT_WEIGHT: i32 = 5;
/// Points for a category keyword found in the sender address.
pub const SENDER_WEIGHT: i32 = 3;
/// Points for a category keyword found in the body.
pub const BODY_WEIGHT: i32 = 2;

/// Which message field a heuristic inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    Sender,
    Subject,
    Body,
}

/// Lowercased view of the fields a rule can match against.
#[derive(Debug, Clone)]
pub struct RuleInput {
    pub sender: String,
    pub subject: String,
    pub body: String,
}

impl RuleInput {
    pub fn field(&self, field: RuleField) -> &str {
        match field {
            RuleField::Sender => &self.sender,
            RuleField::Subject => &self.subject,
            RuleField::Body => &self.body,
        }
    }

    /// Subject and body joined, as the OTP policy sees them.
    pub fn text(&self) -> String {
        format!("{} {}", self.subject, self.body)
    }
}

/// A condition: the field contains any of the needles.
#[derive(Debug, Clone)]
pub struct Condition {
    pub field: RuleField,
    pub any_of: Vec<String>,
}

impl Condition {
    pub fn new(field: RuleField, any_of: &[&str]) -> Self {
        Self {
            field,
            any_of: any_of.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, input: &RuleInput) -> bool {
        let value = input.field(self.field);
        self.any_of.iter().any(|needle| value.contains(needle.as_str()))
    }
}

/// Adds (or subtracts) points for a category when all conditions hold.
#[derive(Debug, Clone)]
pub struct HeuristicRule {
    pub when: Vec<Condition>,
    pub category: Category,
    pub points: i32,
    /// Short name for debug logging.
    pub name: &'static str,
}

impl HeuristicRule {
    pub fn matches(&self, input: &RuleInput) -> bool {
        self.when.iter().all(|c| c.matches(input))
    }
}

/// Policy for the OTP short-circuit that runs before weighted scoring.
#[derive(Debug, Clone)]
pub struct OtpPolicy {
    /// Phrases that mark a message as carrying a one-time code.
    pub strong_phrases: Vec<String>,
    /// Label-style markers directly preceding a code.
    pub code_markers: Vec<String>,
    /// Words that identify digests and reports quoting codes; these fall
    /// through to weighted scoring.
    pub exclusions: Vec<String>,
    /// Automated sender markers for the weak (sender + bare code) signal.
    pub automated_senders: Vec<String>,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            strong_phrases: owned(&[
                "verification code",
                "otp",
                "one-time password",
                "one time password",
                "security code",
                "authentication code",
                "login code",
                "access code",
                "verify your",
                "confirm your account",
                "verification pin",
            ]),
            code_markers: owned(&[
                "your code is",
                "code:",
                "otp:",
                "pin:",
                "verification:",
            ]),
            exclusions: owned(&[
                "summary",
                "daily",
                "weekly",
                "report",
                "digest",
                "newsletter",
                "update",
            ]),
            automated_senders: owned(&["noreply", "no-reply"]),
        }
    }
}

impl OtpPolicy {
    pub fn is_excluded(&self, text: &str) -> bool {
        self.exclusions.iter().any(|kw| text.contains(kw.as_str()))
    }

    pub fn has_strong_signal(&self, text: &str) -> bool {
        self.strong_phrases
            .iter()
            .chain(self.code_markers.iter())
            .any(|kw| text.contains(kw.as_str()))
    }

    pub fn is_automated_sender(&self, sender: &str) -> bool {
        self.automated_senders
            .iter()
            .any(|s| sender.contains(s.as_str()))
    }
}

/// Complete rule set consumed by the classifier.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Keyword lists per category.
    pub keywords: Vec<(Category, Vec<String>)>,
    /// Sender-domain heuristics and subject-level overrides, applied in order.
    pub heuristics: Vec<HeuristicRule>,
    pub otp: OtpPolicy,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::default_rules()
    }
}

impl RuleSet {
    /// The built-in rule tables.
    pub fn default_rules() -> Self {
        let keywords = vec![
            (
                Category::Bills,
                owned(&[
                    "invoice",
                    "payment due",
                    "amount due",
                    "due date",
                    "receipt",
                    "subscription charge",
                    "transaction receipt",
                    "billing statement",
                    "pay your bill",
                ]),
            ),
            (
                Category::StudentMeetings,
                owned(&[
                    "class",
                    "lecture",
                    "assignment",
                    "exam",
                    "course",
                    "professor",
                    "university",
                    "college",
                    "semester",
                    "program",
                    "degree",
                    "learning",
                    "education",
                    "training program",
                ]),
            ),
            (
                Category::JobMeetings,
                owned(&[
                    "interview",
                    "job interview",
                    "recruiter",
                    "hiring manager",
                    "career opportunity",
                ]),
            ),
            (
                Category::InternshipMeetings,
                owned(&[
                    "internship",
                    "intern interview",
                    "intern opportunity",
                    "associate consultant intern",
                ]),
            ),
            (
                Category::Meetings,
                owned(&[
                    "meeting",
                    "google meet",
                    "zoom",
                    "teams meeting",
                    "join",
                    "conference call",
                    "discussion",
                    "call scheduled",
                ]),
            ),
            (
                Category::Promotions,
                owned(&[
                    "offer",
                    "discount",
                    "sale",
                    "deal",
                    "promo",
                    "coupon",
                    "limited time",
                    "save",
                    "free shipping",
                ]),
            ),
            (
                Category::Jobs,
                owned(&[
                    "job alert",
                    "hiring for the role",
                    "apply now",
                    "position available",
                    "vacancy",
                    "employment opportunity",
                    "is hiring",
                    "we are hiring",
                    "job opening",
                ]),
            ),
        ];

        use RuleField::{Body, Sender, Subject};
        let rule = |name, when: Vec<Condition>, category, points| HeuristicRule {
            when,
            category,
            points,
            name,
        };

        let heuristics = vec![
            // Sender-domain heuristics
            rule(
                "billing sender",
                vec![Condition::new(Sender, &["billing", "invoice", "payment"])],
                Category::Bills,
                8,
            ),
            rule(
                "noreply promotional",
                vec![
                    Condition::new(Sender, &["noreply", "no-reply"]),
                    Condition::new(Body, &["unsubscribe", "promotional"]),
                ],
                Category::Promotions,
                10,
            ),
            rule(
                "marketing sender",
                vec![Condition::new(Sender, &["marketing", "promo", "newsletter"])],
                Category::Promotions,
                8,
            ),
            rule(
                "academic sender",
                vec![Condition::new(Sender, &[".edu", "university", "college"])],
                Category::StudentMeetings,
                8,
            ),
            rule(
                "recruiting sender",
                vec![Condition::new(Sender, &["recruit", "careers", "jobs"])],
                Category::Jobs,
                8,
            ),
            rule(
                "retail sender",
                vec![Condition::new(Sender, &["deals", "offers", "shop"])],
                Category::Promotions,
                10,
            ),
            // Subject-level overrides
            rule(
                "intern subject",
                vec![Condition::new(Subject, &["intern"])],
                Category::InternshipMeetings,
                10,
            ),
            rule(
                "intern subject suppresses jobs",
                vec![Condition::new(Subject, &["intern"])],
                Category::Jobs,
                -10,
            ),
            rule(
                "interview subject",
                vec![Condition::new(Subject, &["interview"])],
                Category::JobMeetings,
                10,
            ),
            rule(
                "billing subject",
                vec![Condition::new(Subject, &["invoice", "receipt", "payment"])],
                Category::Bills,
                8,
            ),
            rule(
                "meeting subject",
                vec![Condition::new(Subject, &["meet", "zoom", "teams"])],
                Category::Meetings,
                8,
            ),
            rule(
                "sale subject",
                vec![Condition::new(Subject, &["discount", "sale", "%off", "% off", "deal"])],
                Category::Promotions,
                8,
            ),
            rule(
                "unsubscribe footer",
                vec![Condition::new(Body, &["unsubscribe", "opt-out", "manage preferences"])],
                Category::Promotions,
                6,
            ),
            rule(
                "shared subject",
                vec![Condition::new(Subject, &["shared", "invited you"])],
                Category::Attachments,
                10,
            ),
            rule(
                "shared subject suppresses promotions",
                vec![Condition::new(Subject, &["shared", "invited you"])],
                Category::Promotions,
                -10,
            ),
        ];

        Self {
            keywords,
            heuristics,
            otp: OtpPolicy::default(),
        }
    }

    /// Rule set with no keywords or heuristics (for testing).
    pub fn empty() -> Self {
        Self {
            keywords: Vec::new(),
            heuristics: Vec::new(),
            otp: OtpPolicy::default(),
        }
    }

    /// Add a custom heuristic, applied after the built-in ones.
    pub fn add_heuristic(&mut self, rule: HeuristicRule) {
        self.heuristics.push(rule);
    }

    /// Add keywords for a category.
    pub fn add_keywords(&mut self, category: Category, words: &[&str]) {
        match self.keywords.iter_mut().find(|(c, _)| *c == category) {
            Some((_, list)) => list.extend(owned(words)),
            None => self.keywords.push((category, owned(words))),
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(sender: &str, subject: &str, body: &str) -> RuleInput {
        RuleInput {
            sender: sender.to_lowercase(),
            subject: subject.to_lowercase(),
            body: body.to_lowercase(),
        }
    }

    #[test]
    fn condition_matches_any_needle() {
        let cond = Condition::new(RuleField::Sender, &["billing", "invoice"]);
        assert!(cond.matches(&input("invoices@power.com", "", "")));
        assert!(!cond.matches(&input("alice@power.com", "invoice", "")));
    }

    #[test]
    fn compound_rule_requires_all_conditions() {
        let rules = RuleSet::default_rules();
        let rule = rules
            .heuristics
            .iter()
            .find(|r| r.name == "noreply promotional")
            .unwrap();
        assert!(rule.matches(&input("noreply@store.com", "", "click to unsubscribe")));
        assert!(!rule.matches(&input("noreply@store.com", "", "your order shipped")));
        assert!(!rule.matches(&input("alice@store.com", "", "unsubscribe")));
    }

    #[test]
    fn otp_policy_exclusions() {
        let policy = OtpPolicy::default();
        assert!(policy.is_excluded("weekly digest with your otp"));
        assert!(!policy.is_excluded("your otp is 1234"));
        assert!(policy.has_strong_signal("your otp is 1234"));
        assert!(policy.has_strong_signal("pin: 9921"));
    }

    #[test]
    fn every_scored_category_has_keywords() {
        let rules = RuleSet::default_rules();
        for category in Category::TIE_BREAK_ORDER {
            if category == Category::Attachments {
                continue;
            }
            assert!(
                rules.keywords.iter().any(|(c, words)| *c == category && !words.is_empty()),
                "no keywords for {category}"
            );
        }
    }

    #[test]
    fn add_keywords_extends_existing_list() {
        let mut rules = RuleSet::empty();
        rules.add_keywords(Category::Bills, &["Rent"]);
        rules.add_keywords(Category::Bills, &["utility"]);
        assert_eq!(rules.keywords.len(), 1);
        assert_eq!(rules.keywords[0].1, vec!["rent", "utility"]);
    }
}
