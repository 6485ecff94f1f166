//! Importance scoring (0-100).
//!
//! Additive bands, clamped to 100:
//! - Bills: due today +15, tomorrow +10, within 3 days +5, otherwise +1
//! - Jobs / Job Meetings / Internship Meetings: deadline today +12,
//!   within 3 days +8, otherwise +2
//! - Any meeting category: time within the next 3 hours +10, some other
//!   time +6, no time +2
//! - Attachments: +3 (+6 with urgent keywords), +2 more when more than one
//! - Urgent keywords: distinct matches x3, capped at +15
//!
//! A message that collects nothing still gets `FLOOR_SCORE`.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

use crate::pipeline::clock::ClockTime;
use crate::pipeline::types::{Category, ExtractedData, Message, ProcessedMessage};

/// Keywords that raise urgency wherever they appear in subject or body.
pub const URGENT_KEYWORDS: &[&str] = &[
    "urgent",
    "important",
    "action required",
    "reminder",
    "final notice",
    "deadline",
];

/// Score for a message with no signal in any band.
pub const FLOOR_SCORE: u8 = 1;

const MAX_SCORE: u32 = 100;
const KEYWORD_POINTS: u32 = 3;
const KEYWORD_CAP: u32 = 15;
const SOON_DAYS: i64 = 3;
const MEETING_WINDOW_HOURS: i64 = 3;

/// Pure importance scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer;

impl Scorer {
    pub fn new() -> Self {
        Self
    }

    /// Score against the local wall clock.
    pub fn calculate_score(&self, processed: &ProcessedMessage) -> u8 {
        self.calculate_score_at(processed, Local::now().naive_local())
    }

    /// Score as of `now`.
    pub fn calculate_score_at(&self, processed: &ProcessedMessage, now: NaiveDateTime) -> u8 {
        self.score_parts(
            &processed.message,
            &processed.extracted,
            processed.category,
            now,
        )
    }

    /// Score from the pieces of a processed message before it is assembled.
    pub fn score_parts(
        &self,
        message: &Message,
        extracted: &ExtractedData,
        category: Category,
        now: NaiveDateTime,
    ) -> u8 {
        let today = now.date();
        let dates = &extracted.due_dates;
        let text = message.subject_and_body().to_lowercase();
        let keyword_hits = urgent_keyword_count(&text);

        let mut score: u32 = 0;

        score += match category {
            Category::Bills => {
                if is_due_on(dates, today) {
                    15
                } else if is_due_on(dates, today + Duration::days(1)) {
                    10
                } else if is_due_within(dates, today, SOON_DAYS) {
                    5
                } else {
                    1
                }
            }
            Category::Jobs | Category::JobMeetings | Category::InternshipMeetings => {
                if is_due_on(dates, today) {
                    12
                } else if is_due_within(dates, today, SOON_DAYS) {
                    8
                } else {
                    2
                }
            }
            Category::StudentMeetings
            | Category::Meetings
            | Category::Promotions
            | Category::Otp
            | Category::Attachments
            | Category::Other => 0,
        };

        if category.is_meeting() {
            score += meeting_points(&extracted.times, now);
        }

        let attachments = message.attachments.len();
        if attachments > 0 {
            score += if keyword_hits > 0 { 6 } else { 3 };
            if attachments > 1 {
                score += 2;
            }
        }

        score += (keyword_hits * KEYWORD_POINTS).min(KEYWORD_CAP);

        if score == 0 {
            return FLOOR_SCORE;
        }
        score.min(MAX_SCORE) as u8
    }
}

fn urgent_keyword_count(text: &str) -> u32 {
    URGENT_KEYWORDS.iter().filter(|kw| text.contains(*kw)).count() as u32
}

fn is_due_on(dates: &[NaiveDate], day: NaiveDate) -> bool {
    dates.iter().any(|d| *d == day)
}

fn is_due_within(dates: &[NaiveDate], today: NaiveDate, days: i64) -> bool {
    let limit = today + Duration::days(days);
    dates.iter().any(|d| *d >= today && *d <= limit)
}

fn meeting_points(times: &[String], now: NaiveDateTime) -> u32 {
    let parsed: Vec<ClockTime> = times.iter().filter_map(|t| ClockTime::parse_12h(t)).collect();
    if parsed.is_empty() {
        return 2;
    }
    let window_end = now + Duration::hours(MEETING_WINDOW_HOURS);
    let soon = parsed.iter().any(|t| {
        let at = now.date().and_time(t.to_naive());
        at >= now && at <= window_end
    });
    if soon { 10 } else { 6 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::Attachment;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn day(offset: i64) -> NaiveDate {
        now().date() + Duration::days(offset)
    }

    fn processed(category: Category, subject: &str, extracted: ExtractedData) -> ProcessedMessage {
        ProcessedMessage {
            message: Message::new("s-1", "x@y.com", subject, ""),
            extracted,
            category,
            score: 0,
        }
    }

    fn with_dates(dates: Vec<NaiveDate>) -> ExtractedData {
        ExtractedData {
            due_dates: dates,
            ..Default::default()
        }
    }

    fn with_times(times: &[&str]) -> ExtractedData {
        ExtractedData {
            times: times.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn score(p: &ProcessedMessage) -> u8 {
        Scorer::new().calculate_score_at(p, now())
    }

    #[test]
    fn bill_bands() {
        assert_eq!(score(&processed(Category::Bills, "Bill", with_dates(vec![day(0)]))), 15);
        assert_eq!(score(&processed(Category::Bills, "Bill", with_dates(vec![day(1)]))), 10);
        assert_eq!(score(&processed(Category::Bills, "Bill", with_dates(vec![day(3)]))), 5);
        assert_eq!(score(&processed(Category::Bills, "Bill", with_dates(vec![day(9)]))), 1);
        assert_eq!(score(&processed(Category::Bills, "Bill", with_dates(vec![day(-2)]))), 1);
        assert_eq!(score(&processed(Category::Bills, "Bill", ExtractedData::default())), 1);
    }

    #[test]
    fn bill_score_is_monotonic_in_due_date() {
        let mut previous = u8::MAX;
        for offset in 0..6 {
            let s = score(&processed(Category::Bills, "Bill", with_dates(vec![day(offset)])));
            assert!(s <= previous, "day {offset} scored {s} after {previous}");
            previous = s;
        }
    }

    #[test]
    fn career_bands() {
        for category in [Category::Jobs, Category::JobMeetings, Category::InternshipMeetings] {
            let base = if category.is_meeting() { 2 } else { 0 };
            assert_eq!(score(&processed(category, "Role", with_dates(vec![day(0)]))), 12 + base);
            assert_eq!(score(&processed(category, "Role", with_dates(vec![day(2)]))), 8 + base);
            assert_eq!(score(&processed(category, "Role", with_dates(vec![day(10)]))), 2 + base);
        }
    }

    #[test]
    fn meeting_bands() {
        assert_eq!(score(&processed(Category::Meetings, "Sync", with_times(&["11:30 AM"]))), 10);
        assert_eq!(score(&processed(Category::Meetings, "Sync", with_times(&["4:00 PM"]))), 6);
        assert_eq!(score(&processed(Category::Meetings, "Sync", with_times(&["9:00 AM"]))), 6);
        assert_eq!(score(&processed(Category::Meetings, "Sync", ExtractedData::default())), 2);
        assert_eq!(
            score(&processed(Category::StudentMeetings, "Lecture", with_times(&["1:00 PM"]))),
            10
        );
    }

    #[test]
    fn attachment_points() {
        let mut p = processed(Category::Other, "Files", ExtractedData::default());
        p.message = p.message.with_attachment(Attachment::new("a.pdf", "application/pdf", 10));
        assert_eq!(score(&p), 3);
        p.message = p.message.with_attachment(Attachment::new("b.pdf", "application/pdf", 10));
        assert_eq!(score(&p), 5);
        p.message.subject = "URGENT files".into();
        // 6 + 2 for attachments, 3 for one keyword
        assert_eq!(score(&p), 11);
    }

    #[test]
    fn keyword_density_is_capped() {
        let subject = "urgent important action required reminder final notice deadline";
        let p = processed(Category::Other, subject, ExtractedData::default());
        assert_eq!(score(&p), 15);
    }

    #[test]
    fn keywords_count_once_each() {
        let p = processed(Category::Other, "urgent urgent urgent", ExtractedData::default());
        assert_eq!(score(&p), 3);
    }

    #[test]
    fn unscored_mail_gets_floor() {
        for category in [Category::Other, Category::Promotions, Category::Otp] {
            assert_eq!(score(&processed(category, "hi", ExtractedData::default())), FLOOR_SCORE);
        }
    }

    #[test]
    fn score_never_exceeds_100() {
        let subject = "urgent important action required reminder final notice deadline";
        let mut p = processed(Category::JobMeetings, subject, with_dates(vec![day(0)]));
        p.extracted.times = vec!["10:30 AM".into()];
        for i in 0..5 {
            p.message = p
                .message
                .with_attachment(Attachment::new(format!("{i}.pdf"), "application/pdf", 1));
        }
        assert!(score(&p) <= 100);
    }
}
