//! Free-text reminder extraction.
//!
//! Text is cleaned of markup, split into lines and each surviving line is
//! scanned for dates (numeric, month-name, relative), clock times and
//! verb-led action phrases. Relative dates resolve against `today`.
//!
//! Urgency comes from the resolved date when there is one; keywords
//! ("today", "urgent", "asap", "tomorrow") only decide when no date resolves.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::channels::mail::strip_tags;
use crate::pipeline::clock::ClockTime;
use crate::pipeline::extractor::parse_calendar_date;
use crate::pipeline::types::{Message, truncate_chars};

const MIN_LINE_CHARS: usize = 10;
const MAX_LINE_CHARS: usize = 200;
const MIN_PHRASE_CHARS: usize = 10;
const MAX_PHRASE_CHARS: usize = 150;
const FALLBACK_LINE_CHARS: usize = 80;
const DEDUPE_KEY_CHARS: usize = 30;
const SOURCE_CHARS: usize = 30;
const MIN_ALPHA_RATIO: f64 = 0.4;

/// How soon a reminder needs attention.
/// Declaration order is display order: most pressing first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Past,
    Today,
    Tomorrow,
    Upcoming,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Past => "past",
            Urgency::Today => "today",
            Urgency::Tomorrow => "tomorrow",
            Urgency::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub text: String,
    pub date: Option<NaiveDate>,
    /// Normalized `"H:MM AM|PM"`.
    pub time: Option<String>,
    pub urgency: Urgency,
    pub source: String,
}

// ── Pattern tables ──────────────────────────────────────────────────

static HTML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&(?:[a-z]+|#[0-9]+);").unwrap());
static INLINE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r]+").unwrap());

static HAS_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]").unwrap());
static MARKUP_JUNK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(href|src|http|www\.|mailto:|style=|class=)").unwrap()
});
static PAYMENT_BOILERPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(VISA|UPI|MasterCard|RuPay|Maestro|©|®|™)").unwrap());
static JUNK_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(all applicable|personally identifiable|service-related|keep your searches|your profile|all refunds|to such rights|us via the email|you service-related)",
    )
    .unwrap()
});

const MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";
const WEEKDAYS: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]{1,2})[/-]([0-9]{1,2})[/-]([0-9]{4})\b").unwrap()
});
static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b([0-9]{{1,2}})\s+({MONTHS})[a-z]*\s+([0-9]{{4}})\b")).unwrap()
});
static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({MONTHS})[a-z]*\s+([0-9]{{1,2}}),?\s+([0-9]{{4}})\b")).unwrap()
});

/// Relative date expressions, tried in this order.
#[derive(Debug, Clone, Copy)]
enum Relative {
    Today,
    Tomorrow,
    Weekday,
}

static RELATIVE_PATTERNS: LazyLock<Vec<(Relative, Regex)>> = LazyLock::new(|| {
    vec![
        (Relative::Today, Regex::new(r"(?i)\b(?:today|tonight)\b").unwrap()),
        (Relative::Tomorrow, Regex::new(r"(?i)\btomorrow\b").unwrap()),
        (
            Relative::Weekday,
            Regex::new(&format!(r"(?i)\b(?:next|by)\s+({WEEKDAYS})\b")).unwrap(),
        ),
    ]
});

static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([0-9]{1,2})(?::([0-9]{2}))?\s*([AP])M\b").unwrap()
});

static ACTION_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:pay|submit|attend|complete|finish|send|upload|apply|review|check)\s+([^.!?\n]{5,60})",
        r"(?i)\b(?:reminder|deadline|due date|action required)[:\s]+([^.!?\n]{5,60})",
        r"(?i)(?:don't forget|remember to)\s+([^.!?\n]{5,60})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static REPLY_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(?:re:|fwd:)").unwrap());
static TODAY_WORDS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)today|urgent|asap").unwrap());
static TOMORROW_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)tomorrow").unwrap());

// ── Extractor ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ReminderExtractor;

impl ReminderExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_from_text(&self, text: &str, source: &str) -> Vec<Reminder> {
        self.extract_from_text_at(text, source, Local::now().date_naive())
    }

    /// Reminders found in `text`, deduplicated by their first 30 characters.
    pub fn extract_from_text_at(&self, text: &str, source: &str, today: NaiveDate) -> Vec<Reminder> {
        let cleaned = clean_markup(text);
        let mut reminders = Vec::new();

        for line in cleaned.lines() {
            let trimmed = line.trim();
            if is_junk_line(trimmed) {
                continue;
            }

            let dates = extract_dates(trimmed, today);
            let times = extract_times(trimmed);
            let phrases = extract_phrases(trimmed);
            let date = dates.first().copied();
            let time = times.first().cloned();
            let urgency = urgency_for(date, trimmed, today);

            let mut push = |text: String| {
                reminders.push(Reminder {
                    text,
                    date,
                    time: time.clone(),
                    urgency,
                    source: source.to_string(),
                });
            };

            if phrases.is_empty() {
                if date.is_some() || time.is_some() {
                    let fallback = truncate_chars(trimmed, FALLBACK_LINE_CHARS);
                    if is_valid_reminder(fallback) {
                        push(fallback.to_string());
                    }
                }
                continue;
            }
            for phrase in phrases.into_iter().filter(|p| is_valid_reminder(p)) {
                push(phrase);
            }
        }

        dedupe(reminders)
    }

    pub fn extract_from_message(&self, message: &Message) -> Vec<Reminder> {
        self.extract_from_message_at(message, Local::now().date_naive())
    }

    /// Reminders in the subject line and body, labelled with the subject.
    pub fn extract_from_message_at(&self, message: &Message, today: NaiveDate) -> Vec<Reminder> {
        let subject = message.subject.trim();
        let source = if subject.is_empty() {
            "email"
        } else {
            truncate_chars(subject, SOURCE_CHARS)
        };
        let text = format!("{}\n{}", message.subject, message.body_text());
        self.extract_from_text_at(&text, source, today)
    }
}

/// Most pressing first; within an urgency, dated before undated, earliest first.
pub fn sort_reminders(reminders: &mut [Reminder]) {
    reminders.sort_by_key(|r| (r.urgency, r.date.is_none(), r.date));
}

fn clean_markup(text: &str) -> String {
    let text = strip_tags(text);
    let text = HTML_ENTITY.replace_all(&text, " ");
    INLINE_SPACE.replace_all(&text, " ").into_owned()
}

fn is_junk_line(line: &str) -> bool {
    let len = line.chars().count();
    !(MIN_LINE_CHARS..=MAX_LINE_CHARS).contains(&len)
        || !HAS_LETTER.is_match(line)
        || MARKUP_JUNK.is_match(line)
        || PAYMENT_BOILERPLATE.is_match(line)
}

/// Absolute dates first (numeric, day-month, month-day), then relative.
fn extract_dates(line: &str, today: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();

    for caps in NUMERIC_DATE.captures_iter(line) {
        if let (Ok(d), Ok(m), Ok(y)) = (
            caps[1].parse::<u32>(),
            caps[2].parse::<u32>(),
            caps[3].parse::<i32>(),
        )
            && let Some(date) = parse_calendar_date(d, m, y)
        {
            dates.push(date);
        }
    }
    for caps in DAY_MONTH_YEAR.captures_iter(line) {
        if let (Ok(d), Some(m), Ok(y)) = (
            caps[1].parse::<u32>(),
            month_number(&caps[2]),
            caps[3].parse::<i32>(),
        )
            && let Some(date) = parse_calendar_date(d, m, y)
        {
            dates.push(date);
        }
    }
    for caps in MONTH_DAY_YEAR.captures_iter(line) {
        if let (Some(m), Ok(d), Ok(y)) = (
            month_number(&caps[1]),
            caps[2].parse::<u32>(),
            caps[3].parse::<i32>(),
        )
            && let Some(date) = parse_calendar_date(d, m, y)
        {
            dates.push(date);
        }
    }

    for (kind, re) in RELATIVE_PATTERNS.iter() {
        for caps in re.captures_iter(line) {
            let resolved = match kind {
                Relative::Today => Some(today),
                Relative::Tomorrow => Some(today + Duration::days(1)),
                Relative::Weekday => caps
                    .get(1)
                    .and_then(|m| m.as_str().to_lowercase().parse::<Weekday>().ok())
                    .map(|weekday| next_weekday(today, weekday)),
            };
            dates.extend(resolved);
        }
    }

    dates
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_lowercase();
    MONTHS
        .split('|')
        .position(|m| m == prefix)
        .map(|i| i as u32 + 1)
}

/// Next `weekday` strictly after `today`; the same weekday means a week out.
pub fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_sunday() as i64;
    let target = weekday.num_days_from_sunday() as i64;
    let mut ahead = target - current;
    if ahead <= 0 {
        ahead += 7;
    }
    today + Duration::days(ahead)
}

fn extract_times(line: &str) -> Vec<String> {
    TIME_OF_DAY
        .captures_iter(line)
        .filter_map(|caps| {
            let hour = caps[1].parse().ok()?;
            let minute = match caps.get(2) {
                Some(m) => m.as_str().parse().ok()?,
                None => 0,
            };
            ClockTime::from_12h(hour, minute, caps[3].eq_ignore_ascii_case("p"))
        })
        .map(|t| t.to_string())
        .collect()
}

fn extract_phrases(line: &str) -> Vec<String> {
    let mut phrases: Vec<String> = ACTION_PHRASES
        .iter()
        .flat_map(|re| re.captures_iter(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|p| within_phrase_bounds(p))
        .collect();

    if phrases.is_empty() {
        let lower = line.to_lowercase();
        if ["due", "deadline", "submit"].iter().any(|kw| lower.contains(kw)) {
            let cleaned = REPLY_PREFIX.replace(line, "").trim().to_string();
            if within_phrase_bounds(&cleaned) {
                phrases.push(cleaned);
            }
        }
    }
    phrases
}

fn within_phrase_bounds(phrase: &str) -> bool {
    let len = phrase.chars().count();
    len > MIN_PHRASE_CHARS && len < MAX_PHRASE_CHARS
}

/// At least two words longer than two characters, mostly letters, and not
/// a known boilerplate opener.
pub fn is_valid_reminder(text: &str) -> bool {
    let words = text.split_whitespace().filter(|w| w.chars().count() > 2).count();
    if words < 2 {
        return false;
    }
    let total = text.chars().count();
    let alpha = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    if (alpha as f64) < total as f64 * MIN_ALPHA_RATIO {
        return false;
    }
    !JUNK_PHRASES.is_match(text)
}

/// Date-derived urgency wins; keywords only apply without a date.
pub fn urgency_for(date: Option<NaiveDate>, line: &str, today: NaiveDate) -> Urgency {
    match date {
        Some(date) if date < today => Urgency::Past,
        Some(date) if date == today => Urgency::Today,
        Some(date) if date == today + Duration::days(1) => Urgency::Tomorrow,
        Some(_) => Urgency::Upcoming,
        None if TODAY_WORDS.is_match(line) => Urgency::Today,
        None if TOMORROW_WORD.is_match(line) => Urgency::Tomorrow,
        None => Urgency::Upcoming,
    }
}

fn dedupe(reminders: Vec<Reminder>) -> Vec<Reminder> {
    let mut seen = HashSet::new();
    reminders
        .into_iter()
        .filter(|r| {
            let lower = r.text.to_lowercase();
            seen.insert(truncate_chars(&lower, DEDUPE_KEY_CHARS).to_string())
        })
        .collect()
}
