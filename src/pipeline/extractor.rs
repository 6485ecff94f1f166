//! Regex extraction of amounts, due dates, clock times, URLs and one-time codes.
//!
//! Every method accepts arbitrary text and returns an empty list when nothing
//! matches. Invalid candidates (e.g. `30/02/2025`) are dropped silently.

use chrono::NaiveDate;
use regex::Regex;

use crate::config::OtpConfig;
use crate::pipeline::clock::ClockTime;
use crate::pipeline::types::ExtractedData;

/// Which fact a pattern produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Amount,
    DueDate,
    ClockTime,
    Url,
}

/// Built-in pattern table.
///
/// `DueDate` must capture day, month and year; `ClockTime` must capture
/// hour, minute and the AM/PM marker.
pub const DEFAULT_PATTERNS: &[(FieldKind, &str)] = &[
    (
        FieldKind::Amount,
        r"[₹$€£]\s?[0-9]+(?:,[0-9]{3})*(?:\.[0-9]{1,2})?",
    ),
    (
        FieldKind::DueDate,
        r"\b([0-9]{1,2})[/-]([0-9]{1,2})[/-]([0-9]{4})\b",
    ),
    (FieldKind::ClockTime, r"(?i)([0-9]{1,2}):([0-9]{2})\s?([AP])M\b"),
    (FieldKind::Url, r"https?://\S+"),
];

/// Words that must appear somewhere in the text before any code is returned.
const OTP_CONTEXT: &[&str] = &[
    "otp",
    "code",
    "verification",
    "authenticate",
    "confirm",
    "security code",
    "pin",
];

/// Compiled pattern table.
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: Vec<(FieldKind, Regex)>,
}

impl PatternTable {
    /// Compile a table; later entries for the same field are ignored.
    pub fn compile(patterns: &[(FieldKind, &str)]) -> Result<Self, regex::Error> {
        let mut entries: Vec<(FieldKind, Regex)> = Vec::with_capacity(patterns.len());
        for (kind, pattern) in patterns {
            if entries.iter().any(|(k, _)| k == kind) {
                continue;
            }
            entries.push((*kind, Regex::new(pattern)?));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, kind: FieldKind) -> Option<&Regex> {
        self.entries.iter().find(|(k, _)| *k == kind).map(|(_, r)| r)
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::compile(DEFAULT_PATTERNS).expect("built-in extraction patterns compile")
    }
}

/// Stateless fact extractor.
#[derive(Debug, Clone)]
pub struct Extractor {
    patterns: PatternTable,
    otp: OtpConfig,
    otp_contextual: Regex,
    otp_standalone: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(OtpConfig::default())
    }
}

impl Extractor {
    /// Extractor with the built-in pattern table.
    pub fn new(otp: OtpConfig) -> Self {
        Self::with_patterns(PatternTable::default(), otp)
    }

    /// Extractor with a custom pattern table.
    ///
    /// OTP bounds are clamped first (see [`OtpConfig::clamped`]), so any
    /// config yields valid, non-empty code patterns.
    pub fn with_patterns(patterns: PatternTable, otp: OtpConfig) -> Self {
        let otp = otp.clamped();
        let contextual = format!(
            r"(?i)(?:otp|code|verification|pin|authenticate)(?:\s+is\s+|[:\s]+)([0-9]{{{},{}}})\b",
            otp.min_len, otp.max_len
        );
        let standalone = format!(r"\b[0-9]{{{}}}\b", otp.standalone_len);
        Self {
            patterns,
            otp,
            otp_contextual: Regex::new(&contextual).expect("clamped otp bounds compile"),
            otp_standalone: Regex::new(&standalone).expect("clamped otp bounds compile"),
        }
    }

    /// Run every extractor over the same text.
    pub fn extract_all(&self, text: &str) -> ExtractedData {
        ExtractedData {
            amounts: self.extract_amounts(text),
            due_dates: self.extract_due_dates(text),
            times: self.extract_times(text),
            urls: self.extract_urls(text),
            otp_codes: self.extract_otp_codes(text),
        }
    }

    /// Currency amounts as written, left to right.
    pub fn extract_amounts(&self, text: &str) -> Vec<String> {
        self.find_all(FieldKind::Amount, text)
    }

    /// `DD/MM/YYYY` or `DD-MM-YYYY` tokens that name a real calendar date.
    pub fn extract_due_dates(&self, text: &str) -> Vec<NaiveDate> {
        let Some(re) = self.patterns.get(FieldKind::DueDate) else {
            return Vec::new();
        };
        re.captures_iter(text)
            .filter_map(|caps| {
                let day = caps.get(1)?.as_str().parse().ok()?;
                let month = caps.get(2)?.as_str().parse().ok()?;
                let year = caps.get(3)?.as_str().parse().ok()?;
                parse_calendar_date(day, month, year)
            })
            .collect()
    }

    /// Clock times normalized to `"H:MM AM|PM"`.
    pub fn extract_times(&self, text: &str) -> Vec<String> {
        let Some(re) = self.patterns.get(FieldKind::ClockTime) else {
            return Vec::new();
        };
        re.captures_iter(text)
            .filter_map(|caps| {
                let hour = caps.get(1)?.as_str().parse().ok()?;
                let minute = caps.get(2)?.as_str().parse().ok()?;
                let pm = caps.get(3)?.as_str().eq_ignore_ascii_case("p");
                ClockTime::from_12h(hour, minute, pm)
            })
            .map(|t| t.to_string())
            .collect()
    }

    pub fn extract_urls(&self, text: &str) -> Vec<String> {
        self.find_all(FieldKind::Url, text)
    }

    /// Numeric one-time codes, only when the text talks about codes.
    ///
    /// Codes directly following a keyword ("code: 1234", "OTP is 556677")
    /// win; otherwise the first bare token of the standalone length is taken.
    /// Year-like tokens are never returned.
    pub fn extract_otp_codes(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        if !OTP_CONTEXT.iter().any(|kw| lower.contains(kw)) {
            return Vec::new();
        }

        let contextual: Vec<String> = self
            .otp_contextual
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|code| self.is_plausible_code(code))
            .map(String::from)
            .collect();
        if !contextual.is_empty() {
            return contextual;
        }

        self.otp_standalone
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|code| !looks_like_year(code))
            .map(String::from)
            .into_iter()
            .collect()
    }

    fn is_plausible_code(&self, code: &str) -> bool {
        let len = code.len();
        if len < self.otp.min_len || len > self.otp.max_len {
            return false;
        }
        if looks_like_year(code) {
            return false;
        }
        // 4-digit codes with a leading zero are usually list numbering.
        !(len == 4 && code.starts_with('0'))
    }

    fn find_all(&self, kind: FieldKind, text: &str) -> Vec<String> {
        self.patterns
            .get(kind)
            .map(|re| re.find_iter(text).map(|m| m.as_str().to_string()).collect())
            .unwrap_or_default()
    }
}

/// Validate day/month/year; returns `None` for impossible dates.
pub fn parse_calendar_date(day: u32, month: u32, year: i32) -> Option<NaiveDate> {
    if !(1900..=2100).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn looks_like_year(code: &str) -> bool {
    code.len() == 4 && (code.starts_with("19") || code.starts_with("20"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn amounts_in_order() {
        let ex = Extractor::default();
        let found = ex.extract_amounts("Pay $150 now, then ₹1,200.50 and €9.99 later. £3");
        assert_eq!(found, vec!["$150", "₹1,200.50", "€9.99", "£3"]);
    }

    #[test]
    fn amounts_keep_duplicates() {
        let ex = Extractor::default();
        assert_eq!(ex.extract_amounts("$5 and $5"), vec!["$5", "$5"]);
    }

    #[test]
    fn due_dates_validate_calendar() {
        let ex = Extractor::default();
        let found = ex.extract_due_dates("due 15/12/2025, not 30/02/2025 or 32/01/2025 or 10-13-2025, but 01-03-2026");
        assert_eq!(found, vec![date(2025, 12, 15), date(2026, 3, 1)]);
    }

    #[test]
    fn leap_day_accepted_only_in_leap_years() {
        let ex = Extractor::default();
        assert_eq!(ex.extract_due_dates("29/02/2024"), vec![date(2024, 2, 29)]);
        assert!(ex.extract_due_dates("29/02/2025").is_empty());
    }

    #[test]
    fn times_are_normalized() {
        let ex = Extractor::default();
        let found = ex.extract_times("Standup at 9:30am, review 02:15 PM, dinner 7:00PM");
        assert_eq!(found, vec!["9:30 AM", "2:15 PM", "7:00 PM"]);
    }

    #[test]
    fn impossible_times_dropped() {
        let ex = Extractor::default();
        assert!(ex.extract_times("at 13:30 PM or 0:10 AM").is_empty());
    }

    #[test]
    fn urls_stop_at_whitespace() {
        let ex = Extractor::default();
        let found = ex.extract_urls("Join https://meet.google.com/abc-defg now or http://x.io/a?b=c");
        assert_eq!(found, vec!["https://meet.google.com/abc-defg", "http://x.io/a?b=c"]);
    }

    #[test]
    fn otp_after_keyword() {
        let ex = Extractor::default();
        assert_eq!(ex.extract_otp_codes("Your code is 482913 verify your login"), vec!["482913"]);
        assert_eq!(ex.extract_otp_codes("OTP: 5521"), vec!["5521"]);
    }

    #[test]
    fn otp_requires_context() {
        let ex = Extractor::default();
        assert!(ex.extract_otp_codes("Order 123456 has been dispatched").is_empty());
    }

    #[test]
    fn otp_excludes_years() {
        let ex = Extractor::default();
        assert!(ex.extract_otp_codes("code: 2024").is_empty());
        assert!(ex.extract_otp_codes("Use the code from 1999").is_empty());
    }

    #[test]
    fn otp_standalone_fallback_takes_first() {
        let ex = Extractor::default();
        let found = ex.extract_otp_codes("Confirm sign-in. 123456 expires soon; ignore 654321");
        assert_eq!(found, vec!["123456"]);
    }

    #[test]
    fn otp_length_is_configurable() {
        let ex = Extractor::new(OtpConfig {
            min_len: 6,
            max_len: 6,
            standalone_len: 6,
        });
        assert_eq!(ex.extract_otp_codes("pin: 4821 and code 482913"), vec!["482913"]);
    }

    #[test]
    fn inverted_otp_bounds_are_reordered() {
        let ex = Extractor::new(OtpConfig {
            min_len: 8,
            max_len: 4,
            standalone_len: 6,
        });
        assert_eq!(ex.extract_otp_codes("code: 12345"), vec!["12345"]);
    }

    #[test]
    fn zero_standalone_len_never_yields_empty_codes() {
        let ex = Extractor::new(OtpConfig {
            min_len: 4,
            max_len: 8,
            standalone_len: 0,
        });
        assert!(ex.extract_otp_codes("Your verification is pending").is_empty());
        assert_eq!(ex.extract_otp_codes("Confirm with 7788 today"), vec!["7788"]);
    }

    #[test]
    fn empty_and_garbage_input() {
        let ex = Extractor::default();
        for text in ["", "   ", "\u{0}\u{1}$$$//::", "₹", "https://", "99/99/9999"] {
            let data = ex.extract_all(text);
            assert!(data.due_dates.is_empty());
            assert!(data.otp_codes.is_empty());
        }
        assert!(ex.extract_all("").is_empty());
    }

    #[test]
    fn custom_pattern_table() {
        let table = PatternTable::compile(&[(FieldKind::Amount, r"USD\s?[0-9]+")]).unwrap();
        let ex = Extractor::with_patterns(table, OtpConfig::default());
        assert_eq!(ex.extract_amounts("USD 40 or $40"), vec!["USD 40"]);
        assert!(ex.extract_urls("https://a.b").is_empty());
    }
}
