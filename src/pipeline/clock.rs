//! 12-hour clock time parsing shared by the scorer and the timeline views.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([0-9]{1,2})(?::([0-9]{2}))?\s*([AP])\.?M\.?\s*$").unwrap()
});

/// A wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Build from 24-hour components.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Parse `"H:MM AM"`, `"HH:MMpm"` or `"H PM"`.
    pub fn parse_12h(text: &str) -> Option<Self> {
        let caps = CLOCK_RE.captures(text)?;
        let hour: u8 = caps[1].parse().ok()?;
        let minute: u8 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Self::from_12h(hour, minute, caps[3].eq_ignore_ascii_case("p"))
    }

    /// Build from 12-hour components.
    pub fn from_12h(hour: u8, minute: u8, pm: bool) -> Option<Self> {
        if !(1..=12).contains(&hour) || minute >= 60 {
            return None;
        }
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        Self::new(hour, minute)
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        let hour = u8::try_from(minutes / 60).ok()?;
        Self::new(hour, (minutes % 60) as u8)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn to_naive(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    fn display_hour(&self) -> u8 {
        match self.hour {
            0 => 12,
            h if h > 12 => h - 12,
            h => h,
        }
    }

    fn period(&self) -> &'static str {
        if self.hour >= 12 { "PM" } else { "AM" }
    }

    /// Zero-padded 12-hour form, e.g. `"09:05 AM"`.
    pub fn padded_12h(&self) -> String {
        format!("{:02}:{:02} {}", self.display_hour(), self.minute, self.period())
    }
}

/// Canonical form `"H:MM AM"`.
impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.display_hour(), self.minute, self.period())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        assert_eq!(ClockTime::parse_12h("10:30 AM").unwrap().minutes(), 630);
        assert_eq!(ClockTime::parse_12h("2:05pm").unwrap().minutes(), 845);
        assert_eq!(ClockTime::parse_12h("5 PM").unwrap().minutes(), 1020);
        assert_eq!(ClockTime::parse_12h("12:00 AM").unwrap().minutes(), 0);
        assert_eq!(ClockTime::parse_12h("12:15 PM").unwrap().minutes(), 735);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(ClockTime::parse_12h("13:00 PM").is_none());
        assert!(ClockTime::parse_12h("0:30 AM").is_none());
        assert!(ClockTime::parse_12h("9:75 AM").is_none());
        assert!(ClockTime::parse_12h("noon").is_none());
    }

    #[test]
    fn formats_canonically() {
        let t = ClockTime::parse_12h("5 pm").unwrap();
        assert_eq!(t.to_string(), "5:00 PM");
        assert_eq!(t.padded_12h(), "05:00 PM");
        assert_eq!(ClockTime::new(0, 7).unwrap().to_string(), "12:07 AM");
    }

    #[test]
    fn minutes_round_trip() {
        let t = ClockTime::from_minutes(1439).unwrap();
        assert_eq!((t.hour(), t.minute()), (23, 59));
        assert!(ClockTime::from_minutes(1440).is_none());
    }
}
