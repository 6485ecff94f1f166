//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::safety::LogMode;

/// Default score at or above which a message lands in the important bucket.
pub const DEFAULT_IMPORTANCE_THRESHOLD: u8 = 8;

/// Length bounds for one-time-code extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpConfig {
    /// Shortest accepted code.
    pub min_len: usize,
    /// Longest accepted code.
    pub max_len: usize,
    /// Exact length of a bare numeric token accepted when no code follows a keyword.
    pub standalone_len: usize,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            min_len: 4,
            max_len: 8,
            standalone_len: 6,
        }
    }
}

/// Code lengths the extractor can honor.
pub const OTP_LEN_RANGE: std::ops::RangeInclusive<usize> = 4..=8;

impl OtpConfig {
    /// Bounds pulled into `OTP_LEN_RANGE`, ordered, with the standalone
    /// length inside them.
    pub fn clamped(self) -> Self {
        let (lo, hi) = (*OTP_LEN_RANGE.start(), *OTP_LEN_RANGE.end());
        let a = self.min_len.clamp(lo, hi);
        let b = self.max_len.clamp(lo, hi);
        let (min_len, max_len) = if a <= b { (a, b) } else { (b, a) };
        Self {
            min_len,
            max_len,
            standalone_len: self.standalone_len.clamp(min_len, max_len),
        }
    }
}

/// Planner configuration.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Score threshold for the important bucket (0-100).
    pub importance_threshold: u8,
    /// Maximum number of messages requested from the source per refresh.
    pub fetch_limit: usize,
    /// One-time-code extraction bounds.
    pub otp: OtpConfig,
    /// Whether log output redacts message content.
    pub log_mode: LogMode,
    /// Where starred messages are persisted (in-memory when unset).
    pub saved_path: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            importance_threshold: DEFAULT_IMPORTANCE_THRESHOLD,
            fetch_limit: 100,
            otp: OtpConfig::default(),
            log_mode: LogMode::Redact,
            saved_path: None,
        }
    }
}

impl PlannerConfig {
    /// Build config from environment variables, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let min_len = env_parse("DAY_PLANNER_OTP_MIN_LEN").unwrap_or(defaults.otp.min_len);
        let max_len = env_parse("DAY_PLANNER_OTP_MAX_LEN").unwrap_or(defaults.otp.max_len);
        // Keep the default standalone length inside custom bounds.
        let standalone_len = if min_len <= max_len {
            defaults.otp.standalone_len.clamp(min_len, max_len)
        } else {
            defaults.otp.standalone_len
        };

        let config = Self {
            importance_threshold: env_parse("DAY_PLANNER_IMPORTANCE_THRESHOLD")
                .unwrap_or(defaults.importance_threshold),
            fetch_limit: env_parse("DAY_PLANNER_FETCH_LIMIT").unwrap_or(defaults.fetch_limit),
            otp: OtpConfig {
                min_len,
                max_len,
                standalone_len,
            },
            log_mode: std::env::var("DAY_PLANNER_LOG_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.log_mode),
            saved_path: std::env::var("DAY_PLANNER_SAVED_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the pipeline cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.importance_threshold > 100 {
            return Err(ConfigError::InvalidValue {
                key: "importance_threshold".into(),
                message: format!("{} exceeds the 0-100 score range", self.importance_threshold),
            });
        }
        let OtpConfig {
            min_len,
            max_len,
            standalone_len,
        } = self.otp;
        if !OTP_LEN_RANGE.contains(&min_len) || !OTP_LEN_RANGE.contains(&max_len) {
            return Err(ConfigError::InvalidValue {
                key: "otp".into(),
                message: format!("code lengths must be within 4..=8, got {min_len}..={max_len}"),
            });
        }
        if min_len > max_len {
            return Err(ConfigError::InvalidValue {
                key: "otp".into(),
                message: format!("min_len {min_len} is greater than max_len {max_len}"),
            });
        }
        if !(min_len..=max_len).contains(&standalone_len) {
            return Err(ConfigError::InvalidValue {
                key: "otp".into(),
                message: format!("standalone_len {standalone_len} is outside {min_len}..={max_len}"),
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
