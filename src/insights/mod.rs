//! Inbox insights derived from processed messages.

pub mod duplicates;
pub mod noise;
pub mod otp_center;
pub mod stress;
pub mod tomorrow;

pub use duplicates::{DuplicateDetector, DuplicateReport};
pub use noise::{NoiseFilter, NoiseReport};
pub use otp_center::{OtpCenter, OtpEntry};
pub use stress::{StressAnalysis, StressIndicator, StressLevel};
pub use tomorrow::{EventKind, TomorrowEvent, TomorrowPredictor};
