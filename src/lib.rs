//! Day Planner: rule-engine inbox triage.
//!
//! Messages are classified, mined for facts and scored without any ML,
//! then rolled up into a daily digest of bills, meetings, deadlines and
//! reminders.

pub mod channels;
pub mod config;
pub mod error;
pub mod insights;
pub mod logging;
pub mod pipeline;
pub mod planner;
pub mod reminders;
pub mod safety;
pub mod store;
pub mod timeline;

pub use config::PlannerConfig;
pub use error::{Error, Result};
pub use planner::{DailyDigest, DayPlanner};
