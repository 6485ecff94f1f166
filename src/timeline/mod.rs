//! Time-oriented views: meeting timeline, deadline countdown and tasks.

pub mod deadlines;
pub mod meetings;
pub mod tasks;

pub use deadlines::{DeadlineCountdown, DeadlineItem, DeadlineStatus, format_countdown};
pub use meetings::{MeetingConflict, MeetingEvent, MeetingTimeline, format_time};
pub use tasks::{ExtractedTask, TaskExtractor};
