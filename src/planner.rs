//! Day planner: one refresh turns an inbox into the day's digest.
//!
//! fetch → process batch → summary → analytics. Saved (starred) messages
//! join the duplicate scan so a re-sent starred mail is still flagged.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use crate::channels::MessageSource;
use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::insights::{
    DuplicateDetector, NoiseFilter, OtpCenter, OtpEntry, StressAnalysis, StressIndicator,
    TomorrowEvent, TomorrowPredictor,
};
use crate::pipeline::processor::RuleEngine;
use crate::pipeline::summary::{Summary, SummaryGenerator};
use crate::pipeline::types::ProcessedMessage;
use crate::reminders::{Reminder, ReminderExtractor, sort_reminders};
use crate::store::{SavedStore, saved_view};
use crate::timeline::{
    DeadlineCountdown, DeadlineItem, ExtractedTask, MeetingConflict, MeetingEvent, MeetingTimeline,
    TaskExtractor,
};

/// Everything derived from one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct DailyDigest {
    pub processed: Vec<ProcessedMessage>,
    pub summary: Summary,
    pub stress: StressAnalysis,
    pub tomorrow: Vec<TomorrowEvent>,
    pub deadlines: Vec<DeadlineItem>,
    pub meetings: Vec<MeetingEvent>,
    pub conflicts: Vec<MeetingConflict>,
    pub tasks: Vec<ExtractedTask>,
    pub otp_codes: Vec<OtpEntry>,
    /// Most pressing first, see [`sort_reminders`].
    pub reminders: Vec<Reminder>,
    pub duplicate_count: usize,
    pub noise_count: usize,
}

pub struct DayPlanner {
    config: PlannerConfig,
    source: Arc<dyn MessageSource>,
    saved: Option<Arc<dyn SavedStore>>,
    engine: RuleEngine,
    summary: SummaryGenerator,
    stress: StressIndicator,
    noise: NoiseFilter,
}

impl DayPlanner {
    pub fn new(config: PlannerConfig, source: Arc<dyn MessageSource>) -> Self {
        Self {
            engine: RuleEngine::from_config(&config),
            summary: SummaryGenerator::new(config.importance_threshold),
            stress: StressIndicator::new(config.importance_threshold),
            noise: NoiseFilter::default(),
            saved: None,
            source,
            config,
        }
    }

    /// Builder: include saved messages in the duplicate scan.
    pub fn with_saved_store(mut self, store: Arc<dyn SavedStore>) -> Self {
        self.saved = Some(store);
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn saved_store(&self) -> Option<&Arc<dyn SavedStore>> {
        self.saved.as_ref()
    }

    pub async fn refresh(&self) -> Result<DailyDigest> {
        self.refresh_at(Local::now().naive_local()).await
    }

    /// Fetch and analyze as of `now`.
    ///
    /// Only the source and the saved store can fail; processing cannot.
    pub async fn refresh_at(&self, now: NaiveDateTime) -> Result<DailyDigest> {
        let today = now.date();
        let messages = self.source.fetch(self.config.fetch_limit).await?;
        info!(source = self.source.name(), count = messages.len(), "Fetched messages");

        let processed = self.engine.process_batch_at(messages, now);
        let summary = self.summary.generate(&processed);

        let saved = match &self.saved {
            Some(store) => store.list().await.map_err(Error::Store)?,
            None => Vec::new(),
        };
        let with_saved = saved_view(&processed, &saved);
        let duplicate_count = DuplicateDetector::new().detect(&with_saved).duplicates.len();

        let timeline = MeetingTimeline::new();
        let meetings = timeline.events(&processed);
        let conflicts = timeline.conflicts(&meetings);

        let extractor = ReminderExtractor::new();
        let mut reminders: Vec<Reminder> = processed
            .iter()
            .flat_map(|p| extractor.extract_from_message_at(&p.message, today))
            .collect();
        sort_reminders(&mut reminders);

        let digest = DailyDigest {
            stress: self.stress.analyze_at(&processed, today),
            tomorrow: TomorrowPredictor::new().predict_at(&processed, today),
            deadlines: DeadlineCountdown::new().deadlines_at(&processed, today),
            tasks: TaskExtractor::new().extract(&processed),
            otp_codes: OtpCenter::new().collect(&processed),
            noise_count: self.noise.filter(&processed).noise.len(),
            duplicate_count,
            reminders,
            meetings,
            conflicts,
            summary,
            processed,
        };

        info!(
            important = digest.summary.important.len(),
            stress = %digest.stress.level,
            deadlines = digest.deadlines.len(),
            reminders = digest.reminders.len(),
            conflicts = digest.conflicts.len(),
            duplicates = digest.duplicate_count,
            "Refresh complete"
        );
        Ok(digest)
    }
}
