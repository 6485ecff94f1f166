//! Rule engine: extract → classify → score, one message at a time.
//!
//! Batches are folded item by item: each message resolves to either a full
//! `ProcessedMessage` or a well-defined default (category `Other`, empty
//! extracted data, `FALLBACK_SCORE`). One bad message never aborts the rest.

use std::panic::{self, AssertUnwindSafe};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::pipeline::classifier::Classifier;
use crate::pipeline::extractor::Extractor;
use crate::pipeline::rules::RuleSet;
use crate::pipeline::scorer::Scorer;
use crate::pipeline::types::{Category, ExtractedData, Message, ProcessedMessage};
use crate::safety::LogPolicy;

/// Score given to a message whose processing failed.
pub const FALLBACK_SCORE: u8 = 3;

/// Text beyond this size is not run through the regex tables.
pub const MAX_TEXT_BYTES: usize = 512 * 1024;

/// Why a single message could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessingFault {
    #[error("message has no id")]
    MissingId,

    #[error("message text is {len} bytes, limit is {max}")]
    OversizedText { len: usize, max: usize },

    #[error("processing panicked: {0}")]
    Panicked(String),
}

/// Extraction, classification and scoring composed into one pass.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    extractor: Extractor,
    classifier: Classifier,
    scorer: Scorer,
    log: LogPolicy,
}

impl RuleEngine {
    pub fn new(extractor: Extractor, classifier: Classifier, scorer: Scorer, log: LogPolicy) -> Self {
        Self {
            extractor,
            classifier,
            scorer,
            log,
        }
    }

    /// Engine with the built-in rules and the given configuration.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(
            Extractor::new(config.otp),
            Classifier::new(RuleSet::default_rules()),
            Scorer::new(),
            LogPolicy::new(config.log_mode),
        )
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Process one message against the local wall clock.
    pub fn process(&self, message: Message) -> ProcessedMessage {
        self.process_at(message, Local::now().naive_local())
    }

    /// Process one message as of `now`; faults resolve to the default record.
    pub fn process_at(&self, message: Message, now: NaiveDateTime) -> ProcessedMessage {
        self.resolve(message, now, &mut 0)
    }

    /// Run the pipeline without recovering faults.
    pub fn try_process_at(
        &self,
        message: &Message,
        now: NaiveDateTime,
    ) -> Result<(ExtractedData, Category, u8), ProcessingFault> {
        if message.id.trim().is_empty() {
            return Err(ProcessingFault::MissingId);
        }
        let text = message.subject_and_body();
        if text.len() > MAX_TEXT_BYTES {
            return Err(ProcessingFault::OversizedText {
                len: text.len(),
                max: MAX_TEXT_BYTES,
            });
        }

        panic::catch_unwind(AssertUnwindSafe(|| {
            let extracted = self.extractor.extract_all(&text);
            let category = self.classifier.classify(message);
            let score = self.scorer.score_parts(message, &extracted, category, now);
            (extracted, category, score)
        }))
        .map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ProcessingFault::Panicked(reason)
        })
    }

    /// Process a batch against the local wall clock.
    pub fn process_batch(&self, messages: Vec<Message>) -> Vec<ProcessedMessage> {
        self.process_batch_at(messages, Local::now().naive_local())
    }

    /// Process a batch as of `now`. Output length always equals input length.
    pub fn process_batch_at(
        &self,
        messages: Vec<Message>,
        now: NaiveDateTime,
    ) -> Vec<ProcessedMessage> {
        let count = messages.len();
        info!(count, "Processing message batch");

        let mut faults = 0usize;
        let results: Vec<ProcessedMessage> = messages
            .into_iter()
            .map(|message| self.resolve(message, now, &mut faults))
            .collect();

        info!(total = count, faults, "Batch processing complete");
        results
    }

    /// Full record on success; on a fault, log it, bump `faults` and fall back.
    fn resolve(&self, message: Message, now: NaiveDateTime, faults: &mut usize) -> ProcessedMessage {
        match self.try_process_at(&message, now) {
            Ok((extracted, category, score)) => {
                let processed = ProcessedMessage {
                    message,
                    extracted,
                    category,
                    score,
                };
                debug!(email = %self.log.describe_processed(&processed), "Message processed");
                processed
            }
            Err(fault) => {
                *faults += 1;
                warn!(email = %self.log.describe(&message), error = %fault, "Message processing failed, using defaults");
                fallback(message)
            }
        }
    }
}

fn fallback(message: Message) -> ProcessedMessage {
    ProcessedMessage {
        message,
        extracted: ExtractedData::default(),
        category: Category::Other,
        score: FALLBACK_SCORE,
    }
}
