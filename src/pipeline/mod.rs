//! Rule-engine pipeline.
//!
//! Every fetched message flows through:
//! 1. `Extractor::extract_all()`: regex facts (amounts, dates, times, codes, URLs)
//! 2. `Classifier::classify()`: weighted keyword scoring (no ML)
//! 3. `Scorer::calculate_score()`: 0-100 importance
//! 4. `SummaryGenerator::generate()`: category buckets for the day
//!
//! **Processing never fails a batch.** A bad message resolves to defaults.

pub mod classifier;
pub mod clock;
pub mod extractor;
pub mod processor;
pub mod rules;
pub mod scorer;
pub mod summary;
pub mod types;

pub use classifier::Classifier;
pub use extractor::Extractor;
pub use processor::RuleEngine;
pub use scorer::Scorer;
pub use summary::{Summary, SummaryGenerator};
pub use types::{Attachment, Category, ExtractedData, Message, ProcessedMessage};
