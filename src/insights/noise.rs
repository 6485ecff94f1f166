//! Promotional noise filter.

use crate::pipeline::types::ProcessedMessage;

pub const NOISE_KEYWORDS: &[&str] = &[
    "unsubscribe",
    "newsletter",
    "promotion",
    "deal",
    "offer",
    "discount",
    "sale",
    "marketing",
    "advertisement",
    "subscribe now",
    "limited time",
    "buy now",
    "shop now",
    "free shipping",
    "coupon",
    "promo code",
];

#[derive(Debug, Default)]
pub struct NoiseReport<'a> {
    pub clean: Vec<&'a ProcessedMessage>,
    pub noise: Vec<&'a ProcessedMessage>,
}

#[derive(Debug, Clone)]
pub struct NoiseFilter {
    keywords: Vec<String>,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::with_keywords(NOISE_KEYWORDS)
    }
}

impl NoiseFilter {
    pub fn with_keywords(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_noise(&self, processed: &ProcessedMessage) -> bool {
        let text = processed.message.subject_and_body().to_lowercase();
        self.keywords.iter().any(|kw| text.contains(kw.as_str()))
    }

    /// Split into clean and noise, each in input order.
    pub fn filter<'a>(&self, messages: &'a [ProcessedMessage]) -> NoiseReport<'a> {
        let (noise, clean) = messages.iter().partition(|p| self.is_noise(p));
        NoiseReport { clean, noise }
    }
}
