use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One social post with its polarity in [-1, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSample {
    pub text: String,
    pub polarity: f64,
}

/// Aggregate social read for one iteration
#[derive(Debug, Clone, Default)]
pub struct SocialReport {
    pub samples: Vec<SentimentSample>,
    /// Mean polarity, `None` when no post was fetched
    pub average_sentiment: Option<f64>,
    pub word_frequencies: HashMap<String, usize>,
}
