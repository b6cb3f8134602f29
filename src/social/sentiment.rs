use std::collections::HashMap;

use super::text::tokenize;

/// Base polarities for general English and crypto slang
const LEXICON: &[(&str, f64)] = &[
    // general positive
    ("good", 0.7), ("great", 0.8), ("excellent", 1.0), ("amazing", 0.6), ("awesome", 1.0),
    ("best", 1.0), ("love", 0.5), ("nice", 0.6), ("happy", 0.8), ("strong", 0.43),
    ("solid", 0.4), ("safe", 0.5), ("win", 0.8), ("winning", 0.5), ("profit", 0.6),
    ("gains", 0.5), ("huge", 0.4), ("exciting", 0.3), ("bright", 0.7), ("legit", 0.6),
    // crypto positive
    ("moon", 0.6), ("mooning", 0.7), ("bullish", 0.8), ("gem", 0.6), ("pump", 0.4),
    ("rocket", 0.5), ("hodl", 0.3), ("breakout", 0.5), ("alpha", 0.4), ("lfg", 0.6),
    ("wagmi", 0.5), ("gm", 0.2), ("based", 0.3), ("send", 0.2), ("ath", 0.5),
    // general negative
    ("bad", -0.7), ("terrible", -1.0), ("awful", -1.0), ("worst", -1.0), ("hate", -0.8),
    ("poor", -0.4), ("weak", -0.4), ("sad", -0.5), ("fail", -0.5), ("failed", -0.5),
    ("loss", -0.5), ("losing", -0.4), ("risky", -0.4), ("ugly", -0.7), ("dead", -0.6),
    ("fake", -0.5), ("fraud", -0.9), ("warning", -0.4), ("avoid", -0.5), ("crash", -0.6),
    // crypto negative
    ("dump", -0.6), ("dumping", -0.7), ("bearish", -0.8), ("scam", -1.0), ("rug", -1.0),
    ("rugged", -1.0), ("rekt", -0.8), ("honeypot", -1.0), ("ponzi", -0.9), ("ngmi", -0.6),
    ("exit", -0.2), ("sell", -0.2), ("cope", -0.3), ("jeet", -0.5), ("jeets", -0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "t", "cannot", "nothing", "nobody", "nor", "without", "neither",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3), ("really", 1.3), ("extremely", 1.5), ("super", 1.4), ("so", 1.2),
    ("totally", 1.3), ("absolutely", 1.4), ("incredibly", 1.5),
];

/// Sentiment words lose this much of their weight and flip sign under negation
const NEGATION_FACTOR: f64 = -0.5;
/// A negation only reaches sentiment words this many tokens ahead
const NEGATION_SCOPE: usize = 3;

/// Lexicon based polarity scorer
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self {
            lexicon: LEXICON.iter().map(|(w, s)| (w.to_string(), *s)).collect(),
            intensifiers: INTENSIFIERS.iter().map(|(w, s)| (w.to_string(), *s)).collect(),
        }
    }
}

impl SentimentScorer {
    /// Polarity of `text` in [-1, 1]; 0.0 when no sentiment word is present
    pub fn polarity(&self, text: &str) -> f64 {
        let mut scores = Vec::new();
        let mut negation_left = 0usize;
        let mut intensity = 1.0;

        for token in tokenize(text) {
            if NEGATIONS.contains(&token.as_str()) {
                negation_left = NEGATION_SCOPE;
                continue;
            }
            if let Some(factor) = self.intensifiers.get(&token) {
                intensity *= factor;
                continue;
            }

            if let Some(base) = self.lexicon.get(&token) {
                let mut score = base * intensity;
                if negation_left > 0 {
                    score *= NEGATION_FACTOR;
                }
                scores.push(score.clamp(-1.0, 1.0));
                negation_left = 0;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
            intensity = 1.0;
        }

        if scores.is_empty() {
            return 0.0;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

/// Arithmetic mean of the polarities, `None` for an empty set
pub fn mean_polarity(polarities: &[f64]) -> Option<f64> {
    if polarities.is_empty() {
        return None;
    }
    Some(polarities.iter().sum::<f64>() / polarities.len() as f64)
}
