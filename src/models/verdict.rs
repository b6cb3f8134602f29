use serde::{Deserialize, Serialize};

/// Outcome of an external check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
    /// The service could not answer (transport error, non-success status, auth failure)
    Indeterminate,
}

/// RugCheck result for a mint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecurityVerdict {
    pub verdict: Verdict,
    pub top_holder_percentage: f64,
}

impl SecurityVerdict {
    pub fn pass(top_holder_percentage: f64) -> Self {
        Self { verdict: Verdict::Pass, top_holder_percentage }
    }

    pub fn fail(top_holder_percentage: f64) -> Self {
        Self { verdict: Verdict::Fail, top_holder_percentage }
    }

    pub fn indeterminate() -> Self {
        Self { verdict: Verdict::Indeterminate, top_holder_percentage: 0.0 }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

/// TweetScout result for a handle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReputationVerdict {
    pub verdict: Verdict,
    pub score: f64,
}

impl ReputationVerdict {
    pub fn from_score(score: f64, threshold: f64) -> Self {
        let verdict = if score > threshold { Verdict::Pass } else { Verdict::Fail };
        Self { verdict, score }
    }

    pub fn indeterminate() -> Self {
        Self { verdict: Verdict::Indeterminate, score: 0.0 }
    }

    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reputation_threshold_is_exclusive() {
        assert!(ReputationVerdict::from_score(20.5, 20.0).passed());
        assert!(!ReputationVerdict::from_score(20.0, 20.0).passed());
        assert_eq!(ReputationVerdict::from_score(3.0, 20.0).verdict, Verdict::Fail);
    }

    #[test]
    fn indeterminate_defaults_to_zero() {
        let security = SecurityVerdict::indeterminate();
        assert!(!security.passed());
        assert_eq!(security.top_holder_percentage, 0.0);

        let reputation = ReputationVerdict::indeterminate();
        assert!(!reputation.passed());
        assert_eq!(reputation.score, 0.0);
    }
}
