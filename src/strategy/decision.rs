use log::{debug, info};
use std::fmt;

use crate::checks::{ReputationEvaluator, SecurityEvaluator};
use crate::models::{ReputationVerdict, SecurityVerdict, TokenRecord, Verdict};
use crate::utils::handle_from_social_link;

/// Thresholds a token must meet to be bought
#[derive(Debug, Clone)]
pub struct AdmissionCriteria {
    /// Largest holder share must stay strictly below this percentage
    pub max_top_holder_percentage: f64,
}

impl Default for AdmissionCriteria {
    fn default() -> Self {
        Self { max_top_holder_percentage: 10.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    MissingMint,
    NoSocialLinks,
    SecurityFailed,
    /// RugCheck could not be reached or refused the request
    SecurityUnavailable,
    ReputationFailed,
    /// TweetScout could not be reached or refused the request
    ReputationUnavailable,
    ConcentrationTooHigh(f64),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMint => write!(f, "no mint address"),
            Self::NoSocialLinks => write!(f, "no social links"),
            Self::SecurityFailed => write!(f, "security check failed"),
            Self::SecurityUnavailable => write!(f, "security check unavailable"),
            Self::ReputationFailed => write!(f, "reputation score too low"),
            Self::ReputationUnavailable => write!(f, "reputation check unavailable"),
            Self::ConcentrationTooHigh(pct) => write!(f, "top holder owns {:.2}%", pct),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Admit,
    Reject(RejectReason),
}

impl Decision {
    pub fn is_admit(&self) -> bool {
        matches!(self, Decision::Admit)
    }
}

fn security_rejection(security: &SecurityVerdict) -> Option<RejectReason> {
    match security.verdict {
        Verdict::Pass => None,
        Verdict::Fail => Some(RejectReason::SecurityFailed),
        Verdict::Indeterminate => Some(RejectReason::SecurityUnavailable),
    }
}

fn reputation_rejection(reputation: &ReputationVerdict) -> Option<RejectReason> {
    match reputation.verdict {
        Verdict::Pass => None,
        Verdict::Fail => Some(RejectReason::ReputationFailed),
        Verdict::Indeterminate => Some(RejectReason::ReputationUnavailable),
    }
}

/// Admit iff security passed, reputation passed and concentration is below the limit
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn decide(security: &SecurityVerdict, reputation: &ReputationVerdict, criteria: &AdmissionCriteria) -> Decision {
    if let Some(reason) = security_rejection(security) {
        return Decision::Reject(reason);
    }
    if let Some(reason) = reputation_rejection(reputation) {
        return Decision::Reject(reason);
    }
    // NaN on either side rejects
    if !(security.top_holder_percentage < criteria.max_top_holder_percentage) {
        return Decision::Reject(RejectReason::ConcentrationTooHigh(security.top_holder_percentage));
    }
    Decision::Admit
}

/// Decision plus the verdicts that led to it
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub decision: Decision,
    pub security: Option<SecurityVerdict>,
    pub reputation: Option<ReputationVerdict>,
}

impl Evaluation {
    fn rejected(reason: RejectReason) -> Self {
        Self { decision: Decision::Reject(reason), security: None, reputation: None }
    }
}

/// Runs the external checks for a token and decides on admission
pub struct DecisionPipeline {
    security: Box<dyn SecurityEvaluator>,
    reputation: Box<dyn ReputationEvaluator>,
    criteria: AdmissionCriteria,
}

impl DecisionPipeline {
    pub fn new(
        security: Box<dyn SecurityEvaluator>,
        reputation: Box<dyn ReputationEvaluator>,
        criteria: AdmissionCriteria,
    ) -> Self {
        Self { security, reputation, criteria }
    }

    /// Check a token; the reputation service is only asked once security passed
    pub async fn evaluate(&self, token: &TokenRecord) -> Evaluation {
        let Some(mint) = token.mint_address.as_deref() else {
            return Evaluation::rejected(RejectReason::MissingMint);
        };
        let Some(first_link) = token.social_links.first() else {
            return Evaluation::rejected(RejectReason::NoSocialLinks);
        };

        let security = self.security.evaluate(mint).await;
        debug!("Security verdict for {}: {:?}", mint, security);
        if let Some(reason) = security_rejection(&security) {
            return Evaluation { decision: Decision::Reject(reason), security: Some(security), reputation: None };
        }

        let handle = handle_from_social_link(first_link);
        let reputation = self.reputation.evaluate(&handle).await;
        debug!("Reputation verdict for {}: {:?}", handle, reputation);

        let decision = decide(&security, &reputation, &self.criteria);
        if decision.is_admit() {
            info!("Token {} meets all criteria", token.display_name());
        }
        Evaluation { decision, security: Some(security), reputation: Some(reputation) }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    pub(crate) struct FixedSecurity {
        pub verdict: SecurityVerdict,
        pub calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SecurityEvaluator for FixedSecurity {
        async fn evaluate(&self, _mint_address: &str) -> SecurityVerdict {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict
        }
    }

    pub(crate) struct FixedReputation {
        pub verdict: ReputationVerdict,
        pub handles: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ReputationEvaluator for FixedReputation {
        async fn evaluate(&self, handle: &str) -> ReputationVerdict {
            self.handles.lock().unwrap().push(handle.to_string());
            self.verdict
        }
    }

    fn pass_reputation() -> ReputationVerdict {
        ReputationVerdict::from_score(50.0, 20.0)
    }

    fn fail_reputation() -> ReputationVerdict {
        ReputationVerdict::from_score(5.0, 20.0)
    }

    #[test]
    fn admits_when_all_predicates_hold() {
        let criteria = AdmissionCriteria::default();
        assert_eq!(decide(&SecurityVerdict::pass(9.5), &pass_reputation(), &criteria), Decision::Admit);
    }

    #[test]
    fn concentration_boundary_is_strict() {
        let criteria = AdmissionCriteria::default();
        assert_eq!(
            decide(&SecurityVerdict::pass(10.0), &pass_reputation(), &criteria),
            Decision::Reject(RejectReason::ConcentrationTooHigh(10.0))
        );
    }

    #[test]
    fn nan_concentration_never_admits() {
        let nan_limit = AdmissionCriteria { max_top_holder_percentage: f64::NAN };
        assert!(!decide(&SecurityVerdict::pass(99.0), &pass_reputation(), &nan_limit).is_admit());
        assert!(!decide(&SecurityVerdict::pass(1.0), &pass_reputation(), &nan_limit).is_admit());

        let criteria = AdmissionCriteria::default();
        assert!(!decide(&SecurityVerdict::pass(f64::NAN), &pass_reputation(), &criteria).is_admit());
    }

    #[test]
    fn flipping_any_predicate_rejects() {
        let criteria = AdmissionCriteria::default();
        let security = SecurityVerdict::pass(9.5);
        let reputation = pass_reputation();
        assert!(decide(&security, &reputation, &criteria).is_admit());

        // security
        assert!(!decide(&SecurityVerdict::fail(9.5), &reputation, &criteria).is_admit());
        // reputation
        assert!(!decide(&security, &fail_reputation(), &criteria).is_admit());
        // concentration
        assert!(!decide(&SecurityVerdict::pass(55.0), &reputation, &criteria).is_admit());
    }

    #[test]
    fn indeterminate_verdicts_are_rejected_with_their_own_reason() {
        let criteria = AdmissionCriteria::default();
        assert_eq!(
            decide(&SecurityVerdict::indeterminate(), &pass_reputation(), &criteria),
            Decision::Reject(RejectReason::SecurityUnavailable)
        );
        assert_eq!(
            decide(&SecurityVerdict::pass(1.0), &ReputationVerdict::indeterminate(), &criteria),
            Decision::Reject(RejectReason::ReputationUnavailable)
        );
    }

    struct Harness {
        pipeline: DecisionPipeline,
        security_calls: Arc<AtomicUsize>,
        handles: Arc<Mutex<Vec<String>>>,
    }

    fn harness(security: SecurityVerdict, reputation: ReputationVerdict) -> Harness {
        let security_calls = Arc::new(AtomicUsize::new(0));
        let handles = Arc::new(Mutex::new(Vec::new()));
        let pipeline = DecisionPipeline::new(
            Box::new(FixedSecurity { verdict: security, calls: security_calls.clone() }),
            Box::new(FixedReputation { verdict: reputation, handles: handles.clone() }),
            AdmissionCriteria::default(),
        );
        Harness { pipeline, security_calls, handles }
    }

    fn token(links: &[&str]) -> TokenRecord {
        TokenRecord {
            name: Some("Moon Cat".to_string()),
            symbol: Some("MCAT".to_string()),
            mint_address: Some("Mint111".to_string()),
            social_links: links.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn no_social_links_skips_reputation() {
        let h = harness(SecurityVerdict::pass(1.0), pass_reputation());
        let evaluation = h.pipeline.evaluate(&token(&[])).await;
        assert_eq!(evaluation.decision, Decision::Reject(RejectReason::NoSocialLinks));
        assert!(h.handles.lock().unwrap().is_empty());
        assert_eq!(h.security_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_mint_skips_all_checks() {
        let h = harness(SecurityVerdict::pass(1.0), pass_reputation());
        let mut record = token(&["https://x.com/mooncat"]);
        record.mint_address = None;
        let evaluation = h.pipeline.evaluate(&record).await;
        assert_eq!(evaluation.decision, Decision::Reject(RejectReason::MissingMint));
        assert_eq!(h.security_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_security_short_circuits() {
        let h = harness(SecurityVerdict::fail(1.0), pass_reputation());
        let evaluation = h.pipeline.evaluate(&token(&["https://x.com/mooncat"])).await;
        assert_eq!(evaluation.decision, Decision::Reject(RejectReason::SecurityFailed));
        assert!(evaluation.reputation.is_none());
        assert!(h.handles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn checks_first_link_as_handle() {
        let h = harness(SecurityVerdict::pass(9.5), pass_reputation());
        let evaluation = h
            .pipeline
            .evaluate(&token(&["https://twitter.com/mooncat", "https://t.me/mooncat"]))
            .await;
        assert!(evaluation.decision.is_admit());
        assert_eq!(*h.handles.lock().unwrap(), vec!["mooncat".to_string()]);
    }
}
