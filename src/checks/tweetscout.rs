use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use super::{endpoint, CheckError, ReputationEvaluator};
use crate::models::ReputationVerdict;

#[derive(Debug, Default, Deserialize)]
struct AudienceQuality {
    score: Option<f64>,
}

/// Map a raw TweetScout response to a verdict against `threshold`
fn verdict_from_response(status: StatusCode, body: &str, threshold: f64) -> ReputationVerdict {
    if status != StatusCode::OK {
        warn!("TweetScout returned status {}", status.as_u16());
        return ReputationVerdict::indeterminate();
    }

    match serde_json::from_str::<AudienceQuality>(body) {
        Ok(quality) => ReputationVerdict::from_score(quality.score.unwrap_or(0.0), threshold),
        Err(e) => {
            warn!("Failed to decode TweetScout response: {}", e);
            ReputationVerdict::indeterminate()
        }
    }
}

/// Audience quality check against TweetScout
pub struct TweetScoutEvaluator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    threshold: f64,
}

impl TweetScoutEvaluator {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>, threshold: f64) -> Self {
        Self { client, base_url: base_url.to_string(), api_key, threshold }
    }

    fn query_request(&self, handle: &str) -> Result<RequestBuilder, CheckError> {
        let api_key = self.api_key.as_deref().ok_or(CheckError::MissingCredential("TWEETSCOUT_API_KEY"))?;

        Ok(self
            .client
            .get(endpoint(&self.base_url, "check-audience-quality"))
            .bearer_auth(api_key)
            .query(&[("handle", handle)]))
    }

    async fn query(&self, handle: &str) -> Result<(StatusCode, String), CheckError> {
        let response = self.query_request(handle)?.send().await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl ReputationEvaluator for TweetScoutEvaluator {
    async fn evaluate(&self, handle: &str) -> ReputationVerdict {
        debug!("Checking TweetScout score for {}", handle);
        match self.query(handle).await {
            Ok((status, body)) => verdict_from_response(status, &body, self.threshold),
            Err(e) => {
                warn!("TweetScout query failed: {}", e);
                ReputationVerdict::indeterminate()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;

    #[test]
    fn score_above_threshold_passes() {
        let verdict = verdict_from_response(StatusCode::OK, r#"{"score": 57}"#, 20.0);
        assert!(verdict.passed());
        assert_eq!(verdict.score, 57.0);
    }

    #[test]
    fn score_at_threshold_fails() {
        let verdict = verdict_from_response(StatusCode::OK, r#"{"score": 20}"#, 20.0);
        assert_eq!(verdict.verdict, Verdict::Fail);
    }

    #[test]
    fn missing_score_counts_as_zero() {
        let verdict = verdict_from_response(StatusCode::OK, r#"{"handle": "x"}"#, 20.0);
        assert_eq!(verdict.verdict, Verdict::Fail);
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn non_success_is_indeterminate_with_zero() {
        let verdict = verdict_from_response(StatusCode::NOT_FOUND, r#"{"score": 99}"#, 20.0);
        assert_eq!(verdict, ReputationVerdict::indeterminate());
        assert!(!verdict.passed());
    }

    #[test]
    fn queries_audience_quality_by_handle() {
        let evaluator = TweetScoutEvaluator::new(Client::new(), "https://api.tweetscout.io/", Some("ts-key".to_string()), 20.0);
        let request = evaluator.query_request("moon_cat").unwrap().build().unwrap();
        assert_eq!(request.url().as_str(), "https://api.tweetscout.io/check-audience-quality?handle=moon_cat");
        assert_eq!(request.headers()["authorization"], "Bearer ts-key");
    }

    #[tokio::test]
    async fn missing_key_is_indeterminate() {
        let evaluator = TweetScoutEvaluator::new(Client::new(), "http://127.0.0.1:9/", None, 20.0);
        assert_eq!(evaluator.evaluate("dev").await, ReputationVerdict::indeterminate());
    }
}
