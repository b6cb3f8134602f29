use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{endpoint, CheckError, SecurityEvaluator};
use crate::models::SecurityVerdict;
use crate::solana::Wallet;

/// Status value RugCheck reports for a safe token
const GOOD_STATUS: &str = "good";

#[derive(Debug, Default, Deserialize)]
struct RugCheckReport {
    status: Option<String>,
    top_holder_percentage: Option<f64>,
}

/// Message signed to authenticate a security query for `mint_address`
pub fn challenge_message(mint_address: &str) -> String {
    format!("Check security for {}", mint_address)
}

/// Map a raw RugCheck response to a verdict.
///
/// Anything but 200 with a decodable body is indeterminate with no concentration.
fn verdict_from_response(status: StatusCode, body: &str) -> SecurityVerdict {
    if status != StatusCode::OK {
        warn!("RugCheck returned status {}", status.as_u16());
        return SecurityVerdict::indeterminate();
    }

    let report: RugCheckReport = match serde_json::from_str(body) {
        Ok(report) => report,
        Err(e) => {
            warn!("Failed to decode RugCheck response: {}", e);
            return SecurityVerdict::indeterminate();
        }
    };

    let top_holder_percentage = report.top_holder_percentage.unwrap_or(0.0);
    if report.status.as_deref() == Some(GOOD_STATUS) {
        SecurityVerdict::pass(top_holder_percentage)
    } else {
        SecurityVerdict::fail(top_holder_percentage)
    }
}

async fn read_response(response: reqwest::Response) -> Result<(StatusCode, String), CheckError> {
    let status = response.status();
    let body = response.text().await?;
    Ok((status, body))
}

/// RugCheck check authenticated by a message signed with the operator keypair
pub struct RugCheckSignedEvaluator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    wallet: Option<Arc<Wallet>>,
}

impl RugCheckSignedEvaluator {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>, wallet: Option<Arc<Wallet>>) -> Self {
        Self { client, base_url: base_url.to_string(), api_key, wallet }
    }

    fn login_request(&self, mint_address: &str) -> Result<RequestBuilder, CheckError> {
        let wallet = self.wallet.as_ref().ok_or(CheckError::MissingCredential("SOLANA_PRIVATE_KEY"))?;
        let api_key = self.api_key.as_deref().ok_or(CheckError::MissingCredential("RUGCHECK_API_KEY"))?;

        let message = challenge_message(mint_address);
        let payload = json!({
            "message": message,
            "signature": wallet.sign_message_base64(&message),
        });

        Ok(self
            .client
            .post(endpoint(&self.base_url, "auth/login/solana"))
            .bearer_auth(api_key)
            .json(&payload))
    }

    async fn login(&self, mint_address: &str) -> Result<(StatusCode, String), CheckError> {
        let response = self.login_request(mint_address)?.send().await?;
        read_response(response).await
    }
}

#[async_trait]
impl SecurityEvaluator for RugCheckSignedEvaluator {
    async fn evaluate(&self, mint_address: &str) -> SecurityVerdict {
        debug!("Checking contract security for {} (signed)", mint_address);
        match self.login(mint_address).await {
            Ok((status, body)) => verdict_from_response(status, &body),
            Err(e) => {
                warn!("Failed to authenticate with RugCheck: {}", e);
                SecurityVerdict::indeterminate()
            }
        }
    }
}

/// RugCheck check using the static API key only
pub struct RugCheckKeyEvaluator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RugCheckKeyEvaluator {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self { client, base_url: base_url.to_string(), api_key }
    }

    fn query_request(&self, mint_address: &str) -> Result<RequestBuilder, CheckError> {
        let api_key = self.api_key.as_deref().ok_or(CheckError::MissingCredential("RUGCHECK_API_KEY"))?;
        let path = format!("tokens/{}/report/summary", mint_address);

        Ok(self
            .client
            .get(endpoint(&self.base_url, &path))
            .bearer_auth(api_key)
            .header("accept", "application/json"))
    }

    async fn query(&self, mint_address: &str) -> Result<(StatusCode, String), CheckError> {
        let response = self.query_request(mint_address)?.send().await?;
        read_response(response).await
    }
}

#[async_trait]
impl SecurityEvaluator for RugCheckKeyEvaluator {
    async fn evaluate(&self, mint_address: &str) -> SecurityVerdict {
        debug!("Checking contract security for {}", mint_address);
        match self.query(mint_address).await {
            Ok((status, body)) => verdict_from_response(status, &body),
            Err(e) => {
                warn!("RugCheck query failed: {}", e);
                SecurityVerdict::indeterminate()
            }
        }
    }
}
