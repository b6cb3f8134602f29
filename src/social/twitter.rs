use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("no bearer token configured")]
    MissingCredentials,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("social API returned status {0}")]
    Status(u16),
}

/// A member of the monitored list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SocialAccount {
    pub id: String,
    pub username: String,
}

/// Source of list members and their recent posts
#[async_trait]
pub trait SocialPlatform: Send + Sync {
    async fn list_members(&self, list_id: &str) -> Result<Vec<SocialAccount>, SocialError>;

    async fn recent_posts(&self, account: &SocialAccount, limit: usize) -> Result<Vec<String>, SocialError>;
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    meta: PageMeta,
}

#[derive(Debug, Default, Deserialize)]
struct PageMeta {
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text: String,
}

/// Page size accepted by the timeline endpoint (5..=100)
fn timeline_page_size(remaining: usize) -> usize {
    remaining.clamp(5, 100)
}

/// Twitter API v2 client using an app-only bearer token
pub struct TwitterClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl TwitterClient {
    pub fn new(client: Client, base_url: &str, bearer_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    async fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>, SocialError> {
        let token = self.bearer_token.as_deref().ok_or(SocialError::MissingCredentials)?;
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SocialError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SocialPlatform for TwitterClient {
    async fn list_members(&self, list_id: &str) -> Result<Vec<SocialAccount>, SocialError> {
        let path = format!("lists/{}/members", list_id);
        let mut members = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut query = vec![("max_results", "100".to_string())];
            if let Some(token) = next_token.take() {
                query.push(("pagination_token", token));
            }

            let page: Page<SocialAccount> = self.get_page(&path, &query).await?;
            members.extend(page.data);

            match page.meta.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        debug!("List {} has {} members", list_id, members.len());
        Ok(members)
    }

    async fn recent_posts(&self, account: &SocialAccount, limit: usize) -> Result<Vec<String>, SocialError> {
        let path = format!("users/{}/tweets", account.id);
        let mut posts = Vec::new();
        let mut next_token: Option<String> = None;

        while posts.len() < limit {
            let mut query = vec![("max_results", timeline_page_size(limit - posts.len()).to_string())];
            if let Some(token) = next_token.take() {
                query.push(("pagination_token", token));
            }

            let page: Page<Tweet> = self.get_page(&path, &query).await?;
            posts.extend(page.data.into_iter().map(|tweet| tweet.text));

            match page.meta.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        posts.truncate(limit);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_member_page() {
        let body = r#"{
            "data": [{"id": "1", "name": "Dev", "username": "solana_dev"}],
            "meta": {"result_count": 1, "next_token": "abc"}
        }"#;
        let page: Page<SocialAccount> = serde_json::from_str(body).unwrap();
        assert_eq!(page.data, vec![SocialAccount { id: "1".into(), username: "solana_dev".into() }]);
        assert_eq!(page.meta.next_token.as_deref(), Some("abc"));
    }

    #[test]
    fn decodes_empty_timeline() {
        let page: Page<Tweet> = serde_json::from_str(r#"{"meta": {"result_count": 0}}"#).unwrap();
        assert!(page.data.is_empty());
        assert!(page.meta.next_token.is_none());
    }

    #[test]
    fn page_size_stays_in_api_bounds() {
        assert_eq!(timeline_page_size(1), 5);
        assert_eq!(timeline_page_size(42), 42);
        assert_eq!(timeline_page_size(1_000), 100);
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_request() {
        let client = TwitterClient::new(Client::new(), "http://127.0.0.1:9/2/", None);
        let err = client.list_members("123").await.unwrap_err();
        assert!(matches!(err, SocialError::MissingCredentials));
    }
}
