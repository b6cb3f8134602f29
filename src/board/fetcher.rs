use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Why the board page could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("board page unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("board page returned status {0}")]
    Status(u16),
    #[error("browser session failed: {0}")]
    WebDriver(String),
}

/// Capability to fetch the board page markup
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self) -> Result<String, FetchError>;
}

/// Fetches the board with a single GET request
pub struct HttpPageFetcher {
    client: Client,
    url: String,
}

impl HttpPageFetcher {
    pub fn new(client: Client, url: &str) -> Self {
        Self { client, url: url.to_string() }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self) -> Result<String, FetchError> {
        debug!("Fetching board page {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
