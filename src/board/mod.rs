pub mod fetcher;
pub mod parser;
pub mod webdriver;

pub use fetcher::{FetchError, HttpPageFetcher, PageFetcher};
pub use parser::{BoardLayout, TokenExtractor};
pub use webdriver::{WebDriverConfig, WebDriverPageFetcher};

use crate::config::{Config, PageFetchMode};
use reqwest::Client;

/// Create the page fetcher selected in the application configuration
pub fn create_fetcher_from_config(config: &Config, http: Client) -> Box<dyn PageFetcher> {
    match config.page_fetch_mode {
        PageFetchMode::Http => Box::new(HttpPageFetcher::new(http, &config.board_url)),
        PageFetchMode::WebDriver => {
            let webdriver_config = WebDriverConfig {
                webdriver_url: config.webdriver_url.clone(),
                ..WebDriverConfig::default()
            };
            Box::new(WebDriverPageFetcher::new(http, &config.board_url, webdriver_config))
        }
    }
}
