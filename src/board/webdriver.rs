use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{self, Instant};

use super::fetcher::{FetchError, PageFetcher};

/// W3C key under which WebDriver returns element references
const ELEMENT_KEY: &str = "element-6066-11e4-a346-4d5b-a9e1-3a8f1b0c3b36";

/// Browser session settings for the rendered board fetch
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Base URL of the WebDriver server (chromedriver)
    pub webdriver_url: String,
    /// Texts of the buttons clicked in order after the page loads
    pub navigation: Vec<String>,
    /// How long to wait for each button to become clickable
    pub element_timeout: Duration,
    pub poll_interval: Duration,
    /// Pause after the last click so the sorted list can render
    pub settle_delay: Duration,
    pub headless: bool,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            navigation: vec![
                "I'm ready to pump".to_string(),
                "sort: featured".to_string(),
                "sort: creation time".to_string(),
            ],
            element_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(500),
            settle_delay: Duration::from_secs(5),
            headless: true,
        }
    }
}

/// Raw request/response exchange with the WebDriver server
#[async_trait]
trait WebDriverTransport: Send + Sync {
    async fn send(&self, method: Method, url: &str, body: Option<Value>) -> Result<(StatusCode, String), FetchError>;
}

struct HttpTransport {
    client: Client,
}

#[async_trait]
impl WebDriverTransport for HttpTransport {
    async fn send(&self, method: Method, url: &str, body: Option<Value>) -> Result<(StatusCode, String), FetchError> {
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        Ok((status, response.text().await?))
    }
}

/// Fetches the fully rendered board through a scripted browser session
pub struct WebDriverPageFetcher {
    transport: Box<dyn WebDriverTransport>,
    url: String,
    config: WebDriverConfig,
}

impl WebDriverPageFetcher {
    pub fn new(client: Client, url: &str, config: WebDriverConfig) -> Self {
        Self {
            transport: Box::new(HttpTransport { client }),
            url: url.to_string(),
            config,
        }
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, FetchError> {
        let url = format!("{}/{}", self.config.webdriver_url.trim_end_matches('/'), path);
        let (status, body) = self.transport.send(method, &url, body).await?;
        command_result(status, &body)
    }

    async fn create_session(&self) -> Result<String, FetchError> {
        let mut args = vec!["--disable-gpu", "--no-sandbox"];
        if self.config.headless {
            args.push("--headless=new");
        }
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let value = self.command(Method::POST, "session", Some(capabilities)).await?;
        session_id_from(&value)
            .ok_or_else(|| FetchError::WebDriver("session response without sessionId".to_string()))
    }

    async fn delete_session(&self, session: &str) {
        if let Err(e) = self.command(Method::DELETE, &format!("session/{}", session), None).await {
            warn!("Failed to close browser session {}: {}", session, e);
        }
    }

    async fn try_click(&self, session: &str, text: &str) -> Result<(), FetchError> {
        let locator = json!({ "using": "xpath", "value": button_xpath(text) });
        let value = self
            .command(Method::POST, &format!("session/{}/element", session), Some(locator))
            .await?;
        let element = element_id_from(&value)
            .ok_or_else(|| FetchError::WebDriver("element response without reference".to_string()))?;

        self.command(
            Method::POST,
            &format!("session/{}/element/{}/click", session, element),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    /// Click the button with the given text, retrying until it becomes clickable
    async fn click_button(&self, session: &str, text: &str) -> Result<(), FetchError> {
        info!("Waiting for '{}' button to appear...", text);
        let deadline = Instant::now() + self.config.element_timeout;

        loop {
            match self.try_click(session, text).await {
                Ok(()) => {
                    info!("Clicked the '{}' button", text);
                    return Ok(());
                }
                Err(e) if Instant::now() >= deadline => {
                    return Err(FetchError::WebDriver(format!(
                        "button '{}' not clickable after {:?}: {}",
                        text, self.config.element_timeout, e
                    )));
                }
                Err(e) => {
                    debug!("Button '{}' not ready yet: {}", text, e);
                    time::sleep(self.config.poll_interval).await;
                }
            }
        }
    }

    async fn render(&self, session: &str) -> Result<String, FetchError> {
        self.command(
            Method::POST,
            &format!("session/{}/url", session),
            Some(json!({ "url": self.url })),
        )
        .await?;

        for text in &self.config.navigation {
            self.click_button(session, text).await?;
        }

        debug!("Waiting {:?} for the board to settle", self.config.settle_delay);
        time::sleep(self.config.settle_delay).await;

        let value = self
            .command(Method::GET, &format!("session/{}/source", session), None)
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| FetchError::WebDriver("page source is not a string".to_string()))
    }
}

#[async_trait]
impl PageFetcher for WebDriverPageFetcher {
    async fn fetch_page(&self) -> Result<String, FetchError> {
        let session = self.create_session().await?;
        debug!("Opened browser session {}", session);

        let result = self.render(&session).await;
        self.delete_session(&session).await;
        result
    }
}

/// Status is checked before decoding so non-JSON error pages still report the status
fn command_result(status: StatusCode, body: &str) -> Result<Value, FetchError> {
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|payload| payload["value"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| "unknown webdriver error".to_string());
        return Err(FetchError::WebDriver(format!("{} ({})", message, status.as_u16())));
    }

    let payload: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::WebDriver(format!("invalid webdriver response: {}", e)))?;
    Ok(payload["value"].clone())
}

fn session_id_from(value: &Value) -> Option<String> {
    value["sessionId"].as_str().map(str::to_string)
}

fn element_id_from(value: &Value) -> Option<String> {
    value[ELEMENT_KEY].as_str().map(str::to_string)
}

/// XPath matching a button whose text contains `text`
fn button_xpath(text: &str) -> String {
    format!("//button[contains(text(), {})]", xpath_literal(text))
}

fn xpath_literal(text: &str) -> String {
    if !text.contains('"') {
        format!("\"{}\"", text)
    } else if !text.contains('\'') {
        format!("'{}'", text)
    } else {
        let parts: Vec<String> = text.split('"').map(|part| format!("\"{}\"", part)).collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Answers session creation, fails navigation, records every call
    struct FailingNavigation {
        calls: Arc<Mutex<Vec<(Method, String)>>>,
    }

    #[async_trait]
    impl WebDriverTransport for FailingNavigation {
        async fn send(&self, method: Method, url: &str, _body: Option<Value>) -> Result<(StatusCode, String), FetchError> {
            let path = url.trim_start_matches("http://localhost:9515/").to_string();
            self.calls.lock().unwrap().push((method.clone(), path.clone()));

            let reply = match (method, path.as_str()) {
                (Method::POST, "session") => (StatusCode::OK, r#"{"value": {"sessionId": "abc", "capabilities": {}}}"#),
                (Method::DELETE, "session/abc") => (StatusCode::OK, r#"{"value": null}"#),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"value": {"error": "unknown error", "message": "net::ERR_NAME_NOT_RESOLVED"}}"#,
                ),
            };
            Ok((reply.0, reply.1.to_string()))
        }
    }

    #[tokio::test]
    async fn session_is_deleted_when_render_fails() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let fetcher = WebDriverPageFetcher {
            transport: Box::new(FailingNavigation { calls: calls.clone() }),
            url: "https://pump.fun/".to_string(),
            config: WebDriverConfig::default(),
        };

        let err = fetcher.fetch_page().await.unwrap_err();
        assert!(err.to_string().contains("ERR_NAME_NOT_RESOLVED"));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.first(), Some(&(Method::POST, "session".to_string())));
        assert_eq!(calls.last(), Some(&(Method::DELETE, "session/abc".to_string())));
        assert!(calls.contains(&(Method::POST, "session/abc/url".to_string())));
    }

    #[test]
    fn error_pages_keep_their_status() {
        let err = command_result(StatusCode::BAD_GATEWAY, "<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::WebDriver(ref msg) if msg.ends_with("(502)")));

        let err = command_result(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, FetchError::WebDriver(_)));

        let value = command_result(StatusCode::OK, r#"{"value": "<html></html>"}"#).unwrap();
        assert_eq!(value, json!("<html></html>"));
    }

    #[test]
    fn xpath_quotes_apostrophes() {
        assert_eq!(
            button_xpath("I'm ready to pump"),
            "//button[contains(text(), \"I'm ready to pump\")]"
        );
        assert_eq!(xpath_literal("say \"hi\""), "'say \"hi\"'");
        assert_eq!(xpath_literal("it's \"x\""), "concat(\"it's \", '\"', \"x\", '\"', \"\")");
    }

    #[test]
    fn reads_protocol_references() {
        let session = json!({ "sessionId": "abc123", "capabilities": {} });
        assert_eq!(session_id_from(&session).as_deref(), Some("abc123"));

        let mut element = json!({});
        element[ELEMENT_KEY] = json!("el-1");
        assert_eq!(element_id_from(&element).as_deref(), Some("el-1"));
        assert_eq!(element_id_from(&json!({})), None);
    }

    #[test]
    fn default_navigation_sorts_by_creation_time() {
        let config = WebDriverConfig::default();
        assert_eq!(config.navigation.last().map(String::as_str), Some("sort: creation time"));
        assert_eq!(config.element_timeout, Duration::from_secs(20));
    }
}
