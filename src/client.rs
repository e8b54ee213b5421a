use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{ChatRequest, ChatResponse, ConversationHistory, HealthStatus, ServiceInfo};

/// Where the Digital Twin backend listens when run locally.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Digital Twin backend.
///
/// Exactly one `POST /chat` request is sent per submitted turn; the root,
/// health, and conversation routes are read-only probes layered on top.
#[derive(Clone)]
pub struct TwinClient {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

/// The transport used to resolve a chat turn.
///
/// The chat widget talks to this trait rather than to [`TwinClient`]
/// directly, so turn handling can be driven by a scripted backend in tests.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one chat request and await the twin's reply.
    async fn send_chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}

impl TwinClient {
    /// Create a new client pointed at the local backend with default settings.
    pub fn new() -> Result<Self> {
        Self::with_options(None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// The base URL is validated eagerly so a bad address fails at startup
    /// rather than on the first turn.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every chat exchange.
    pub fn set_logger(&mut self, logger: Arc<dyn ClientLogger>) {
        self.logger = Some(logger);
    }

    /// Returns the normalized base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create and return default headers for backend requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Process backend response errors and convert to our Error type.
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        // FastAPI wraps error messages in a "detail" key; validation
        // failures put a structure there instead of a string.
        #[derive(Deserialize)]
        struct ErrorResponse {
            detail: Option<serde_json::Value>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.detail);
        let error_message = match detail {
            Some(serde_json::Value::String(message)) => message,
            Some(other) => other.to_string(),
            None if error_body.is_empty() => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            None => error_body,
        };

        Error::api(status_code, error_message)
    }

    /// Send one chat turn to the backend and await the twin's reply.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}chat", self.base_url);

        if let Some(logger) = &self.logger {
            logger.log_request(&request);
        }
        CLIENT_REQUESTS.click();
        let start = Instant::now();

        let outcome = self.post_chat(&url, &request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &outcome {
            Ok(reply) => {
                if let Some(logger) = &self.logger {
                    logger.log_reply(reply);
                }
            }
            Err(error) => {
                CLIENT_REQUEST_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_failure(error);
                }
            }
        }
        outcome
    }

    async fn post_chat(&self, url: &str, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse chat response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Fetch the backend's root route metadata.
    pub async fn service_info(&self) -> Result<ServiceInfo> {
        self.get_json("", "service info").await
    }

    /// Fetch the backend's health report.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get_json("health", "health status").await
    }

    /// Fetch the conversation the backend has recorded for a session.
    pub async fn conversation(&self, session_id: &str) -> Result<ConversationHistory> {
        self.get_json(&format!("conversation/{}", session_id), "conversation")
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        CLIENT_REQUESTS.click();
        let response = self
            .client
            .get(&url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        response.json::<T>().await.map_err(|e| {
            CLIENT_REQUEST_ERRORS.click();
            Error::serialization(
                format!("Failed to parse {}: {}", what, e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl ChatBackend for TwinClient {
    async fn send_chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.chat(request).await
    }
}

impl fmt::Debug for TwinClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwinClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Validate the base URL and guarantee one trailing slash so routes can be
/// appended directly.
fn normalize_base_url(base_url: &str) -> Result<String> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(
            format!("URL cannot be used as a base: {}", base_url),
            None,
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_new_uses_defaults() {
        let client = TwinClient::new().unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        assert!(client.logger.is_none());
    }

    #[test]
    fn client_with_custom_options() {
        let client = TwinClient::with_options(
            Some("https://twin.example.com/api".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://twin.example.com/api/");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn normalize_adds_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:8000").unwrap(),
            "http://localhost:8000/"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000/").unwrap(),
            "http://localhost:8000/"
        );
    }

    #[test]
    fn normalize_preserves_path_segments() {
        assert_eq!(
            normalize_base_url("http://example.com/twin/v1").unwrap(),
            "http://example.com/twin/v1/"
        );
    }

    #[test]
    fn normalize_rejects_invalid_urls() {
        let err = normalize_base_url("not a url").unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn chat_route_is_appended_to_base() {
        let client = TwinClient::new().unwrap();
        assert_eq!(
            format!("{}chat", client.base_url),
            "http://localhost:8000/chat"
        );
    }
}
