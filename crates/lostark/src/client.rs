//! HTTP client for the Lost Ark open API.
//!
//! Wraps `GET /characters/{name}/siblings` with bearer auth, a global
//! in-flight request ceiling, and retry with exponential backoff for
//! transient failures.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::Semaphore;

use crate::backoff::{next_delay, BackoffConfig};
use crate::error::{classify_status, ApiError, StatusClass};
use crate::models::SiblingCharacter;

/// Production endpoint of the Lost Ark open API.
pub const DEFAULT_BASE_URL: &str = "https://developer-lostark.game.onstove.com";

/// Default ceiling on in-flight requests. The upstream rate limits are
/// undocumented, so this stays deliberately small.
pub const DEFAULT_MAX_CONCURRENCY: usize = 3;

/// Default attempt ceiling for retryable failures (including the first
/// attempt).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Per-request timeout. Timeouts count as retryable failures.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for [`LostarkClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API.
    pub base_url: String,
    /// Pre-issued API key, sent as a bearer token.
    pub api_key: String,
    /// Maximum number of in-flight requests across the whole process.
    pub max_concurrency: usize,
    /// Retry attempt ceiling for transient failures.
    pub max_attempts: u32,
    /// Backoff schedule between retry attempts.
    pub backoff: BackoffConfig,
}

impl ClientConfig {
    /// Config with production defaults for the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Rate-limited Lost Ark API client.
///
/// Holds no state across calls other than the shared request-permit
/// pool; all rate-limit access goes through this client.
#[derive(Debug)]
pub struct LostarkClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
    max_attempts: u32,
    backoff: BackoffConfig,
    permits: Arc<Semaphore>,
}

/// Outcome of a single HTTP attempt, before retry handling.
enum Attempt {
    Ok(Vec<SiblingCharacter>),
    /// Retryable: 429, 5xx, or a transport-level failure.
    Retry(String),
    /// Non-retryable typed failure, returned as-is.
    Fail(ApiError),
}

impl LostarkClient {
    /// Build a client from config. Fails only when the base URL is
    /// unparsable.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Malformed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base,
            api_key: config.api_key,
            max_attempts: config.max_attempts.max(1),
            backoff: config.backoff,
            permits: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
        })
    }

    /// Fetch the account-wide character list for a handle.
    ///
    /// Retries transient failures up to the attempt ceiling; 404 and
    /// undecodable responses are returned immediately without consuming
    /// retry budget.
    pub async fn fetch_siblings(&self, handle: &str) -> Result<Vec<SiblingCharacter>, ApiError> {
        let url = self.siblings_url(handle)?;

        let mut delay = self.backoff.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.attempt(&url).await {
                Attempt::Ok(characters) => {
                    tracing::debug!(handle, count = characters.len(), "Siblings fetched");
                    return Ok(characters);
                }
                Attempt::Fail(err) => return Err(err),
                Attempt::Retry(message) => {
                    if attempt >= self.max_attempts {
                        return Err(ApiError::Transient {
                            attempts: attempt,
                            message,
                        });
                    }
                    tracing::warn!(
                        handle,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        %message,
                        "Transient API failure, retrying",
                    );
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay, &self.backoff);
                }
            }
        }
    }

    /// Issue one HTTP attempt while holding a request permit.
    ///
    /// The permit is released before any backoff sleep so waiting does
    /// not starve other callers.
    async fn attempt(&self, url: &Url) -> Attempt {
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("request permit pool is never closed");

        let response = match self
            .http
            .get(url.clone())
            .header("accept", "application/json")
            .header("authorization", format!("bearer {}", self.api_key))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(format!("Request failed: {e}")),
        };

        let status = response.status();
        match classify_status(status) {
            StatusClass::Success => {}
            StatusClass::NotFound => return Attempt::Fail(ApiError::NotFound),
            StatusClass::Retryable => {
                let body = response.text().await.unwrap_or_default();
                return Attempt::Retry(format!("Status {status}: {body}"));
            }
            StatusClass::Fatal => {
                let body = response.text().await.unwrap_or_default();
                return Attempt::Fail(ApiError::Malformed(format!(
                    "Unexpected status {status}: {body}"
                )));
            }
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Attempt::Retry(format!("Failed to read body: {e}")),
        };

        // An unknown handle is reported as 200 with a `null` body, not
        // only as a 404.
        match serde_json::from_str::<Option<Vec<SiblingCharacter>>>(&body) {
            Ok(Some(characters)) => Attempt::Ok(characters),
            Ok(None) => Attempt::Fail(ApiError::NotFound),
            Err(e) => Attempt::Fail(ApiError::Malformed(format!("Undecodable body: {e}"))),
        }
    }

    /// Build the siblings endpoint URL, percent-encoding the handle.
    fn siblings_url(&self, handle: &str) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .extend(["characters", handle, "siblings"]);
        Ok(url)
    }

    /// Number of request permits currently available (diagnostics).
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn client() -> LostarkClient {
        LostarkClient::new(ClientConfig::new("test-key")).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn siblings_url_joins_path() {
        let url = client().siblings_url("alice").unwrap();
        assert_eq!(
            url.as_str(),
            "https://developer-lostark.game.onstove.com/characters/alice/siblings"
        );
    }

    #[test]
    fn siblings_url_percent_encodes_handle() {
        let url = client().siblings_url("큰 도끼").unwrap();
        let path = url.path();
        assert!(path.starts_with("/characters/"));
        assert!(path.ends_with("/siblings"));
        assert!(!path.contains(' '), "spaces must be percent-encoded: {path}");
        assert!(path.is_ascii(), "non-ASCII must be percent-encoded: {path}");
    }

    #[test]
    fn rejects_unparsable_base_url() {
        let config = ClientConfig {
            base_url: "not a url".into(),
            ..ClientConfig::new("key")
        };
        assert_matches!(LostarkClient::new(config), Err(ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn permit_pool_matches_configured_ceiling() {
        let config = ClientConfig {
            max_concurrency: 2,
            ..ClientConfig::new("key")
        };
        let client = LostarkClient::new(config).unwrap();
        assert_eq!(client.available_permits(), 2);
    }

    #[test]
    fn zero_concurrency_is_clamped_to_one() {
        let config = ClientConfig {
            max_concurrency: 0,
            ..ClientConfig::new("key")
        };
        let client = LostarkClient::new(config).unwrap();
        assert_eq!(client.available_permits(), 1);
    }
}
