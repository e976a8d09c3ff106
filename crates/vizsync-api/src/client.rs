//! Dashboard server HTTP client
//!
//! Provides a typed HTTP client for the server's REST API. Handles the
//! `Authorization: Key` header, JSON bodies, error message extraction and
//! `429` retries.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vizsync_api::client::RedashClient;
//! use vizsync_core::domain::QueryId;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = RedashClient::new("https://redash.example.com").with_api_key("secret");
//! let destinations = vizsync_api::destinations::list(&client, QueryId::new(12)).await?;
//! println!("{} destinations", destinations.len());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::retry::{parse_retry_after, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_AFTER};
use crate::ApiError;

/// Error body the server sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// HTTP client for the server's REST API
///
/// Wraps `reqwest::Client` with key authentication and base URL handling.
#[derive(Debug, Clone)]
pub struct RedashClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL without a trailing slash
    base_url: String,
    /// API key sent as `Authorization: Key <key>`
    api_key: Option<String>,
    /// 429 retries before giving up
    max_retries: u32,
}

impl RedashClient {
    /// Creates an unauthenticated client for `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overrides the number of 429 retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an authenticated request builder for `path` (e.g. `/api/queries/1`)
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.authorize(self.client.request(method, url))
    }

    /// Resolves a link relative to the server root, leaving absolute URLs alone
    pub fn absolute_url(&self, link: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(link) {
            return Ok(url);
        }
        let base = Url::parse(&format!("{}/", self.base_url))
            .with_context(|| format!("Invalid server URL {}", self.base_url))?;
        base.join(link.trim_start_matches('/'))
            .with_context(|| format!("Invalid link {link}"))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header(reqwest::header::AUTHORIZATION, format!("Key {key}")),
            None => builder,
        }
    }

    /// Sends the request built by `build`, retrying on `429`.
    ///
    /// `build` is called once per attempt since request bodies cannot be
    /// replayed. Non-success responses are turned into [`ApiError`] with the
    /// server's message.
    pub async fn execute_with_retry<F>(&self, label: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        for attempt in 0..=self.max_retries {
            let response = build()
                .send()
                .await
                .map_err(ApiError::NetworkError)
                .with_context(|| format!("Failed to send {label}"))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .map(|v| parse_retry_after(v, DEFAULT_RETRY_AFTER))
                    .unwrap_or(DEFAULT_RETRY_AFTER);

                if attempt >= self.max_retries {
                    warn!(label, attempts = attempt + 1, "429 retry limit exhausted");
                    return Err(ApiError::TooManyRequests { retry_after })
                        .with_context(|| format!("{label} throttled"));
                }

                info!(
                    label,
                    attempt,
                    retry_after_ms = retry_after.as_millis() as u64,
                    "Received 429, backing off"
                );
                tokio::time::sleep(retry_after).await;
                continue;
            }

            if !status.is_success() {
                let message = error_message(response).await;
                debug!(label, status = status.as_u16(), message = %message, "Request rejected");
                return Err(ApiError::from_status(status, message)).context(label.to_string());
            }

            if attempt > 0 {
                info!(label, attempt, "Request succeeded after retry");
            }
            return Ok(response);
        }

        Err(anyhow::anyhow!(
            "Request failed: retry loop exited unexpectedly for {label}"
        ))
    }

    /// GETs `path` and decodes the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let label = format!("GET {path}");
        let response = self
            .execute_with_retry(&label, || self.request(Method::GET, path).query(query))
            .await?;
        decode(response, &label).await
    }

    /// POSTs `body` as JSON to `path` and decodes the JSON answer
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let label = format!("POST {path}");
        let response = self
            .execute_with_retry(&label, || self.request(Method::POST, path).json(body))
            .await?;
        decode(response, &label).await
    }

    /// DELETEs `path`, ignoring any body
    pub async fn delete(&self, path: &str) -> Result<()> {
        let label = format!("DELETE {path}");
        self.execute_with_retry(&label, || self.request(Method::DELETE, path))
            .await?;
        Ok(())
    }

    /// GETs an absolute or root-relative link and decodes the JSON body
    pub async fn get_link_json<T: DeserializeOwned>(&self, link: &str) -> Result<T> {
        let url = self.absolute_url(link)?;
        let label = format!("GET {}", url.path());
        let response = self
            .execute_with_retry(&label, || {
                self.authorize(self.client.request(Method::GET, url.clone()))
            })
            .await?;
        decode(response, &label).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response, label: &str) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(ApiError::NetworkError)
        .with_context(|| format!("Failed to read {label} response"))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
        .with_context(|| format!("Failed to parse {label} response"))
}

/// Extracts `message` (or `error`) from an error body, falling back to the raw text
async fn error_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            error: Some(error), ..
        }) => error,
        _ => text.trim().to_string(),
    }
}
