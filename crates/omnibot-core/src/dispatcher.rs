use crate::config::ClientConfig;
use crate::error::{ChatError, Result};
use crate::fallback::FallbackTable;
use crate::types::{Category, Params, RawResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Sends one request for an extracted intent.
#[async_trait]
pub trait Dispatch: Send + Sync {
    /// Perform the request for `category`. Transport failures are folded into
    /// the returned [`RawResponse`]; an `Err` means something unexpected.
    async fn dispatch(&self, category: Category, params: &Params) -> Result<RawResponse>;
}

/// HTTP dispatcher for the `/api` backend.
pub struct Dispatcher {
    client: reqwest::Client,
    api_base: String,
    timeout: Duration,
    fallback_enabled: bool,
    fallbacks: FallbackTable,
}

impl Dispatcher {
    pub fn new(config: &ClientConfig, fallbacks: FallbackTable) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("omnibot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let fallback_enabled = config.fallback_enabled();
        debug!(
            "Dispatcher for {} (origin {}, fallback {})",
            config.api_base,
            config.resolved_origin_host(),
            if fallback_enabled { "on" } else { "off" }
        );
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            fallback_enabled,
            fallbacks,
        })
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn fallback_enabled(&self) -> bool {
        self.fallback_enabled
    }

    /// Full URL for a category's endpoint.
    pub fn endpoint_url(&self, category: Category) -> Option<String> {
        category
            .endpoint()
            .map(|path| format!("{}{}", self.api_base, path))
    }

    /// Query the backend's health endpoint.
    pub async fn health(&self) -> Result<Value> {
        let url = format!("{}/health", self.api_base);
        let fut = async {
            let resp = self.client.get(&url).send().await?.error_for_status()?;
            Ok::<_, ChatError>(resp.json::<Value>().await?)
        };
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| ChatError::Transport(format!("{} timed out", url)))?
    }

    /// POST `params` to `url`, bounded by the timeout. Dropping the inner
    /// future on expiry aborts the request.
    async fn send(&self, url: &str, params: &Params) -> Result<Value> {
        let fut = async {
            let resp = self
                .client
                .post(url)
                .json(params)
                .send()
                .await
                .map_err(|e| ChatError::Transport(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                debug!("API error {}: {}", status, body);
                return Err(ChatError::Transport(format!("API error: {}", status)));
            }

            resp.json::<Value>()
                .await
                .map_err(|e| ChatError::Transport(format!("Invalid response body: {}", e)))
        };

        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ChatError::Transport(format!(
                "Request timed out after {:?}",
                self.timeout
            ))),
        }
    }

    /// Turn a failed request into a fallback payload, or `NoResponse` when
    /// running against a local development host.
    ///
    /// Logs only at debug level; the loading placeholder still occupies the
    /// terminal line when this runs.
    fn recover(&self, category: Category, err: &ChatError) -> RawResponse {
        debug!("API call for {} failed: {}", category, err);
        if self.fallback_enabled {
            debug!("Using fallback demo response for {}", category);
            RawResponse::Fallback(self.fallbacks.get(category))
        } else {
            RawResponse::NoResponse
        }
    }
}

#[async_trait]
impl Dispatch for Dispatcher {
    async fn dispatch(&self, category: Category, params: &Params) -> Result<RawResponse> {
        let url = match self.endpoint_url(category) {
            Some(url) if params.category() == category => url,
            _ => {
                let err = ChatError::Transport(format!(
                    "No endpoint for {} with {} parameters",
                    category,
                    params.category()
                ));
                return Ok(self.recover(category, &err));
            }
        };

        debug!("Calling API endpoint: {} {}", url, serde_json::to_string(params)?);

        match self.send(&url, params).await {
            Ok(value) => Ok(RawResponse::Payload(value)),
            Err(e) => Ok(self.recover(category, &e)),
        }
    }
}
