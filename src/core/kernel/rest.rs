use crate::core::errors::ExchangeError;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// A fully built request ready to go over the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: Method,
    /// Absolute URL including any query string
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

/// Status code and body text of a completed exchange call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// REST transport trait
///
/// The transport only moves bytes. Signing happens before `send` and error
/// classification after it, so any HTTP stack (or a recording fake in tests)
/// can sit behind this trait.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Send the request and return the raw status and body
    ///
    /// Non-2xx responses are returned as `Ok`; only transport failures are
    /// errors.
    async fn send(&self, request: SignedRequest) -> Result<RawResponse, ExchangeError>;
}

#[async_trait]
impl<T: RestClient + ?Sized> RestClient for std::sync::Arc<T> {
    async fn send(&self, request: SignedRequest) -> Result<RawResponse, ExchangeError> {
        (**self).send(request).await
    }
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 30,
            user_agent: concat!("qtrade-connector/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(
        skip(self, request),
        fields(exchange = %self.config.exchange_name, method = %request.method, url = %request.url)
    )]
    async fn send(&self, request: SignedRequest) -> Result<RawResponse, ExchangeError> {
        debug!("Sending request");
        let mut builder = self.client.request(request.method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!(status, "Response body: {}", body);
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(RawResponse::new(200, "{}").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(400, "{}").is_success());
        assert!(!RawResponse::new(503, "").is_success());
    }

    #[test]
    fn config_defaults() {
        let config = RestClientConfig::new("https://api.qtrade.io".to_string(), "qtrade".to_string())
            .with_timeout(5);
        assert_eq!(config.timeout_seconds, 5);
        assert!(config.user_agent.starts_with("qtrade-connector/"));
    }

    #[test]
    fn builder_produces_client() {
        let config = RestClientConfig::new("https://api.qtrade.io".to_string(), "qtrade".to_string());
        let rest = RestClientBuilder::new(config).build().unwrap();
        assert_eq!(rest.config().exchange_name, "qtrade");
        assert!(format!("{:?}", rest).contains("ReqwestRest"));
    }
}
