use crate::core::config::ExchangeConfig;
use crate::core::currency::CurrencyCodes;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, Signer};
use crate::exchanges::qtrade::connector::QtradeConnector;
use crate::exchanges::qtrade::errors::EXCHANGE_ID;
use crate::exchanges::qtrade::request::RequestBuilder;
use crate::exchanges::qtrade::rest::QtradeRest;
use crate::exchanges::qtrade::signer::QtradeSigner;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://api.qtrade.io";

/// Builder for creating qTrade connectors
///
/// Without credentials the connector can only reach public endpoints;
/// private calls fail with `ExchangeError::AuthError` before any request
/// is sent.
#[derive(Debug)]
pub struct QtradeBuilder {
    config: ExchangeConfig,
    rest_timeout: u64,
    codes: CurrencyCodes,
}

impl Default for QtradeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QtradeBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            rest_timeout: 30,
            codes: CurrencyCodes::new(),
        }
    }

    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set API credentials, keeping any base URL already configured
    pub fn with_credentials(mut self, api_key: String, secret_key: String) -> Self {
        let base_url = self.config.base_url.take();
        self.config = ExchangeConfig::new(api_key, secret_key);
        self.config.base_url = base_url;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// REST timeout in seconds
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    /// Replace the native-to-unified currency alias table
    pub fn with_currency_codes(mut self, codes: CurrencyCodes) -> Self {
        self.codes = codes;
        self
    }

    fn base_url(&self) -> String {
        self.config
            .base_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    fn signer(&self) -> Option<Arc<dyn Signer>> {
        self.config.has_credentials().then(|| {
            Arc::new(QtradeSigner::new(
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
            )) as Arc<dyn Signer>
        })
    }

    /// Build a connector over the reqwest transport
    pub fn build(self) -> Result<QtradeConnector<ReqwestRest>, ExchangeError> {
        let rest_config = RestClientConfig::new(self.base_url(), EXCHANGE_ID.to_string())
            .with_timeout(self.rest_timeout);
        let transport = RestClientBuilder::new(rest_config).build()?;
        Ok(self.build_with_transport(transport))
    }

    /// Build a connector over a caller-supplied transport
    pub fn build_with_transport<R: RestClient>(self, transport: R) -> QtradeConnector<R> {
        let requests = RequestBuilder::new(self.base_url(), self.signer());
        QtradeConnector::new(QtradeRest::new(transport, requests), self.codes)
    }
}

/// Create a qTrade connector from configuration
pub fn create_qtrade_connector(
    config: ExchangeConfig,
) -> Result<QtradeConnector<ReqwestRest>, ExchangeError> {
    QtradeBuilder::new().with_config(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_credentials() {
        let connector = create_qtrade_connector(ExchangeConfig::read_only());
        assert!(connector.is_ok());
    }

    #[test]
    fn test_base_url_defaults_and_overrides() {
        assert_eq!(QtradeBuilder::new().base_url(), DEFAULT_BASE_URL);

        let builder = QtradeBuilder::new().with_base_url("http://localhost:8080".to_string());
        assert_eq!(builder.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_credentials_keep_base_url() {
        let builder = QtradeBuilder::new()
            .with_base_url("http://localhost:8080".to_string())
            .with_credentials("key".to_string(), "secret".to_string());
        assert_eq!(builder.base_url(), "http://localhost:8080");
        assert!(builder.signer().is_some());
        assert!(QtradeBuilder::new().signer().is_none());
    }

    #[test]
    fn test_build_with_rest_timeout() {
        let connector = QtradeBuilder::new()
            .with_credentials("key".to_string(), "secret".to_string())
            .with_rest_timeout(5)
            .build();
        assert!(connector.is_ok());
    }
}
