use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// Generic exchange-side rejection. `message` carries the raw body.
    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

impl ExchangeError {
    /// True for errors raised by the exchange itself rather than locally.
    pub const fn is_exchange_error(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailure(_) | Self::InsufficientFunds(_) | Self::ApiError { .. }
        )
    }
}
