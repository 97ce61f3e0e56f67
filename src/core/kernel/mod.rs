/// Transport kernel shared by exchange adapters
///
/// The kernel holds only exchange-agnostic plumbing:
///
/// - `Signer`: pluggable request authentication
/// - `RestClient`: byte-level HTTP transport (`SignedRequest` in, `RawResponse` out)
/// - `ReqwestRest`: the default reqwest-backed transport
///
/// # Example
/// ```rust,no_run
/// use qtrade_connector::core::kernel::*;
/// use reqwest::Method;
/// use std::collections::HashMap;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RestClientConfig::new("https://api.qtrade.io".to_string(), "qtrade".to_string());
/// let rest = RestClientBuilder::new(config).build()?;
///
/// let response = rest
///     .send(SignedRequest {
///         method: Method::GET,
///         url: "https://api.qtrade.io/v1/tickers".to_string(),
///         headers: HashMap::new(),
///         body: None,
///     })
///     .await?;
/// println!("{} {}", response.status, response.body);
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

pub use rest::{RawResponse, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, SignedRequest};
pub use signer::{SignatureResult, Signer};
