use crate::core::errors::ExchangeError;
use crate::core::kernel::{SignedRequest, Signer};
use crate::core::time::now_millis;
use crate::exchanges::qtrade::endpoints::{Access, Endpoint};
use reqwest::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub const API_VERSION: &str = "v1";

/// Request parameters keyed by name
pub type Params = Map<String, Value>;

/// Turns an endpoint plus parameters into a wire-ready `SignedRequest`.
///
/// Path placeholders consume their parameters. Whatever remains goes to the
/// query string on GET or to a JSON body on POST. Private endpoints live
/// under `/v1/user/` and are signed.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    signer: Option<Arc<dyn Signer>>,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("has_signer", &self.signer.is_some())
            .finish()
    }
}

impl RequestBuilder {
    pub fn new(base_url: impl Into<String>, signer: Option<Arc<dyn Signer>>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signer,
        }
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    pub fn build(&self, endpoint: Endpoint, params: Params) -> Result<SignedRequest, ExchangeError> {
        let timestamp = match endpoint.access() {
            Access::Public => 0,
            Access::Private => now_millis()?,
        };
        self.build_at(endpoint, params, timestamp)
    }

    /// Same as [`build`](Self::build) with an explicit signing timestamp
    pub fn build_at(
        &self,
        endpoint: Endpoint,
        mut params: Params,
        timestamp: u64,
    ) -> Result<SignedRequest, ExchangeError> {
        let access = endpoint.access();
        let method = endpoint.method();

        let mut path = format!("/{}/", API_VERSION);
        if access == Access::Private {
            path.push_str("user/");
        }
        path.push_str(&implode_path(endpoint.path(), &mut params)?);

        let (query_string, body) = if method == Method::POST {
            (String::new(), Some(Value::Object(params).to_string()))
        } else {
            (urlencode(&params), None)
        };

        let mut headers = HashMap::new();
        if access == Access::Private {
            let signer = self.signer.as_ref().ok_or_else(|| {
                ExchangeError::AuthError(format!(
                    "Credentials required for private endpoint '{}'",
                    endpoint.path()
                ))
            })?;
            headers = signer.sign_request(
                method.as_str(),
                &path,
                &query_string,
                body.as_deref().unwrap_or_default().as_bytes(),
                timestamp,
            )?;
        }

        let mut url = format!("{}{}", self.base_url, path);
        if !query_string.is_empty() {
            url.push('?');
            url.push_str(&query_string);
        }

        Ok(SignedRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

/// Substitute `{name}` placeholders from `params`, removing the ones used.
fn implode_path(template: &str, params: &mut Params) -> Result<String, ExchangeError> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let end = rest[start..].find('}').map(|i| start + i).ok_or_else(|| {
            ExchangeError::InvalidParameters(format!("Unterminated placeholder in '{}'", template))
        })?;
        let name = &rest[start + 1..end];
        let value = params.remove(name).ok_or_else(|| {
            ExchangeError::InvalidParameters(format!("Missing path parameter '{}'", name))
        })?;

        path.push_str(&rest[..start]);
        path.push_str(&param_to_string(&value));
        rest = &rest[end + 1..];
    }
    path.push_str(rest);

    Ok(path)
}

fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn urlencode(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&param_to_string(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
