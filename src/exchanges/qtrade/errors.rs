use crate::core::errors::ExchangeError;
use crate::core::kernel::RawResponse;
use serde_json::Value;
use tracing::warn;

pub const EXCHANGE_ID: &str = "qtrade";

/// Exact error-code table. Codes not listed fall through to `ApiError`.
fn map_qtrade_error(code: &str, feedback: &str) -> Option<ExchangeError> {
    match code {
        "invalid_auth" => Some(ExchangeError::AuthenticationFailure(feedback.to_string())),
        "insuff_funds" => Some(ExchangeError::InsufficientFunds(feedback.to_string())),
        _ => None,
    }
}

fn error_code(entry: &Value) -> Option<String> {
    match entry.get("code")? {
        Value::String(code) => Some(code.clone()),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

/// Raise the typed error described by a decoded qTrade payload, if any.
///
/// Nothing is raised when the payload has no non-empty `errors` array. The
/// first entry whose code is in the exact table decides the error kind;
/// otherwise a generic `ApiError` carries the whole body.
pub fn classify(body: &str, payload: &Value) -> Result<(), ExchangeError> {
    let errors = match payload.get("errors").and_then(Value::as_array) {
        Some(errors) if !errors.is_empty() => errors,
        _ => return Ok(()),
    };

    let feedback = format!("{} {}", EXCHANGE_ID, body);
    let codes: Vec<String> = errors.iter().filter_map(error_code).collect();

    let error = codes
        .iter()
        .find_map(|code| map_qtrade_error(code, &feedback))
        .unwrap_or_else(|| ExchangeError::ApiError {
            code: codes.first().cloned().unwrap_or_else(|| "unknown".to_string()),
            message: feedback,
        });

    warn!(codes = ?codes, "qtrade rejected request: {}", error);
    Err(error)
}

/// Decode a raw response, classify it, and return the JSON payload.
///
/// An empty body decodes to `Value::Null`. A non-2xx status without a
/// recognisable error payload still fails with the status as the code.
pub fn interpret_response(response: &RawResponse) -> Result<Value, ExchangeError> {
    let feedback = || format!("{} {}", EXCHANGE_ID, response.body);

    let trimmed = response.body.trim();
    let payload = if trimmed.is_empty() {
        Value::Null
    } else {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(payload) => payload,
            Err(e) if response.is_success() => {
                return Err(ExchangeError::ParseError(format!(
                    "Invalid JSON from {}: {}",
                    EXCHANGE_ID, e
                )));
            }
            Err(_) => {
                return Err(ExchangeError::ApiError {
                    code: response.status.to_string(),
                    message: feedback(),
                });
            }
        }
    };

    classify(&response.body, &payload)?;

    if !response.is_success() {
        return Err(ExchangeError::ApiError {
            code: response.status.to_string(),
            message: feedback(),
        });
    }

    Ok(payload)
}
