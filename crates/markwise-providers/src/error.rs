//! Provider error types.
//!
//! The error enum lives in `markwise-core` so the scorer can return it
//! without depending on this crate; it is re-exported here for callers that
//! only construct providers.

pub use markwise_core::error::ProviderError;

use std::time::Duration;

/// Timeout applied to every HTTP assessor request.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Build the shared HTTP client used by the HTTP assessors.
pub(crate) fn http_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::NetworkError(format!("failed to build HTTP client: {e}")))
}

/// Map a transport failure from reqwest.
pub(crate) fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

/// Pass successful responses through and map error statuses.
///
/// `detail` turns the raw error body into a message; providers use it to
/// pull the message out of their JSON error envelope.
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
    detail: fn(String) -> String,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }
    if status == 429 {
        let header = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok());
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after_ms(header),
        });
    }
    if status == 404 {
        return Err(ProviderError::ModelNotFound(model.to_string()));
    }
    let body = response.text().await.unwrap_or_default();
    if status == 401 {
        return Err(ProviderError::AuthenticationFailed(body));
    }
    Err(ProviderError::ApiError {
        status,
        message: detail(body),
    })
}

/// `Retry-After` seconds in milliseconds, 5s when absent or unparseable.
fn retry_after_ms(header: Option<&str>) -> u64 {
    header
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(5)
        .saturating_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_defaults_to_five_seconds() {
        assert_eq!(retry_after_ms(None), 5000);
        assert_eq!(retry_after_ms(Some("soon")), 5000);
        assert_eq!(retry_after_ms(Some(" 12 ")), 12_000);
    }

    #[test]
    fn huge_retry_after_saturates() {
        assert_eq!(retry_after_ms(Some(&u64::MAX.to_string())), u64::MAX);
        assert_eq!(retry_after_ms(Some("18446744073709552")), u64::MAX);
    }
}
