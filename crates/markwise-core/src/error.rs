//! Error types shared across markwise.
//!
//! `ProviderError` covers failures of the assessor call itself and is the
//! only error `Scorer::evaluate` surfaces. `JudgmentError` describes why an
//! assessor response could not be read; it is always recovered internally
//! by substituting the fallback judgment.

use thiserror::Error;

use crate::model::Dimension;

/// Errors that can occur when calling an assessor backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if retrying the same evaluation cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// Reasons an assessor response could not be read as a judgment.
#[derive(Debug, Error)]
pub enum JudgmentError {
    /// The response body is not valid JSON.
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The response parsed, but its top level is not an object.
    #[error("judgment must be a JSON object")]
    NotAnObject,

    /// A dimension is present but is not an object.
    #[error("the '{0}' dimension is not an object")]
    MalformedDimension(Dimension),
}
