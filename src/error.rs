//! Error type shared by every catalog request
//!
//! Callers only ever branch on `ApiError`: the retry wrapper decides whether a
//! failure is worth another attempt from it, and the front end uses the
//! attached HTTP status to tell "not found" and "rate limited" apart.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the movie catalog API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout)
    #[error("HTTP request failed: {0}")]
    Network(String),

    /// The API answered with a non-success status code
    #[error("Catalog API returned {status}: {message}")]
    Status {
        /// HTTP status code of the failed response
        status: u16,
        /// Message from the response body, or the canonical reason phrase
        message: String,
    },

    /// The response body did not match the expected schema
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// A request was rejected before being sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Builds a status error, falling back to the canonical reason phrase
    /// when the response carried no usable message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("An error occurred while fetching data")
                .to_string()
        });
        ApiError::Status { status, message }
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the catalog reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether the catalog is throttling us
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Network failures, request timeouts (408), throttling (429) and server
    /// errors (5xx) are retryable. Other client errors and schema mismatches
    /// will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => matches!(*status, 408 | 429 | 500..=599),
            ApiError::Malformed(_) | ApiError::InvalidRequest(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), None)
        } else if err.is_decode() {
            ApiError::Malformed(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessors() {
        let err = ApiError::from_status(404, Some("The resource you requested could not be found.".into()));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_rate_limited());

        let err = ApiError::from_status(429, None);
        assert!(err.is_rate_limited());
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_from_status_uses_reason_phrase_when_message_missing() {
        let err = ApiError::from_status(503, None);
        assert_eq!(
            err,
            ApiError::Status {
                status: 503,
                message: "Service Unavailable".to_string()
            }
        );

        let err = ApiError::from_status(500, Some("   ".into()));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Network("connection refused".into()).is_retryable());
        assert!(ApiError::from_status(408, None).is_retryable());
        assert!(ApiError::from_status(429, None).is_retryable());
        assert!(ApiError::from_status(500, None).is_retryable());
        assert!(ApiError::from_status(503, None).is_retryable());

        assert!(!ApiError::from_status(400, None).is_retryable());
        assert!(!ApiError::from_status(401, None).is_retryable());
        assert!(!ApiError::from_status(404, None).is_retryable());
        assert!(!ApiError::Malformed("missing field `id`".into()).is_retryable());
        assert!(!ApiError::InvalidRequest("empty query".into()).is_retryable());
    }

    #[test]
    fn test_non_status_errors_have_no_status() {
        assert_eq!(ApiError::Network("timeout".into()).status(), None);
        assert_eq!(ApiError::Malformed("bad".into()).status(), None);
    }

    #[test]
    fn test_serde_error_maps_to_malformed() {
        let err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        assert!(matches!(ApiError::from(err), ApiError::Malformed(_)));
    }
}
