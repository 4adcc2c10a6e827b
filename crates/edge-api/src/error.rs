//! Transport and API error types.
//!
//! Every resource client funnels its transport outcome through [`classify`],
//! which sorts failures into two buckets: server-side failures (no response at
//! all, or a status of 500 and above) and everything else.

use thiserror::Error;

use crate::Response;

/// Errors raised by the HTTP transport before a response is available.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to send the request or read the response.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

/// Classified outcome of a failed API call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response, or the service answered with a 5xx status.
    #[error("{resource} request failed: internal server error, please try again later")]
    ServerFailure { resource: &'static str },

    /// The service rejected the request (4xx and any other non-success status).
    #[error("{resource} request failed with HTTP {status}: {body}")]
    Rejected {
        resource: &'static str,
        status: u16,
        body: String,
    },

    /// A successful response whose body could not be decoded.
    #[error("unexpected {resource} response: {message}")]
    Decode {
        resource: &'static str,
        message: String,
    },

    /// Rejected locally before any request was sent.
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl ApiError {
    /// HTTP status attached to a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service reported the entity as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether this is the generic server-side failure.
    pub fn is_server_failure(&self) -> bool {
        matches!(self, ApiError::ServerFailure { .. })
    }
}

/// Sort a transport outcome into success or a classified [`ApiError`].
///
/// Transport detail and 5xx bodies are logged at debug level and never
/// surfaced; other failures keep the raw body for diagnostics.
pub fn classify(
    resource: &'static str,
    outcome: Result<Response, FetchError>,
) -> Result<Response, ApiError> {
    match outcome {
        Err(FetchError::InvalidUrl(url)) => {
            Err(ApiError::Invalid(format!("invalid API URL: {}", url)))
        }
        Err(FetchError::JsonError(message)) => Err(ApiError::Invalid(message)),
        Err(err) => {
            tracing::debug!(resource, error = %err, "no response from API");
            Err(ApiError::ServerFailure { resource })
        }
        Ok(response) if response.is_success() => Ok(response),
        Ok(response) if response.is_server_error() => {
            tracing::debug!(
                resource,
                status = response.status,
                body = %response.text_lossy(),
                "server-side failure"
            );
            Err(ApiError::ServerFailure { resource })
        }
        Ok(response) => Err(ApiError::Rejected {
            resource,
            status: response.status,
            body: response.text_lossy(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn response(status: u16, body: &str) -> Response {
        Response::new(status, HashMap::new(), body.as_bytes().to_vec())
    }

    #[test]
    fn test_classify_success_passes_through() {
        let resp = classify("edge function", Ok(response(200, "{}"))).unwrap();
        assert_eq!(resp.status, 200);
    }

    #[test]
    fn test_classify_no_response_is_server_failure() {
        let err = classify("edge function", Err(FetchError::Timeout)).unwrap_err();
        assert!(err.is_server_failure());

        let err = classify(
            "edge service",
            Err(FetchError::RequestError("connection refused".into())),
        )
        .unwrap_err();
        assert!(err.is_server_failure());
    }

    #[test]
    fn test_classify_bad_url_is_local() {
        let err = classify(
            "edge function",
            Err(FetchError::InvalidUrl("not a url".into())),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
    }

    #[test]
    fn test_classify_5xx_ignores_body() {
        for status in [500, 502, 503, 599, 600] {
            let err = classify(
                "edge function",
                Ok(response(status, r#"{"detail": "database exploded"}"#)),
            )
            .unwrap_err();
            assert!(err.is_server_failure());
            assert!(!err.to_string().contains("database"));
        }
    }

    #[test]
    fn test_classify_4xx_keeps_body() {
        let err = classify(
            "edge function",
            Ok(response(400, r#"{"name": ["required"]}"#)),
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains(r#"{"name": ["required"]}"#));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_classify_not_found() {
        let err = classify("edge service", Ok(response(404, "Not Found"))).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "edge service request failed with HTTP 404: Not Found"
        );
    }

    #[test]
    fn test_server_failure_message_is_generic() {
        let err = ApiError::ServerFailure {
            resource: "edge function",
        };
        assert_eq!(
            err.to_string(),
            "edge function request failed: internal server error, please try again later"
        );
    }
}
