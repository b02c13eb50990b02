// src/error.rs
//! Application error types with structured error handling.
//!
//! Failures coming back from Notion are classified once, here, into the
//! vocabulary the rest of the exporter dispatches on: rate limiting and
//! transient unavailability are retried, not-found and validation failures
//! degrade to empty content, everything else aborts the affected root.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded
    RateLimited,
    /// The requested object does not exist or is not shared with the integration
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// Notion could not reach its database
    DatabaseConnectionUnavailable,
    /// Notion timed out while handling the request
    GatewayTimeout,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            "database_connection_unavailable" => Self::DatabaseConnectionUnavailable,
            "gateway_timeout" => Self::GatewayTimeout,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            404 => Self::ObjectNotFound,
            other => Self::HttpStatus(other),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// Server overload or timeout; the same request may succeed later.
    pub fn is_transiently_unavailable(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable
                | Self::DatabaseConnectionUnavailable
                | Self::GatewayTimeout
                | Self::InternalError
                | Self::HttpStatus(502..=504)
        )
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.is_rate_limited() || self.is_transiently_unavailable()
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::DatabaseConnectionUnavailable => write!(f, "database_connection_unavailable"),
            Self::GatewayTimeout => write!(f, "gateway_timeout"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: u16,
        /// Seconds the server asked us to wait, from the `Retry-After` header.
        retry_after: Option<Duration>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parent '{parent_id}' of '{child_id}' has no composed path yet")]
    MissingParentPath { child_id: String, parent_id: String },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// The Notion error code, when the failure came from the API itself.
    pub fn notion_code(&self) -> Option<&NotionErrorCode> {
        match self {
            AppError::NotionService { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.notion_code().is_some_and(NotionErrorCode::is_rate_limited)
    }

    /// Service overload, gateway timeouts, and client-side request timeouts.
    pub fn is_transiently_unavailable(&self) -> bool {
        match self {
            AppError::NotionService { code, .. } => code.is_transiently_unavailable(),
            AppError::NetworkFailure(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// The default predicate for the retry policy.
    pub fn is_retryable(&self) -> bool {
        self.is_rate_limited() || self.is_transiently_unavailable()
    }

    pub fn is_not_found(&self) -> bool {
        self.notion_code().is_some_and(NotionErrorCode::is_not_found)
    }

    /// Not-found or validation failure: how Notion answers for linked databases.
    pub fn is_inaccessible(&self) -> bool {
        self.notion_code()
            .is_some_and(|code| code.is_not_found() || code.is_validation())
    }

    /// Server-directed wait before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AppError::NotionService { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Short description of why a retry is happening, for the retry log line.
    pub fn retry_reason(&self) -> &'static str {
        if self.is_rate_limited() {
            "rate limit exceeded"
        } else if matches!(self, AppError::NetworkFailure(_)) {
            "request timeout"
        } else {
            "service unavailable"
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
pub(crate) fn service_error(code: NotionErrorCode, retry_after: Option<Duration>) -> AppError {
    AppError::NotionService {
        message: format!("{} from test", code),
        code,
        status: 400,
        retry_after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_vocabulary() {
        assert_eq!(
            NotionErrorCode::from_api_response("gateway_timeout"),
            NotionErrorCode::GatewayTimeout
        );
        assert_eq!(
            NotionErrorCode::from_api_response("something_new"),
            NotionErrorCode::Unknown("something_new".to_string())
        );
        assert_eq!(
            NotionErrorCode::from_api_response("database_connection_unavailable").to_string(),
            "database_connection_unavailable"
        );
    }

    #[test]
    fn test_retry_classification() {
        let retryable = [
            NotionErrorCode::RateLimited,
            NotionErrorCode::ServiceUnavailable,
            NotionErrorCode::DatabaseConnectionUnavailable,
            NotionErrorCode::GatewayTimeout,
            NotionErrorCode::InternalError,
            NotionErrorCode::HttpStatus(504),
        ];
        for code in retryable {
            assert!(service_error(code.clone(), None).is_retryable(), "{}", code);
        }

        let terminal = [
            NotionErrorCode::ObjectNotFound,
            NotionErrorCode::ValidationFailed,
            NotionErrorCode::RestrictedResource,
            NotionErrorCode::Unauthorized,
            NotionErrorCode::HttpStatus(400),
        ];
        for code in terminal {
            assert!(!service_error(code.clone(), None).is_retryable(), "{}", code);
        }
    }

    #[test]
    fn test_http_status_fallback() {
        assert!(NotionErrorCode::from_http_status(429).is_rate_limited());
        assert!(NotionErrorCode::from_http_status(404).is_not_found());
        assert!(NotionErrorCode::from_http_status(504).is_transiently_unavailable());
        assert!(!NotionErrorCode::from_http_status(500).is_transiently_unavailable());
    }

    #[test]
    fn test_inaccessible_covers_not_found_and_validation() {
        assert!(service_error(NotionErrorCode::ObjectNotFound, None).is_inaccessible());
        assert!(service_error(NotionErrorCode::ValidationFailed, None).is_inaccessible());
        assert!(!service_error(NotionErrorCode::RateLimited, None).is_inaccessible());
        assert!(!AppError::MalformedResponse("x".into()).is_inaccessible());
    }

    #[test]
    fn test_retry_after_is_exposed() {
        let err = service_error(NotionErrorCode::RateLimited, Some(Duration::from_secs(2)));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
        assert_eq!(err.retry_reason(), "rate limit exceeded");
    }
}
