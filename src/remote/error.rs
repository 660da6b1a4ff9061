//! Error mapping for the remote bug list endpoint.

use std::fmt;

use reqwest::StatusCode;

use crate::error::BugdeckError;

/// Fallback wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// A non-success response from the bug list endpoint.
#[derive(Debug)]
pub struct ApiError {
    pub status: Option<StatusCode>,
    /// Retry-After header value in seconds, if present.
    pub retry_after: Option<u64>,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            retry_after: None,
            message: message.into(),
        }
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status: Some(status),
            retry_after: None,
            message: message.into(),
        }
    }

    pub fn with_retry_after(mut self, seconds: Option<u64>) -> Self {
        self.retry_after = seconds;
        self
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(StatusCode::TOO_MANY_REQUESTS)
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status,
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    pub fn to_bugdeck_error(&self) -> BugdeckError {
        if self.is_rate_limited() {
            return BugdeckError::RateLimited(
                self.retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            );
        }
        if self.is_auth_failure() {
            return BugdeckError::Auth(self.message.clone());
        }
        BugdeckError::Api(self.message.clone())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ApiError> for BugdeckError {
    fn from(error: ApiError) -> Self {
        error.to_bugdeck_error()
    }
}

/// Parse a `Retry-After` header given in seconds.
pub fn parse_retry_after(value: Option<&reqwest::header::HeaderValue>) -> Option<u64> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}
