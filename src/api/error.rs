//! API Error Types
//!
//! Errors returned by the backend client and the rule for turning them into
//! the message a user sees in a toast.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection refused, DNS failure, TLS failure
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    /// 401 from the backend; the session token is missing or expired
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("session expired"))]
    Unauthorized { message: Option<String> },

    /// 404 from the backend
    #[error("Not found: {endpoint}")]
    NotFound {
        endpoint: String,
        message: Option<String>,
    },

    /// Any other non-success status
    #[error("API error {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },

    /// The response body did not match the expected shape
    #[error("Unexpected response from {endpoint}: {error}")]
    Decode { endpoint: String, error: String },

    /// A call that needs a session was made while logged out
    #[error("Not logged in")]
    NotAuthenticated,

    /// The client could not be constructed from its configuration
    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ApiError {
    /// Message from the backend's error body, falling back to `fallback`.
    ///
    /// Errors with no body (network, timeout, decode) always use the fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        let backend = match self {
            ApiError::Unauthorized { message }
            | ApiError::NotFound { message, .. }
            | ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        };

        match backend.map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status when the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller should drop its session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Unavailable(e.to_string())
        } else {
            ApiError::Request(e)
        }
    }

    pub(crate) fn from_status(status: u16, endpoint: &str, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            401 => ApiError::Unauthorized { message },
            404 => ApiError::NotFound {
                endpoint: endpoint.to_string(),
                message,
            },
            _ => ApiError::Status { status, message },
        }
    }
}

/// Error bodies come back as `{"message": ...}` from the API's own handlers
/// and as problem details (`{"title": ...}`) from the framework's validators.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.message.or(parsed.title).filter(|m| !m.trim().is_empty())
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
