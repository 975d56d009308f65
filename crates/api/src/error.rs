//! API error types

use thiserror::Error;

/// Errors surfaced by backend API calls
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The backend returned HTTP 401; the bearer token is missing or invalid
    #[error("Authentication required. Please enter a valid token.")]
    AuthRequired,

    /// The backend reported a failure, either via a non-2xx status or an
    /// envelope with `success: false`
    #[error("{0}")]
    Server(String),

    /// Non-2xx status with no usable error message in the body
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (connect, DNS, I/O)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body was not a valid envelope
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Type alias for API results
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_required_display() {
        let msg = format!("{}", ApiError::AuthRequired);
        assert!(msg.contains("Authentication required"));
    }

    #[test]
    fn test_server_error_passes_message_through() {
        let err = ApiError::Server("container not found".to_string());
        assert_eq!(format!("{}", err), "container not found");
    }

    #[test]
    fn test_http_error_display() {
        let err = ApiError::Http {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("503"));
        assert!(msg.contains("Service Unavailable"));
    }
}
