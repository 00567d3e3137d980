//! Error handling module for the club admin client.
//!
//! Every failure is collapsed into [`AppError`], whose message is what the
//! admin screens show in their banner.

use serde::Deserialize;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const BUSY: &str = "BUSY";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The request never produced a response
    Network(String),
    /// The backend answered with a non-success status
    Server { status: u16, message: String },
    /// The backend rejected our credentials or session
    Unauthorized(String),
    /// Client-side validation failed; no request was sent
    Validation(String),
    /// The response body did not have the expected shape
    Decode(String),
    /// A submission is already in flight for this draft
    Busy,
    /// Invalid configuration
    Config(String),
    /// Local I/O outside of file attachments, e.g. the console prompt
    Io(String),
}

impl AppError {
    /// HTTP status carried by the error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Server { status, .. } => Some(*status),
            AppError::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Network(_) => codes::NETWORK_ERROR,
            AppError::Server { .. } => codes::SERVER_ERROR,
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Decode(_) => codes::DECODE_ERROR,
            AppError::Busy => codes::BUSY,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Io(_) => codes::IO_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Network(msg) => msg.clone(),
            AppError::Server { message, .. } => message.clone(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Decode(msg) => msg.clone(),
            AppError::Busy => "A submission is already in progress".to_string(),
            AppError::Config(msg) => msg.clone(),
            AppError::Io(msg) => msg.clone(),
        }
    }

    /// Whether the error was raised before any request left the client.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Busy | AppError::Config(_) | AppError::Io(_)
        )
    }

    /// Message to show in the UI.
    ///
    /// Server-reported and client-side messages are shown verbatim. Transport
    /// and decoding failures, and server errors without a message, get the
    /// generic `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Server { message, .. } | AppError::Unauthorized(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::Busy => self.message(),
            _ => fallback.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("HTTP error: {:?}", err);
        if err.is_decode() {
            AppError::Decode(format!("Invalid response body: {}", err))
        } else {
            AppError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("IO error: {:?}", err);
        AppError::Validation(format!("Could not read file: {}", err))
    }
}

/// Error body as returned by the club backend.
///
/// Only `message` is relied upon; some routes use `error` instead.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Build an [`AppError`] from a failed response.
    pub fn into_error(self, status: u16) -> AppError {
        let message = self
            .message
            .or(self.error)
            .map(|m| m.trim().to_string())
            .unwrap_or_default();

        if status == 401 || status == 403 {
            AppError::Unauthorized(message)
        } else {
            AppError::Server { status, message }
        }
    }

    /// Extract the error body from an arbitrary JSON value.
    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_message_is_verbatim() {
        let err = ErrorBody::from_value(&json!({ "message": "Name already taken" })).into_error(400);
        assert_eq!(err.user_message("Failed to save member"), "Name already taken");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_server_without_message_uses_fallback() {
        let err = ErrorBody::from_value(&json!({})).into_error(500);
        assert_eq!(err.user_message("Failed to fetch members"), "Failed to fetch members");
    }

    #[test]
    fn test_network_error_uses_fallback() {
        let err = AppError::Network("connection refused".to_string());
        assert_eq!(err.user_message("Failed to delete honor"), "Failed to delete honor");
        assert!(!err.is_client_side());
    }

    #[test]
    fn test_unauthorized_mapping() {
        let err = ErrorBody::from_value(&json!({ "error": "Invalid token" })).into_error(401);
        assert_eq!(err, AppError::Unauthorized("Invalid token".to_string()));
        assert_eq!(err.error_code(), codes::UNAUTHORIZED);
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::Validation("Member name is required".to_string());
        assert_eq!(err.to_string(), "VALIDATION_ERROR: Member name is required");
        assert!(err.is_client_side());
    }

    #[test]
    fn test_io_error_is_not_a_validation_error() {
        let err = AppError::Io("Could not use the terminal: broken pipe".to_string());
        assert_eq!(err.error_code(), codes::IO_ERROR);
        assert_eq!(err.user_message("Failed to delete member"), "Failed to delete member");
        assert!(err.is_client_side());
    }
}
