//! Strongly typed error system for the storefront SDK.
//!
//! Every failure that prevents a decodable envelope from reaching the
//! orchestrator is an [`SdkError`] tagged with an [`ErrorCode`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Typed error codes for compile-time safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // Network errors
    NetworkError,
    ConnectionRefused,

    // Protocol errors
    HttpError,
    HttpsNotSupported,
    InvalidUrl,
    InvalidResponse,

    // GraphQL errors
    InvalidOperation,
    ParseError,

    // Serialization errors
    SerializeError,
    DeserializeError,

    // Orchestration errors
    Busy,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::ConnectionRefused => "CONNECTION_REFUSED",
            Self::HttpError => "HTTP_ERROR",
            Self::HttpsNotSupported => "HTTPS_NOT_SUPPORTED",
            Self::InvalidUrl => "INVALID_URL",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::InvalidOperation => "INVALID_OPERATION",
            Self::ParseError => "PARSE_ERROR",
            Self::SerializeError => "SERIALIZE_ERROR",
            Self::DeserializeError => "DESERIALIZE_ERROR",
            Self::Busy => "BUSY",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strongly typed SDK error.
#[derive(Error, Debug, Clone)]
#[error("[{code}] {message}")]
pub struct SdkError {
    /// Typed error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Underlying cause, if any.
    #[source]
    pub source: Option<Box<SdkError>>,
    /// Extension data for debugging.
    pub extensions: Option<HashMap<String, serde_json::Value>>,
}

impl SdkError {
    /// Creates a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
            extensions: None,
        }
    }

    /// Adds a source error.
    #[must_use]
    pub fn with_source(mut self, source: SdkError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Adds extension data.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let extensions = self.extensions.get_or_insert_with(HashMap::new);
        if let Ok(v) = serde_json::to_value(value) {
            extensions.insert(key.into(), v);
        }
        self
    }

    // Convenience constructors

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    /// Creates a serialization error.
    pub fn serialize(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializeError, message)
    }

    /// Creates a deserialization error.
    pub fn deserialize(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DeserializeError, message)
    }

    /// Creates the error returned when a call is already in flight.
    pub fn busy() -> Self {
        Self::new(ErrorCode::Busy, "A call is already in flight")
    }
}

impl Serialize for SdkError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SdkError", 3)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;
        if let Some(ref ext) = self.extensions {
            state.serialize_field("extensions", ext)?;
        }
        state.end()
    }
}

/// Type alias for SDK results.
pub type SdkResult<T> = std::result::Result<T, SdkError>;

/// Result extension for mapping foreign errors with context.
pub trait ResultExt<T> {
    /// Maps the error to an SdkError with the given code. The message is
    /// `"{context}: {cause}"`.
    fn map_sdk_err_with(self, code: ErrorCode, context: &str) -> SdkResult<T>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn map_sdk_err_with(self, code: ErrorCode, context: &str) -> SdkResult<T> {
        self.map_err(|e| {
            SdkError::new(code, format!("{context}: {e}"))
                .with_extension("original_error", e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::ConnectionRefused.as_str(), "CONNECTION_REFUSED");
        assert_eq!(ErrorCode::Busy.to_string(), "BUSY");
        assert_eq!(
            serde_json::to_value(ErrorCode::HttpsNotSupported).unwrap(),
            serde_json::json!("HTTPS_NOT_SUPPORTED")
        );
    }

    #[test]
    fn test_display_keeps_message_separate() {
        let err = SdkError::network("network down");
        assert_eq!(err.to_string(), "[NETWORK_ERROR] network down");
        assert_eq!(err.message, "network down");
    }

    #[test]
    fn test_error_serialization() {
        let err = SdkError::network("Connection failed").with_extension("attempt", 1);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("NETWORK_ERROR"));
        assert!(json.contains("Connection failed"));
        assert!(json.contains("attempt"));
    }

    #[test]
    fn test_result_ext_keeps_cause_in_message() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = result
            .map_sdk_err_with(ErrorCode::NetworkError, "Write failed")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert_eq!(err.message, "Write failed: boom");
        assert_eq!(
            err.extensions.unwrap()["original_error"],
            serde_json::json!("boom")
        );
    }
}
