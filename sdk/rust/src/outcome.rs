//! Normalization of call results into a single outcome.

use crate::envelope::Envelope;
use crate::error::SdkResult;

/// Error text shown when the server answered without errors and without data.
pub const MISSING_DATA_MESSAGE: &str = "No data returned by GraphQL API";

/// The outcome of one call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    /// No errors and a payload.
    Success(T),
    /// The server reported errors; messages in server order.
    ApplicationError(Vec<String>),
    /// No errors, but no payload either.
    MissingData,
    /// No decodable envelope was obtained.
    TransportError(String),
}

/// The kind of a [`CallOutcome`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    ApplicationError,
    MissingData,
    TransportError,
}

impl<T> CallOutcome<T> {
    /// Classifies a decoded envelope. Errors take precedence over data.
    pub fn from_envelope(envelope: Envelope<T>) -> Self {
        if envelope.has_errors() {
            return Self::ApplicationError(envelope.messages());
        }
        match envelope.data {
            Some(data) => Self::Success(data),
            None => Self::MissingData,
        }
    }

    /// Classifies the result of a transport task.
    ///
    /// A failed task keeps only the error's message, not its code.
    pub fn from_result(result: SdkResult<Envelope<T>>) -> Self {
        match result {
            Ok(envelope) => Self::from_envelope(envelope),
            Err(err) => Self::TransportError(err.message),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::ApplicationError(_) => OutcomeKind::ApplicationError,
            Self::MissingData => OutcomeKind::MissingData,
            Self::TransportError(_) => OutcomeKind::TransportError,
        }
    }

    /// The user-visible error text, or `None` on success.
    pub fn error_text(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::ApplicationError(messages) => Some(messages.join("\n")),
            Self::MissingData => Some(MISSING_DATA_MESSAGE.to_string()),
            Self::TransportError(message) => Some(message.clone()),
        }
    }
}

impl OutcomeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ApplicationError => "application_error",
            Self::MissingData => "missing_data",
            Self::TransportError => "transport_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::GraphQLError;
    use crate::error::SdkError;
    use serde_json::json;

    #[test]
    fn test_errors_win_over_data() {
        let envelope = Envelope {
            data: Some(json!({"customer": {"id": "C-1"}})),
            errors: Some(vec![GraphQLError::new("first"), GraphQLError::new("second")]),
        };
        let outcome = CallOutcome::from_envelope(envelope);
        assert_eq!(
            outcome,
            CallOutcome::ApplicationError(vec!["first".into(), "second".into()])
        );
        assert_eq!(outcome.error_text().as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_single_error_message() {
        let outcome = CallOutcome::<serde_json::Value>::from_envelope(Envelope::errors(vec![
            GraphQLError::new("not found"),
        ]));
        assert_eq!(outcome.error_text().as_deref(), Some("not found"));
    }

    #[test]
    fn test_empty_envelope_is_missing_data() {
        let outcome = CallOutcome::<serde_json::Value>::from_envelope(Envelope::empty());
        assert_eq!(outcome, CallOutcome::MissingData);
        assert_eq!(outcome.error_text().as_deref(), Some(MISSING_DATA_MESSAGE));
    }

    #[test]
    fn test_empty_error_list_with_data_is_success() {
        let envelope = Envelope {
            data: Some(json!({"ok": true})),
            errors: Some(Vec::new()),
        };
        let outcome = CallOutcome::from_envelope(envelope);
        assert_eq!(outcome, CallOutcome::Success(json!({"ok": true})));
        assert_eq!(outcome.error_text(), None);
        assert_eq!(outcome.kind(), OutcomeKind::Success);
    }

    #[test]
    fn test_transport_error_keeps_bare_message() {
        let outcome =
            CallOutcome::<serde_json::Value>::from_result(Err(SdkError::network("network down")));
        assert_eq!(outcome, CallOutcome::TransportError("network down".into()));
        assert_eq!(outcome.kind().as_str(), "transport_error");
    }
}
