//! Decoded GraphQL responses.

use crate::error::{SdkError, SdkResult};
use serde::{de::DeserializeOwned, Deserialize};
use std::collections::HashMap;

/// The decoded response body of one call.
///
/// `data` is present only on at least partial success. A non-empty `errors`
/// list marks the call as failed even when `data` is also present.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T = serde_json::Value> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLError>>,
}

/// A GraphQL error record. Only `message` is interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub extensions: Option<HashMap<String, serde_json::Value>>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }
}

impl<T> Envelope<T> {
    /// An envelope carrying only a payload.
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    /// An envelope carrying only errors.
    pub fn errors(errors: Vec<GraphQLError>) -> Self {
        Self {
            data: None,
            errors: Some(errors),
        }
    }

    /// An envelope with neither field.
    pub fn empty() -> Self {
        Self {
            data: None,
            errors: None,
        }
    }

    /// Returns true if the server reported at least one error.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// The error messages in server order.
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flatten()
            .map(|e| e.message.clone())
            .collect()
    }
}

impl Envelope<serde_json::Value> {
    /// Parses a response body.
    pub fn from_body(body: &str) -> SdkResult<Self> {
        serde_json::from_str(body).map_err(|e| {
            SdkError::parse(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                truncate(body, 200)
            ))
        })
    }

    /// Converts the raw payload into the operation's response type.
    ///
    /// Payload conversion is skipped when errors are present.
    pub fn decode<T: DeserializeOwned>(self) -> SdkResult<Envelope<T>> {
        if self.has_errors() {
            return Ok(Envelope {
                data: None,
                errors: self.errors,
            });
        }

        let data = match self.data {
            Some(value) => Some(serde_json::from_value(value).map_err(|e| {
                SdkError::deserialize(format!("Failed to deserialize response: {e}"))
            })?),
            None => None,
        };

        Ok(Envelope {
            data,
            errors: self.errors,
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
