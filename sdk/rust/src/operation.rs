//! GraphQL operations as sent on the wire.
//!
//! An [`Operation`] is the pair of query text and named variables that forms
//! one request body. Typed operations describe their variables and payload
//! at compile time through [`TypedOperation`].
//!
//! # Example
//!
//! ```ignore
//! use storefront_sdk::operation::{OperationKind, TypedOperation};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct GetCustomerVars { id: String }
//!
//! #[derive(Deserialize)]
//! struct GetCustomerData { customer: Option<Customer> }
//!
//! struct GetCustomer;
//! impl TypedOperation for GetCustomer {
//!     type Variables = GetCustomerVars;
//!     type Response = GetCustomerData;
//!     const OPERATION: &'static str = "query GetCustomer($id: ID!) { customer(id: $id) { id name } }";
//!     const OPERATION_NAME: &'static str = "GetCustomer";
//!     const KIND: OperationKind = OperationKind::Query;
//! }
//! ```

use crate::error::{ErrorCode, SdkError, SdkResult};
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};

/// Named operation variables, serialized in insertion order.
pub type Variables = IndexMap<String, serde_json::Value>;

/// A strongly typed GraphQL operation.
pub trait TypedOperation {
    /// The input variables type. Must serialize to a JSON object.
    type Variables: Serialize;

    /// The response data type.
    type Response: DeserializeOwned;

    /// The GraphQL operation string.
    const OPERATION: &'static str;

    /// The operation name, used for logging.
    const OPERATION_NAME: &'static str;

    /// The kind of operation.
    const KIND: OperationKind;
}

/// The kind of GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

/// Marker type for operations without variables.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoVariables {}

/// One request: operation text plus variables.
///
/// Serializes to exactly `{"query": ..., "variables": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub query: String,
    pub variables: Variables,
}

impl Operation {
    /// Creates an operation with no variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Variables::new(),
        }
    }

    /// Adds one named variable.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Replaces the variables with the fields of a serializable value.
    ///
    /// The value must serialize to a JSON object.
    pub fn variables<V: Serialize>(mut self, variables: &V) -> SdkResult<Self> {
        self.variables = to_variables(variables)?;
        Ok(self)
    }

    /// Builds the wire operation for a typed operation.
    pub fn typed<Op: TypedOperation>(variables: &Op::Variables) -> SdkResult<Self> {
        Self::new(Op::OPERATION).variables(variables)
    }

    /// Rejects operations that can never be sent.
    pub fn validate(&self) -> SdkResult<()> {
        if self.query.trim().is_empty() {
            return Err(SdkError::new(
                ErrorCode::InvalidOperation,
                "Operation text must not be empty",
            ));
        }
        Ok(())
    }

    /// Serializes the request body.
    pub fn to_body(&self) -> SdkResult<String> {
        serde_json::to_string(self).map_err(|e| SdkError::serialize(e.to_string()))
    }
}

fn to_variables<V: Serialize>(variables: &V) -> SdkResult<Variables> {
    match serde_json::to_value(variables).map_err(|e| SdkError::serialize(e.to_string()))? {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        serde_json::Value::Null => Ok(Variables::new()),
        other => Err(SdkError::serialize(format!(
            "Variables must serialize to an object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize)]
    struct LookupVars {
        id: String,
    }

    #[derive(Deserialize)]
    struct LookupData {
        #[allow(dead_code)]
        thing: Option<serde_json::Value>,
    }

    struct Lookup;

    impl TypedOperation for Lookup {
        type Variables = LookupVars;
        type Response = LookupData;
        const OPERATION: &'static str = "query Lookup($id: ID!) { thing(id: $id) { id } }";
        const OPERATION_NAME: &'static str = "Lookup";
        const KIND: OperationKind = OperationKind::Query;
    }

    #[test]
    fn test_body_shape() {
        let op = Operation::new("query { products { sku } }").variable("limit", 5);
        let body: serde_json::Value = serde_json::from_str(&op.to_body().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "query": "query { products { sku } }",
                "variables": { "limit": 5 }
            })
        );
    }

    #[test]
    fn test_empty_variables_still_sent() {
        let body = Operation::new("query { ping }").to_body().unwrap();
        assert!(body.contains("\"variables\":{}"));
    }

    #[test]
    fn test_typed_operation() {
        let op = Operation::typed::<Lookup>(&LookupVars { id: "C-1".into() }).unwrap();
        assert_eq!(op.query, Lookup::OPERATION);
        assert_eq!(op.variables["id"], "C-1");
        assert_eq!(Lookup::KIND.as_str(), "query");
    }

    #[test]
    fn test_no_variables_marker() {
        let op = Operation::new("query { ping }").variables(&NoVariables {}).unwrap();
        assert!(op.variables.is_empty());
    }

    #[test]
    fn test_non_object_variables_rejected() {
        let err = Operation::new("query { ping }").variables(&[1, 2]).unwrap_err();
        assert_eq!(err.code, ErrorCode::SerializeError);
    }

    #[test]
    fn test_validate() {
        assert!(Operation::new("query { ping }").validate().is_ok());
        let err = Operation::new("   ").validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOperation);
    }
}
