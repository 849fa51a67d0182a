//! Storefront GraphQL client.
//!
//! Wraps a [`Transport`] with operation validation and typed payload
//! decoding. There are no retries, caches or middleware: each call is
//! exactly one request.
//!
//! ```ignore
//! use storefront_sdk::client::Client;
//!
//! let client = Client::new("http://127.0.0.1:4000/graphql")?;
//! let envelope = client
//!     .send_typed::<GetCustomer>(&GetCustomerVars { id: "C-1".into() })
//!     .await?;
//! ```

use crate::envelope::Envelope;
use crate::error::SdkResult;
use crate::operation::{Operation, TypedOperation};
use crate::transport::{HttpTransport, Transport};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// URL of the GraphQL endpoint.
    pub url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_URL: &'static str = "http://127.0.0.1:4000/graphql";

    /// Creates a new config with a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// The storefront client.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client posting to the given URL.
    pub fn new(url: impl Into<String>) -> SdkResult<Self> {
        Self::with_config(&ClientConfig::new(url))
    }

    /// Creates a client from configuration.
    pub fn with_config(config: &ClientConfig) -> SdkResult<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Creates a client over a custom transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Sends a raw operation.
    pub async fn send(&self, operation: &Operation) -> SdkResult<Envelope> {
        operation.validate()?;
        self.transport.send(operation).await
    }

    /// Sends a typed operation and decodes its payload.
    pub async fn send_typed<Op: TypedOperation>(
        &self,
        variables: &Op::Variables,
    ) -> SdkResult<Envelope<Op::Response>> {
        let operation = Operation::typed::<Op>(variables)?;
        debug!(
            operation = Op::OPERATION_NAME,
            kind = Op::KIND.as_str(),
            "sending operation"
        );
        self.send(&operation).await?.decode()
    }
}
