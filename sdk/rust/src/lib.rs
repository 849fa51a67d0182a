//! Storefront SDK
//!
//! Client-side orchestration of typed GraphQL calls over a single HTTP
//! endpoint. A call goes through two layers:
//!
//! - [`transport`]: posts `{"query", "variables"}` and decodes the reply into
//!   an [`Envelope`].
//! - [`orchestrator`]: normalizes the envelope into a [`CallOutcome`] and
//!   applies it to a caller-owned [`CallState`] (busy flag, error text,
//!   typed result slots).
//!
//! # Example
//!
//! ```ignore
//! use storefront_sdk::{CallOrchestrator, Client};
//!
//! #[derive(Clone, Default)]
//! struct Slots { customer: Option<Customer> }
//!
//! let client = Client::new("http://127.0.0.1:4000/graphql")?;
//! let orchestrator = CallOrchestrator::<Slots>::default();
//!
//! orchestrator
//!     .execute(
//!         || client.send_typed::<GetCustomer>(&GetCustomerVars { id: "C-1".into() }),
//!         |slots, data| slots.customer = data.customer,
//!     )
//!     .await?;
//!
//! let state = orchestrator.state();
//! if let Some(text) = state.error() {
//!     eprintln!("{text}");
//! }
//! ```

pub mod client;
pub mod envelope;
pub mod error;
pub mod operation;
pub mod orchestrator;
pub mod outcome;
pub mod transport;

pub use client::{Client, ClientConfig};
pub use envelope::{Envelope, GraphQLError};
pub use error::{ErrorCode, ResultExt, SdkError, SdkResult};
pub use operation::{NoVariables, Operation, OperationKind, TypedOperation, Variables};
pub use orchestrator::{CallOrchestrator, CallState};
pub use outcome::{CallOutcome, OutcomeKind, MISSING_DATA_MESSAGE};
pub use transport::{HttpTransport, Transport};
