//! Call Orchestrator: drives UI state around one remote call.
//!
//! Each call moves the published [`CallState`] through
//! `Idle -> Busy -> {Success, ApplicationError, MissingData, TransportError} -> Idle`.
//! The state lives in a `tokio::sync::watch` channel, so a UI can subscribe
//! and re-render on every transition. Exactly two transitions are published
//! per call: "busy, error cleared" and the terminal one. The terminal
//! transition applies the outcome and clears `busy` together.
//!
//! # Single-flight
//!
//! Only one call may be in flight per orchestrator. A second [`execute`]
//! while one is pending fails immediately with [`ErrorCode::Busy`] and does
//! not touch the state.
//!
//! # Panics in `on_success`
//!
//! A panicking `on_success` callback propagates out of [`execute`]. Before it
//! does, `busy` is cleared and the orchestrator accepts calls again;
//! `error_text` stays empty. The same cleanup runs if the `execute` future is
//! dropped before it completes.
//!
//! [`execute`]: CallOrchestrator::execute
//! [`ErrorCode::Busy`]: crate::error::ErrorCode::Busy

use crate::envelope::Envelope;
use crate::error::{SdkError, SdkResult};
use crate::outcome::{CallOutcome, OutcomeKind};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Caller-visible state of the orchestrator.
///
/// `results` holds the caller's typed result slots. It is only ever mutated
/// by the `on_success` callback of a successful call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallState<R> {
    pub busy: bool,
    /// Empty when there is no error.
    pub error_text: String,
    pub results: R,
}

impl<R> CallState<R> {
    pub fn new(results: R) -> Self {
        Self {
            busy: false,
            error_text: String::new(),
            results,
        }
    }

    /// Returns the error text, if any.
    pub fn error(&self) -> Option<&str> {
        (!self.error_text.is_empty()).then_some(self.error_text.as_str())
    }
}

/// Wraps transport calls and folds their outcome into a [`CallState`].
pub struct CallOrchestrator<R> {
    state: watch::Sender<CallState<R>>,
    in_flight: AtomicBool,
}

impl<R: Default> Default for CallOrchestrator<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R> CallOrchestrator<R> {
    /// Creates an idle orchestrator around the initial result slots.
    pub fn new(results: R) -> Self {
        let (state, _) = watch::channel(CallState::new(results));
        Self {
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<CallState<R>> {
        self.state.subscribe()
    }

    /// Reads the current state without cloning it.
    pub fn with_state<U>(&self, f: impl FnOnce(&CallState<R>) -> U) -> U {
        f(&self.state.borrow())
    }

    pub fn is_busy(&self) -> bool {
        self.with_state(|state| state.busy)
    }

    /// Runs one call.
    ///
    /// `task` performs the transport call. On success `on_success` receives
    /// the payload together with the result slots; it is the only place the
    /// slots change. Application errors, missing data and transport failures
    /// are written to `error_text` and reported through the returned kind;
    /// they are not `Err`. `Err` is returned only when another call is
    /// already in flight.
    ///
    /// `on_success` runs while the state is locked for the terminal
    /// transition and must not read this orchestrator.
    pub async fn execute<T, F, Fut, A>(&self, task: F, on_success: A) -> SdkResult<OutcomeKind>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SdkResult<Envelope<T>>>,
        A: FnOnce(&mut R, T),
    {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            warn!("rejected call: another call is in flight");
            return Err(SdkError::busy());
        }
        let mut flight = Flight {
            orchestrator: self,
            settled: false,
        };

        self.state.send_modify(|state| {
            state.busy = true;
            state.error_text.clear();
        });

        let outcome = CallOutcome::from_result(task().await);
        let kind = outcome.kind();

        self.state.send_modify(|state| {
            match outcome {
                CallOutcome::Success(data) => on_success(&mut state.results, data),
                failure => {
                    if let Some(text) = failure.error_text() {
                        debug!(outcome = kind.as_str(), "call failed: {}", text);
                        state.error_text = text;
                    }
                }
            }
            state.busy = false;
            self.in_flight.store(false, Ordering::Release);
        });
        flight.settled = true;

        debug!(outcome = kind.as_str(), "call settled");
        Ok(kind)
    }
}

/// Clears `busy` if a call ends without reaching its terminal transition.
struct Flight<'a, R> {
    orchestrator: &'a CallOrchestrator<R>,
    settled: bool,
}

impl<R> Drop for Flight<'_, R> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("call ended before settling; clearing busy flag");
        let in_flight = &self.orchestrator.in_flight;
        self.orchestrator.state.send_modify(|state| {
            state.busy = false;
            in_flight.store(false, Ordering::Release);
        });
    }
}

impl<R: Clone> CallOrchestrator<R> {
    /// Returns a snapshot of the current state.
    pub fn state(&self) -> CallState<R> {
        self.state.borrow().clone()
    }
}
