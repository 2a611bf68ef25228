//! One-shot verification flows.
//!
//! A flow instance lives for one page view:
//!
//! 1. [`FlowInstance::mount`] reads the navigation context once and validates it.
//! 2. [`FlowInstance::run`] issues exactly one remote call, and only when
//!    validation passed. Invalid input goes straight to `Failure`.
//! 3. The result lands in [`FlowState`], which moves from `Pending` to a terminal
//!    state at most once and never changes afterwards.
//!
//! After [`FlowInstance::teardown`] any late resolution is dropped. Every error
//! kind is folded into `Failure` with a display-ready message; nothing else
//! reaches the presentation layer.

pub mod email;
pub mod error;
pub mod params;
pub mod password;
pub mod platform;
pub mod reset;

pub use self::error::{FailureCause, FlowError, PolicyViolation, ValidationError};
pub use self::params::{NavigationContext, VerificationRequestParams};

use crate::client::VerificationClient;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub message: String,
    pub cause: FailureCause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome<T> {
    Pending,
    Success(T),
    Failure(Failure),
}

impl<T> VerificationOutcome<T> {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// The single observable state cell of a flow instance.
#[derive(Debug)]
pub struct FlowState<T> {
    outcome: watch::Sender<VerificationOutcome<T>>,
    mounted: AtomicBool,
}

impl<T> Default for FlowState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FlowState<T> {
    #[must_use]
    pub fn new() -> Self {
        let (outcome, _) = watch::channel(VerificationOutcome::Pending);
        Self {
            outcome,
            mounted: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn current(&self) -> VerificationOutcome<T>
    where
        T: Clone,
    {
        self.outcome.borrow().clone()
    }

    /// Watch for the terminal transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<VerificationOutcome<T>> {
        self.outcome.subscribe()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Apply a terminal outcome. Returns `false`, leaving the state untouched, when
    /// the instance is torn down, the state is already terminal, or `outcome` is
    /// `Pending`.
    pub fn resolve(&self, outcome: VerificationOutcome<T>) -> bool {
        if !outcome.is_terminal() || !self.is_mounted() {
            return false;
        }

        self.outcome.send_if_modified(|current| {
            if current.is_terminal() {
                false
            } else {
                *current = outcome;
                true
            }
        })
    }
}

/// One kind of page flow: which parameters it needs, which remote operation it
/// calls and how its failures read.
pub trait Flow: Send + Sync {
    type Params: Send + Sync;
    type Payload: Clone + Send + Sync;

    /// Name used in logs.
    const NAME: &'static str;

    /// Local validation only; yields `Validation` or `LocalPolicy` errors.
    ///
    /// # Errors
    /// Returns a [`FlowError`] when the context cannot produce valid parameters.
    fn extract(&self, context: &NavigationContext) -> Result<Self::Params, FlowError>;

    /// The single remote call. `NegativeResult` for a `success: false` answer,
    /// `Transport` when the call itself failed.
    fn call<C: VerificationClient>(
        &self,
        client: &C,
        params: &Self::Params,
    ) -> impl Future<Output = Result<Self::Payload, FlowError>> + Send;

    /// Display-ready message for a failure.
    fn describe(&self, error: &FlowError) -> String;
}

/// One page view's run of a [`Flow`].
pub struct FlowInstance<F: Flow> {
    flow: F,
    prepared: Mutex<Option<Result<F::Params, FlowError>>>,
    state: FlowState<F::Payload>,
}

impl<F: Flow> FlowInstance<F> {
    /// Capture and validate the navigation context. Nothing is sent yet.
    pub fn mount(flow: F, context: &NavigationContext) -> Self {
        let prepared = flow.extract(context);
        Self {
            flow,
            prepared: Mutex::new(Some(prepared)),
            state: FlowState::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &FlowState<F::Payload> {
        &self.state
    }

    /// Drive the flow to its terminal state and return what the page should show.
    ///
    /// Only the first call does any work; later calls return the current state
    /// without touching the client.
    pub async fn run<C: VerificationClient>(&self, client: &C) -> VerificationOutcome<F::Payload> {
        let Some(prepared) = self.take_prepared() else {
            debug!(flow = F::NAME, "flow already started");
            return self.state.current();
        };

        let result = match prepared {
            Ok(params) => {
                debug!(flow = F::NAME, "calling verification API");
                self.flow.call(client, &params).await
            }
            Err(err) => Err(err),
        };

        let outcome = match result {
            Ok(payload) => {
                debug!(flow = F::NAME, "flow succeeded");
                VerificationOutcome::Success(payload)
            }
            Err(err) => {
                warn!(flow = F::NAME, cause = ?err.cause(), "flow failed: {err}");
                VerificationOutcome::Failure(Failure {
                    message: self.flow.describe(&err),
                    cause: err.cause(),
                })
            }
        };

        if !self.state.resolve(outcome) {
            debug!(flow = F::NAME, "late resolution ignored");
        }

        self.state.current()
    }

    /// The page is gone; later resolutions are ignored.
    pub fn teardown(&self) {
        self.state.unmount();
    }

    fn take_prepared(&self) -> Option<Result<F::Params, FlowError>> {
        // the slot is only ever taken, so a poisoned guard still holds valid data
        self.prepared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
