//! # Flowline
//!
//! A client-side decision engine for a remote, event-sourced
//! workflow-orchestration service.
//!
//! ## Features
//!
//! - **Deterministic replay**: every pass re-derives all in-flight step
//!   state purely from the execution's event history; nothing is persisted
//!   client-side
//! - **Correlated step state machines**: raw history records are normalized
//!   and correlated back to logical steps, including back-reference
//!   resolution across the full history
//! - **Composable retries**: pure retry-strategy combinators reschedule
//!   failed activities through in-band backoff timers
//! - **Multi-pass composition**: dependency chains between steps suspend as
//!   pending outcomes and resume on later passes, without busy-waiting
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DecisionPoller                          │
//! │  (fetches history, replays the workflow, responds)          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Workflow::decide(DecisionContext)            │
//! │  (composes Actions through Outcome chaining)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Actions over the normalized Event history         │
//! │  (Activity / Timer / RecordMarker / WaitSignal)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use flowline::prelude::*;
//!
//! struct OrderWorkflow;
//!
//! impl Workflow for OrderWorkflow {
//!     const NAME: &'static str = "order-flow";
//!     const VERSION: &'static str = "1.0";
//!     type Output = String;
//!
//!     fn decide(&self, ctx: &mut DecisionContext) -> Result<Outcome<String>, ActionError> {
//!         let validate = ActivityAction::<bool>::new("validate", "validate-order", "1.0");
//!         let ship = ActivityAction::<String>::new("ship", "ship-order", "1.0");
//!
//!         validate
//!             .decide(ctx)?
//!             .try_and_then(|_ok| ship.decide(ctx))
//!     }
//! }
//!
//! let mut registry = WorkflowRegistry::new();
//! registry.register(OrderWorkflow);
//! let poller = DecisionPoller::new(client, registry, "orders", "default");
//! poller.run(shutdown_rx).await;
//! ```

pub mod action;
pub mod client;
pub mod context;
pub mod converter;
pub mod decision;
pub mod history;
pub mod outcome;
pub mod poller;
pub mod protocol;
pub mod retry;
pub mod workflow;

/// Prelude for common imports
pub mod prelude {
    pub use crate::action::{
        Action, ActionError, ActivityAction, RecordMarkerAction, TimerAction, WaitSignalAction,
    };
    pub use crate::client::{
        ClientError, DecisionTaskPage, OrchestrationClient, PollRequest, TaskToken,
        WorkflowExecution, WorkflowType,
    };
    pub use crate::context::DecisionContext;
    pub use crate::converter::{DataConverter, DataConverterExt, JsonDataConverter};
    pub use crate::decision::{ActivityType, Decision};
    pub use crate::history::{
        ActionId, Event, EventId, EventKind, EventState, RawEvent, TaskType,
    };
    pub use crate::outcome::{ActionFailure, Outcome};
    pub use crate::poller::{DecisionPoller, PollOutcome, PollerConfig};
    pub use crate::retry::{
        default_strategy, ExponentialDelay, FixedDelay, MaxAttempts, MaxElapsed, NoRetry,
        RetryStrategy,
    };
    pub use crate::workflow::{AnyWorkflow, Workflow, WorkflowRegistry};
}

// Re-export key types at crate root
pub use action::{
    Action, ActionError, ActivityAction, RecordMarkerAction, TimerAction, WaitSignalAction,
};
pub use client::{ClientError, OrchestrationClient, TaskToken};
pub use context::DecisionContext;
pub use converter::{ConversionError, DataConverter, DataConverterExt, JsonDataConverter};
pub use decision::Decision;
pub use history::{ActionId, Event, EventId, EventKind, EventState, HistoryError, RawEvent, TaskType};
pub use outcome::{ActionFailure, Outcome};
pub use poller::{DecisionPoller, PollError, PollOutcome, PollerConfig};
pub use retry::RetryStrategy;
pub use workflow::{Workflow, WorkflowRegistry};
