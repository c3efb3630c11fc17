//! Event history: raw records and their normalized view
//!
//! The remote service hands every decision pass the full, append-only event
//! history for one workflow execution. This module owns:
//! - [`RawEvent`] / [`EventAttributes`] / [`EventKind`]: the closed
//!   repertoire of raw history record types as the service reports them
//! - [`Event`]: the normalized record: category, lifecycle state,
//!   correlation id, causal back-reference, and opaque payload slots
//!
//! Normalization is total over the repertoire and requires the complete
//! history, because several terminal record types only carry a numeric
//! back-reference to the record that began their causal chain.

mod event;
mod raw;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use event::{normalize_history, Event, HistoryError};
pub use raw::{EventAttributes, EventKind, RawEvent};

/// Identifier of one history record, monotonically increasing within an
/// execution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The logical identifier tying together all history events that belong to
/// one workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Category of task a history event belongs to.
///
/// Groups the raw event repertoire by the decision kind that produced it.
/// Every [`EventKind`] maps to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Activity,
    Timer,
    StartChildWorkflow,
    RecordMarker,
    SignalExternalWorkflow,
    CancelExternalWorkflow,
    ContinueAsNew,
    Decision,
    WorkflowExecution,
    WorkflowSignaled,
}

/// Lifecycle state of a workflow step as determined by its most recent
/// history event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    /// No events exist for the step yet.
    NotStarted,

    /// The event that began the step.
    Initial,

    /// The step is underway.
    Active,

    /// A backoff timer for the step has elapsed; it should be rescheduled.
    ///
    /// Never produced by the raw derivation table. Derived at the action
    /// level when a step's most recent correlated event is an elapsed timer
    /// belonging to a non-timer step.
    Retry,

    /// The step finished successfully.
    Success,

    /// The step failed.
    Error,
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not_started",
            Self::Initial => "initial",
            Self::Active => "active",
            Self::Retry => "retry",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}
