//! Cross-pass completion values
//!
//! A step that spans decision passes is not a real future: within one pass
//! everything is synchronous, and "waiting" just means the step's history is
//! not terminal yet. [`Outcome`] makes that explicit: a step is pending,
//! resolved with a value, or failed with a serializable error, and the
//! combinators short-circuit on the first non-resolved step so nothing
//! downstream of a pending step runs in the same pass.

use serde::{Deserialize, Serialize};

/// A workflow error value that round-trips through the payload serializer.
///
/// Failure events carry a human-oriented `reason` and an opaque `details`
/// payload; both are preserved so diagnostics survive the trip through the
/// service and back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFailure {
    /// Short description of what failed.
    pub reason: String,

    /// Opaque serialized error payload, when the failure carried one.
    pub details: Option<String>,
}

impl ActionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl std::fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} : {}", self.reason, details),
            None => write!(f, "{}", self.reason),
        }
    }
}

impl std::error::Error for ActionFailure {}

/// Completion state of a step, derived from history during one pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Not terminal yet; a later pass will see more history.
    Pending,

    /// Terminal, with the step's value.
    Resolved(T),

    /// Terminal, with the step's error.
    Failed(ActionFailure),
}

impl<T> Outcome<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Transform the resolved value; pending and failed pass through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Pending => Outcome::Pending,
            Self::Resolved(value) => Outcome::Resolved(f(value)),
            Self::Failed(failure) => Outcome::Failed(failure),
        }
    }

    /// Chain a dependent step: it only runs once this one is resolved.
    ///
    /// This is the composition operator for data dependencies between
    /// steps: the downstream step's `decide` is simply not invoked while
    /// the upstream is pending, so no decision is emitted for it this pass.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Pending => Outcome::Pending,
            Self::Resolved(value) => f(value),
            Self::Failed(failure) => Outcome::Failed(failure),
        }
    }

    /// Fallible chain: a conversion or invariant error inside the
    /// continuation aborts the pass rather than failing the step.
    pub fn try_and_then<U, E>(
        self,
        f: impl FnOnce(T) -> Result<Outcome<U>, E>,
    ) -> Result<Outcome<U>, E> {
        match self {
            Self::Pending => Ok(Outcome::Pending),
            Self::Resolved(value) => f(value),
            Self::Failed(failure) => Ok(Outcome::Failed(failure)),
        }
    }

    /// Join two independent steps. Both may emit decisions in the same
    /// pass; the pair resolves once both have resolved. A failure wins over
    /// a pending side so errors surface as early as possible.
    pub fn zip<U>(self, other: Outcome<U>) -> Outcome<(T, U)> {
        match (self, other) {
            (Self::Failed(failure), _) => Outcome::Failed(failure),
            (_, Outcome::Failed(failure)) => Outcome::Failed(failure),
            (Self::Resolved(a), Outcome::Resolved(b)) => Outcome::Resolved((a, b)),
            _ => Outcome::Pending,
        }
    }
}
