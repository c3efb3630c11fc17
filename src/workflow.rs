//! Workflow definitions and the registry the poller resolves them from
//!
//! A workflow is the decider for one registered (name, version): it composes
//! actions into a dependency chain inside `decide` and must be deterministic
//! (same history in, same decisions out) because it is re-run from scratch
//! on every pass.
//!
//! The registry stores workflows type-erased behind [`AnyWorkflow`] so the
//! poller can resolve and drive them by the (name, version) carried on a
//! decision task, with outputs already serialized for the complete-workflow
//! decision.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::action::ActionError;
use crate::context::DecisionContext;
use crate::converter::DataConverterExt;
use crate::decision::Decision;
use crate::history::Event;
use crate::outcome::Outcome;
use crate::protocol::make_key;

/// A workflow definition.
///
/// # Determinism
///
/// `decide` runs to completion inside every pass, with no blocking I/O and
/// no sleeping. All step state must come from the context's event list, so
/// that replaying an unchanged history reproduces the identical decisions.
pub trait Workflow: Send + Sync + 'static {
    /// Registered workflow type name.
    const NAME: &'static str;

    /// Registered workflow type version.
    const VERSION: &'static str;

    /// Value the workflow resolves with when it completes.
    type Output: Serialize + Send;

    /// Compose the workflow's steps against the history and report where
    /// the run stands: pending (mid-flight), resolved, or failed.
    fn decide(&self, ctx: &mut DecisionContext) -> Result<Outcome<Self::Output>, ActionError>;

    /// Called before `decide` when the history contains a cancel request
    /// for this execution. The default gracefully gives up by queueing a
    /// cancel-workflow decision; override to wind down a more complex run.
    fn on_cancel_requested(&self, cancel_event: &Event, ctx: &mut DecisionContext) {
        ctx.add_decision(Decision::cancel_workflow(
            cancel_event.details().map(str::to_string),
        ));
    }
}

/// Type-erased workflow interface the poller drives.
///
/// The resolved output is serialized eagerly so the poller never needs the
/// concrete output type.
pub trait AnyWorkflow: Send + Sync {
    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// `name-version`, the registry key.
    fn key(&self) -> String {
        make_key(self.name(), self.version())
    }

    fn decide(&self, ctx: &mut DecisionContext) -> Result<Outcome<String>, ActionError>;

    fn on_cancel_requested(&self, cancel_event: &Event, ctx: &mut DecisionContext);
}

impl fmt::Debug for dyn AnyWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyWorkflow")
            .field("key", &self.key())
            .finish()
    }
}

struct WorkflowWrapper<W: Workflow> {
    inner: W,
}

impl<W: Workflow> AnyWorkflow for WorkflowWrapper<W> {
    fn name(&self) -> &'static str {
        W::NAME
    }

    fn version(&self) -> &'static str {
        W::VERSION
    }

    fn decide(&self, ctx: &mut DecisionContext) -> Result<Outcome<String>, ActionError> {
        let outcome = self.inner.decide(ctx)?;
        match outcome {
            Outcome::Pending => Ok(Outcome::Pending),
            Outcome::Resolved(output) => {
                let serialized = ctx.converter().to_data(&output)?;
                Ok(Outcome::Resolved(serialized))
            }
            Outcome::Failed(failure) => Ok(Outcome::Failed(failure)),
        }
    }

    fn on_cancel_requested(&self, cancel_event: &Event, ctx: &mut DecisionContext) {
        self.inner.on_cancel_requested(cancel_event, ctx);
    }
}

/// A decision task arrived for a workflow type nobody registered.
#[derive(Debug, thiserror::Error)]
#[error("received decision task for unregistered workflow {key}")]
pub struct UnregisteredWorkflow {
    pub key: String,
}

/// Registry of workflow definitions, keyed by `name-version`.
pub struct WorkflowRegistry {
    workflows: HashMap<String, Arc<dyn AnyWorkflow>>,
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self {
            workflows: HashMap::new(),
        }
    }

    /// Register a workflow definition. A later registration for the same
    /// (name, version) replaces the earlier one.
    pub fn register<W: Workflow>(&mut self, workflow: W) {
        let key = make_key(W::NAME, W::VERSION);
        self.workflows
            .insert(key, Arc::new(WorkflowWrapper { inner: workflow }));
    }

    pub fn contains(&self, name: &str, version: &str) -> bool {
        self.workflows.contains_key(&make_key(name, version))
    }

    /// Resolve the workflow registered for a decision task's type.
    pub fn resolve(
        &self,
        name: &str,
        version: &str,
    ) -> Result<&Arc<dyn AnyWorkflow>, UnregisteredWorkflow> {
        let key = make_key(name, version);
        self.workflows
            .get(&key)
            .ok_or(UnregisteredWorkflow { key })
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    /// All registered keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.workflows.keys().map(|k| k.as_str())
    }
}

impl fmt::Debug for WorkflowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowRegistry")
            .field("workflows", &self.workflows.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::JsonDataConverter;
    use crate::history::fixtures::raw;
    use crate::history::{normalize_history, EventAttributes};

    struct NoopWorkflow;

    impl Workflow for NoopWorkflow {
        const NAME: &'static str = "noop";
        const VERSION: &'static str = "1.0";
        type Output = i64;

        fn decide(&self, _ctx: &mut DecisionContext) -> Result<Outcome<i64>, ActionError> {
            Ok(Outcome::Resolved(7))
        }
    }

    fn empty_context() -> DecisionContext {
        DecisionContext::new(Vec::new(), Arc::new(JsonDataConverter))
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = WorkflowRegistry::new();
        registry.register(NoopWorkflow);

        assert!(registry.contains("noop", "1.0"));
        assert!(!registry.contains("noop", "2.0"));

        let workflow = registry.resolve("noop", "1.0").unwrap();
        assert_eq!(workflow.key(), "noop-1.0");
    }

    #[test]
    fn test_resolve_unregistered_fails() {
        let registry = WorkflowRegistry::new();
        let err = registry.resolve("ghost", "9").unwrap_err();
        assert_eq!(err.key, "ghost-9");
    }

    #[test]
    fn test_erased_decide_serializes_output() {
        let mut registry = WorkflowRegistry::new();
        registry.register(NoopWorkflow);

        let workflow = registry.resolve("noop", "1.0").unwrap();
        let mut ctx = empty_context();
        let outcome = workflow.decide(&mut ctx).unwrap();
        assert_eq!(outcome, Outcome::Resolved("7".to_string()));
    }

    #[test]
    fn test_default_cancel_hook_queues_cancel_decision() {
        let mut registry = WorkflowRegistry::new();
        registry.register(NoopWorkflow);

        let events = normalize_history(&[raw(
            2,
            EventAttributes::WorkflowExecutionCancelRequested {
                cause: Some("operator request".to_string()),
            },
        )])
        .unwrap();
        let cancel_event = events[0].clone();
        let mut ctx = DecisionContext::new(events, Arc::new(JsonDataConverter));

        let workflow = registry.resolve("noop", "1.0").unwrap();
        workflow.on_cancel_requested(&cancel_event, &mut ctx);

        assert!(matches!(
            ctx.decisions()[0],
            Decision::CancelWorkflowExecution { .. }
        ));
    }
}
