//! Per-pass decision context
//!
//! One [`DecisionContext`] lives for exactly one decision pass: the
//! normalized history (read-only, most recent first) goes in, the decisions
//! produced by replay accumulate, and the whole thing is discarded once the
//! response is sent. Nothing here survives to the next pass, which is what
//! makes concurrent pollers safe without locks.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::converter::DataConverter;
use crate::decision::Decision;
use crate::history::{Event, EventKind};

pub struct DecisionContext {
    events: Vec<Event>,
    decisions: Vec<Decision>,
    converter: Arc<dyn DataConverter>,
}

impl DecisionContext {
    /// Build a context over a normalized history (descending by id).
    pub fn new(events: Vec<Event>, converter: Arc<dyn DataConverter>) -> Self {
        Self {
            events,
            decisions: Vec::new(),
            converter,
        }
    }

    /// The full normalized history, most recent first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn converter(&self) -> &Arc<dyn DataConverter> {
        &self.converter
    }

    /// Queue a decision for this pass's response.
    pub fn add_decision(&mut self, decision: Decision) {
        self.decisions.push(decision);
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn into_decisions(self) -> Vec<Decision> {
        self.decisions
    }

    /// The event that started this execution, if it is in the fetched
    /// history.
    pub fn started_event(&self) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| e.kind() == EventKind::WorkflowExecutionStarted)
    }

    /// The serialized input the execution was started with.
    pub fn workflow_input(&self) -> Option<&str> {
        self.started_event().and_then(|e| e.input())
    }

    /// When the execution was started.
    pub fn workflow_started_at(&self) -> Option<DateTime<Utc>> {
        self.started_event().map(|e| e.timestamp())
    }
}
