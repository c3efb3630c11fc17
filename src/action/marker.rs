//! Marker step: record a value in the history
//!
//! Markers do not cause the service to issue a new decision task on their
//! own, so a chain must never wait on one across a pass boundary: the
//! outcome resolves in the same call that queues the record decision, and
//! composed steps after the marker keep deciding within this pass.

use tracing::error;

use crate::context::DecisionContext;
use crate::decision::Decision;
use crate::history::{ActionId, EventState, TaskType};
use crate::outcome::Outcome;

use super::{Action, ActionError};

pub struct RecordMarkerAction {
    action_id: ActionId,
    details: Option<String>,
}

impl RecordMarkerAction {
    pub fn new(action_id: impl Into<ActionId>) -> Self {
        Self {
            action_id: action_id.into(),
            details: None,
        }
    }

    /// Serialized payload to record with the marker.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Action for RecordMarkerAction {
    type Output = ();

    fn action_id(&self) -> &ActionId {
        &self.action_id
    }

    fn task_type(&self) -> TaskType {
        TaskType::RecordMarker
    }

    fn decide(&self, ctx: &mut DecisionContext) -> Result<Outcome<()>, ActionError> {
        let state = self.state(ctx.events());
        match state {
            EventState::NotStarted => {
                ctx.add_decision(Decision::record_marker(
                    self.action_id.as_str(),
                    self.details.clone(),
                ));
                Ok(Outcome::Resolved(()))
            }

            EventState::Initial
            | EventState::Active
            | EventState::Retry
            | EventState::Success => Ok(Outcome::Resolved(())),

            EventState::Error => {
                let details = self
                    .current_event(ctx.events())
                    .and_then(|e| e.details())
                    .map(str::to_string);
                error!(
                    action_id = %self.action_id,
                    "record marker decision failed; the only cause is that the operation is not permitted"
                );
                Err(ActionError::OperationNotPermitted {
                    action_id: self.action_id.clone(),
                    details,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::converter::JsonDataConverter;
    use crate::history::fixtures::raw;
    use crate::history::{normalize_history, EventAttributes, RawEvent};

    fn context(history: &[RawEvent]) -> DecisionContext {
        let events = normalize_history(history).unwrap();
        DecisionContext::new(events, Arc::new(JsonDataConverter))
    }

    #[test]
    fn test_not_started_emits_decision_and_resolves_in_same_call() {
        let mut ctx = context(&[]);
        let action = RecordMarkerAction::new("checkpoint").with_details("\"v1\"".to_string());

        let outcome = action.decide(&mut ctx).unwrap();
        assert_eq!(outcome, Outcome::Resolved(()));
        assert_eq!(ctx.decisions().len(), 1);
        match &ctx.decisions()[0] {
            Decision::RecordMarker {
                marker_name,
                details,
            } => {
                assert_eq!(marker_name, "checkpoint");
                assert_eq!(details.as_deref(), Some("\"v1\""));
            }
            other => panic!("expected RecordMarker, got {other}"),
        }
    }

    #[test]
    fn test_recorded_marker_resolves_without_new_decision() {
        let mut ctx = context(&[raw(
            2,
            EventAttributes::MarkerRecorded {
                marker_name: "checkpoint".to_string(),
                details: Some("\"v1\"".to_string()),
            },
        )]);
        let action = RecordMarkerAction::new("checkpoint");

        let outcome = action.decide(&mut ctx).unwrap();
        assert_eq!(outcome, Outcome::Resolved(()));
        assert!(ctx.decisions().is_empty());
    }

    #[test]
    fn test_rejected_marker_is_fatal() {
        let mut ctx = context(&[raw(
            2,
            EventAttributes::RecordMarkerFailed {
                marker_name: "checkpoint".to_string(),
                cause: Some("OPERATION_NOT_PERMITTED".to_string()),
            },
        )]);
        let action = RecordMarkerAction::new("checkpoint");

        let err = action.decide(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            ActionError::OperationNotPermitted { ref details, .. }
                if details.as_deref() == Some("OPERATION_NOT_PERMITTED")
        ));
    }
}
