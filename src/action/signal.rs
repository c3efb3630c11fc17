//! Signal-wait step: block the chain until an external signal arrives
//!
//! Signals are sent into an execution by external actors (other workflows or
//! direct API calls), commonly standing in for human approval. This step
//! never emits a decision: there is nothing to schedule, only history to
//! watch for the delivered signal.

use crate::context::DecisionContext;
use crate::converter::DataConverterExt;
use crate::history::{ActionId, EventState, TaskType};
use crate::outcome::Outcome;

use super::{Action, ActionError};

pub struct WaitSignalAction {
    action_id: ActionId,
}

impl WaitSignalAction {
    /// `action_id` is the signal name the step waits for.
    pub fn new(action_id: impl Into<ActionId>) -> Self {
        Self {
            action_id: action_id.into(),
        }
    }
}

impl Action for WaitSignalAction {
    type Output = String;

    fn action_id(&self) -> &ActionId {
        &self.action_id
    }

    fn task_type(&self) -> TaskType {
        TaskType::WorkflowSignaled
    }

    fn decide(&self, ctx: &mut DecisionContext) -> Result<Outcome<String>, ActionError> {
        let state = self.state(ctx.events());
        match state {
            EventState::NotStarted
            | EventState::Initial
            | EventState::Active
            | EventState::Retry => Ok(Outcome::Pending),

            EventState::Success => {
                let Some(event) = self.current_event(ctx.events()) else {
                    return Err(ActionError::IllegalState {
                        action_id: self.action_id.clone(),
                        state,
                    });
                };
                let payload = ctx
                    .converter()
                    .from_optional_data::<String>(event.output())?;
                Ok(Outcome::Resolved(payload))
            }

            // A signal wait has no error protocol; anything else is a
            // corrupted history.
            EventState::Error => Err(ActionError::IllegalState {
                action_id: self.action_id.clone(),
                state,
            }),
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
    fn test_waiting_is_pending_and_emits_nothing() {
        let mut ctx = context(&[raw(1, EventAttributes::WorkflowExecutionStarted {
            input: None,
        })]);
        let action = WaitSignalAction::new("approval");

        assert!(action.decide(&mut ctx).unwrap().is_pending());
        assert!(ctx.decisions().is_empty());
    }

    #[test]
    fn test_delivered_signal_resolves_with_payload() {
        let mut ctx = context(&[raw(
            6,
            EventAttributes::WorkflowExecutionSignaled {
                signal_name: "approval".to_string(),
                input: Some("\"approved-by-ops\"".to_string()),
            },
        )]);
        let action = WaitSignalAction::new("approval");

        assert_eq!(
            action.decide(&mut ctx).unwrap(),
            Outcome::Resolved("approved-by-ops".to_string())
        );
        assert!(ctx.decisions().is_empty());
    }

    #[test]
    fn test_signal_for_other_name_does_not_resolve() {
        let mut ctx = context(&[raw(
            6,
            EventAttributes::WorkflowExecutionSignaled {
                signal_name: "other".to_string(),
                input: Some("\"x\"".to_string()),
            },
        )]);
        let action = WaitSignalAction::new("approval");

        assert!(action.decide(&mut ctx).unwrap().is_pending());
    }
}
