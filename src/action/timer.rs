//! Timer step: wait for an amount of time to elapse, in-band
//!
//! A timer notifies the decider when a duration has elapsed, the usual way
//! to delay a dependent activity. The wait is realized entirely through
//! history (started → fired), never by sleeping inside a pass.

use std::time::Duration;

use tracing::warn;

use crate::context::DecisionContext;
use crate::decision::Decision;
use crate::history::{ActionId, EventState, TaskType};
use crate::outcome::{ActionFailure, Outcome};

use super::{Action, ActionError};

pub struct TimerAction {
    action_id: ActionId,
    start_to_fire: Duration,
    control: Option<String>,
}

impl TimerAction {
    pub fn new(action_id: impl Into<ActionId>, start_to_fire: Duration) -> Self {
        Self {
            action_id: action_id.into(),
            start_to_fire,
            control: None,
        }
    }

    pub fn with_control(mut self, control: impl Into<String>) -> Self {
        self.control = Some(control.into());
        self
    }
}

impl Action for TimerAction {
    type Output = ();

    fn action_id(&self) -> &ActionId {
        &self.action_id
    }

    fn task_type(&self) -> TaskType {
        TaskType::Timer
    }

    fn decide(&self, ctx: &mut DecisionContext) -> Result<Outcome<()>, ActionError> {
        let state = self.state(ctx.events());
        match state {
            EventState::NotStarted => {
                ctx.add_decision(Decision::StartTimer {
                    timer_id: self.action_id.clone(),
                    start_to_fire_timeout: self.start_to_fire.as_secs().to_string(),
                    control: self.control.clone(),
                });
                Ok(Outcome::Pending)
            }

            EventState::Initial | EventState::Active | EventState::Retry => Ok(Outcome::Pending),

            // Fired or canceled: either way the wait is over.
            EventState::Success => Ok(Outcome::Resolved(())),

            EventState::Error => {
                let failure = {
                    let Some(event) = self.current_event(ctx.events()) else {
                        return Err(ActionError::IllegalState {
                            action_id: self.action_id.clone(),
                            state,
                        });
                    };
                    warn!(action_id = %self.action_id, details = ?event.details(), "start timer failed");
                    ActionFailure {
                        reason: event.reason().unwrap_or("Start Timer Failed").to_string(),
                        details: event.details().map(str::to_string),
                    }
                };
                Ok(Outcome::Failed(failure))
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
    use crate::history::{normalize_history, EventAttributes, EventId, RawEvent};

    fn context(history: &[RawEvent]) -> DecisionContext {
        let events = normalize_history(history).unwrap();
        DecisionContext::new(events, Arc::new(JsonDataConverter))
    }

    #[test]
    fn test_not_started_emits_start_timer() {
        let mut ctx = context(&[]);
        let action = TimerAction::new("delay", Duration::from_secs(30));

        let outcome = action.decide(&mut ctx).unwrap();
        assert!(outcome.is_pending());
        match &ctx.decisions()[0] {
            Decision::StartTimer {
                timer_id,
                start_to_fire_timeout,
                ..
            } => {
                assert_eq!(timer_id.as_str(), "delay");
                assert_eq!(start_to_fire_timeout, "30");
            }
            other => panic!("expected StartTimer, got {other}"),
        }
    }

    #[test]
    fn test_started_is_pending() {
        let mut ctx = context(&[raw(
            4,
            EventAttributes::TimerStarted {
                timer_id: "delay".to_string(),
                control: None,
                start_to_fire_timeout: "30".to_string(),
            },
        )]);
        let action = TimerAction::new("delay", Duration::from_secs(30));

        assert!(action.decide(&mut ctx).unwrap().is_pending());
        assert!(ctx.decisions().is_empty());
    }

    #[test]
    fn test_fired_resolves() {
        let mut ctx = context(&[
            raw(
                4,
                EventAttributes::TimerStarted {
                    timer_id: "delay".to_string(),
                    control: None,
                    start_to_fire_timeout: "30".to_string(),
                },
            ),
            raw(5, EventAttributes::TimerFired {
                timer_id: "delay".to_string(),
                started_event_id: EventId(4),
            }),
        ]);
        let action = TimerAction::new("delay", Duration::from_secs(30));

        assert_eq!(action.decide(&mut ctx).unwrap(), Outcome::Resolved(()));
    }

    #[test]
    fn test_canceled_also_resolves() {
        let mut ctx = context(&[
            raw(
                4,
                EventAttributes::TimerStarted {
                    timer_id: "delay".to_string(),
                    control: None,
                    start_to_fire_timeout: "30".to_string(),
                },
            ),
            raw(6, EventAttributes::TimerCanceled {
                timer_id: "delay".to_string(),
                started_event_id: EventId(4),
            }),
        ]);
        let action = TimerAction::new("delay", Duration::from_secs(30));

        assert_eq!(action.decide(&mut ctx).unwrap(), Outcome::Resolved(()));
    }

    #[test]
    fn test_start_failed_resolves_failed() {
        let mut ctx = context(&[raw(
            4,
            EventAttributes::StartTimerFailed {
                timer_id: "delay".to_string(),
                cause: Some("TIMER_ID_ALREADY_IN_USE".to_string()),
            },
        )]);
        let action = TimerAction::new("delay", Duration::from_secs(30));

        match action.decide(&mut ctx).unwrap() {
            Outcome::Failed(failure) => {
                assert_eq!(failure.reason, "Start Timer Failed");
                assert_eq!(failure.details.as_deref(), Some("TIMER_ID_ALREADY_IN_USE"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
