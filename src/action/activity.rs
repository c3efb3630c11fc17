//! Activity step: schedule, observe, retry, resolve
//!
//! The state machine over the step's history:
//! - no events yet → queue a schedule decision, stay pending
//! - scheduled/started → pending, nothing to add
//! - backoff timer elapsed → queue the schedule decision again, pending
//! - completed → deserialize the recorded output and resolve
//! - failed → consult the retry strategy: either queue a backoff timer
//!   (tagged with the attempt number) or resolve as failed
//!
//! Rescheduling is idempotent because the decision is derived from state,
//! never from poller memory: once the schedule decision is durably recorded,
//! the next pass sees `Initial`/`Active` instead of `NotStarted`.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::context::DecisionContext;
use crate::converter::{ConversionError, DataConverter, DataConverterExt};
use crate::decision::{ActivityType, Decision};
use crate::history::{ActionId, Event, EventState, TaskType};
use crate::outcome::Outcome;
use crate::protocol::timeout_string;
use crate::retry::RetryStrategy;

use super::{failure_from_event, Action, ActionError};

/// Descriptor of one activity step.
///
/// `T` is the activity's output type; the recorded result payload is
/// deserialized into it when the step resolves.
pub struct ActivityAction<T> {
    action_id: ActionId,
    activity_type: ActivityType,
    input: Option<serde_json::Value>,
    task_list: Option<String>,
    control: Option<String>,
    priority: Option<i32>,
    heartbeat_timeout: Option<Duration>,
    schedule_to_close_timeout: Option<Duration>,
    schedule_to_start_timeout: Option<Duration>,
    start_to_close_timeout: Option<Duration>,
    retry: Option<Arc<dyn RetryStrategy>>,
    _output: PhantomData<fn() -> T>,
}

impl<T> ActivityAction<T> {
    pub fn new(action_id: impl Into<ActionId>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            activity_type: ActivityType {
                name: name.into(),
                version: version.into(),
            },
            input: None,
            task_list: None,
            control: None,
            priority: None,
            heartbeat_timeout: None,
            schedule_to_close_timeout: None,
            schedule_to_start_timeout: None,
            start_to_close_timeout: None,
            retry: None,
            _output: PhantomData,
        }
    }

    /// Set the input the activity is scheduled with.
    pub fn with_input<I: Serialize>(mut self, input: &I) -> Result<Self, ConversionError> {
        self.input = Some(serde_json::to_value(input).map_err(ConversionError::from)?);
        Ok(self)
    }

    /// Route the activity to a task list other than the workflow's.
    pub fn with_task_list(mut self, task_list: impl Into<String>) -> Self {
        self.task_list = Some(task_list.into());
        self
    }

    pub fn with_control(mut self, control: impl Into<String>) -> Self {
        self.control = Some(control.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_heartbeat_timeout(mut self, timeout: Duration) -> Self {
        self.heartbeat_timeout = Some(timeout);
        self
    }

    pub fn with_schedule_to_close_timeout(mut self, timeout: Duration) -> Self {
        self.schedule_to_close_timeout = Some(timeout);
        self
    }

    pub fn with_schedule_to_start_timeout(mut self, timeout: Duration) -> Self {
        self.schedule_to_start_timeout = Some(timeout);
        self
    }

    pub fn with_start_to_close_timeout(mut self, timeout: Duration) -> Self {
        self.start_to_close_timeout = Some(timeout);
        self
    }

    /// Retry failed executions according to a strategy. Without one the
    /// first failure is terminal.
    pub fn with_retry(mut self, strategy: Arc<dyn RetryStrategy>) -> Self {
        self.retry = Some(strategy);
        self
    }

    fn schedule_decision(
        &self,
        converter: &Arc<dyn DataConverter>,
    ) -> Result<Decision, ConversionError> {
        let input = self
            .input
            .as_ref()
            .map(|value| converter.write_value(value))
            .transpose()?;
        Ok(Decision::ScheduleActivityTask {
            activity_id: self.action_id.clone(),
            activity_type: self.activity_type.clone(),
            task_list: self.task_list.clone(),
            input,
            control: self.control.clone(),
            heartbeat_timeout: timeout_string(self.heartbeat_timeout),
            schedule_to_close_timeout: timeout_string(self.schedule_to_close_timeout),
            schedule_to_start_timeout: timeout_string(self.schedule_to_start_timeout),
            start_to_close_timeout: timeout_string(self.start_to_close_timeout),
            priority: self.priority,
        })
    }

    /// Number of recorded failures for this step and the timestamp of its
    /// most recent started event (falling back to its most recent failure
    /// when no started event survives in history).
    fn failure_history(&self, events: &[Event]) -> (u64, Option<DateTime<Utc>>)
    where
        T: DeserializeOwned,
    {
        let own_events = self.task_events(events);
        let failures = own_events
            .iter()
            .filter(|e| e.state() == EventState::Error)
            .count() as u64;
        // Events are most recent first, so `find` is the latest match.
        let started_at = own_events
            .iter()
            .find(|e| e.state() == EventState::Active)
            .or_else(|| own_events.iter().find(|e| e.state() == EventState::Error))
            .map(|e| e.timestamp());
        (failures, started_at)
    }
}

impl<T: DeserializeOwned> Action for ActivityAction<T> {
    type Output = T;

    fn action_id(&self) -> &ActionId {
        &self.action_id
    }

    fn task_type(&self) -> TaskType {
        TaskType::Activity
    }

    fn decide(&self, ctx: &mut DecisionContext) -> Result<Outcome<T>, ActionError> {
        let state = self.state(ctx.events());
        match state {
            EventState::NotStarted => {
                let decision = self.schedule_decision(ctx.converter())?;
                debug!(action_id = %self.action_id, "scheduling activity");
                ctx.add_decision(decision);
                Ok(Outcome::Pending)
            }

            EventState::Initial | EventState::Active => Ok(Outcome::Pending),

            EventState::Retry => {
                let decision = self.schedule_decision(ctx.converter())?;
                debug!(action_id = %self.action_id, "backoff elapsed, rescheduling activity");
                ctx.add_decision(decision);
                Ok(Outcome::Pending)
            }

            EventState::Success => {
                let output = {
                    let Some(event) = self.current_event(ctx.events()) else {
                        return Err(ActionError::IllegalState {
                            action_id: self.action_id.clone(),
                            state,
                        });
                    };
                    ctx.converter().from_optional_data::<T>(event.output())?
                };
                Ok(Outcome::Resolved(output))
            }

            EventState::Error => {
                let (attempts, started_at) = self.failure_history(ctx.events());
                let delay = match (&self.retry, started_at) {
                    (Some(strategy), Some(started_at)) => strategy.next_retry(attempts, started_at),
                    _ => Duration::ZERO,
                };

                if delay.is_zero() {
                    let failure = {
                        let Some(event) = self.current_event(ctx.events()) else {
                            return Err(ActionError::IllegalState {
                                action_id: self.action_id.clone(),
                                state,
                            });
                        };
                        failure_from_event(event, ctx.converter())
                    };
                    Ok(Outcome::Failed(failure))
                } else {
                    // The backoff timer reuses this step's id so its fired
                    // event correlates back; the control slot records which
                    // attempt it backs off.
                    let control = ctx.converter().to_data(&attempts)?;
                    debug!(
                        action_id = %self.action_id,
                        attempts,
                        delay_secs = delay.as_secs(),
                        "activity failed, scheduling retry timer"
                    );
                    ctx.add_decision(Decision::StartTimer {
                        timer_id: self.action_id.clone(),
                        start_to_fire_timeout: delay.as_secs().max(1).to_string(),
                        control: Some(control),
                    });
                    Ok(Outcome::Pending)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::JsonDataConverter;
    use crate::history::fixtures::{raw, timestamp};
    use crate::history::{normalize_history, EventAttributes, EventId, RawEvent};
    use crate::retry::FixedDelay;

    fn context(history: &[RawEvent]) -> DecisionContext {
        let events = normalize_history(history).unwrap();
        DecisionContext::new(events, Arc::new(JsonDataConverter))
    }

    fn scheduled(id: i64) -> RawEvent {
        raw(
            id,
            EventAttributes::ActivityTaskScheduled {
                activity_id: "step1".to_string(),
                input: Some("\"in\"".to_string()),
                control: None,
            },
        )
    }

    #[test]
    fn test_not_started_emits_schedule_decision() {
        let mut ctx = context(&[raw(1, EventAttributes::WorkflowExecutionStarted {
            input: None,
        })]);
        let action = ActivityAction::<i64>::new("step1", "double", "1.0")
            .with_input(&21)
            .unwrap();

        let outcome = action.decide(&mut ctx).unwrap();
        assert!(outcome.is_pending());
        assert_eq!(ctx.decisions().len(), 1);
        match &ctx.decisions()[0] {
            Decision::ScheduleActivityTask {
                activity_id,
                activity_type,
                input,
                ..
            } => {
                assert_eq!(activity_id.as_str(), "step1");
                assert_eq!(activity_type.name, "double");
                assert_eq!(input.as_deref(), Some("21"));
            }
            other => panic!("expected ScheduleActivityTask, got {other}"),
        }
    }

    #[test]
    fn test_scheduled_and_started_stay_pending_without_decisions() {
        let mut ctx = context(&[
            scheduled(3),
            raw(4, EventAttributes::ActivityTaskStarted {
                scheduled_event_id: EventId(3),
            }),
        ]);
        let action = ActivityAction::<i64>::new("step1", "double", "1.0");

        let outcome = action.decide(&mut ctx).unwrap();
        assert!(outcome.is_pending());
        assert!(ctx.decisions().is_empty());
    }

    #[test]
    fn test_completed_resolves_with_deserialized_output() {
        let mut ctx = context(&[
            scheduled(3),
            raw(4, EventAttributes::ActivityTaskStarted {
                scheduled_event_id: EventId(3),
            }),
            raw(
                5,
                EventAttributes::ActivityTaskCompleted {
                    scheduled_event_id: EventId(3),
                    result: Some("42".to_string()),
                },
            ),
        ]);
        let action = ActivityAction::<i64>::new("step1", "double", "1.0");

        let outcome = action.decide(&mut ctx).unwrap();
        assert_eq!(outcome, Outcome::Resolved(42));
        assert!(ctx.decisions().is_empty());
    }

    #[test]
    fn test_failure_with_retry_emits_one_backoff_timer() {
        let mut ctx = context(&[
            scheduled(3),
            raw(4, EventAttributes::ActivityTaskStarted {
                scheduled_event_id: EventId(3),
            }),
            raw(
                5,
                EventAttributes::ActivityTaskFailed {
                    scheduled_event_id: EventId(3),
                    reason: Some("boom".to_string()),
                    details: None,
                },
            ),
        ]);
        let action = ActivityAction::<i64>::new("step1", "double", "1.0")
            .with_retry(Arc::new(FixedDelay::new(Duration::from_secs(5))));

        let outcome = action.decide(&mut ctx).unwrap();
        assert!(outcome.is_pending());
        assert_eq!(ctx.decisions().len(), 1);
        match &ctx.decisions()[0] {
            Decision::StartTimer {
                timer_id,
                start_to_fire_timeout,
                control,
            } => {
                assert_eq!(timer_id.as_str(), "step1");
                assert_eq!(start_to_fire_timeout, "5");
                assert_eq!(control.as_deref(), Some("1"));
            }
            other => panic!("expected StartTimer, got {other}"),
        }
    }

    #[test]
    fn test_failure_without_retry_resolves_failed() {
        let mut ctx = context(&[
            scheduled(3),
            raw(
                5,
                EventAttributes::ActivityTaskFailed {
                    scheduled_event_id: EventId(3),
                    reason: Some("boom".to_string()),
                    details: Some("wire details".to_string()),
                },
            ),
        ]);
        let action = ActivityAction::<i64>::new("step1", "double", "1.0");

        match action.decide(&mut ctx).unwrap() {
            Outcome::Failed(failure) => {
                assert_eq!(failure.reason, "boom");
                assert_eq!(failure.details.as_deref(), Some("wire details"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(ctx.decisions().is_empty());
    }

    #[test]
    fn test_exhausted_retry_resolves_failed() {
        // Two failures already recorded; strategy allows a single attempt.
        let mut ctx = context(&[
            scheduled(3),
            raw(4, EventAttributes::ActivityTaskStarted {
                scheduled_event_id: EventId(3),
            }),
            raw(
                5,
                EventAttributes::ActivityTaskFailed {
                    scheduled_event_id: EventId(3),
                    reason: Some("first".to_string()),
                    details: None,
                },
            ),
            raw(
                7,
                EventAttributes::TimerStarted {
                    timer_id: "step1".to_string(),
                    control: Some("1".to_string()),
                    start_to_fire_timeout: "5".to_string(),
                },
            ),
            raw(8, EventAttributes::TimerFired {
                timer_id: "step1".to_string(),
                started_event_id: EventId(7),
            }),
            raw(
                9,
                EventAttributes::ActivityTaskScheduled {
                    activity_id: "step1".to_string(),
                    input: None,
                    control: None,
                },
            ),
            raw(
                10,
                EventAttributes::ActivityTaskFailed {
                    scheduled_event_id: EventId(9),
                    reason: Some("second".to_string()),
                    details: None,
                },
            ),
        ]);
        let action = ActivityAction::<i64>::new("step1", "double", "1.0").with_retry(Arc::new(
            crate::retry::MaxAttempts::new(FixedDelay::new(Duration::from_secs(5)), 1),
        ));

        match action.decide(&mut ctx).unwrap() {
            Outcome::Failed(failure) => assert_eq!(failure.reason, "second"),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(ctx.decisions().is_empty());
    }

    #[test]
    fn test_retry_state_reschedules_activity() {
        let mut ctx = context(&[
            scheduled(3),
            raw(
                5,
                EventAttributes::ActivityTaskFailed {
                    scheduled_event_id: EventId(3),
                    reason: Some("boom".to_string()),
                    details: None,
                },
            ),
            raw(
                7,
                EventAttributes::TimerStarted {
                    timer_id: "step1".to_string(),
                    control: Some("1".to_string()),
                    start_to_fire_timeout: "5".to_string(),
                },
            ),
            raw(8, EventAttributes::TimerFired {
                timer_id: "step1".to_string(),
                started_event_id: EventId(7),
            }),
        ]);
        let action = ActivityAction::<i64>::new("step1", "double", "1.0")
            .with_retry(Arc::new(FixedDelay::new(Duration::from_secs(5))));

        let outcome = action.decide(&mut ctx).unwrap();
        assert!(outcome.is_pending());
        assert_eq!(ctx.decisions().len(), 1);
        assert!(matches!(
            ctx.decisions()[0],
            Decision::ScheduleActivityTask { .. }
        ));
    }

    #[test]
    fn test_decide_is_idempotent_over_unchanged_history() {
        let history = vec![
            scheduled(3),
            raw(
                5,
                EventAttributes::ActivityTaskFailed {
                    scheduled_event_id: EventId(3),
                    reason: Some("boom".to_string()),
                    details: None,
                },
            ),
        ];
        let action = ActivityAction::<i64>::new("step1", "double", "1.0")
            .with_retry(Arc::new(FixedDelay::new(Duration::from_secs(5))));

        let mut first = context(&history);
        let mut second = context(&history);
        let outcome_a = action.decide(&mut first).unwrap();
        let outcome_b = action.decide(&mut second).unwrap();

        assert_eq!(outcome_a.is_pending(), outcome_b.is_pending());
        assert_eq!(first.decisions(), second.decisions());
    }

    #[test]
    fn test_failure_history_counts_and_start_time() {
        let history = [
            scheduled(3),
            raw(4, EventAttributes::ActivityTaskStarted {
                scheduled_event_id: EventId(3),
            }),
            raw(
                5,
                EventAttributes::ActivityTaskFailed {
                    scheduled_event_id: EventId(3),
                    reason: None,
                    details: None,
                },
            ),
        ];
        let events = normalize_history(&history).unwrap();
        let action = ActivityAction::<i64>::new("step1", "double", "1.0");

        let (failures, started_at) = action.failure_history(&events);
        assert_eq!(failures, 1);
        assert_eq!(started_at, Some(timestamp(4)));
    }
}
