//! Workflow steps ("actions") and their state machines
//!
//! An action is a stateless descriptor of one logical step: a correlation id
//! plus parameters. It owns no mutable state; `decide` recomputes the
//! step's situation from the event history every pass and either returns a
//! [`Outcome`] or queues exactly one new decision.
//!
//! The step repertoire is closed: [`ActivityAction`], [`TimerAction`],
//! [`RecordMarkerAction`], [`WaitSignalAction`]. Each variant reads the same
//! query primitives provided on the [`Action`] trait.

mod activity;
mod marker;
mod signal;
mod timer;

pub use activity::ActivityAction;
pub use marker::RecordMarkerAction;
pub use signal::WaitSignalAction;
pub use timer::TimerAction;

use std::sync::Arc;

use crate::context::DecisionContext;
use crate::converter::{ConversionError, DataConverter, DataConverterExt};
use crate::history::{ActionId, Event, EventState, TaskType};
use crate::outcome::{ActionFailure, Outcome};

/// Fatal errors raised while deciding a step.
///
/// These abort the replay of the current pass; the poller converts them
/// into a fail-workflow decision.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The step's history is in a state its state machine cannot account
    /// for (e.g. a terminal state with no terminal event).
    #[error("action '{action_id}' in unexpected state {state}")]
    IllegalState {
        action_id: ActionId,
        state: EventState,
    },

    /// The service rejected a record-marker decision. The only cause the
    /// service reports for this decision type is a non-retryable
    /// operation-not-permitted violation, so this is not retried.
    #[error("record marker '{action_id}' rejected: operation not permitted ({details:?})")]
    OperationNotPermitted {
        action_id: ActionId,
        details: Option<String>,
    },

    /// A payload failed to serialize or deserialize.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Arbitrary failure out of user workflow code.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One logical workflow step.
///
/// Implementations must take care that replay is idempotent: `decide` over
/// an unchanged event list must produce the identical outcome and decisions
/// every time.
pub trait Action {
    /// The step's resolved value type.
    type Output;

    /// Unique id of this step within a run, for its task type.
    fn action_id(&self) -> &ActionId;

    /// The task category this step's events belong to.
    fn task_type(&self) -> TaskType;

    /// Inspect the history and either queue a decision or report the step's
    /// completion state.
    fn decide(&self, ctx: &mut DecisionContext) -> Result<Outcome<Self::Output>, ActionError>;

    /// Events correlated to this step, most recent first (ignoring task
    /// type; a backoff timer's events correlate to the activity they
    /// reschedule).
    fn events<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events
            .iter()
            .filter(|e| e.action_id() == Some(self.action_id()))
            .collect()
    }

    /// The most recent event for this step, if any.
    fn current_event<'a>(&self, events: &'a [Event]) -> Option<&'a Event> {
        events
            .iter()
            .find(|e| e.action_id() == Some(self.action_id()))
    }

    /// Events correlated to this step that also match its task type. Used
    /// for counting an activity's own failures across retries.
    fn task_events<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events
            .iter()
            .filter(|e| {
                e.action_id() == Some(self.action_id()) && e.task_type() == self.task_type()
            })
            .collect()
    }

    /// Current state of this step.
    ///
    /// [`EventState::NotStarted`] when no correlated event exists. A
    /// non-timer step whose most recent correlated event is an elapsed
    /// backoff timer reports [`EventState::Retry`].
    fn state(&self, events: &[Event]) -> EventState {
        match self.current_event(events) {
            None => EventState::NotStarted,
            Some(event)
                if event.task_type() == TaskType::Timer
                    && self.task_type() != TaskType::Timer
                    && event.state() == EventState::Success =>
            {
                EventState::Retry
            }
            Some(event) => event.state(),
        }
    }
}

/// Convert a failure event's payload into an error value.
///
/// The details slot is expected to hold a serialized [`ActionFailure`];
/// anything else falls back to a generic failure combining the event's
/// reason and raw details.
pub(crate) fn failure_from_event(
    event: &Event,
    converter: &Arc<dyn DataConverter>,
) -> ActionFailure {
    event
        .details()
        .and_then(|details| converter.from_data::<ActionFailure>(details).ok())
        .unwrap_or_else(|| ActionFailure {
            reason: event.reason().unwrap_or("unknown failure").to_string(),
            details: event.details().map(str::to_string),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::JsonDataConverter;
    use crate::history::fixtures::raw;
    use crate::history::{normalize_history, EventAttributes, EventId};

    struct Probe {
        id: ActionId,
        task_type: TaskType,
    }

    impl Probe {
        fn activity(id: &str) -> Self {
            Self {
                id: ActionId::new(id),
                task_type: TaskType::Activity,
            }
        }
    }

    impl Action for Probe {
        type Output = ();

        fn action_id(&self) -> &ActionId {
            &self.id
        }

        fn task_type(&self) -> TaskType {
            self.task_type
        }

        fn decide(&self, _ctx: &mut DecisionContext) -> Result<Outcome<()>, ActionError> {
            Ok(Outcome::Pending)
        }
    }

    fn step1_history() -> Vec<Event> {
        normalize_history(&[
            raw(1, EventAttributes::WorkflowExecutionStarted { input: None }),
            raw(
                3,
                EventAttributes::ActivityTaskScheduled {
                    activity_id: "step1".to_string(),
                    input: None,
                    control: None,
                },
            ),
            raw(4, EventAttributes::ActivityTaskStarted {
                scheduled_event_id: EventId(3),
            }),
        ])
        .unwrap()
    }

    #[test]
    fn test_state_not_started_without_correlated_events() {
        let events = step1_history();
        let probe = Probe::activity("other-step");
        assert_eq!(probe.state(&events), EventState::NotStarted);
        assert!(probe.current_event(&events).is_none());
    }

    #[test]
    fn test_state_follows_highest_event_id() {
        let events = step1_history();
        let probe = Probe::activity("step1");
        assert_eq!(probe.state(&events), EventState::Active);
        assert_eq!(probe.current_event(&events).unwrap().id(), EventId(4));
    }

    #[test]
    fn test_elapsed_backoff_timer_reads_as_retry() {
        let events = normalize_history(&[
            raw(
                3,
                EventAttributes::ActivityTaskScheduled {
                    activity_id: "step1".to_string(),
                    input: None,
                    control: None,
                },
            ),
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
        ])
        .unwrap();

        let probe = Probe::activity("step1");
        assert_eq!(probe.state(&events), EventState::Retry);
        // The timer events correlate but are not the activity's own task
        // events.
        assert_eq!(probe.events(&events).len(), 4);
        assert_eq!(probe.task_events(&events).len(), 2);
    }

    #[test]
    fn test_failure_from_event_prefers_serialized_failure() {
        let converter: Arc<dyn DataConverter> = Arc::new(JsonDataConverter);
        let serialized =
            serde_json::to_string(&ActionFailure::new("ValidationError").with_details("qty"))
                .unwrap();
        let events = normalize_history(&[
            raw(
                3,
                EventAttributes::ActivityTaskScheduled {
                    activity_id: "step1".to_string(),
                    input: None,
                    control: None,
                },
            ),
            raw(
                5,
                EventAttributes::ActivityTaskFailed {
                    scheduled_event_id: EventId(3),
                    reason: Some("ignored".to_string()),
                    details: Some(serialized),
                },
            ),
        ])
        .unwrap();

        let failure = failure_from_event(&events[0], &converter);
        assert_eq!(failure.reason, "ValidationError");
        assert_eq!(failure.details.as_deref(), Some("qty"));
    }

    #[test]
    fn test_failure_from_event_falls_back_to_reason_and_details() {
        let converter: Arc<dyn DataConverter> = Arc::new(JsonDataConverter);
        let events = normalize_history(&[
            raw(
                3,
                EventAttributes::ActivityTaskScheduled {
                    activity_id: "step1".to_string(),
                    input: None,
                    control: None,
                },
            ),
            raw(
                5,
                EventAttributes::ActivityTaskFailed {
                    scheduled_event_id: EventId(3),
                    reason: Some("SomethingBroke".to_string()),
                    details: Some("not a serialized failure".to_string()),
                },
            ),
        ])
        .unwrap();

        let failure = failure_from_event(&events[0], &converter);
        assert_eq!(failure.reason, "SomethingBroke");
        assert_eq!(failure.details.as_deref(), Some("not a serialized failure"));
    }
}
