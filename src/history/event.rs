//! Normalized view over raw history records
//!
//! An [`Event`] consolidates the raw record types so groups of similar
//! events can be read uniformly: one task category, one lifecycle state, one
//! correlation id, one causal back-reference, and the opaque payload slots
//! (input, output, control, reason, details).
//!
//! Normalizing a record needs the complete history: terminal activity
//! records carry only a numeric back-reference to their scheduling record,
//! and the logical step identifier has to be re-derived from that record.
//! The service guarantees referential completeness within one execution's
//! history, so a dangling back-reference is a fatal invariant violation.

use chrono::{DateTime, Utc};

use super::raw::{EventAttributes, EventKind, RawEvent};
use super::{ActionId, EventId, EventState, TaskType};

/// Fatal defects in a fetched history.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The service reported an event type this engine does not know.
    /// Protocol drift; the pass must abort rather than silently skip.
    #[error("unsupported history event type: {0}")]
    UnsupportedEventType(String),

    /// A record referenced a causal event id that is not in the history.
    /// Indicates a corrupted or incomplete fetch.
    #[error("event {referencing} references event {referenced} which is missing from history")]
    MissingCausalEvent {
        referencing: EventId,
        referenced: EventId,
    },
}

/// One normalized history record.
///
/// All fields are derived from the raw record (and, where back-references
/// are involved, from the full history) at construction time, so reads are
/// cheap during replay.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: EventId,
    timestamp: DateTime<Utc>,
    kind: EventKind,
    initiating_id: Option<EventId>,
    action_id: Option<ActionId>,
    input: Option<String>,
    output: Option<String>,
    control: Option<String>,
    reason: Option<String>,
    details: Option<String>,
}

impl Event {
    /// Normalize one raw record against the complete history.
    pub fn normalize(raw: &RawEvent, history: &[RawEvent]) -> Result<Self, HistoryError> {
        Ok(Self {
            id: raw.id,
            timestamp: raw.timestamp,
            kind: raw.kind(),
            initiating_id: initiating_id(raw),
            action_id: resolve_action_id(raw, history)?,
            input: input(&raw.attributes),
            output: output(&raw.attributes),
            control: control(&raw.attributes),
            reason: reason(&raw.attributes),
            details: details(&raw.attributes),
        })
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn task_type(&self) -> TaskType {
        self.kind.task_type()
    }

    pub fn state(&self) -> EventState {
        self.kind.state()
    }

    /// Id of the event that began this causal chain.
    pub fn initiating_id(&self) -> Option<EventId> {
        self.initiating_id
    }

    /// The logical step identifier this event belongs to, if any.
    pub fn action_id(&self) -> Option<&ActionId> {
        self.action_id.as_ref()
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn control(&self) -> Option<&str> {
        self.control.as_deref()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.id)?;
        if let Some(action_id) = &self.action_id {
            write!(f, " [{action_id}]")?;
        }
        if let Some(reason) = &self.reason {
            write!(f, " {reason}")?;
        }
        if let Some(details) = &self.details {
            write!(f, ": {details}")?;
        }
        Ok(())
    }
}

/// Normalize a full raw history into replay order: descending by id (most
/// recent first), deduplicated.
///
/// The service sends pre-sorted pages, but stitched pagination can
/// interleave or repeat records, so order is re-established here.
pub fn normalize_history(history: &[RawEvent]) -> Result<Vec<Event>, HistoryError> {
    let mut events = history
        .iter()
        .map(|raw| Event::normalize(raw, history))
        .collect::<Result<Vec<_>, _>>()?;
    events.sort_by(|a, b| b.id.cmp(&a.id));
    events.dedup_by_key(|e| e.id);
    Ok(events)
}

/// Id of the event that began the record's causal chain.
///
/// Most records begin their own chain; terminal records point back at the
/// scheduling/starting/initiating record. `StartTimerFailed` is the one
/// type with no causal anchor at all.
fn initiating_id(raw: &RawEvent) -> Option<EventId> {
    use EventAttributes as A;
    match &raw.attributes {
        A::DecisionTaskCompleted {
            scheduled_event_id, ..
        }
        | A::ActivityTaskStarted {
            scheduled_event_id, ..
        }
        | A::ActivityTaskCompleted {
            scheduled_event_id, ..
        }
        | A::ActivityTaskFailed {
            scheduled_event_id, ..
        }
        | A::ActivityTaskTimedOut {
            scheduled_event_id, ..
        }
        | A::ActivityTaskCanceled {
            scheduled_event_id, ..
        } => Some(*scheduled_event_id),

        A::TimerFired {
            started_event_id, ..
        }
        | A::TimerCanceled {
            started_event_id, ..
        } => Some(*started_event_id),

        A::StartChildWorkflowExecutionFailed {
            initiated_event_id, ..
        }
        | A::ChildWorkflowExecutionStarted { initiated_event_id }
        | A::ChildWorkflowExecutionCompleted {
            initiated_event_id, ..
        }
        | A::ChildWorkflowExecutionFailed {
            initiated_event_id, ..
        }
        | A::ChildWorkflowExecutionTimedOut {
            initiated_event_id, ..
        }
        | A::ChildWorkflowExecutionCanceled {
            initiated_event_id, ..
        }
        | A::ChildWorkflowExecutionTerminated {
            initiated_event_id, ..
        }
        | A::SignalExternalWorkflowExecutionFailed {
            initiated_event_id, ..
        }
        | A::ExternalWorkflowExecutionSignaled {
            initiated_event_id, ..
        } => Some(*initiated_event_id),

        A::StartTimerFailed { .. } => None,

        _ => Some(raw.id),
    }
}

/// Resolve the logical step identifier for a record.
///
/// Terminal activity records do not repeat the activity id; they carry the
/// id of their `ActivityTaskScheduled` record, and the identifier is
/// re-derived from that record.
fn resolve_action_id(
    raw: &RawEvent,
    history: &[RawEvent],
) -> Result<Option<ActionId>, HistoryError> {
    use EventAttributes as A;
    let action_id = match &raw.attributes {
        A::ActivityTaskScheduled { activity_id, .. }
        | A::ScheduleActivityTaskFailed { activity_id, .. } => {
            Some(ActionId::new(activity_id.clone()))
        }

        A::ActivityTaskStarted {
            scheduled_event_id, ..
        }
        | A::ActivityTaskCompleted {
            scheduled_event_id, ..
        }
        | A::ActivityTaskFailed {
            scheduled_event_id, ..
        }
        | A::ActivityTaskTimedOut {
            scheduled_event_id, ..
        }
        | A::ActivityTaskCanceled {
            scheduled_event_id, ..
        } => {
            let scheduled = history
                .iter()
                .find(|e| e.id == *scheduled_event_id)
                .ok_or(HistoryError::MissingCausalEvent {
                    referencing: raw.id,
                    referenced: *scheduled_event_id,
                })?;
            resolve_action_id(scheduled, history)?
        }

        A::WorkflowExecutionSignaled { signal_name, .. }
        | A::SignalExternalWorkflowExecutionInitiated { signal_name, .. } => {
            Some(ActionId::new(signal_name.clone()))
        }

        A::MarkerRecorded { marker_name, .. } => Some(ActionId::new(marker_name.clone())),

        A::TimerStarted { timer_id, .. }
        | A::StartTimerFailed { timer_id, .. }
        | A::TimerFired { timer_id, .. }
        | A::TimerCanceled { timer_id, .. }
        | A::CancelTimerFailed { timer_id, .. } => Some(ActionId::new(timer_id.clone())),

        A::StartChildWorkflowExecutionInitiated { control, .. }
        | A::RequestCancelExternalWorkflowExecutionInitiated { control, .. }
        | A::RequestCancelExternalWorkflowExecutionFailed { control, .. } => {
            control.clone().map(ActionId::new)
        }

        _ => None,
    };
    Ok(action_id)
}

fn input(attributes: &EventAttributes) -> Option<String> {
    use EventAttributes as A;
    match attributes {
        A::WorkflowExecutionStarted { input }
        | A::WorkflowExecutionContinuedAsNew { input }
        | A::ActivityTaskScheduled { input, .. }
        | A::WorkflowExecutionSignaled { input, .. }
        | A::StartChildWorkflowExecutionInitiated { input, .. }
        | A::SignalExternalWorkflowExecutionInitiated { input, .. } => input.clone(),
        A::MarkerRecorded { details, .. } => details.clone(),
        A::TimerStarted { .. } => Some("Timer Started".to_string()),
        _ => None,
    }
}

fn output(attributes: &EventAttributes) -> Option<String> {
    use EventAttributes as A;
    match attributes {
        A::WorkflowExecutionCompleted { result }
        | A::ActivityTaskCompleted { result, .. }
        | A::ChildWorkflowExecutionCompleted { result, .. } => result.clone(),
        A::DecisionTaskCompleted {
            execution_context, ..
        } => execution_context.clone(),
        // A delivered signal's payload is its output.
        A::WorkflowExecutionSignaled { input, .. } => input.clone(),
        A::MarkerRecorded { details, .. } => details.clone(),
        A::TimerFired { .. } => Some("Timer Fired".to_string()),
        A::TimerCanceled { .. } => Some("Timer Canceled".to_string()),
        A::ExternalWorkflowExecutionSignaled { run_id, .. } => Some(run_id.clone()),
        _ => None,
    }
}

fn control(attributes: &EventAttributes) -> Option<String> {
    use EventAttributes as A;
    match attributes {
        A::ActivityTaskScheduled { control, .. }
        | A::TimerStarted { control, .. }
        | A::StartChildWorkflowExecutionInitiated { control, .. }
        | A::StartChildWorkflowExecutionFailed { control, .. }
        | A::SignalExternalWorkflowExecutionInitiated { control, .. }
        | A::SignalExternalWorkflowExecutionFailed { control, .. }
        | A::RequestCancelExternalWorkflowExecutionInitiated { control, .. }
        | A::RequestCancelExternalWorkflowExecutionFailed { control, .. } => control.clone(),
        _ => None,
    }
}

fn reason(attributes: &EventAttributes) -> Option<String> {
    use EventAttributes as A;
    let reason = match attributes {
        A::WorkflowExecutionCancelRequested { .. } => "Workflow Execution Cancel Requested",
        A::CompleteWorkflowExecutionFailed { .. } => "Complete Workflow Execution Failed",
        A::WorkflowExecutionFailed { .. } => "Workflow Execution Failed",
        A::FailWorkflowExecutionFailed { .. } => "Fail Workflow Execution Failed",
        A::WorkflowExecutionTimedOut {} => "Workflow Execution Timed Out",
        A::WorkflowExecutionCanceled { .. } => "Workflow Execution Canceled",
        A::CancelWorkflowExecutionFailed { .. } => "Cancel Workflow Execution Failed",
        A::ContinueAsNewWorkflowExecutionFailed { .. } => {
            "Continue As New Workflow Execution Failed"
        }
        A::WorkflowExecutionTerminated { .. } => "Workflow Execution Terminated",
        A::ScheduleActivityTaskFailed { .. } => "Schedule Activity Task Failed",
        A::ActivityTaskFailed { reason, .. } => return reason.clone(),
        A::ActivityTaskTimedOut { timeout_type, .. } => return Some(timeout_type.clone()),
        A::ActivityTaskCanceled { .. } => "Activity Task Canceled",
        A::ActivityTaskCancelRequested { .. } => "Activity Task Cancel Requested",
        A::RequestCancelActivityTaskFailed { .. } => "Request Cancel Activity Task Failed",
        A::RecordMarkerFailed { .. } => "Record Marker Failed",
        A::StartTimerFailed { .. } => "Start Timer Failed",
        A::StartChildWorkflowExecutionFailed { .. } => "Start Child Workflow Execution Failed",
        A::ChildWorkflowExecutionFailed { reason, .. } => return reason.clone(),
        A::ChildWorkflowExecutionTimedOut { .. } => "Child Workflow Execution Timed Out",
        A::ChildWorkflowExecutionCanceled { .. } => "Child Workflow Execution Canceled",
        A::ChildWorkflowExecutionTerminated { .. } => "Child Workflow Execution Terminated",
        A::SignalExternalWorkflowExecutionFailed { .. } => {
            "Signal External Workflow Execution Failed"
        }
        A::RequestCancelExternalWorkflowExecutionFailed { .. } => {
            "Request Cancel External Workflow Execution Failed"
        }
        _ => return None,
    };
    Some(reason.to_string())
}

fn details(attributes: &EventAttributes) -> Option<String> {
    use EventAttributes as A;
    match attributes {
        A::WorkflowExecutionCancelRequested { cause }
        | A::CompleteWorkflowExecutionFailed { cause }
        | A::FailWorkflowExecutionFailed { cause }
        | A::CancelWorkflowExecutionFailed { cause }
        | A::ContinueAsNewWorkflowExecutionFailed { cause }
        | A::ScheduleActivityTaskFailed { cause, .. }
        | A::RequestCancelActivityTaskFailed { cause, .. }
        | A::RecordMarkerFailed { cause, .. }
        | A::StartTimerFailed { cause, .. }
        | A::StartChildWorkflowExecutionFailed { cause, .. }
        | A::SignalExternalWorkflowExecutionFailed { cause, .. }
        | A::RequestCancelExternalWorkflowExecutionFailed { cause, .. } => cause.clone(),

        A::WorkflowExecutionFailed { details }
        | A::WorkflowExecutionCanceled { details }
        | A::WorkflowExecutionTerminated { details }
        | A::ActivityTaskFailed { details, .. }
        | A::ActivityTaskTimedOut { details, .. }
        | A::ActivityTaskCanceled { details, .. }
        | A::MarkerRecorded { details, .. }
        | A::ChildWorkflowExecutionFailed { details, .. }
        | A::ChildWorkflowExecutionCanceled { details, .. } => details.clone(),

        A::ChildWorkflowExecutionTimedOut { timeout_type, .. } => Some(timeout_type.clone()),
        A::ChildWorkflowExecutionTerminated { run_id, .. } => Some(run_id.clone()),

        _ => None,
    }
}
