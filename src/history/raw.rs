//! Raw history records as reported by the orchestration service
//!
//! The repertoire of record types is closed: [`EventKind`] enumerates every
//! type the service can emit and [`EventAttributes`] carries each type's
//! fields. The derivation tables on [`EventKind`] (task category, lifecycle
//! state) are exhaustive matches; adding a variant without extending them is
//! a compile error, which keeps the mapping auditable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, EventState, TaskType};

/// One raw history record. Owned by the service; never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Monotonically increasing id within one execution.
    pub id: EventId,

    /// When the service recorded the event.
    pub timestamp: DateTime<Utc>,

    /// Type tag and type-specific fields.
    #[serde(flatten)]
    pub attributes: EventAttributes,
}

impl RawEvent {
    pub fn kind(&self) -> EventKind {
        self.attributes.kind()
    }
}

/// The closed set of raw history event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    // Workflow lifecycle
    WorkflowExecutionStarted,
    WorkflowExecutionCancelRequested,
    WorkflowExecutionCompleted,
    CompleteWorkflowExecutionFailed,
    WorkflowExecutionFailed,
    FailWorkflowExecutionFailed,
    WorkflowExecutionTimedOut,
    WorkflowExecutionCanceled,
    CancelWorkflowExecutionFailed,
    WorkflowExecutionContinuedAsNew,
    ContinueAsNewWorkflowExecutionFailed,
    WorkflowExecutionTerminated,
    // Decision tasks
    DecisionTaskScheduled,
    DecisionTaskStarted,
    DecisionTaskCompleted,
    DecisionTaskTimedOut,
    // Activity tasks
    ActivityTaskScheduled,
    ScheduleActivityTaskFailed,
    ActivityTaskStarted,
    ActivityTaskCompleted,
    ActivityTaskFailed,
    ActivityTaskTimedOut,
    ActivityTaskCanceled,
    ActivityTaskCancelRequested,
    RequestCancelActivityTaskFailed,
    // Signals into this execution
    WorkflowExecutionSignaled,
    // Markers
    MarkerRecorded,
    RecordMarkerFailed,
    // Timers
    TimerStarted,
    StartTimerFailed,
    TimerFired,
    TimerCanceled,
    CancelTimerFailed,
    // Child workflows
    StartChildWorkflowExecutionInitiated,
    StartChildWorkflowExecutionFailed,
    ChildWorkflowExecutionStarted,
    ChildWorkflowExecutionCompleted,
    ChildWorkflowExecutionFailed,
    ChildWorkflowExecutionTimedOut,
    ChildWorkflowExecutionCanceled,
    ChildWorkflowExecutionTerminated,
    // Signals to external executions
    SignalExternalWorkflowExecutionInitiated,
    SignalExternalWorkflowExecutionFailed,
    ExternalWorkflowExecutionSignaled,
    // Cancel requests to external executions
    RequestCancelExternalWorkflowExecutionInitiated,
    RequestCancelExternalWorkflowExecutionFailed,
    ExternalWorkflowExecutionCancelRequested,
}

impl EventKind {
    /// Every variant, for totality checks over the derivation tables.
    pub const ALL: [EventKind; 47] = [
        Self::WorkflowExecutionStarted,
        Self::WorkflowExecutionCancelRequested,
        Self::WorkflowExecutionCompleted,
        Self::CompleteWorkflowExecutionFailed,
        Self::WorkflowExecutionFailed,
        Self::FailWorkflowExecutionFailed,
        Self::WorkflowExecutionTimedOut,
        Self::WorkflowExecutionCanceled,
        Self::CancelWorkflowExecutionFailed,
        Self::WorkflowExecutionContinuedAsNew,
        Self::ContinueAsNewWorkflowExecutionFailed,
        Self::WorkflowExecutionTerminated,
        Self::DecisionTaskScheduled,
        Self::DecisionTaskStarted,
        Self::DecisionTaskCompleted,
        Self::DecisionTaskTimedOut,
        Self::ActivityTaskScheduled,
        Self::ScheduleActivityTaskFailed,
        Self::ActivityTaskStarted,
        Self::ActivityTaskCompleted,
        Self::ActivityTaskFailed,
        Self::ActivityTaskTimedOut,
        Self::ActivityTaskCanceled,
        Self::ActivityTaskCancelRequested,
        Self::RequestCancelActivityTaskFailed,
        Self::WorkflowExecutionSignaled,
        Self::MarkerRecorded,
        Self::RecordMarkerFailed,
        Self::TimerStarted,
        Self::StartTimerFailed,
        Self::TimerFired,
        Self::TimerCanceled,
        Self::CancelTimerFailed,
        Self::StartChildWorkflowExecutionInitiated,
        Self::StartChildWorkflowExecutionFailed,
        Self::ChildWorkflowExecutionStarted,
        Self::ChildWorkflowExecutionCompleted,
        Self::ChildWorkflowExecutionFailed,
        Self::ChildWorkflowExecutionTimedOut,
        Self::ChildWorkflowExecutionCanceled,
        Self::ChildWorkflowExecutionTerminated,
        Self::SignalExternalWorkflowExecutionInitiated,
        Self::SignalExternalWorkflowExecutionFailed,
        Self::ExternalWorkflowExecutionSignaled,
        Self::RequestCancelExternalWorkflowExecutionInitiated,
        Self::RequestCancelExternalWorkflowExecutionFailed,
        Self::ExternalWorkflowExecutionCancelRequested,
    ];

    /// Task category this event type belongs to.
    pub fn task_type(self) -> TaskType {
        match self {
            Self::WorkflowExecutionStarted
            | Self::WorkflowExecutionCancelRequested
            | Self::WorkflowExecutionCompleted
            | Self::CompleteWorkflowExecutionFailed
            | Self::WorkflowExecutionFailed
            | Self::FailWorkflowExecutionFailed
            | Self::WorkflowExecutionTimedOut
            | Self::WorkflowExecutionCanceled
            | Self::CancelWorkflowExecutionFailed
            | Self::WorkflowExecutionTerminated => TaskType::WorkflowExecution,

            Self::WorkflowExecutionContinuedAsNew
            | Self::ContinueAsNewWorkflowExecutionFailed => TaskType::ContinueAsNew,

            Self::DecisionTaskScheduled
            | Self::DecisionTaskStarted
            | Self::DecisionTaskCompleted
            | Self::DecisionTaskTimedOut => TaskType::Decision,

            Self::ActivityTaskScheduled
            | Self::ScheduleActivityTaskFailed
            | Self::ActivityTaskStarted
            | Self::ActivityTaskCompleted
            | Self::ActivityTaskFailed
            | Self::ActivityTaskTimedOut
            | Self::ActivityTaskCanceled
            | Self::ActivityTaskCancelRequested
            | Self::RequestCancelActivityTaskFailed => TaskType::Activity,

            Self::WorkflowExecutionSignaled => TaskType::WorkflowSignaled,

            Self::MarkerRecorded | Self::RecordMarkerFailed => TaskType::RecordMarker,

            Self::TimerStarted
            | Self::StartTimerFailed
            | Self::TimerFired
            | Self::TimerCanceled
            | Self::CancelTimerFailed => TaskType::Timer,

            Self::StartChildWorkflowExecutionInitiated
            | Self::StartChildWorkflowExecutionFailed
            | Self::ChildWorkflowExecutionStarted
            | Self::ChildWorkflowExecutionCompleted
            | Self::ChildWorkflowExecutionFailed
            | Self::ChildWorkflowExecutionTimedOut
            | Self::ChildWorkflowExecutionCanceled
            | Self::ChildWorkflowExecutionTerminated => TaskType::StartChildWorkflow,

            Self::SignalExternalWorkflowExecutionInitiated
            | Self::SignalExternalWorkflowExecutionFailed
            | Self::ExternalWorkflowExecutionSignaled => TaskType::SignalExternalWorkflow,

            Self::RequestCancelExternalWorkflowExecutionInitiated
            | Self::RequestCancelExternalWorkflowExecutionFailed
            | Self::ExternalWorkflowExecutionCancelRequested => TaskType::CancelExternalWorkflow,
        }
    }

    /// Lifecycle state this event type reports for its step.
    ///
    /// Two deliberate oddities of the protocol are preserved: a failed
    /// cancel-timer request leaves the timer `Active`, and a canceled timer
    /// counts as `Success` (the wait is over either way).
    pub fn state(self) -> EventState {
        match self {
            Self::WorkflowExecutionStarted => EventState::Initial,
            Self::WorkflowExecutionCancelRequested => EventState::Active,
            Self::WorkflowExecutionCompleted => EventState::Success,
            Self::CompleteWorkflowExecutionFailed => EventState::Error,
            Self::WorkflowExecutionFailed => EventState::Error,
            Self::FailWorkflowExecutionFailed => EventState::Error,
            Self::WorkflowExecutionTimedOut => EventState::Error,
            Self::WorkflowExecutionCanceled => EventState::Error,
            Self::CancelWorkflowExecutionFailed => EventState::Error,
            Self::WorkflowExecutionContinuedAsNew => EventState::Initial,
            Self::ContinueAsNewWorkflowExecutionFailed => EventState::Error,
            Self::WorkflowExecutionTerminated => EventState::Error,

            Self::DecisionTaskScheduled => EventState::Initial,
            Self::DecisionTaskStarted => EventState::Active,
            Self::DecisionTaskCompleted => EventState::Success,
            Self::DecisionTaskTimedOut => EventState::Error,

            Self::ActivityTaskScheduled => EventState::Initial,
            Self::ScheduleActivityTaskFailed => EventState::Error,
            Self::ActivityTaskStarted => EventState::Active,
            Self::ActivityTaskCompleted => EventState::Success,
            Self::ActivityTaskFailed => EventState::Error,
            Self::ActivityTaskTimedOut => EventState::Error,
            Self::ActivityTaskCanceled => EventState::Error,
            Self::ActivityTaskCancelRequested => EventState::Error,
            Self::RequestCancelActivityTaskFailed => EventState::Error,

            Self::WorkflowExecutionSignaled => EventState::Success,

            Self::MarkerRecorded => EventState::Initial,
            Self::RecordMarkerFailed => EventState::Error,

            Self::TimerStarted => EventState::Initial,
            Self::StartTimerFailed => EventState::Error,
            Self::TimerFired => EventState::Success,
            Self::TimerCanceled => EventState::Success,
            Self::CancelTimerFailed => EventState::Active,

            Self::StartChildWorkflowExecutionInitiated => EventState::Initial,
            Self::StartChildWorkflowExecutionFailed => EventState::Error,
            Self::ChildWorkflowExecutionStarted => EventState::Active,
            Self::ChildWorkflowExecutionCompleted => EventState::Success,
            Self::ChildWorkflowExecutionFailed => EventState::Error,
            Self::ChildWorkflowExecutionTimedOut => EventState::Error,
            Self::ChildWorkflowExecutionCanceled => EventState::Error,
            Self::ChildWorkflowExecutionTerminated => EventState::Error,

            Self::SignalExternalWorkflowExecutionInitiated => EventState::Initial,
            Self::SignalExternalWorkflowExecutionFailed => EventState::Error,
            Self::ExternalWorkflowExecutionSignaled => EventState::Success,

            Self::RequestCancelExternalWorkflowExecutionInitiated => EventState::Initial,
            Self::RequestCancelExternalWorkflowExecutionFailed => EventState::Error,
            Self::ExternalWorkflowExecutionCancelRequested => EventState::Success,
        }
    }

    /// The wire tag for this kind (the serde snake_case form).
    pub fn name(self) -> &'static str {
        match self {
            Self::WorkflowExecutionStarted => "workflow_execution_started",
            Self::WorkflowExecutionCancelRequested => "workflow_execution_cancel_requested",
            Self::WorkflowExecutionCompleted => "workflow_execution_completed",
            Self::CompleteWorkflowExecutionFailed => "complete_workflow_execution_failed",
            Self::WorkflowExecutionFailed => "workflow_execution_failed",
            Self::FailWorkflowExecutionFailed => "fail_workflow_execution_failed",
            Self::WorkflowExecutionTimedOut => "workflow_execution_timed_out",
            Self::WorkflowExecutionCanceled => "workflow_execution_canceled",
            Self::CancelWorkflowExecutionFailed => "cancel_workflow_execution_failed",
            Self::WorkflowExecutionContinuedAsNew => "workflow_execution_continued_as_new",
            Self::ContinueAsNewWorkflowExecutionFailed => {
                "continue_as_new_workflow_execution_failed"
            }
            Self::WorkflowExecutionTerminated => "workflow_execution_terminated",
            Self::DecisionTaskScheduled => "decision_task_scheduled",
            Self::DecisionTaskStarted => "decision_task_started",
            Self::DecisionTaskCompleted => "decision_task_completed",
            Self::DecisionTaskTimedOut => "decision_task_timed_out",
            Self::ActivityTaskScheduled => "activity_task_scheduled",
            Self::ScheduleActivityTaskFailed => "schedule_activity_task_failed",
            Self::ActivityTaskStarted => "activity_task_started",
            Self::ActivityTaskCompleted => "activity_task_completed",
            Self::ActivityTaskFailed => "activity_task_failed",
            Self::ActivityTaskTimedOut => "activity_task_timed_out",
            Self::ActivityTaskCanceled => "activity_task_canceled",
            Self::ActivityTaskCancelRequested => "activity_task_cancel_requested",
            Self::RequestCancelActivityTaskFailed => "request_cancel_activity_task_failed",
            Self::WorkflowExecutionSignaled => "workflow_execution_signaled",
            Self::MarkerRecorded => "marker_recorded",
            Self::RecordMarkerFailed => "record_marker_failed",
            Self::TimerStarted => "timer_started",
            Self::StartTimerFailed => "start_timer_failed",
            Self::TimerFired => "timer_fired",
            Self::TimerCanceled => "timer_canceled",
            Self::CancelTimerFailed => "cancel_timer_failed",
            Self::StartChildWorkflowExecutionInitiated => {
                "start_child_workflow_execution_initiated"
            }
            Self::StartChildWorkflowExecutionFailed => "start_child_workflow_execution_failed",
            Self::ChildWorkflowExecutionStarted => "child_workflow_execution_started",
            Self::ChildWorkflowExecutionCompleted => "child_workflow_execution_completed",
            Self::ChildWorkflowExecutionFailed => "child_workflow_execution_failed",
            Self::ChildWorkflowExecutionTimedOut => "child_workflow_execution_timed_out",
            Self::ChildWorkflowExecutionCanceled => "child_workflow_execution_canceled",
            Self::ChildWorkflowExecutionTerminated => "child_workflow_execution_terminated",
            Self::SignalExternalWorkflowExecutionInitiated => {
                "signal_external_workflow_execution_initiated"
            }
            Self::SignalExternalWorkflowExecutionFailed => {
                "signal_external_workflow_execution_failed"
            }
            Self::ExternalWorkflowExecutionSignaled => "external_workflow_execution_signaled",
            Self::RequestCancelExternalWorkflowExecutionInitiated => {
                "request_cancel_external_workflow_execution_initiated"
            }
            Self::RequestCancelExternalWorkflowExecutionFailed => {
                "request_cancel_external_workflow_execution_failed"
            }
            Self::ExternalWorkflowExecutionCancelRequested => {
                "external_workflow_execution_cancel_requested"
            }
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for EventKind {
    type Err = super::HistoryError;

    /// Parse a wire tag. An unrecognized tag is protocol drift and must
    /// abort the pass rather than be skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| super::HistoryError::UnsupportedEventType(s.to_string()))
    }
}

/// Type-specific fields of a raw history record.
///
/// Terminal records for activities, timers, child workflows, and external
/// signals carry a numeric back-reference (`scheduled_event_id` /
/// `started_event_id` / `initiated_event_id`) to the record that began their
/// causal chain instead of repeating the logical identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventAttributes {
    // =========================================================================
    // Workflow lifecycle
    // =========================================================================
    WorkflowExecutionStarted {
        input: Option<String>,
    },
    WorkflowExecutionCancelRequested {
        cause: Option<String>,
    },
    WorkflowExecutionCompleted {
        result: Option<String>,
    },
    CompleteWorkflowExecutionFailed {
        cause: Option<String>,
    },
    WorkflowExecutionFailed {
        details: Option<String>,
    },
    FailWorkflowExecutionFailed {
        cause: Option<String>,
    },
    WorkflowExecutionTimedOut {},
    WorkflowExecutionCanceled {
        details: Option<String>,
    },
    CancelWorkflowExecutionFailed {
        cause: Option<String>,
    },
    WorkflowExecutionContinuedAsNew {
        input: Option<String>,
    },
    ContinueAsNewWorkflowExecutionFailed {
        cause: Option<String>,
    },
    WorkflowExecutionTerminated {
        details: Option<String>,
    },

    // =========================================================================
    // Decision tasks
    // =========================================================================
    DecisionTaskScheduled {},
    DecisionTaskStarted {},
    DecisionTaskCompleted {
        scheduled_event_id: EventId,
        execution_context: Option<String>,
    },
    DecisionTaskTimedOut {},

    // =========================================================================
    // Activity tasks
    // =========================================================================
    ActivityTaskScheduled {
        activity_id: String,
        input: Option<String>,
        control: Option<String>,
    },
    ScheduleActivityTaskFailed {
        activity_id: String,
        cause: Option<String>,
    },
    ActivityTaskStarted {
        scheduled_event_id: EventId,
    },
    ActivityTaskCompleted {
        scheduled_event_id: EventId,
        result: Option<String>,
    },
    ActivityTaskFailed {
        scheduled_event_id: EventId,
        reason: Option<String>,
        details: Option<String>,
    },
    ActivityTaskTimedOut {
        scheduled_event_id: EventId,
        timeout_type: String,
        details: Option<String>,
    },
    ActivityTaskCanceled {
        scheduled_event_id: EventId,
        details: Option<String>,
    },
    ActivityTaskCancelRequested {
        activity_id: String,
    },
    RequestCancelActivityTaskFailed {
        activity_id: String,
        cause: Option<String>,
    },

    // =========================================================================
    // Signals into this execution
    // =========================================================================
    WorkflowExecutionSignaled {
        signal_name: String,
        input: Option<String>,
    },

    // =========================================================================
    // Markers
    // =========================================================================
    MarkerRecorded {
        marker_name: String,
        details: Option<String>,
    },
    RecordMarkerFailed {
        marker_name: String,
        cause: Option<String>,
    },

    // =========================================================================
    // Timers
    // =========================================================================
    TimerStarted {
        timer_id: String,
        control: Option<String>,
        start_to_fire_timeout: String,
    },
    StartTimerFailed {
        timer_id: String,
        cause: Option<String>,
    },
    TimerFired {
        timer_id: String,
        started_event_id: EventId,
    },
    TimerCanceled {
        timer_id: String,
        started_event_id: EventId,
    },
    CancelTimerFailed {
        timer_id: String,
    },

    // =========================================================================
    // Child workflows
    // =========================================================================
    StartChildWorkflowExecutionInitiated {
        workflow_id: String,
        input: Option<String>,
        control: Option<String>,
    },
    StartChildWorkflowExecutionFailed {
        initiated_event_id: EventId,
        cause: Option<String>,
        control: Option<String>,
    },
    ChildWorkflowExecutionStarted {
        initiated_event_id: EventId,
    },
    ChildWorkflowExecutionCompleted {
        initiated_event_id: EventId,
        result: Option<String>,
    },
    ChildWorkflowExecutionFailed {
        initiated_event_id: EventId,
        reason: Option<String>,
        details: Option<String>,
    },
    ChildWorkflowExecutionTimedOut {
        initiated_event_id: EventId,
        timeout_type: String,
    },
    ChildWorkflowExecutionCanceled {
        initiated_event_id: EventId,
        details: Option<String>,
    },
    ChildWorkflowExecutionTerminated {
        initiated_event_id: EventId,
        run_id: String,
    },

    // =========================================================================
    // Signals to external executions
    // =========================================================================
    SignalExternalWorkflowExecutionInitiated {
        signal_name: String,
        input: Option<String>,
        control: Option<String>,
    },
    SignalExternalWorkflowExecutionFailed {
        initiated_event_id: EventId,
        cause: Option<String>,
        control: Option<String>,
    },
    ExternalWorkflowExecutionSignaled {
        initiated_event_id: EventId,
        run_id: String,
    },

    // =========================================================================
    // Cancel requests to external executions
    // =========================================================================
    RequestCancelExternalWorkflowExecutionInitiated {
        workflow_id: String,
        control: Option<String>,
    },
    RequestCancelExternalWorkflowExecutionFailed {
        cause: Option<String>,
        control: Option<String>,
    },
    ExternalWorkflowExecutionCancelRequested {},
}

impl EventAttributes {
    /// The type tag of this record.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::WorkflowExecutionStarted { .. } => EventKind::WorkflowExecutionStarted,
            Self::WorkflowExecutionCancelRequested { .. } => {
                EventKind::WorkflowExecutionCancelRequested
            }
            Self::WorkflowExecutionCompleted { .. } => EventKind::WorkflowExecutionCompleted,
            Self::CompleteWorkflowExecutionFailed { .. } => {
                EventKind::CompleteWorkflowExecutionFailed
            }
            Self::WorkflowExecutionFailed { .. } => EventKind::WorkflowExecutionFailed,
            Self::FailWorkflowExecutionFailed { .. } => EventKind::FailWorkflowExecutionFailed,
            Self::WorkflowExecutionTimedOut {} => EventKind::WorkflowExecutionTimedOut,
            Self::WorkflowExecutionCanceled { .. } => EventKind::WorkflowExecutionCanceled,
            Self::CancelWorkflowExecutionFailed { .. } => EventKind::CancelWorkflowExecutionFailed,
            Self::WorkflowExecutionContinuedAsNew { .. } => {
                EventKind::WorkflowExecutionContinuedAsNew
            }
            Self::ContinueAsNewWorkflowExecutionFailed { .. } => {
                EventKind::ContinueAsNewWorkflowExecutionFailed
            }
            Self::WorkflowExecutionTerminated { .. } => EventKind::WorkflowExecutionTerminated,
            Self::DecisionTaskScheduled {} => EventKind::DecisionTaskScheduled,
            Self::DecisionTaskStarted {} => EventKind::DecisionTaskStarted,
            Self::DecisionTaskCompleted { .. } => EventKind::DecisionTaskCompleted,
            Self::DecisionTaskTimedOut {} => EventKind::DecisionTaskTimedOut,
            Self::ActivityTaskScheduled { .. } => EventKind::ActivityTaskScheduled,
            Self::ScheduleActivityTaskFailed { .. } => EventKind::ScheduleActivityTaskFailed,
            Self::ActivityTaskStarted { .. } => EventKind::ActivityTaskStarted,
            Self::ActivityTaskCompleted { .. } => EventKind::ActivityTaskCompleted,
            Self::ActivityTaskFailed { .. } => EventKind::ActivityTaskFailed,
            Self::ActivityTaskTimedOut { .. } => EventKind::ActivityTaskTimedOut,
            Self::ActivityTaskCanceled { .. } => EventKind::ActivityTaskCanceled,
            Self::ActivityTaskCancelRequested { .. } => EventKind::ActivityTaskCancelRequested,
            Self::RequestCancelActivityTaskFailed { .. } => {
                EventKind::RequestCancelActivityTaskFailed
            }
            Self::WorkflowExecutionSignaled { .. } => EventKind::WorkflowExecutionSignaled,
            Self::MarkerRecorded { .. } => EventKind::MarkerRecorded,
            Self::RecordMarkerFailed { .. } => EventKind::RecordMarkerFailed,
            Self::TimerStarted { .. } => EventKind::TimerStarted,
            Self::StartTimerFailed { .. } => EventKind::StartTimerFailed,
            Self::TimerFired { .. } => EventKind::TimerFired,
            Self::TimerCanceled { .. } => EventKind::TimerCanceled,
            Self::CancelTimerFailed { .. } => EventKind::CancelTimerFailed,
            Self::StartChildWorkflowExecutionInitiated { .. } => {
                EventKind::StartChildWorkflowExecutionInitiated
            }
            Self::StartChildWorkflowExecutionFailed { .. } => {
                EventKind::StartChildWorkflowExecutionFailed
            }
            Self::ChildWorkflowExecutionStarted { .. } => EventKind::ChildWorkflowExecutionStarted,
            Self::ChildWorkflowExecutionCompleted { .. } => {
                EventKind::ChildWorkflowExecutionCompleted
            }
            Self::ChildWorkflowExecutionFailed { .. } => EventKind::ChildWorkflowExecutionFailed,
            Self::ChildWorkflowExecutionTimedOut { .. } => {
                EventKind::ChildWorkflowExecutionTimedOut
            }
            Self::ChildWorkflowExecutionCanceled { .. } => {
                EventKind::ChildWorkflowExecutionCanceled
            }
            Self::ChildWorkflowExecutionTerminated { .. } => {
                EventKind::ChildWorkflowExecutionTerminated
            }
            Self::SignalExternalWorkflowExecutionInitiated { .. } => {
                EventKind::SignalExternalWorkflowExecutionInitiated
            }
            Self::SignalExternalWorkflowExecutionFailed { .. } => {
                EventKind::SignalExternalWorkflowExecutionFailed
            }
            Self::ExternalWorkflowExecutionSignaled { .. } => {
                EventKind::ExternalWorkflowExecutionSignaled
            }
            Self::RequestCancelExternalWorkflowExecutionInitiated { .. } => {
                EventKind::RequestCancelExternalWorkflowExecutionInitiated
            }
            Self::RequestCancelExternalWorkflowExecutionFailed { .. } => {
                EventKind::RequestCancelExternalWorkflowExecutionFailed
            }
            Self::ExternalWorkflowExecutionCancelRequested {} => {
                EventKind::ExternalWorkflowExecutionCancelRequested
            }
        }
    }
}
