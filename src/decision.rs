//! Decisions: the commands a pass sends back to the service
//!
//! Each decision has a fixed attribute schema. Payload fields are opaque
//! strings produced by the [`DataConverter`](crate::converter::DataConverter);
//! the constructors trim oversized reason/details/result fields to the
//! protocol limits so a pass never fails server-side validation on length.

use serde::{Deserialize, Serialize};

use crate::history::ActionId;
use crate::protocol::{
    trim_to_max_length, MARKER_NAME_MAX_LENGTH, MAX_DETAILS_LENGTH, MAX_REASON_LENGTH,
    MAX_RESULT_LENGTH,
};

/// An activity's registered type: name and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityType {
    pub name: String,
    pub version: String,
}

/// The commands this engine emits in response to a decision task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision_type", rename_all = "snake_case")]
pub enum Decision {
    /// Schedule one activity execution.
    ScheduleActivityTask {
        activity_id: ActionId,
        activity_type: ActivityType,
        task_list: Option<String>,
        input: Option<String>,
        control: Option<String>,
        heartbeat_timeout: String,
        schedule_to_close_timeout: String,
        schedule_to_start_timeout: String,
        start_to_close_timeout: String,
        priority: Option<i32>,
    },

    /// Start a timer that fires after the given whole-second timeout.
    StartTimer {
        timer_id: ActionId,
        start_to_fire_timeout: String,
        control: Option<String>,
    },

    /// Record a marker in the history. Markers do not produce a new
    /// decision task on their own.
    RecordMarker {
        marker_name: String,
        details: Option<String>,
    },

    /// Close the workflow successfully with a serialized result.
    CompleteWorkflowExecution { result: Option<String> },

    /// Close the workflow as failed.
    FailWorkflowExecution {
        reason: String,
        details: Option<String>,
    },

    /// Close the workflow as canceled.
    CancelWorkflowExecution { details: Option<String> },
}

impl Decision {
    pub fn complete_workflow(result: Option<String>) -> Self {
        Self::CompleteWorkflowExecution {
            result: result.map(|r| trim_to_max_length(&r, MAX_RESULT_LENGTH).to_string()),
        }
    }

    /// Build a fail decision. `target` names the thing that failed (usually
    /// the workflow execution) and is combined with the reason.
    pub fn fail_workflow(target: Option<&str>, reason: &str, details: Option<String>) -> Self {
        let reason = match target {
            Some(target) => format!("{target}:\n{reason}"),
            None => reason.to_string(),
        };
        Self::FailWorkflowExecution {
            reason: trim_to_max_length(&reason, MAX_REASON_LENGTH).to_string(),
            details: details.map(|d| trim_to_max_length(&d, MAX_DETAILS_LENGTH).to_string()),
        }
    }

    pub fn cancel_workflow(details: Option<String>) -> Self {
        Self::CancelWorkflowExecution {
            details: details.map(|d| trim_to_max_length(&d, MAX_DETAILS_LENGTH).to_string()),
        }
    }

    pub fn record_marker(marker_name: &str, details: Option<String>) -> Self {
        Self::RecordMarker {
            marker_name: trim_to_max_length(marker_name, MARKER_NAME_MAX_LENGTH).to_string(),
            details: details.map(|d| trim_to_max_length(&d, MAX_DETAILS_LENGTH).to_string()),
        }
    }

    /// The wire tag of this decision.
    pub fn decision_type(&self) -> &'static str {
        match self {
            Self::ScheduleActivityTask { .. } => "schedule_activity_task",
            Self::StartTimer { .. } => "start_timer",
            Self::RecordMarker { .. } => "record_marker",
            Self::CompleteWorkflowExecution { .. } => "complete_workflow_execution",
            Self::FailWorkflowExecution { .. } => "fail_workflow_execution",
            Self::CancelWorkflowExecution { .. } => "cancel_workflow_execution",
        }
    }
}

/// One-line log form of a decision.
impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScheduleActivityTask {
                activity_id,
                activity_type,
                input,
                control,
                ..
            } => write!(
                f,
                "schedule_activity_task['{}' '{}-{}': {:?} {:?}]",
                activity_id, activity_type.name, activity_type.version, input, control
            ),
            Self::StartTimer {
                timer_id,
                start_to_fire_timeout,
                control,
            } => write!(
                f,
                "start_timer['{timer_id}': {start_to_fire_timeout}s {control:?}]"
            ),
            Self::RecordMarker {
                marker_name,
                details,
            } => write!(f, "record_marker['{marker_name}': {details:?}]"),
            Self::CompleteWorkflowExecution { result } => {
                write!(f, "complete_workflow_execution[{result:?}]")
            }
            Self::FailWorkflowExecution { reason, details } => {
                write!(f, "fail_workflow_execution[{reason} {details:?}]")
            }
            Self::CancelWorkflowExecution { details } => {
                write!(f, "cancel_workflow_execution[{details:?}]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_workflow_combines_target_and_reason() {
        let decision = Decision::fail_workflow(Some("order-1 run-9"), "Errors reported", None);
        match decision {
            Decision::FailWorkflowExecution { reason, .. } => {
                assert_eq!(reason, "order-1 run-9:\nErrors reported");
            }
            _ => panic!("expected FailWorkflowExecution"),
        }
    }

    #[test]
    fn test_fail_workflow_trims_oversized_reason() {
        let long_reason = "x".repeat(1000);
        let decision = Decision::fail_workflow(None, &long_reason, None);
        match decision {
            Decision::FailWorkflowExecution { reason, .. } => {
                assert_eq!(reason.len(), MAX_REASON_LENGTH);
            }
            _ => panic!("expected FailWorkflowExecution"),
        }
    }

    #[test]
    fn test_decision_serialization() {
        let decision = Decision::StartTimer {
            timer_id: ActionId::new("step1"),
            start_to_fire_timeout: "5".to_string(),
            control: Some("1".to_string()),
        };

        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains("\"decision_type\":\"start_timer\""));

        let parsed: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, decision);
    }

    #[test]
    fn test_display_forms() {
        let complete = Decision::complete_workflow(Some("\"done\"".to_string()));
        assert!(complete.to_string().starts_with("complete_workflow_execution["));

        let marker = Decision::record_marker("checkpoint", None);
        assert!(marker.to_string().contains("'checkpoint'"));
    }
}
