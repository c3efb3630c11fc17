//! Wire client interface to the orchestration service
//!
//! The engine consumes exactly two operations: poll for a decision task
//! (paginated, newest-first) and respond with the decisions a pass
//! produced. Implementations own connection management; the poller holds
//! the client only for the duration of one pass's pagination and response.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::decision::Decision;
use crate::history::RawEvent;

/// Errors from the wire client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never completed (connectivity, timeouts).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service rejected the request.
    #[error("service rejected request: {0}")]
    Rejected(String),

    /// Implementation-specific failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Opaque claim on one delivered decision task. The service guarantees each
/// task is delivered to exactly one claimant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskToken(pub String);

/// A workflow's registered type: name and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowType {
    pub name: String,
    pub version: String,
}

/// One concrete execution of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowExecution {
    /// Domain-unique execution identifier.
    pub workflow_id: String,

    /// Service-generated unique id for this specific run.
    pub run_id: String,
}

/// Parameters of one poll request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRequest {
    pub domain: String,
    pub task_list: String,

    /// Identifies this poller in the service's records.
    pub identity: String,

    /// Request history newest-first. The engine always sets this.
    pub reverse_order: bool,

    /// Continuation token from a previous page, if paginating.
    pub next_page_token: Option<String>,
}

/// One page of a decision task.
///
/// If no task became available before the service's long-poll timeout, the
/// page comes back with no task token and no events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTaskPage {
    pub task_token: Option<TaskToken>,
    pub workflow_type: Option<WorkflowType>,
    pub workflow_execution: Option<WorkflowExecution>,
    pub events: Vec<RawEvent>,
    pub next_page_token: Option<String>,
}

impl DecisionTaskPage {
    /// An empty page: no decision task was available.
    pub fn empty() -> Self {
        Self {
            task_token: None,
            workflow_type: None,
            workflow_execution: None,
            events: Vec::new(),
            next_page_token: None,
        }
    }
}

/// The two operations this engine consumes from the orchestration service.
#[async_trait]
pub trait OrchestrationClient: Send + Sync {
    /// Long-poll for a decision task, or a follow-up page of one.
    async fn poll_for_decision_task(
        &self,
        request: &PollRequest,
    ) -> Result<DecisionTaskPage, ClientError>;

    /// Submit the decisions produced for a claimed task.
    async fn respond_decision_task_completed(
        &self,
        task_token: &TaskToken,
        decisions: &[Decision],
    ) -> Result<(), ClientError>;
}
