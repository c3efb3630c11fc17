//! Decision polling and the replay pass
//!
//! Each pass is independent and carries no state to the next: fetch the
//! full history (paginated), normalize it, detect service-reported terminal
//! errors, replay the registered workflow against it, and respond with the
//! harvested decisions. Correctness relies only on history content, so any
//! number of pollers may run against the same domain and task list.
//!
//! The [`DecisionPoller::run`] loop polls with adaptive backoff: the
//! interval resets when a task was decided and grows toward the maximum
//! while idle.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, instrument, trace};
use uuid::Uuid;

use crate::action::ActionError;
use crate::client::{ClientError, OrchestrationClient, PollRequest, TaskToken};
use crate::context::DecisionContext;
use crate::converter::{DataConverter, DataConverterExt, JsonDataConverter};
use crate::decision::Decision;
use crate::history::{
    normalize_history, EventKind, EventState, HistoryError, RawEvent, TaskType,
};
use crate::outcome::{ActionFailure, Outcome};
use crate::workflow::{UnregisteredWorkflow, WorkflowRegistry};

/// Polling cadence configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollerConfig {
    /// Poll interval while tasks are flowing.
    #[serde(with = "duration_millis")]
    pub min_interval: Duration,

    /// Poll interval ceiling while idle.
    #[serde(with = "duration_millis")]
    pub max_interval: Duration,

    /// Backoff multiplier applied after an idle poll.
    pub backoff_multiplier: f64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(5),
            backoff_multiplier: 1.5,
        }
    }
}

impl PollerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier.max(1.0);
        self
    }
}

/// Errors that abort a decision pass.
///
/// Every variant means no response was sent for the task: the service will
/// redeliver it (or time it out) and a later pass retries from scratch.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// Poll RPC failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The fetched history is unusable (unknown event type or a dangling
    /// causal reference).
    #[error(transparent)]
    History(#[from] HistoryError),

    /// No workflow registered for the task's (name, version).
    #[error(transparent)]
    Unregistered(#[from] UnregisteredWorkflow),
}

/// What one pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No decision task was available before the long-poll timeout.
    Idle,

    /// A task was replayed and a response was attempted.
    Decided {
        workflow_id: String,
        run_id: String,
        decisions: usize,
    },
}

/// Polls one domain and task list and asks registered workflows for their
/// next decisions.
pub struct DecisionPoller<C> {
    client: Arc<C>,
    registry: WorkflowRegistry,
    converter: Arc<dyn DataConverter>,
    domain: String,
    task_list: String,
    identity: String,
    config: PollerConfig,
}

impl<C: OrchestrationClient> DecisionPoller<C> {
    pub fn new(
        client: Arc<C>,
        registry: WorkflowRegistry,
        domain: impl Into<String>,
        task_list: impl Into<String>,
    ) -> Self {
        Self {
            client,
            registry,
            converter: Arc::new(JsonDataConverter),
            domain: domain.into(),
            task_list: task_list.into(),
            identity: format!("decider-{}", Uuid::now_v7()),
            config: PollerConfig::default(),
        }
    }

    /// Identity recorded by the service for tasks this poller claims.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn DataConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_config(mut self, config: PollerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Run one full decision pass.
    #[instrument(skip(self), fields(domain = %self.domain, task_list = %self.task_list, identity = %self.identity))]
    pub async fn poll_once(&self) -> Result<PollOutcome, PollError> {
        let (task, raw_events) = self.fetch_task().await?;
        let Some(task) = task else {
            trace!("no decision task available");
            return Ok(PollOutcome::Idle);
        };

        let events = normalize_history(&raw_events)?;
        if events.is_empty() {
            debug!("decision task delivered with no history");
            return Ok(PollOutcome::Idle);
        }

        // Unresolvable workflow type aborts without responding; the task
        // will be redelivered or time out upstream.
        let workflow = self
            .registry
            .resolve(&task.workflow_type.name, &task.workflow_type.version)?;
        let workflow_id = task.execution.workflow_id.clone();
        let run_id = task.execution.run_id.clone();
        let run_info = format!("{workflow_id} {run_id}");

        let workflow_errors: Vec<_> = events
            .iter()
            .filter(|e| e.task_type() == TaskType::WorkflowExecution)
            .filter(|e| e.state() == EventState::Error)
            .collect();

        let decisions = if workflow_errors.is_empty() {
            let cancel_event = events
                .iter()
                .find(|e| e.kind() == EventKind::WorkflowExecutionCancelRequested)
                .cloned();

            let mut ctx = DecisionContext::new(events, self.converter.clone());

            // The cancellation hook runs before replay.
            if let Some(cancel_event) = &cancel_event {
                workflow.on_cancel_requested(cancel_event, &mut ctx);
            }

            match workflow.decide(&mut ctx) {
                Ok(Outcome::Pending) => {
                    debug!(%workflow_id, "workflow still in flight");
                }
                Ok(Outcome::Resolved(result)) => {
                    debug!(%workflow_id, "workflow completed");
                    ctx.add_decision(Decision::complete_workflow(Some(result)));
                }
                Ok(Outcome::Failed(failure)) => {
                    // The workflow body failed. Complete (not fail) the
                    // execution with the serialized error so arbitrary
                    // error values round-trip through the serializer.
                    debug!(%workflow_id, %failure, "workflow failed");
                    let serialized = self
                        .converter
                        .to_data(&failure)
                        .unwrap_or_else(|_| failure.to_string());
                    ctx.add_decision(Decision::complete_workflow(Some(serialized)));
                }
                Err(err) => {
                    error!(%workflow_id, error = %err, "workflow decide raised");
                    let details = self.fail_details(&err);
                    ctx.add_decision(Decision::fail_workflow(
                        Some(&run_info),
                        &err.to_string(),
                        details,
                    ));
                }
            }
            ctx.into_decisions()
        } else {
            // The service already reported the execution terminally broken;
            // skip replay entirely.
            let joined = workflow_errors
                .iter()
                .map(|e| e.details().or(e.reason()).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n");
            error!(%workflow_id, "workflow-level errors reported:\n{joined}");
            vec![Decision::fail_workflow(
                Some(&run_info),
                "Errors reported",
                Some(joined),
            )]
        };

        for decision in &decisions {
            debug!(%workflow_id, "{decision}");
        }

        if let Err(err) = self
            .client
            .respond_decision_task_completed(&task.token, &decisions)
            .await
        {
            // Swallowed: the task is redelivered and the next pass replays
            // from scratch. Decisions already durably recorded show up as
            // Initial/Active in that history, so nothing is emitted twice.
            error!(%workflow_id, error = %err, "failed to respond to decision task");
        }

        Ok(PollOutcome::Decided {
            workflow_id,
            run_id,
            decisions: decisions.len(),
        })
    }

    /// Poll repeatedly until shutdown is signaled.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut interval = self.config.min_interval;
        while !*shutdown_rx.borrow() {
            match self.poll_once().await {
                Ok(PollOutcome::Decided { .. }) => {
                    interval = self.config.min_interval;
                }
                Ok(PollOutcome::Idle) => {
                    interval = self.next_interval(interval);
                    trace!(interval_ms = interval.as_millis(), "idle, backing off");
                }
                Err(err) => {
                    error!(error = %err, "decision pass failed");
                    interval = self.next_interval(interval);
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown_rx.changed() => {
                    debug!("shutdown signal received");
                    break;
                }
            }
        }
    }

    /// Fetch all pages of the next decision task.
    ///
    /// The claim token and task metadata come from the first page that
    /// carries them; events accumulate across pages.
    async fn fetch_task(&self) -> Result<(Option<ClaimedDecisionTask>, Vec<RawEvent>), PollError> {
        let mut request = PollRequest {
            domain: self.domain.clone(),
            task_list: self.task_list.clone(),
            identity: self.identity.clone(),
            reverse_order: true,
            next_page_token: None,
        };

        let mut raw_events = Vec::new();
        let mut token: Option<TaskToken> = None;
        let mut workflow_type = None;
        let mut execution = None;

        loop {
            let page = self.client.poll_for_decision_task(&request).await?;
            token = token.or(page.task_token);
            workflow_type = workflow_type.or(page.workflow_type);
            execution = execution.or(page.workflow_execution);
            raw_events.extend(page.events);

            match page.next_page_token {
                Some(next) => request.next_page_token = Some(next),
                None => break,
            }
        }

        let Some(token) = token else {
            return Ok((None, raw_events));
        };
        let workflow_type = workflow_type.ok_or_else(|| {
            ClientError::Rejected("decision task missing workflow type".to_string())
        })?;
        let execution = execution.ok_or_else(|| {
            ClientError::Rejected("decision task missing workflow execution".to_string())
        })?;

        Ok((
            Some(ClaimedDecisionTask {
                token,
                workflow_type,
                execution,
            }),
            raw_events,
        ))
    }

    fn fail_details(&self, err: &ActionError) -> Option<String> {
        self.converter
            .to_data(&ActionFailure::new(err.to_string()))
            .ok()
    }

    fn next_interval(&self, current: Duration) -> Duration {
        let grown = Duration::from_secs_f64(current.as_secs_f64() * self.config.backoff_multiplier);
        grown.min(self.config.max_interval)
    }
}

struct ClaimedDecisionTask {
    token: TaskToken,
    workflow_type: crate::client::WorkflowType,
    execution: crate::client::WorkflowExecution,
}

/// Serde support for Duration as milliseconds
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
