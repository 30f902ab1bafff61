use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{AgentError, Result};
use crate::task::TaskStatus;
use crate::transport::{ConnectionId, HttpTransport};
use crate::worker::TaskExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unregistered,
    Registered,
    Polling,
    Reporting,
    ShuttingDown,
    Terminated,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Unregistered => write!(f, "unregistered"),
            SessionState::Registered => write!(f, "registered"),
            SessionState::Polling => write!(f, "polling"),
            SessionState::Reporting => write!(f, "reporting"),
            SessionState::ShuttingDown => write!(f, "shutting_down"),
            SessionState::Terminated => write!(f, "terminated"),
        }
    }
}

/// What one heartbeat cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Empty heartbeat, nothing to do
    Idle,
    /// Task executed and its result accepted by the coordinator
    Reported(TaskStatus),
    /// Task executed but the report call failed
    ReportFailed,
    /// Heartbeat body did not describe a task
    Malformed,
    /// Heartbeat call failed
    HeartbeatFailed,
}

/// Counters accumulated over a session, logged at shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub cycles: u64,
    pub tasks_reported: u64,
    pub execution_failures: u64,
    pub transport_failures: u64,
    pub malformed_responses: u64,
}

/// A registered connection to the coordinator.
///
/// Owns the identity for its whole life and runs at most one task at a
/// time. Created only through [`Session::register`], so a session always
/// has a valid identity.
pub struct Session {
    identity: ConnectionId,
    transport: HttpTransport,
    executor: TaskExecutor,
    poll_interval: Duration,
    state: SessionState,
    summary: SessionSummary,
}

impl Session {
    /// Register with the coordinator. Failure here is fatal to the agent;
    /// it is not retried.
    pub async fn register(
        transport: HttpTransport,
        executor: TaskExecutor,
        poll_interval: Duration,
    ) -> Result<Self> {
        let identity = transport.register().await?;
        tracing::info!(identity = %identity, "Registered with coordinator");

        Ok(Self {
            identity,
            transport,
            executor,
            poll_interval,
            state: SessionState::Registered,
            summary: SessionSummary::default(),
        })
    }

    pub fn identity(&self) -> &ConnectionId {
        &self.identity
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state != next {
            tracing::debug!(from = %self.state, to = %next, "Session state change");
            self.state = next;
        }
    }

    /// Run heartbeat cycles until `shutdown` is cancelled.
    ///
    /// The token is checked before every cycle and once more after it, so a
    /// running command or report always finishes. Cancellation during the
    /// inter-cycle delay cuts the delay short.
    pub async fn run(mut self, shutdown: CancellationToken) -> SessionSummary {
        tracing::info!(
            identity = %self.identity,
            poll_interval = ?self.poll_interval,
            "Starting heartbeat loop"
        );
        self.set_state(SessionState::Polling);

        while !shutdown.is_cancelled() {
            self.poll_cycle().await;

            if shutdown.is_cancelled() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = shutdown.cancelled() => {}
            }
        }

        self.set_state(SessionState::ShuttingDown);
        tracing::info!(
            identity = %self.identity,
            cycles = self.summary.cycles,
            tasks_reported = self.summary.tasks_reported,
            execution_failures = self.summary.execution_failures,
            transport_failures = self.summary.transport_failures,
            malformed_responses = self.summary.malformed_responses,
            "Shutting down"
        );
        self.set_state(SessionState::Terminated);

        self.summary
    }

    /// One heartbeat, plus execute-and-report if a task came back.
    ///
    /// Every failure is logged and absorbed here.
    pub async fn poll_cycle(&mut self) -> CycleOutcome {
        self.set_state(SessionState::Polling);
        self.summary.cycles += 1;

        let task = match self.transport.poll_once(&self.identity).await {
            Ok(Some(task)) => task,
            Ok(None) => {
                tracing::debug!("No command received");
                return CycleOutcome::Idle;
            }
            Err(AgentError::MalformedTaskResponse(reason)) => {
                tracing::warn!(reason = %reason, "Ignoring malformed heartbeat response");
                self.summary.malformed_responses += 1;
                return CycleOutcome::Malformed;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Heartbeat failed");
                self.summary.transport_failures += 1;
                return CycleOutcome::HeartbeatFailed;
            }
        };

        tracing::info!(task_id = %task.uid, "Task received");
        self.set_state(SessionState::Reporting);

        let task = self.executor.execute(task).await;
        if task.output.is_none() {
            self.summary.execution_failures += 1;
        }

        let outcome = match self.transport.report(&self.identity, &task).await {
            Ok(status) => {
                tracing::info!(task_id = %task.uid, status = %status, "Task reported");
                self.summary.tasks_reported += 1;
                CycleOutcome::Reported(status)
            }
            Err(e) => {
                tracing::warn!(task_id = %task.uid, error = %e, "Failed to report task");
                self.summary.transport_failures += 1;
                CycleOutcome::ReportFailed
            }
        };

        self.set_state(SessionState::Polling);
        outcome
    }
}
