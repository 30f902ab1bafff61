use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::config::ExecutorConfig;
use crate::error::{AgentError, Result};
use crate::task::Task;

use super::capture::CaptureBuffer;

const READ_CHUNK_SIZE: usize = 1024;

/// Output of a command that ran to completion.
#[derive(Debug)]
pub struct Captured {
    pub output: String,
    pub exit_code: Option<i32>,
    /// Times the capture buffer doubled
    pub growths: u32,
}

/// Runs task commands on the local host through the configured shell.
#[derive(Debug, Clone)]
pub struct TaskExecutor {
    config: ExecutorConfig,
}

impl TaskExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Run the task's command and store its stdout in `task.output`.
    ///
    /// The output stays `None` if the command could not be started or its
    /// output could not be captured in full. A non-zero exit code is logged
    /// but still counts as a successful capture.
    pub async fn execute(&self, mut task: Task) -> Task {
        tracing::info!(task_id = %task.uid, command = %task.command, "Executing task");

        match self.capture(&task.command).await {
            Ok(captured) => {
                if captured.exit_code != Some(0) {
                    tracing::warn!(
                        task_id = %task.uid,
                        exit_code = ?captured.exit_code,
                        "Command exited unsuccessfully"
                    );
                }
                tracing::info!(
                    task_id = %task.uid,
                    bytes = captured.output.len(),
                    growths = captured.growths,
                    "Task executed"
                );
                task.output = Some(captured.output);
            }
            Err(e) => {
                tracing::error!(task_id = %task.uid, error = %e, "Task execution failed");
            }
        }

        task
    }

    /// Spawn `<shell> -c <command>` and read its stdout to EOF.
    pub async fn capture(&self, command: &str) -> Result<Captured> {
        let mut child = Command::new(&self.config.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AgentError::Execution(format!("failed to spawn {}: {}", self.config.shell, e))
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgentError::Execution("stdout was not captured".to_string()))?;

        let mut buffer = CaptureBuffer::with_capacity(self.config.initial_capacity)?;
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            let n = stdout
                .read(&mut chunk)
                .await
                .map_err(|e| AgentError::Execution(format!("failed to read output: {}", e)))?;
            if n == 0 {
                break;
            }
            buffer.append(&chunk[..n])?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| AgentError::Execution(format!("failed to wait for command: {}", e)))?;

        let growths = buffer.growths();
        Ok(Captured {
            output: buffer.into_string(),
            exit_code: status.code(),
            growths,
        })
    }
}
