use crate::task::{Task, TaskStatus};

use super::escape::escape_json;

/// Request body for `update_task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBody {
    pub json: String,
    pub status: TaskStatus,
    /// Output was longer than the escape capacity and was cut
    pub truncated: bool,
}

impl ReportBody {
    /// Compose `{"uid": .., "command": .., "output": .., "status": ..}`.
    ///
    /// A task without output reports an empty string and status `-1`.
    pub fn from_task(task: &Task, escape_capacity: usize) -> Self {
        let uid = escape_json(&task.uid, usize::MAX).text;
        let command = escape_json(&task.command, usize::MAX).text;

        let (output, truncated) = match &task.output {
            Some(text) => {
                let escaped = escape_json(text, escape_capacity);
                (escaped.text, escaped.truncated)
            }
            None => (String::new(), false),
        };
        let status = task.status();

        let json = format!(
            "{{\"uid\": \"{}\", \"command\": \"{}\", \"output\": \"{}\", \"status\": {}}}",
            uid,
            command,
            output,
            status.code()
        );

        Self {
            json,
            status,
            truncated,
        }
    }
}
