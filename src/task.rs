/// Status code reported back with a finished task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Complete,
    Error,
}

impl TaskStatus {
    pub fn code(self) -> i32 {
        match self {
            TaskStatus::Complete => 0,
            TaskStatus::Error => -1,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Complete => write!(f, "complete"),
            TaskStatus::Error => write!(f, "error"),
        }
    }
}

/// One unit of remote work.
///
/// Built by the heartbeat parser, filled in once by the executor, consumed
/// by the report. `output` stays `None` when the command could not be run
/// or its output could not be captured; `Some("")` means it ran and printed
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub uid: String,
    pub command: String,
    pub output: Option<String>,
}

impl Task {
    pub fn new(uid: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            command: command.into(),
            output: None,
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self.output {
            Some(_) => TaskStatus::Complete,
            None => TaskStatus::Error,
        }
    }
}
