use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Malformed task response: {0}")]
    MalformedTaskResponse(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Allocation failed: {0}")]
    Allocation(String),

    #[error("HTTP client initialization failed: {0}")]
    ClientInit(reqwest::Error),

    #[error("Server returned an empty connection identity")]
    EmptyIdentity,
}

impl AgentError {
    /// True for failures of the network call itself, as opposed to
    /// failures interpreting what came back.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AgentError::Transport(_) | AgentError::UnexpectedStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
