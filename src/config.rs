use std::time::Duration;

/// Default coordinator address.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Configuration for the command executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Shell used to interpret command text (invoked as `<shell> -c <command>`)
    pub shell: String,
    /// Starting capacity of the captured output buffer, in bytes
    pub initial_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
            initial_capacity: 4096,
        }
    }
}

/// Agent configuration.
///
/// Endpoints are derived from `server_url`:
/// - `{server_url}/register`
/// - `{server_url}/heartbeat/{identity}`
/// - `{server_url}/update_task/{identity}`
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub server_url: String,
    /// Delay between successive heartbeats
    pub poll_interval: Duration,
    /// Upper bound on each network call
    pub request_timeout: Duration,
    /// Response buffer size. At most `response_limit - 1` bytes of any
    /// register or heartbeat response are kept; the rest is dropped.
    pub response_limit: usize,
    /// Escape buffer size for task output. The escaped text is at most
    /// `escape_capacity - 1` bytes.
    pub escape_capacity: usize,
    pub executor: ExecutorConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            response_limit: 128,
            escape_capacity: 2048,
            executor: ExecutorConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_response_limit(mut self, limit: usize) -> Self {
        self.response_limit = limit;
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.executor.shell = shell.into();
        self
    }

    fn base(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    pub fn register_url(&self) -> String {
        format!("{}/register", self.base())
    }

    pub fn heartbeat_url(&self, identity: &str) -> String {
        format!("{}/heartbeat/{}", self.base(), identity)
    }

    pub fn update_task_url(&self, identity: &str) -> String {
        format!("{}/update_task/{}", self.base(), identity)
    }
}
