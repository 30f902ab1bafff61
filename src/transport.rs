use reqwest::header::CONTENT_TYPE;
use reqwest::Response;

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::task::{Task, TaskStatus};
use crate::wire::{parse_task, ReportBody, ResponseBuffer};

/// Identity assigned by the coordinator at registration. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Build an identity from a raw registration body, trimming
    /// surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AgentError::EmptyIdentity);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP client for the three coordinator calls.
///
/// Every call builds its own request, so headers and bodies from one call
/// never carry into the next. The underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    config: AgentConfig,
}

impl HttpTransport {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(AgentError::ClientInit)?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// `GET /register`. The (bounded) response body is the identity.
    pub async fn register(&self) -> Result<ConnectionId> {
        let url = self.config.register_url();
        let body = self.fetch_bounded(&url).await?;
        ConnectionId::parse(&body)
    }

    /// `GET /heartbeat/{identity}`.
    ///
    /// Returns `Ok(None)` for an empty body. A non-empty body that does not
    /// describe a task is [`AgentError::MalformedTaskResponse`].
    pub async fn poll_once(&self, identity: &ConnectionId) -> Result<Option<Task>> {
        let url = self.config.heartbeat_url(identity.as_str());
        let body = self.fetch_bounded(&url).await?;
        if body.is_empty() {
            return Ok(None);
        }
        parse_task(&body).map(Some)
    }

    /// `POST /update_task/{identity}` with the task result as JSON.
    /// The response body is not read.
    pub async fn report(&self, identity: &ConnectionId, task: &Task) -> Result<TaskStatus> {
        let url = self.config.update_task_url(identity.as_str());
        let body = ReportBody::from_task(task, self.config.escape_capacity);
        if body.truncated {
            tracing::warn!(
                task_id = %task.uid,
                limit = self.config.escape_capacity,
                "Task output truncated in report"
            );
        }

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.json)
            .send()
            .await?;
        check_status(&response, &url)?;

        Ok(body.status)
    }

    async fn fetch_bounded(&self, url: &str) -> Result<String> {
        let mut buffer = ResponseBuffer::new(self.config.response_limit)?;
        let mut response = self.http.get(url).send().await?;
        check_status(&response, url)?;

        while let Some(chunk) = response.chunk().await? {
            buffer.extend(&chunk);
            if buffer.is_full() {
                tracing::debug!(url, limit = self.config.response_limit, "Response truncated");
                break;
            }
        }

        Ok(buffer.into_string())
    }
}

fn check_status(response: &Response, url: &str) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(AgentError::UnexpectedStatus {
            status,
            url: url.to_string(),
        })
    }
}
