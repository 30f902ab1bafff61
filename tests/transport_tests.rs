
use poll_agent::error::AgentError;
use poll_agent::task::{Task, TaskStatus};
use poll_agent::transport::{ConnectionId, HttpTransport};
use test_harness::{task_repr, FakeCoordinator};

#[tokio::test]
async fn test_register_returns_identity() {
    let coordinator = FakeCoordinator::start("0b5a7c1e-8d2f-4a3b-9c6d-7e8f9a0b1c2d").await;
    let transport = HttpTransport::new(&coordinator.agent_config()).unwrap();

    let identity = transport.register().await.unwrap();
    assert_eq!(identity.as_str(), "0b5a7c1e-8d2f-4a3b-9c6d-7e8f9a0b1c2d");
}

#[tokio::test]
async fn test_poll_once_empty_is_no_task() {
    let coordinator = FakeCoordinator::start("abc-123").await;
    let transport = HttpTransport::new(&coordinator.agent_config()).unwrap();
    let identity = ConnectionId::parse("abc-123").unwrap();

    assert_eq!(transport.poll_once(&identity).await.unwrap(), None);
    assert_eq!(coordinator.heartbeat_identities(), vec!["abc-123"]);
}

#[tokio::test]
async fn test_poll_once_parses_task() {
    let coordinator = FakeCoordinator::start("abc-123").await;
    coordinator.push_heartbeat(task_repr("t1", "uname -a"));
    let transport = HttpTransport::new(&coordinator.agent_config()).unwrap();
    let identity = ConnectionId::parse("abc-123").unwrap();

    let task = transport.poll_once(&identity).await.unwrap().unwrap();
    assert_eq!(task, Task::new("t1", "uname -a"));
}

#[tokio::test]
async fn test_poll_once_truncated_body_is_malformed() {
    let coordinator = FakeCoordinator::start("abc-123").await;
    // The closing quote lands past the default 128-byte response limit
    coordinator.push_heartbeat(task_repr("t1", &format!("echo {}", "x".repeat(150))));
    let transport = HttpTransport::new(&coordinator.agent_config()).unwrap();
    let identity = ConnectionId::parse("abc-123").unwrap();

    let err = transport.poll_once(&identity).await.unwrap_err();
    assert!(matches!(err, AgentError::MalformedTaskResponse(_)));
}

#[tokio::test]
async fn test_poll_once_with_larger_limit() {
    let coordinator = FakeCoordinator::start("abc-123").await;
    let command = format!("echo {}", "x".repeat(150));
    coordinator.push_heartbeat(task_repr("t1", &command));
    let config = coordinator.agent_config().with_response_limit(1024);
    let transport = HttpTransport::new(&config).unwrap();
    let identity = ConnectionId::parse("abc-123").unwrap();

    let task = transport.poll_once(&identity).await.unwrap().unwrap();
    assert_eq!(task.command, command);
}

#[tokio::test]
async fn test_report_sends_json_body() {
    let coordinator = FakeCoordinator::start("abc-123").await;
    let transport = HttpTransport::new(&coordinator.agent_config()).unwrap();
    let identity = ConnectionId::parse("abc-123").unwrap();

    let mut task = Task::new("t1", "printf 'a\\tb'");
    task.output = Some("a\tb".to_string());

    let status = transport.report(&identity, &task).await.unwrap();
    assert_eq!(status, TaskStatus::Complete);

    let reports = coordinator.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].identity, "abc-123");
    assert_eq!(reports[0].content_type.as_deref(), Some("application/json"));

    let json: serde_json::Value = serde_json::from_str(&reports[0].body).unwrap();
    assert_eq!(json["uid"], "t1");
    assert_eq!(json["command"], "printf 'a\\tb'");
    assert_eq!(json["output"], "a\tb");
    assert_eq!(json["status"], 0);
}

#[tokio::test]
async fn test_report_without_output() {
    let coordinator = FakeCoordinator::start("abc-123").await;
    let transport = HttpTransport::new(&coordinator.agent_config()).unwrap();
    let identity = ConnectionId::parse("abc-123").unwrap();

    let status = transport
        .report(&identity, &Task::new("t2", "false"))
        .await
        .unwrap();
    assert_eq!(status, TaskStatus::Error);

    let body = &coordinator.reports()[0].body;
    assert!(body.contains(r#""output": """#));
    assert!(body.contains(r#""status": -1"#));
}
