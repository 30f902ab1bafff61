use crate::error::{AgentError, Result};
use crate::task::Task;

const UID_MARKER: &str = "uid=UUID('";
const COMMAND_MARKER: &str = "command='";
const TERMINATOR: char = '\'';

/// Parse a non-empty heartbeat body into a [`Task`].
///
/// Both markers must be present. The identifier is left empty when its
/// terminator is missing; the command is required and must be non-empty.
pub fn parse_task(response: &str) -> Result<Task> {
    let uid_start = find_value_start(response, UID_MARKER);
    let command_start = find_value_start(response, COMMAND_MARKER);

    let (Some(uid_start), Some(command_start)) = (uid_start, command_start) else {
        return Err(AgentError::MalformedTaskResponse(
            "could not find uid or command marker".to_string(),
        ));
    };

    let uid = extract_value(response, uid_start).unwrap_or_default();
    let command = extract_value(response, command_start).ok_or_else(|| {
        AgentError::MalformedTaskResponse("command is empty or unterminated".to_string())
    })?;

    Ok(Task::new(uid, command))
}

fn find_value_start(text: &str, marker: &str) -> Option<usize> {
    text.find(marker).map(|pos| pos + marker.len())
}

/// Text from `start` up to the next terminator. A terminator at `start`
/// counts as not found.
fn extract_value(text: &str, start: usize) -> Option<&str> {
    let end = start + text[start..].find(TERMINATOR)?;
    (end > start).then(|| &text[start..end])
}
