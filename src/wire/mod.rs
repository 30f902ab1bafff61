//! Wire codec for the coordinator protocol.
//!
//! - [`ResponseBuffer`]: bounded accumulator for register/heartbeat bodies
//! - [`parse_task`]: extracts a [`Task`](crate::task::Task) from a heartbeat body
//! - [`escape_json`]: capacity-limited JSON string escaping
//! - [`ReportBody`]: the `update_task` request body
//!
//! Heartbeat bodies are not JSON. The coordinator sends the textual form of
//! its task record, e.g.
//!
//! ```text
//! uid=UUID('6f1c...') command='echo hi' output='' status=<TaskStatus.PENDING: 2>
//! ```
//!
//! and the parser locates the `uid=UUID('` and `command='` markers, taking
//! everything up to the next `'`. A quote inside the command breaks this.

pub mod buffer;
pub mod escape;
pub mod parser;
pub mod report;

pub use buffer::ResponseBuffer;
pub use escape::{escape_json, Escaped};
pub use parser::parse_task;
pub use report::ReportBody;
