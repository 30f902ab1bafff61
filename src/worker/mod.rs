//! Local command execution.
//!
//! - [`TaskExecutor`]: runs a task's command through the shell and fills in
//!   its output
//! - [`CaptureBuffer`]: growable stdout buffer, doubling on demand
//!
//! # Execution Flow
//!
//! 1. [`TaskExecutor::execute`] spawns `<shell> -c <command>`
//! 2. Stdout is read in chunks into a [`CaptureBuffer`]
//! 3. Stderr is not captured; it goes to the agent's own stderr
//! 4. On any spawn, read or allocation failure the task keeps `output: None`
//!
//! Capture is all-or-nothing: a partial buffer is never handed back.

pub mod capture;
pub mod executor;

pub use capture::CaptureBuffer;
pub use executor::{Captured, TaskExecutor};
