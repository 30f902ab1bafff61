pub mod config;
pub mod error;
pub mod session;
pub mod shutdown;
pub mod task;
pub mod transport;
pub mod wire;
pub mod worker;
