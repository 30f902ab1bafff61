//! Signal handling tests. Kept in their own binary because the signals
//! are raised against the whole test process.

use std::time::Duration;

use nix::sys::signal::{raise, Signal};

use poll_agent::shutdown::install_shutdown_handler;

#[tokio::test]
async fn test_signals_cancel_token() {
    let token = install_shutdown_handler().unwrap();
    assert!(!token.is_cancelled());

    raise(Signal::SIGINT).unwrap();
    tokio::time::timeout(Duration::from_secs(5), token.cancelled())
        .await
        .expect("SIGINT should cancel the shutdown token");

    let token = install_shutdown_handler().unwrap();
    assert!(!token.is_cancelled());

    raise(Signal::SIGTERM).unwrap();
    tokio::time::timeout(Duration::from_secs(5), token.cancelled())
        .await
        .expect("SIGTERM should cancel the shutdown token");
}
