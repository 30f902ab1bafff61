use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Install a shutdown handler that listens for SIGTERM and SIGINT.
///
/// Returns a `CancellationToken` that is cancelled when either signal is
/// received. The handler only cancels the token; the session loop decides
/// when to stop.
pub fn install_shutdown_handler() -> std::io::Result<CancellationToken> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, stopping after current cycle");
            }
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, stopping after current cycle");
            }
        }

        token_clone.cancel();
    });

    Ok(token)
}
