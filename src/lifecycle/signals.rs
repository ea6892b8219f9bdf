//! Shutdown signal handling.

use tokio::sync::broadcast;

/// Resolve on Ctrl+C or when the shutdown channel fires or closes.
pub async fn wait_for_shutdown(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = shutdown.recv() => {}
    }

    tracing::info!("Shutdown signal received");
}
