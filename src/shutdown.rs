use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Wait for SIGINT or SIGTERM, then cancel the shared token, which stops
/// long polling.
pub async fn watch_signals(token: CancellationToken) {
    cancel_on(token, wait_for_signal()).await;
}

/// Cancel `token` once `signal` resolves.
pub async fn cancel_on<F>(token: CancellationToken, signal: F)
where
    F: Future<Output = &'static str>,
{
    let name = signal.await;
    info!("Received {}, shutting down...", name);
    token.cancel();
    info!("Long polling cancelled");
}

async fn wait_for_signal() -> &'static str {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signal_cancels_token() {
        let token = CancellationToken::new();
        cancel_on(token.clone(), async { "SIGTERM" }).await;
        assert!(token.is_cancelled());
    }
}
