//! Global shutdown signal for graceful termination.

use once_cell::sync::Lazy;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Parent of every lookup's cancellation scope.
pub static SHUTDOWN: Lazy<CancellationToken> = Lazy::new(CancellationToken::new);

/// Cancel [`SHUTDOWN`] on the first Ctrl+C. Must be called inside a runtime.
pub fn cancel_on_ctrl_c() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl+C received, cancelling pending requests");
            SHUTDOWN.cancel();
        }
    });
}
