mod defaults;

use std::sync::Once;

use ipconsensus_client::ConsensusError;

static INIT_TRACING: Once = Once::new();

/// Error type for E2E tests
#[derive(Debug, thiserror::Error)]
pub enum E2EError {
    #[error("Lookup failed: {0}")]
    Lookup(#[from] ConsensusError),

    #[error("Setup failed: {0}")]
    Setup(String),

    #[error("Unexpected result: {0}")]
    Unexpected(String),
}

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}
