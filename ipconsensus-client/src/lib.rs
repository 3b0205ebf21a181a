// === Core modules ===
pub mod config;
pub mod consensus;
pub mod util;

// === CLI entrypoint ===
pub mod cli;

#[cfg(test)]
mod testing;

pub use consensus::{ConsensusError, FetchError, Resolver, fetch_consensus, get, get_with_endpoints};

/// Entrypoint used by `main.rs` and tests to run the full CLI.
pub async fn run_cli() -> anyhow::Result<()> {
    cli::cli().await
}
