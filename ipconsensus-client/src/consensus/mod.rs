//! Public address lookup by agreement of independent echo services.
//!
//! Every endpoint is queried concurrently. The first address reported by two
//! endpoints wins and the remaining requests are cancelled. When every endpoint
//! has answered without agreement, the caller gets a [`ConsensusError`] listing
//! what each endpoint returned.

pub mod aggregator;
pub mod dispatch;
pub mod error;
pub mod fetch;

use std::net::IpAddr;
use std::time::Duration;

use ipconsensus_shared::config::ConsensusConfig;
use reqwest::{Client, ClientBuilder};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use error::{ConsensusError, ConsensusFailure, EndpointRecord, FetchError};

use aggregator::aggregate;
use dispatch::dispatch;

/// Query `endpoints` concurrently and return the first address two of them agree on.
///
/// `timeout` bounds each request on its own. Cancelling `parent` cancels every
/// request still in flight; dropping the returned future does the same.
pub async fn fetch_consensus(
    client: &Client,
    endpoints: &[String],
    timeout: Duration,
    parent: &CancellationToken,
) -> Result<IpAddr, ConsensusError> {
    if endpoints.is_empty() {
        return Err(ConsensusError::InvalidInput);
    }

    let scope = parent.child_token();
    let _guard = scope.clone().drop_guard();

    debug!(
        "Querying {} endpoints with a {:?} timeout",
        endpoints.len(),
        timeout
    );
    let results = dispatch(client, endpoints, timeout, &scope);

    match aggregate(results, endpoints.len(), &scope).await {
        Ok(ip) => Ok(ip),
        Err(failure) => {
            warn!("No two endpoints agreed ({} reported)", failure.len());
            Err(ConsensusError::NoConsensus(failure))
        }
    }
}

const USER_AGENT: &str = concat!("ipconsensus/", env!("CARGO_PKG_VERSION"));

/// Configured entry point for address lookups.
#[derive(Debug, Clone)]
pub struct Resolver {
    client: Client,
    config: ConsensusConfig,
    shutdown: CancellationToken,
}

impl Resolver {
    pub fn new(config: ConsensusConfig) -> Result<Self, ConsensusError> {
        Self::from_builder(Client::builder(), config)
    }

    /// Finish `builder` with this crate's User-Agent.
    pub fn from_builder(
        builder: ClientBuilder,
        config: ConsensusConfig,
    ) -> Result<Self, ConsensusError> {
        let client = builder
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConsensusError::ClientBuild)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: ConsensusConfig) -> Self {
        Self {
            client,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Tie every lookup to `token`, e.g. a process-wide Ctrl+C signal.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Look up the address using the configured endpoint list.
    pub async fn get(&self) -> Result<IpAddr, ConsensusError> {
        self.get_with_endpoints(&self.config.endpoints).await
    }

    pub async fn get_with_endpoints(
        &self,
        endpoints: &[String],
    ) -> Result<IpAddr, ConsensusError> {
        fetch_consensus(&self.client, endpoints, self.config.timeout(), &self.shutdown).await
    }

    /// Query every endpoint to completion, without stopping at agreement.
    ///
    /// Records come back in arrival order.
    pub async fn probe(&self, endpoints: &[String]) -> Vec<EndpointRecord> {
        let scope = self.shutdown.child_token();
        let _guard = scope.clone().drop_guard();

        let mut results = dispatch(&self.client, endpoints, self.config.timeout(), &scope);
        let mut records = Vec::with_capacity(endpoints.len());
        while records.len() < endpoints.len() {
            match results.recv().await {
                Some(record) => records.push(record),
                None => break,
            }
        }
        records
    }
}

/// Look up the public address using the default endpoint list.
pub async fn get() -> Result<IpAddr, ConsensusError> {
    Resolver::new(ConsensusConfig::default())?.get().await
}

/// Look up the public address using `endpoints`.
pub async fn get_with_endpoints(endpoints: &[String]) -> Result<IpAddr, ConsensusError> {
    Resolver::new(ConsensusConfig::default())?
        .get_with_endpoints(endpoints)
        .await
}
