use std::fmt;
use std::net::IpAddr;

use ipconsensus_shared::report::EndpointReport;
use reqwest::StatusCode;

/// Why a single endpoint did not produce an address.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not build request: {0}")]
    RequestConstruction(String),

    #[error("transport failure: {}", describe_transport(.0))]
    Transport(#[source] reqwest::Error),

    #[error("non-success status: {0}")]
    NonSuccessStatus(StatusCode),

    #[error("could not parse address from {body:?}")]
    ParseFailure { body: String },

    #[error("request cancelled")]
    Cancelled,

    #[error("fetch task panicked: {0}")]
    TaskPanicked(String),
}

impl FetchError {
    /// True when the request was abandoned because its timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport(e) if e.is_timeout())
    }
}

/// reqwest's Display stops at the outermost error; the cause (timeout,
/// refused connection, DNS) lives further down the source chain.
fn describe_transport(e: &reqwest::Error) -> String {
    let mut text = if e.is_timeout() {
        format!("timed out ({e})")
    } else {
        e.to_string()
    };

    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// Outcome of one endpoint, in the order it was received.
#[derive(Debug)]
pub struct EndpointRecord {
    pub endpoint: String,
    pub result: Result<IpAddr, FetchError>,
}

impl EndpointRecord {
    pub fn address(&self) -> Option<IpAddr> {
        self.result.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.result.as_ref().err()
    }

    pub fn to_report(&self) -> EndpointReport {
        EndpointReport {
            endpoint: self.endpoint.clone(),
            address: self.address().map(|ip| ip.to_string()),
            error: self.error().map(|e| e.to_string()),
            timed_out: self.error().is_some_and(FetchError::is_timeout),
        }
    }
}

impl fmt::Display for EndpointRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(ip) => write!(f, "endpoint: {}, address: {}", self.endpoint, ip),
            Err(e) => write!(f, "endpoint: {}, error: {}", self.endpoint, e),
        }
    }
}

/// Every endpoint reported and no address was confirmed twice.
#[derive(Debug, Default)]
pub struct ConsensusFailure {
    pub records: Vec<EndpointRecord>,
}

impl ConsensusFailure {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointRecord> {
        self.records.iter()
    }

    pub fn reports(&self) -> Vec<EndpointReport> {
        self.records.iter().map(EndpointRecord::to_report).collect()
    }
}

impl fmt::Display for ConsensusFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not get two matching addresses from {} endpoints",
            self.records.len()
        )?;
        for record in &self.records {
            write!(f, "\n  {record}")?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    #[error("no endpoints given")]
    InvalidInput,

    #[error("{0}")]
    NoConsensus(ConsensusFailure),

    #[error("could not build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ConsensusError {
    pub fn is_no_consensus(&self) -> bool {
        matches!(self, ConsensusError::NoConsensus(_))
    }

    pub fn failure(&self) -> Option<&ConsensusFailure> {
        match self {
            ConsensusError::NoConsensus(failure) => Some(failure),
            ConsensusError::InvalidInput | ConsensusError::ClientBuild(_) => None,
        }
    }
}
