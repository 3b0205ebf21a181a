use serde::{Deserialize, Serialize};

/// Serializable view of a single endpoint's outcome.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EndpointReport {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub timed_out: bool,
}

impl EndpointReport {
    pub fn is_ok(&self) -> bool {
        self.address.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsensusReport {
    Agreed { address: String },
    NoConsensus { endpoints: Vec<EndpointReport> },
}
