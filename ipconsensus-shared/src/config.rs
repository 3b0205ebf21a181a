use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Public address echo services queried when the caller supplies no list.
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://checkip.amazonaws.com",
    "http://whatismyip.akamai.com",
    "https://api.ipify.org",
    "http://ifconfig.me/ip",
    "http://myexternalip.com/raw",
    "http://ipinfo.io/ip",
    "http://ipecho.net/plain",
    "http://icanhazip.com",
    "http://ident.me",
    "http://bot.whatismyipaddress.com",
    "http://wgetip.com",
    "http://ip.tyk.nu",
];

pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConsensusConfig {
    /// Per-endpoint request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_endpoints() -> Vec<String> {
    DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect()
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        ConsensusConfig {
            timeout_ms: default_timeout_ms(),
            endpoints: default_endpoints(),
        }
    }
}

impl ConsensusConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_endpoints(
        mut self,
        endpoints: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }
}
