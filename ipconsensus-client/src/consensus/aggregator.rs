use std::collections::HashMap;
use std::net::IpAddr;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::{ConsensusFailure, EndpointRecord};

/// Number of distinct endpoints that must report the same address.
pub const QUORUM: usize = 2;

/// Count of endpoints per normalized address.
#[derive(Debug, Default)]
pub struct Tally {
    counts: HashMap<IpAddr, usize>,
}

impl Tally {
    /// Add one vote for `ip` and return its new count.
    pub fn record(&mut self, ip: IpAddr) -> usize {
        let count = self.counts.entry(ip.to_canonical()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Consume records until an address reaches [`QUORUM`] or `expected` records
/// have arrived.
///
/// On a win `scope` is cancelled and records not yet received are discarded.
/// Otherwise every received record is returned, in arrival order.
pub async fn aggregate(
    mut results: mpsc::UnboundedReceiver<EndpointRecord>,
    expected: usize,
    scope: &CancellationToken,
) -> Result<IpAddr, ConsensusFailure> {
    let mut tally = Tally::default();
    let mut failure = ConsensusFailure::default();

    while failure.len() < expected {
        let Some(record) = results.recv().await else {
            warn!(
                "Result stream closed after {} of {} endpoints",
                failure.len(),
                expected
            );
            break;
        };

        if let Some(ip) = record.address() {
            let votes = tally.record(ip);
            if votes >= QUORUM {
                debug!("{} confirmed by {} endpoints, cancelling the rest", ip, votes);
                scope.cancel();
                return Ok(ip.to_canonical());
            }
        }

        failure.records.push(record);
    }

    Err(failure)
}
