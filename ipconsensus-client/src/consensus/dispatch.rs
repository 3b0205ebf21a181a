use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::{EndpointRecord, FetchError};
use super::fetch::fetch_one;

/// Spawn one fetch task per endpoint under `scope`.
///
/// Every task sends exactly one record and exits. The channel is unbounded so a
/// task finishing after the receiver is gone never blocks; its send just fails.
pub fn dispatch(
    client: &Client,
    endpoints: &[String],
    timeout: Duration,
    scope: &CancellationToken,
) -> mpsc::UnboundedReceiver<EndpointRecord> {
    let (tx, rx) = mpsc::unbounded_channel::<EndpointRecord>();

    for endpoint in endpoints {
        let client = client.clone();
        let endpoint = endpoint.clone();
        let scope = scope.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = scope.cancelled() => Err(FetchError::Cancelled),
                r = AssertUnwindSafe(fetch_one(&client, &endpoint, timeout)).catch_unwind() => {
                    r.unwrap_or_else(|panic| Err(FetchError::TaskPanicked(panic_message(panic))))
                }
            };

            match &result {
                Ok(ip) => debug!("{} answered {}", endpoint, ip),
                Err(e) => debug!("{} failed: {}", endpoint, e),
            }

            let _ = tx.send(EndpointRecord { endpoint, result });
        });
    }

    rx
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
