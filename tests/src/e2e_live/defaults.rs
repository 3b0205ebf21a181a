//! The default endpoint list against the real services.

use ipconsensus_client::Resolver;
use ipconsensus_shared::config::ConsensusConfig;

use super::{E2EError, init_tracing};

fn resolver() -> Result<Resolver, E2EError> {
    Resolver::new(ConsensusConfig::default()).map_err(|e| E2EError::Setup(e.to_string()))
}

#[tokio::test]
async fn test_get_with_default_services() -> Result<(), E2EError> {
    init_tracing();

    let ip = ipconsensus_client::get().await?;
    tracing::info!("public address: {}", ip);
    Ok(())
}

#[tokio::test]
async fn test_repeated_lookups_agree() -> Result<(), E2EError> {
    init_tracing();
    let resolver = resolver()?;

    let first = resolver.get().await?;
    let second = resolver.get().await?;
    if first != second {
        return Err(E2EError::Unexpected(format!(
            "lookups disagreed: {first} then {second}"
        )));
    }
    Ok(())
}

/// Every default service is probed; dead ones are reported, not fatal.
#[tokio::test]
async fn test_default_services_answer() -> Result<(), E2EError> {
    init_tracing();
    let resolver = resolver()?;

    let records = resolver.probe(&resolver.config().endpoints).await;
    assert_eq!(records.len(), resolver.config().endpoints.len());

    let mut answered = 0;
    for record in &records {
        match record.address() {
            Some(ip) => {
                answered += 1;
                tracing::info!("{} answered {}", record.endpoint, ip);
            }
            None => tracing::warn!("{}", record),
        }
    }

    if answered < 2 {
        return Err(E2EError::Unexpected(format!(
            "only {answered} of {} default services answered",
            records.len()
        )));
    }
    Ok(())
}
