use std::net::IpAddr;
use std::time::Duration;

use reqwest::{Client, Url};

use super::error::FetchError;

// Keeps ParseFailure messages readable when a service answers with a full page.
const MAX_BODY_IN_ERROR: usize = 64;

/// Fetch one endpoint and parse its body as a literal IP address.
///
/// `timeout` bounds the whole request, from connect until the body is read.
pub async fn fetch_one(
    client: &Client,
    endpoint: &str,
    timeout: Duration,
) -> Result<IpAddr, FetchError> {
    let url = Url::parse(endpoint)
        .map_err(|e| FetchError::RequestConstruction(format!("{endpoint}: {e}")))?;
    let request = client
        .get(url)
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::RequestConstruction(e.to_string()))?;

    let response = client.execute(request).await.map_err(transport_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::NonSuccessStatus(status));
    }

    let body = response.bytes().await.map_err(transport_error)?;
    parse_address(&body)
}

/// Parse a response body as an IPv4 or IPv6 address, ignoring surrounding whitespace.
pub fn parse_address(body: &[u8]) -> Result<IpAddr, FetchError> {
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    trimmed
        .parse::<IpAddr>()
        .map_err(|_| FetchError::ParseFailure {
            body: trimmed.chars().take(MAX_BODY_IN_ERROR).collect(),
        })
}

fn transport_error(e: reqwest::Error) -> FetchError {
    // reqwest defers some request validation (e.g. unsupported schemes) until send
    if e.is_builder() {
        FetchError::RequestConstruction(e.to_string())
    } else {
        FetchError::Transport(e)
    }
}
