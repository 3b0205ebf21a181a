//! Local echo services for tests.
//!
//! Each helper binds a real axum server on an ephemeral loopback port and
//! returns its base URL. The server lives until the test runtime shuts down.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    routing::get,
};
use reqwest::Client;
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/")
}

/// Serve `body` (newline terminated) with `status` after `delay`.
pub async fn spawn_echo(status: StatusCode, body: &'static str, delay: Duration) -> String {
    serve(Router::new().route(
        "/",
        get(move || async move {
            tokio::time::sleep(delay).await;
            (status, format!("{body}\n"))
        }),
    ))
    .await
}

pub async fn echo(body: &'static str) -> String {
    spawn_echo(StatusCode::OK, body, Duration::ZERO).await
}

pub async fn slow_echo(body: &'static str, delay: Duration) -> String {
    spawn_echo(StatusCode::OK, body, delay).await
}

pub async fn failing(status: StatusCode) -> String {
    spawn_echo(status, "error", Duration::ZERO).await
}

/// Answers with the request's User-Agent header.
pub async fn user_agent_echo() -> String {
    serve(Router::new().route(
        "/",
        get(|headers: HeaderMap| async move {
            headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        }),
    ))
    .await
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Never answers. The flags flip when a request arrives and when the server
/// drops the handler because the client hung up.
pub async fn hanging_endpoint() -> (String, Arc<AtomicBool>, Arc<AtomicBool>) {
    let received = Arc::new(AtomicBool::new(false));
    let abandoned = Arc::new(AtomicBool::new(false));

    let (seen, dropped) = (received.clone(), abandoned.clone());
    let url = serve(Router::new().route(
        "/",
        get(move || {
            seen.store(true, Ordering::SeqCst);
            let guard = SetOnDrop(dropped.clone());
            async move {
                let _guard = guard;
                std::future::pending::<&'static str>().await
            }
        }),
    ))
    .await;

    (url, received, abandoned)
}

/// Poll `flag` until it is set or `limit` elapses.
pub async fn wait_for_flag(flag: &AtomicBool, limit: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while !flag.load(Ordering::SeqCst) {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    true
}

/// A loopback URL with nothing listening behind it.
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

/// Client that never routes loopback test traffic through an ambient proxy.
pub fn test_client() -> Client {
    Client::builder().no_proxy().build().unwrap()
}
