//! Live checks against the public echo services.
//!
//! Run with `cargo test -p tests --features e2e` from the `tests` directory.
//! These need outbound network access and are off by default.

#[cfg(all(test, feature = "e2e"))]
mod e2e_live;
