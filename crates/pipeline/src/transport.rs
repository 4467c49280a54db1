//! Port trait for the HTTP transport.
//!
//! The chain never talks to an HTTP client directly. Infrastructure crates
//! implement [`Transport`] and report every call, successful or not, as a
//! [`TransportAttempt`].

use async_trait::async_trait;

use crate::{TransportAttempt, TransportRequest};

/// Sends requests and reports what happened.
///
/// Implementations never fail: every outcome, including a connection error,
/// is described by the returned attempt.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request`, blocking the calling thread until the body has been
    /// read or the call failed.
    ///
    /// Must not be called from within an async runtime.
    fn send(&self, request: TransportRequest) -> TransportAttempt;

    /// Sends `request` without blocking.
    async fn send_async(&self, request: TransportRequest) -> TransportAttempt;
}
