//! NodeKit HTTP transport adapter.
//!
//! Implements the [`pipeline::Transport`] port with
//! [`reqwest`](https://docs.rs/reqwest). Every call, successful or not, is
//! reported as a [`pipeline::TransportAttempt`]; nothing here returns an
//! error to the chain.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Client construction, request building (including
//! multipart bodies), timing and error classification live here. The
//! [`pipeline`] crate sees only [`pipeline::Transport`].

mod config;
mod reqwest_transport;

pub use config::TransportConfig;
pub use reqwest_transport::{ReqwestTransport, TransportSetupError};
