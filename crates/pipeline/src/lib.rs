//! Core domain of the NodeKit request/response chain.
//!
//! This crate defines every type a node sees: the transport attempt it
//! classifies, the normalized response it hands on, the diagnostic log it
//! appends to, the synchronous ([`Context`]) and asynchronous
//! ([`PublisherContext`]) outcome wrappers, the [`Node`] contract itself and
//! the [`Transport`] port. Node implementations live in the `nodes` crate; the
//! HTTP client adapter lives in the `transport` crate.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate performs no I/O. It defines
//! *what* a node consumes and produces; other crates define *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ObjectName`, `RequestUrl`, etc.) |
//! | [`types`] | HTTP value types (`HttpMethod`, `StatusCode`, descriptors, metrics) |
//! | [`response`] | `TransportAttempt` and `NormalizedResponse` |
//! | [`log`] | Diagnostic log records and merging |
//! | [`context`] | Synchronous outcome container |
//! | [`publisher`] | Asynchronous outcome wrapper |
//! | [`node`] | The `Node` trait |
//! | [`transport`] | The `Transport` port trait |
//! | [`errors`] | Error taxonomy |

pub mod context;
pub mod errors;
pub mod identifiers;
pub mod log;
pub mod node;
pub mod publisher;
pub mod response;
pub mod transport;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use context::{Context, Outcome};
pub use errors::{HttpError, NodeError, ParseError, ResponseProcessorError, TransportError};
pub use identifiers::{NodeInstanceId, NodeName, ObjectName, RequestUrl};
pub use log::{DiagnosticLog, LogOrder, LogRecord, SKIPPED_ARROW, SUCCESS_ARROW};
pub use node::{BoxNode, Node};
pub use publisher::PublisherContext;
pub use response::{NormalizedResponse, TransportAttempt};
pub use transport::Transport;
pub use types::{
    HttpMethod, MultipartData, RequestBody, RequestDescriptor, ResponseDescriptor,
    SerializationDuration, StatusCode, Timestamp, TransportMetrics, TransportRequest,
};
