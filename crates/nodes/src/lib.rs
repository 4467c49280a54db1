//! NodeKit node implementations.
//!
//! Every node here implements [`pipeline::Node`] and owns its successor, so a
//! chain is assembled inside-out, from the terminal node up:
//!
//! ```text
//! RequestSenderNode -> ResponseProcessorNode -> HttpErrorProcessorNode -> ResponseDataParserNode
//!   TransportRequest     TransportAttempt         NormalizedResponse        NormalizedResponse -> T
//! ```
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Nodes sequence the domain types from the
//! [`pipeline`] crate. They talk to the network only through
//! [`pipeline::Transport`].

mod http_error_processor;
mod request_sender;
mod response_data_parser;
mod response_processor;
mod transform;

pub use http_error_processor::HttpErrorProcessorNode;
pub use request_sender::RequestSenderNode;
pub use response_data_parser::ResponseDataParserNode;
pub use response_processor::ResponseProcessorNode;
pub use transform::TransformNode;
