//! Error types surfaced by the node chain.
//!
//! [`NodeError`] is the single error type every [`crate::Node`] reports. Errors
//! raised further down the chain travel back up unchanged; no node wraps or
//! swallows a successor's error.
//!
//! The component errors it unifies:
//!
//! - [`TransportError`] originates below the chain and is re-surfaced as-is
//!   when no normalized response can be built.
//! - [`ResponseProcessorError`] signals that the transport broke its contract
//!   (a successful attempt without request/response metadata).
//! - [`HttpError`] and [`ParseError`] come from the response-side nodes.

use thiserror::Error;

use crate::StatusCode;

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// A failure reported by the transport layer for one network call.
///
/// Carries only strings so it can be cloned and compared; the transport
/// adapter flattens its client library's error into one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request or body read did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// No connection could be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The target URL could not be parsed.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl {
        /// The URL as supplied by the caller.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The response head arrived but reading the body failed.
    #[error("failed to read response body: {0}")]
    Body(String),
}

// ---------------------------------------------------------------------------
// Node-local errors
// ---------------------------------------------------------------------------

/// Errors raised by the response processor node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResponseProcessorError {
    /// A successful transport attempt is missing its request or response
    /// descriptor. This is a transport contract violation, never a business
    /// failure.
    #[error("the raw response carries no metadata")]
    RawResponseHasNoMetadata,
}

/// HTTP status codes the error processor node turns into failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("400 bad request")]
    BadRequest(Vec<u8>),

    #[error("401 unauthorized")]
    Unauthorized(Vec<u8>),

    #[error("403 forbidden")]
    Forbidden(Vec<u8>),

    #[error("404 not found")]
    NotFound,

    #[error("500 internal server error")]
    InternalServerError(Vec<u8>),
}

impl HttpError {
    /// Maps a status code to its error, if the code is one the chain treats
    /// as a failure. The body is attached where the server usually explains
    /// itself.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Option<Self> {
        match status.as_u16() {
            400 => Some(Self::BadRequest(body.to_vec())),
            401 => Some(Self::Unauthorized(body.to_vec())),
            403 => Some(Self::Forbidden(body.to_vec())),
            404 => Some(Self::NotFound),
            500 => Some(Self::InternalServerError(body.to_vec())),
            _ => None,
        }
    }
}

/// Errors raised while decoding a response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The body is not valid JSON for the requested type.
    #[error("response body is not valid json: {0}")]
    InvalidJson(String),
}

// ---------------------------------------------------------------------------
// Chain-level error
// ---------------------------------------------------------------------------

/// The error carried by a failed [`crate::Context`] or [`crate::PublisherContext`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    ResponseProcessor(#[from] ResponseProcessorError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Raised by caller-defined nodes.
    #[error("{node}: {message}")]
    Custom {
        /// View name of the node that failed.
        node: String,
        /// Description of the failure.
        message: String,
    },
}

impl NodeError {
    /// Creates a [`NodeError::Custom`].
    pub fn custom(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            node: node.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_maps_only_known_failure_codes() {
        assert_eq!(
            HttpError::from_status(StatusCode::new(404), b"gone"),
            Some(HttpError::NotFound)
        );
        assert_eq!(
            HttpError::from_status(StatusCode::new(401), b"who"),
            Some(HttpError::Unauthorized(b"who".to_vec()))
        );
        assert_eq!(HttpError::from_status(StatusCode::new(418), b""), None);
        assert_eq!(HttpError::from_status(StatusCode::new(502), b""), None);
    }

    #[test]
    fn node_error_displays_component_message_transparently() {
        let err = NodeError::from(ResponseProcessorError::RawResponseHasNoMetadata);
        assert_eq!(err.to_string(), "the raw response carries no metadata");

        let err = NodeError::from(TransportError::Timeout);
        assert_eq!(err.to_string(), "request timed out");
    }
}
