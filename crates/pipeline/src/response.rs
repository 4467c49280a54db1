//! The two shapes an HTTP exchange takes inside the chain.
//!
//! A [`TransportAttempt`] is what the transport hands over: everything it
//! managed to observe, with most fields optional. A [`NormalizedResponse`] is
//! what downstream nodes consume: request and response descriptors are
//! guaranteed to be present.

use bytes::Bytes;

use crate::{
    RequestDescriptor, ResponseDescriptor, SerializationDuration, TransportError, TransportMetrics,
};

/// The raw result of one network call.
///
/// `result` is the discriminant: `Ok` holds the transported body (possibly
/// empty), `Err` holds the transport-level failure and implies there is no
/// body.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportAttempt {
    pub request: Option<RequestDescriptor>,
    pub response: Option<ResponseDescriptor>,
    pub metrics: Option<TransportMetrics>,
    pub serialization_duration: SerializationDuration,
    pub result: Result<Bytes, TransportError>,
}

impl TransportAttempt {
    /// Creates a successful attempt with no metrics.
    pub fn success(
        request: Option<RequestDescriptor>,
        response: Option<ResponseDescriptor>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            request,
            response,
            metrics: None,
            serialization_duration: SerializationDuration::Unavailable,
            result: Ok(body.into()),
        }
    }

    /// Creates a failed attempt with no metrics.
    pub fn failure(
        request: Option<RequestDescriptor>,
        response: Option<ResponseDescriptor>,
        error: TransportError,
    ) -> Self {
        Self {
            request,
            response,
            metrics: None,
            serialization_duration: SerializationDuration::Unavailable,
            result: Err(error),
        }
    }

    pub fn with_metrics(mut self, metrics: TransportMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_serialization_duration(mut self, duration: SerializationDuration) -> Self {
        self.serialization_duration = duration;
        self
    }
}

// ---------------------------------------------------------------------------

/// A completed HTTP exchange with both descriptors present.
///
/// Immutable once built; fields are read through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    request: RequestDescriptor,
    response: ResponseDescriptor,
    body: Bytes,
    metrics: Option<TransportMetrics>,
    serialization_duration: SerializationDuration,
}

impl NormalizedResponse {
    pub fn new(
        request: RequestDescriptor,
        response: ResponseDescriptor,
        body: Bytes,
        metrics: Option<TransportMetrics>,
        serialization_duration: SerializationDuration,
    ) -> Self {
        Self {
            request,
            response,
            body,
            metrics,
            serialization_duration,
        }
    }

    /// Builds the body-less response used when the transport failed after
    /// the response head arrived.
    pub fn empty(request: RequestDescriptor, response: ResponseDescriptor) -> Self {
        Self::new(
            request,
            response,
            Bytes::new(),
            None,
            SerializationDuration::Unavailable,
        )
    }

    pub fn request(&self) -> &RequestDescriptor {
        &self.request
    }

    pub fn response(&self) -> &ResponseDescriptor {
        &self.response
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn metrics(&self) -> Option<&TransportMetrics> {
        self.metrics.as_ref()
    }

    pub fn serialization_duration(&self) -> SerializationDuration {
        self.serialization_duration
    }
}
