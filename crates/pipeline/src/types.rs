//! HTTP value types shared by every node in the chain.
//!
//! These are plain data containers describing one HTTP exchange. They carry no
//! transport behaviour; the [`crate::Transport`] port fills them in and the
//! nodes read them.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::RequestUrl;

// ---------------------------------------------------------------------------
// Request side
// ---------------------------------------------------------------------------

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Connect,
    Trace,
}

impl HttpMethod {
    /// Returns the method token as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Connect => "CONNECT",
            Self::Trace => "TRACE",
        }
    }

    /// Parses a method token, ignoring ASCII case. Returns `None` for
    /// extension methods.
    pub fn parse(token: &str) -> Option<Self> {
        const ALL: [HttpMethod; 9] = [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
            HttpMethod::Head,
            HttpMethod::Options,
            HttpMethod::Connect,
            HttpMethod::Trace,
        ];
        ALL.into_iter().find(|m| m.as_str().eq_ignore_ascii_case(token))
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------

/// What the transport layer knows about the request it sent.
///
/// Both fields are optional because a transport may fail before it has
/// resolved them. Missing values render as `UNDEF` in diagnostic logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// Method of the request, if known.
    pub method: Option<HttpMethod>,
    /// Target URL of the request, if known.
    pub url: Option<RequestUrl>,
}

impl RequestDescriptor {
    /// Creates a descriptor with both method and URL known.
    pub fn new(method: HttpMethod, url: RequestUrl) -> Self {
        Self {
            method: Some(method),
            url: Some(url),
        }
    }

    /// Method token for logs, `UNDEF` when unknown.
    pub fn method_label(&self) -> &str {
        self.method.map(HttpMethod::as_str).unwrap_or("UNDEF")
    }

    /// URL for logs, `UNDEF` when unknown.
    pub fn url_label(&self) -> &str {
        self.url.as_ref().map(RequestUrl::as_str).unwrap_or("UNDEF")
    }
}

// ---------------------------------------------------------------------------

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartData {
    /// Raw content of the part.
    pub data: Bytes,
    /// Form field name.
    pub name: String,
    /// File name reported for the part.
    pub file_name: String,
    /// MIME type of `data` (e.g. `"image/png"`).
    pub mime_type: String,
}

impl MultipartData {
    pub fn new(
        data: impl Into<Bytes>,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            name: name.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Bytes(Bytes),
    Json(serde_json::Value),
    Multipart(Vec<MultipartData>),
}

/// A request as handed to the [`crate::Transport`] port.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Unparsed target URL. The transport validates it.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl TransportRequest {
    /// Creates a request with no headers and an empty body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Adds a header, keeping any existing header with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

// ---------------------------------------------------------------------------
// Response side
// ---------------------------------------------------------------------------

/// An HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatusCode(u16);

impl StatusCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the transport layer received before (or instead of) the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
}

impl ResponseDescriptor {
    /// Creates a descriptor with no headers.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Returns the first header value matching `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Timing of one network call as measured by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportMetrics {
    /// When the request was handed to the HTTP client.
    pub started_at: Timestamp,
    /// Time from sending the request until the response head arrived.
    pub elapsed: Duration,
}

/// Time the transport spent reading and buffering the response body.
///
/// [`SerializationDuration::Unavailable`] marks a response whose body was
/// never read (e.g. a failed attempt normalized into an empty response).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SerializationDuration {
    #[default]
    Unavailable,
    Measured(Duration),
}

impl SerializationDuration {
    /// Returns the measured duration, if any.
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            Self::Measured(d) => Some(d),
            Self::Unavailable => None,
        }
    }

    pub fn is_measured(self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("Patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("PURGE"), None);
    }

    #[test]
    fn request_descriptor_labels_fall_back_to_undef() {
        let empty = RequestDescriptor {
            method: None,
            url: None,
        };
        assert_eq!(empty.method_label(), "UNDEF");
        assert_eq!(empty.url_label(), "UNDEF");

        let url = RequestUrl::new("https://example.com/a").unwrap();
        let full = RequestDescriptor::new(HttpMethod::Delete, url);
        assert_eq!(full.method_label(), "DELETE");
        assert_eq!(full.url_label(), "https://example.com/a");
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let mut response = ResponseDescriptor::new(StatusCode::new(200));
        response
            .headers
            .push((String::from("Content-Type"), String::from("application/json")));
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn serialization_duration_defaults_to_unavailable() {
        assert_eq!(SerializationDuration::default(), SerializationDuration::Unavailable);
        assert!(!SerializationDuration::Unavailable.is_measured());
        let measured = SerializationDuration::Measured(Duration::from_millis(3));
        assert_eq!(measured.as_duration(), Some(Duration::from_millis(3)));
    }
}
