//! reqwest-backed [`Transport`].

use std::sync::OnceLock;
use std::time::Instant;

use async_trait::async_trait;
use pipeline::{
    HttpMethod, RequestBody, RequestDescriptor, RequestUrl, ResponseDescriptor,
    SerializationDuration, StatusCode, Timestamp, Transport, TransportAttempt, TransportError,
    TransportMetrics, TransportRequest,
};
use reqwest::header::HeaderMap;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::TransportConfig;

/// The HTTP client could not be constructed.
#[derive(Debug, Error)]
pub enum TransportSetupError {
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// [`Transport`] over reqwest.
///
/// The async client is built eagerly. The blocking client is built on the
/// first [`Transport::send`], so a transport used only through
/// [`Transport::send_async`] never spawns reqwest's blocking worker.
pub struct ReqwestTransport {
    config: TransportConfig,
    client: reqwest::Client,
    blocking: OnceLock<reqwest::blocking::Client>,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportSetupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            config,
            client,
            blocking: OnceLock::new(),
        })
    }

    fn blocking_client(&self) -> Result<&reqwest::blocking::Client, reqwest::Error> {
        if let Some(client) = self.blocking.get() {
            return Ok(client);
        }
        let built = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout())
            .connect_timeout(self.config.connect_timeout())
            .user_agent(self.config.user_agent.clone())
            .build()?;
        Ok(self.blocking.get_or_init(move || built))
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Parses the target URL. An unparsable URL yields a finished attempt with
/// no descriptors at all.
fn parse_target(request: &TransportRequest) -> Result<(Url, RequestDescriptor), TransportAttempt> {
    match Url::parse(&request.url) {
        Ok(url) => {
            let descriptor = RequestDescriptor {
                method: Some(request.method),
                url: RequestUrl::new(url.as_str()),
            };
            Ok((url, descriptor))
        }
        Err(e) => Err(TransportAttempt::failure(
            None,
            None,
            TransportError::InvalidUrl {
                url: request.url.clone(),
                reason: e.to_string(),
            },
        )),
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
        HttpMethod::Connect => reqwest::Method::CONNECT,
        HttpMethod::Trace => reqwest::Method::TRACE,
    }
}

fn describe_response(status: reqwest::StatusCode, headers: &HeaderMap) -> ResponseDescriptor {
    ResponseDescriptor {
        status: StatusCode::new(status.as_u16()),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
    }
}

fn classify_error(error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else if error.is_body() || error.is_decode() {
        TransportError::Body(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

fn invalid_part(error: reqwest::Error) -> TransportError {
    TransportError::Request(format!("invalid multipart part: {error}"))
}

fn async_body(
    builder: reqwest::RequestBuilder,
    body: RequestBody,
) -> Result<reqwest::RequestBuilder, TransportError> {
    use reqwest::multipart::{Form, Part};

    Ok(match body {
        RequestBody::Empty => builder,
        RequestBody::Bytes(bytes) => builder.body(bytes),
        RequestBody::Json(value) => builder.json(&value),
        RequestBody::Multipart(parts) => {
            let mut form = Form::new();
            for part in parts {
                let data = Part::bytes(part.data.to_vec())
                    .file_name(part.file_name)
                    .mime_str(&part.mime_type)
                    .map_err(invalid_part)?;
                form = form.part(part.name, data);
            }
            builder.multipart(form)
        }
    })
}

fn blocking_body(
    builder: reqwest::blocking::RequestBuilder,
    body: RequestBody,
) -> Result<reqwest::blocking::RequestBuilder, TransportError> {
    use reqwest::blocking::multipart::{Form, Part};

    Ok(match body {
        RequestBody::Empty => builder,
        RequestBody::Bytes(bytes) => builder.body(bytes.to_vec()),
        RequestBody::Json(value) => builder.json(&value),
        RequestBody::Multipart(parts) => {
            let mut form = Form::new();
            for part in parts {
                let data = Part::bytes(part.data.to_vec())
                    .file_name(part.file_name)
                    .mime_str(&part.mime_type)
                    .map_err(invalid_part)?;
                form = form.part(part.name, data);
            }
            builder.multipart(form)
        }
    })
}

fn trace_attempt(attempt: &TransportAttempt) {
    match &attempt.result {
        Ok(body) => debug!(
            status = attempt.response.as_ref().map(|r| r.status.as_u16()),
            body_len = body.len(),
            "transport attempt completed"
        ),
        Err(error) => warn!(
            %error,
            has_response = attempt.response.is_some(),
            "transport attempt failed"
        ),
    }
}

// ---------------------------------------------------------------------------
// Transport impl
// ---------------------------------------------------------------------------

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    fn send(&self, request: TransportRequest) -> TransportAttempt {
        let (url, descriptor) = match parse_target(&request) {
            Ok(target) => target,
            Err(attempt) => return attempt,
        };
        let client = match self.blocking_client() {
            Ok(client) => client,
            Err(e) => return TransportAttempt::failure(Some(descriptor), None, classify_error(&e)),
        };

        let mut builder = client.request(to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let builder = match blocking_body(builder, request.body) {
            Ok(builder) => builder,
            Err(e) => return TransportAttempt::failure(Some(descriptor), None, e),
        };

        let started_at = Timestamp::now();
        let start = Instant::now();
        let response = match builder.send() {
            Ok(response) => response,
            Err(e) => {
                let attempt =
                    TransportAttempt::failure(Some(descriptor), None, classify_error(&e))
                        .with_metrics(TransportMetrics {
                            started_at,
                            elapsed: start.elapsed(),
                        });
                trace_attempt(&attempt);
                return attempt;
            }
        };
        let metrics = TransportMetrics {
            started_at,
            elapsed: start.elapsed(),
        };
        let response_descriptor = describe_response(response.status(), response.headers());

        let read_start = Instant::now();
        let attempt = match response.bytes() {
            Ok(body) => {
                TransportAttempt::success(Some(descriptor), Some(response_descriptor), body)
                    .with_serialization_duration(SerializationDuration::Measured(
                        read_start.elapsed(),
                    ))
            }
            Err(e) => TransportAttempt::failure(
                Some(descriptor),
                Some(response_descriptor),
                classify_error(&e),
            ),
        }
        .with_metrics(metrics);
        trace_attempt(&attempt);
        attempt
    }

    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    async fn send_async(&self, request: TransportRequest) -> TransportAttempt {
        let (url, descriptor) = match parse_target(&request) {
            Ok(target) => target,
            Err(attempt) => return attempt,
        };

        let mut builder = self.client.request(to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let builder = match async_body(builder, request.body) {
            Ok(builder) => builder,
            Err(e) => return TransportAttempt::failure(Some(descriptor), None, e),
        };

        let started_at = Timestamp::now();
        let start = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let attempt =
                    TransportAttempt::failure(Some(descriptor), None, classify_error(&e))
                        .with_metrics(TransportMetrics {
                            started_at,
                            elapsed: start.elapsed(),
                        });
                trace_attempt(&attempt);
                return attempt;
            }
        };
        let metrics = TransportMetrics {
            started_at,
            elapsed: start.elapsed(),
        };
        let response_descriptor = describe_response(response.status(), response.headers());

        let read_start = Instant::now();
        let attempt = match response.bytes().await {
            Ok(body) => {
                TransportAttempt::success(Some(descriptor), Some(response_descriptor), body)
                    .with_serialization_duration(SerializationDuration::Measured(
                        read_start.elapsed(),
                    ))
            }
            Err(e) => TransportAttempt::failure(
                Some(descriptor),
                Some(response_descriptor),
                classify_error(&e),
            ),
        }
        .with_metrics(metrics);
        trace_attempt(&attempt);
        attempt
    }
}
