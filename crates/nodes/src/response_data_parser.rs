//! Terminal node decoding a JSON body.

use std::marker::PhantomData;

use pipeline::{
    Context, LogOrder, LogRecord, Node, NormalizedResponse, ObjectName, ParseError,
    PublisherContext,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Decodes the response body as JSON into `T`.
///
/// An empty body decodes as JSON `null`, so `Option<_>`, `()` and
/// `serde_json::Value` targets accept body-less responses.
pub struct ResponseDataParserNode<T> {
    object_name: ObjectName,
    _target: PhantomData<fn() -> T>,
}

impl<T> ResponseDataParserNode<T> {
    pub fn new() -> Self {
        Self {
            object_name: ObjectName::of::<Self>(),
            _target: PhantomData,
        }
    }
}

impl<T> Default for ResponseDataParserNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> ResponseDataParserNode<T> {
    fn parse(&self, response: NormalizedResponse) -> Context<T> {
        let mut log = LogRecord::new(&self.object_name, LogOrder::ResponseDataParserNode);
        let body: &[u8] = if response.body().is_empty() {
            b"null"
        } else {
            &response.body()[..]
        };

        match serde_json::from_slice::<T>(body) {
            Ok(value) => {
                log.push(format!("Parsed {} bytes of json", response.body().len()));
                Context::value(value).log(log)
            }
            Err(e) => {
                debug!(error = %e, "response body is not valid json");
                log.push(format!("Parse failed: {e}"));
                Context::error(ParseError::InvalidJson(e.to_string())).log(log)
            }
        }
    }
}

impl<T> Node<NormalizedResponse, T> for ResponseDataParserNode<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn process(&self, response: NormalizedResponse) -> Context<T> {
        self.parse(response)
    }

    fn make(&self, response: NormalizedResponse) -> PublisherContext<'_, T> {
        PublisherContext::new(async move { self.parse(response) })
    }

    fn object_name(&self) -> &ObjectName {
        &self.object_name
    }
}
