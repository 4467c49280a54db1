//! Maps well-known HTTP failure statuses to errors.

use pipeline::{
    Context, HttpError, LogOrder, LogRecord, Node, NodeError, NormalizedResponse, ObjectName,
    PublisherContext,
};
use tracing::debug;

/// Fails the chain for `400`, `401`, `403`, `404` and `500` responses and
/// forwards every other response unchanged.
///
/// Other `4xx`/`5xx` codes are left for later nodes to interpret.
pub struct HttpErrorProcessorNode<T> {
    next: Box<dyn Node<NormalizedResponse, T>>,
    object_name: ObjectName,
}

impl<T> HttpErrorProcessorNode<T> {
    pub fn new(next: impl Node<NormalizedResponse, T> + 'static) -> Self {
        Self {
            next: Box::new(next),
            object_name: ObjectName::of::<Self>(),
        }
    }

    fn check(
        &self,
        response: NormalizedResponse,
    ) -> (LogRecord, Result<NormalizedResponse, NodeError>) {
        let mut log = LogRecord::new(&self.object_name, LogOrder::HttpErrorProcessorNode);
        let status = response.response().status;
        match HttpError::from_status(status, response.body()) {
            Some(error) => {
                debug!(status = status.as_u16(), "status mapped to http error");
                log.push(format!("Status {status} -> {error}"));
                (log, Err(error.into()))
            }
            None => {
                log.push(format!("Status {status} -> continue processing"));
                (log, Ok(response))
            }
        }
    }
}

impl<T: Send + 'static> Node<NormalizedResponse, T> for HttpErrorProcessorNode<T> {
    fn process(&self, response: NormalizedResponse) -> Context<T> {
        match self.check(response) {
            (log, Ok(response)) => self.next.process(response).log(log),
            (log, Err(error)) => Context::error(error).log(log),
        }
    }

    fn make(&self, response: NormalizedResponse) -> PublisherContext<'_, T> {
        PublisherContext::new(async move {
            match self.check(response) {
                (log, Ok(response)) => self.next.make(response).await.log(log),
                (log, Err(error)) => Context::error(error).log(log),
            }
        })
    }

    fn object_name(&self) -> &ObjectName {
        &self.object_name
    }
}
