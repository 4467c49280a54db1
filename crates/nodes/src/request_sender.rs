//! Entry node handing a request to the transport.

use std::sync::Arc;

use pipeline::{
    Context, LogOrder, LogRecord, Node, ObjectName, PublisherContext, Transport, TransportAttempt,
    TransportRequest,
};
use tracing::{info_span, Instrument};

/// Sends a [`TransportRequest`] and forwards the resulting attempt.
///
/// [`Node::process`] uses the transport's blocking call and must therefore
/// run outside any async runtime; [`Node::make`] awaits the non-blocking call.
pub struct RequestSenderNode<T> {
    transport: Arc<dyn Transport>,
    next: Box<dyn Node<TransportAttempt, T>>,
    object_name: ObjectName,
}

impl<T> RequestSenderNode<T> {
    pub fn new(
        transport: Arc<dyn Transport>,
        next: impl Node<TransportAttempt, T> + 'static,
    ) -> Self {
        Self {
            transport,
            next: Box::new(next),
            object_name: ObjectName::of::<Self>(),
        }
    }

    fn open_log(&self, request: &TransportRequest) -> LogRecord {
        let mut log = LogRecord::new(&self.object_name, LogOrder::RequestSenderNode);
        log.push(format!("Send request: {} {}", request.method, request.url));
        log
    }
}

impl<T: Send + 'static> Node<TransportRequest, T> for RequestSenderNode<T> {
    fn process(&self, request: TransportRequest) -> Context<T> {
        let span = info_span!("send_request", method = %request.method, url = %request.url);
        let _entered = span.enter();
        let log = self.open_log(&request);
        let attempt = self.transport.send(request);
        self.next.process(attempt).log(log)
    }

    fn make(&self, request: TransportRequest) -> PublisherContext<'_, T> {
        let span = info_span!("send_request", method = %request.method, url = %request.url);
        PublisherContext::new(
            async move {
                let log = self.open_log(&request);
                let attempt = self.transport.send_async(request).await;
                self.next.make(attempt).await.log(log)
            }
            .instrument(span),
        )
    }

    fn object_name(&self) -> &ObjectName {
        &self.object_name
    }
}
