//! First classification stage after the transport returns.

use pipeline::{
    Context, LogOrder, LogRecord, Node, NodeError, NormalizedResponse, ObjectName,
    PublisherContext, ResponseProcessorError, TransportAttempt, SKIPPED_ARROW, SUCCESS_ARROW,
};
use tracing::{debug, info_span, instrument, warn, Instrument};

/// Turns a [`TransportAttempt`] into a [`NormalizedResponse`] and hands it to
/// the next node.
///
/// | Attempt | Descriptors | Result |
/// |---------|-------------|--------|
/// | failure | both present | empty response (no body, no metrics, unavailable duration) forwarded |
/// | failure | one missing | the transport error, successor not called |
/// | success | both present | full response forwarded |
/// | success | one missing | [`ResponseProcessorError::RawResponseHasNoMetadata`], successor not called |
///
/// [`Node::process`] and [`Node::make`] share [`ResponseProcessorNode::classify`],
/// so both take the same branch and build the same response for the same
/// attempt.
pub struct ResponseProcessorNode<T> {
    next: Box<dyn Node<NormalizedResponse, T>>,
    object_name: ObjectName,
}

impl<T> ResponseProcessorNode<T> {
    /// Creates the node with `next` as its successor.
    pub fn new(next: impl Node<NormalizedResponse, T> + 'static) -> Self {
        Self {
            next: Box::new(next),
            object_name: ObjectName::of::<Self>(),
        }
    }

    /// Decides what the attempt becomes and records why.
    ///
    /// Pure: the only output is the returned record and result.
    pub fn classify(
        &self,
        attempt: TransportAttempt,
    ) -> (LogRecord, Result<NormalizedResponse, NodeError>) {
        let mut log = LogRecord::new(&self.object_name, LogOrder::ResponseProcessorNode);
        let TransportAttempt {
            request,
            response,
            metrics,
            serialization_duration,
            result,
        } = attempt;

        match result {
            Err(error) => {
                log.push(format!("Catch transport error: {error}"));
                let (Some(request), Some(response)) = (request, response) else {
                    return (log, Err(NodeError::Transport(error)));
                };

                log.push("Skip cause can extract parameters -> continue processing");
                log.push_transition(
                    request.method_label(),
                    request.url_label(),
                    SKIPPED_ARROW,
                    response.status.as_u16(),
                );
                log.push("EMPTY");

                (log, Ok(NormalizedResponse::empty(request, response)))
            }
            Ok(body) => {
                log.push("Request success!");
                let (Some(request), Some(response)) = (request, response) else {
                    log.push("But cant extract parameters -> terminate with error");
                    return (
                        log,
                        Err(ResponseProcessorError::RawResponseHasNoMetadata.into()),
                    );
                };

                log.push_transition(
                    request.method_label(),
                    request.url_label(),
                    SUCCESS_ARROW,
                    response.status.as_u16(),
                );
                match std::str::from_utf8(&body) {
                    Ok(text) => log.push(text),
                    Err(_) => log.push("CORRUPTED"),
                }

                let normalized = NormalizedResponse::new(
                    request,
                    response,
                    body,
                    metrics,
                    serialization_duration,
                );
                (log, Ok(normalized))
            }
        }
    }
}

fn trace_result(result: &Result<NormalizedResponse, NodeError>) {
    match result {
        Ok(response) => debug!(
            status = response.response().status.as_u16(),
            body_len = response.body().len(),
            "transport attempt normalized"
        ),
        Err(error) => warn!(%error, "transport attempt could not be normalized"),
    }
}

impl<T: Send + 'static> Node<TransportAttempt, T> for ResponseProcessorNode<T> {
    #[instrument(skip_all, fields(node = %self.object_name))]
    fn process(&self, attempt: TransportAttempt) -> Context<T> {
        let (log, result) = self.classify(attempt);
        trace_result(&result);
        match result {
            Ok(response) => self.next.process(response).log(log),
            Err(error) => Context::error(error).log(log),
        }
    }

    fn make(&self, attempt: TransportAttempt) -> PublisherContext<'_, T> {
        let span = info_span!("make", node = %self.object_name);
        PublisherContext::new(
            async move {
                let (log, result) = self.classify(attempt);
                trace_result(&result);
                match result {
                    Ok(response) => self.next.make(response).await.log(log),
                    Err(error) => Context::error(error).log(log),
                }
            }
            .instrument(span),
        )
    }

    fn object_name(&self) -> &ObjectName {
        &self.object_name
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use bytes::Bytes;
    use futures::executor::block_on;
    use pipeline::{
        HttpMethod, Outcome, RequestDescriptor, RequestUrl, ResponseDescriptor,
        SerializationDuration, StatusCode, Timestamp, TransportError, TransportMetrics,
    };
    use tracing_test::traced_test;

    use super::*;
    use crate::TransformNode;

    fn request() -> RequestDescriptor {
        RequestDescriptor::new(
            HttpMethod::Get,
            RequestUrl::new("https://api.example.com/items").unwrap(),
        )
    }

    fn response(status: u16) -> ResponseDescriptor {
        ResponseDescriptor::new(StatusCode::new(status))
    }

    /// A processor whose successor echoes the normalized response and counts calls.
    fn echo_chain() -> (ResponseProcessorNode<NormalizedResponse>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let next = TransformNode::new(
            move |r: NormalizedResponse| -> Result<NormalizedResponse, NodeError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(r)
            },
        );
        (ResponseProcessorNode::new(next), calls)
    }

    #[test]
    fn success_with_descriptors_forwards_full_response() {
        let (node, calls) = echo_chain();
        let metrics = TransportMetrics {
            started_at: Timestamp::now(),
            elapsed: Duration::from_millis(12),
        };
        let attempt = TransportAttempt::success(Some(request()), Some(response(200)), "ok")
            .with_metrics(metrics)
            .with_serialization_duration(SerializationDuration::Measured(Duration::from_millis(1)));

        let ctx = node.process(attempt);

        let Outcome::Value(normalized) = ctx.outcome() else {
            panic!("expected a value, got {:?}", ctx.outcome());
        };
        assert_eq!(normalized.body(), &Bytes::from_static(b"ok"));
        assert_eq!(normalized.response().status, StatusCode::new(200));
        assert_eq!(normalized.metrics(), Some(&metrics));
        assert_eq!(
            normalized.serialization_duration(),
            SerializationDuration::Measured(Duration::from_millis(1))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let lines: Vec<&str> = ctx.diagnostic_log().lines().collect();
        assert!(lines.iter().any(|l| l.ends_with("--> 200")));
        assert!(lines.iter().any(|l| l.contains("ok")));
    }

    #[test]
    fn failure_with_descriptors_forwards_empty_response() {
        let (node, calls) = echo_chain();
        let attempt = TransportAttempt::failure(
            Some(request()),
            Some(response(504)),
            TransportError::Timeout,
        );

        let ctx = node.process(attempt);

        let Outcome::Value(normalized) = ctx.outcome() else {
            panic!("expected a value, got {:?}", ctx.outcome());
        };
        assert!(normalized.body().is_empty());
        assert_eq!(normalized.metrics(), None);
        assert_eq!(
            normalized.serialization_duration(),
            SerializationDuration::Unavailable
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let lines: Vec<&str> = ctx.diagnostic_log().lines().collect();
        assert!(lines.iter().any(|l| l.ends_with("~~> 504")));
        assert!(lines.contains(&"EMPTY"));
    }

    #[test]
    fn failure_without_descriptors_returns_transport_error() {
        let (node, calls) = echo_chain();
        let error = TransportError::Connect(String::from("refused"));
        let attempt = TransportAttempt::failure(Some(request()), None, error.clone());

        let ctx = node.process(attempt.clone());
        assert_eq!(ctx.outcome(), &Outcome::Error(NodeError::Transport(error.clone())));
        assert_eq!(ctx.diagnostic_log().entry_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let ctx = block_on(node.make(attempt));
        assert_eq!(ctx.outcome(), &Outcome::Error(NodeError::Transport(error)));
        assert_eq!(ctx.diagnostic_log().entry_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn success_without_descriptors_is_a_metadata_error() {
        let (node, calls) = echo_chain();
        let attempt = TransportAttempt::success(None, Some(response(200)), "ok");

        for ctx in [node.process(attempt.clone()), block_on(node.make(attempt))] {
            assert_eq!(
                ctx.outcome(),
                &Outcome::Error(ResponseProcessorError::RawResponseHasNoMetadata.into())
            );
            assert_eq!(
                ctx.diagnostic_log().lines().last(),
                Some("But cant extract parameters -> terminate with error")
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_utf8_body_is_logged_as_corrupted_but_kept_intact() {
        let (node, _) = echo_chain();
        let body = Bytes::from_static(&[0xff, 0xfe, 0x00]);
        let attempt =
            TransportAttempt::success(Some(request()), Some(response(200)), body.clone());

        let ctx = node.process(attempt);

        assert!(ctx.diagnostic_log().lines().any(|l| l == "CORRUPTED"));
        let Outcome::Value(normalized) = ctx.outcome() else {
            panic!("expected a value");
        };
        assert_eq!(normalized.body(), &body);
    }

    #[test]
    fn unknown_method_and_url_render_as_undef() {
        let (node, _) = echo_chain();
        let request = RequestDescriptor {
            method: None,
            url: None,
        };
        let attempt = TransportAttempt::success(Some(request), Some(response(204)), "");

        let ctx = node.process(attempt);

        assert!(ctx.diagnostic_log().lines().any(|l| l == "UNDEF UNDEF --> 204"));
    }

    #[test]
    fn make_defers_all_work_until_polled() {
        let (node, calls) = echo_chain();
        let attempt = TransportAttempt::success(Some(request()), Some(response(200)), "ok");

        let publisher = node.make(attempt);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let ctx = block_on(publisher);
        assert!(ctx.outcome().is_value());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[traced_test]
    fn make_traces_inside_a_node_span() {
        let (node, _) = echo_chain();
        let attempt = TransportAttempt::success(Some(request()), Some(response(200)), "ok");

        block_on(node.make(attempt));

        assert!(logs_contain("make{node=ResponseProcessorNode"));
        assert!(logs_contain("transport attempt normalized"));
    }

    #[test]
    fn successor_errors_pass_through_unchanged() {
        let failing = TransformNode::new(|_: NormalizedResponse| -> Result<u8, NodeError> {
            Err(NodeError::custom("Downstream", "boom"))
        });
        let node = ResponseProcessorNode::new(failing);
        let attempt = TransportAttempt::success(Some(request()), Some(response(200)), "ok");

        let ctx = node.process(attempt.clone());
        assert_eq!(
            ctx.outcome(),
            &Outcome::Error(NodeError::custom("Downstream", "boom"))
        );
        let async_ctx = block_on(node.make(attempt));
        assert_eq!(async_ctx.outcome(), ctx.outcome());

        let orders: Vec<LogOrder> = ctx
            .diagnostic_log()
            .records()
            .iter()
            .map(|r| r.order())
            .collect();
        assert_eq!(
            orders,
            vec![LogOrder::ResponseProcessorNode, LogOrder::TransformNode]
        );
    }
}
