//! Asynchronous outcome wrapper.
//!
//! [`PublisherContext`] is what [`crate::Node::make`] returns: a single-shot
//! future that does nothing until polled and then resolves exactly once to a
//! [`Context`]. Nodes compose it by flat-mapping into their successor's
//! `make`, and attach their log record once the inner computation resolves.
//!
//! Cancellation follows the futures model: drop the wrapper, or race it
//! against a signal with [`PublisherContext::with_cancellation`] to get an
//! [`Outcome::Cancelled`] instead.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use futures::future::{self, BoxFuture, Either};
use futures::FutureExt;

use crate::{Context, LogRecord, NodeError, Outcome};

/// A deferred, single-resolution [`Context`].
#[must_use = "a PublisherContext does nothing unless awaited"]
pub struct PublisherContext<'a, T> {
    inner: BoxFuture<'a, Context<T>>,
}

impl<'a, T: Send + 'a> PublisherContext<'a, T> {
    /// Wraps a future resolving to a context.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Context<T>> + Send + 'a,
    {
        Self {
            inner: future.boxed(),
        }
    }

    /// Resolves to an already known context on first poll.
    pub fn ready(context: Context<T>) -> Self {
        Self::new(future::ready(context))
    }

    pub fn value(value: T) -> Self {
        Self::ready(Context::value(value))
    }

    pub fn error(error: impl Into<NodeError>) -> Self {
        Self::ready(Context::error(error))
    }

    /// Puts `record` ahead of the resolved context's log.
    pub fn log(self, record: LogRecord) -> Self {
        Self::new(self.inner.map(move |ctx| ctx.log(record)))
    }

    /// Transforms the success value once resolved.
    pub fn map<U, F>(self, op: F) -> PublisherContext<'a, U>
    where
        U: Send + 'a,
        F: FnOnce(T) -> U + Send + 'a,
    {
        PublisherContext::new(self.inner.map(move |ctx| ctx.map(op)))
    }

    /// Continues with another deferred computation on success. Errors and
    /// cancellation short-circuit; the log resolved so far stays ahead of
    /// the continuation's log.
    pub fn flat_map<U, F>(self, op: F) -> PublisherContext<'a, U>
    where
        U: Send + 'a,
        F: FnOnce(T) -> PublisherContext<'a, U> + Send + 'a,
    {
        PublisherContext::new(async move {
            let (outcome, log) = self.inner.await.into_parts();
            match outcome {
                Outcome::Value(v) => op(v).await.with_log(log),
                Outcome::Error(e) => Context::error(e).with_log(log),
                Outcome::Cancelled => Context::cancelled().with_log(log),
            }
        })
    }

    /// Resolves to [`Outcome::Cancelled`] if `signal` completes first.
    pub fn with_cancellation<S>(self, signal: S) -> Self
    where
        S: Future<Output = ()> + Send + 'a,
    {
        Self::new(async move {
            let signal = signal.boxed();
            match future::select(self.inner, signal).await {
                Either::Left((ctx, _)) => ctx,
                Either::Right(((), _)) => Context::cancelled(),
            }
        })
    }
}

impl<T> Future for PublisherContext<'_, T> {
    type Output = Context<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

impl<T> std::fmt::Debug for PublisherContext<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublisherContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use futures::executor::block_on;

    use super::*;
    use crate::{LogOrder, ObjectName, TransportError};

    struct Stage;

    fn record(line: &str) -> LogRecord {
        let mut r = LogRecord::new(&ObjectName::of::<Stage>(), LogOrder::Custom(0));
        r.push(line);
        r
    }

    #[test]
    fn nothing_runs_until_polled() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let publisher = PublisherContext::new(async move {
            flag.store(true, Ordering::SeqCst);
            Context::value(())
        });

        assert!(!ran.load(Ordering::SeqCst));
        let ctx = block_on(publisher);
        assert!(ran.load(Ordering::SeqCst));
        assert!(ctx.outcome().is_value());
    }

    #[test]
    fn flat_map_orders_logs_and_short_circuits_errors() {
        let ctx = block_on(
            PublisherContext::value(4)
                .log(record("first"))
                .flat_map(|v| PublisherContext::value(v + 1).log(record("second"))),
        );
        assert_eq!(ctx.outcome(), &Outcome::Value(5));
        assert_eq!(
            ctx.diagnostic_log().lines().collect::<Vec<_>>(),
            vec!["first", "second"]
        );

        let ctx = block_on(
            PublisherContext::<u8>::error(TransportError::Timeout)
                .log(record("failed"))
                .flat_map(|v| PublisherContext::value(v).log(record("never"))),
        );
        assert_eq!(
            ctx.outcome(),
            &Outcome::Error(NodeError::Transport(TransportError::Timeout))
        );
        assert_eq!(ctx.diagnostic_log().entry_count(), 1);
    }

    #[test]
    fn map_transforms_value_and_keeps_log() {
        let ctx = block_on(
            PublisherContext::value(21u32)
                .log(record("doubled"))
                .map(|v| v * 2),
        );
        assert_eq!(ctx.outcome(), &Outcome::Value(42));
        assert_eq!(ctx.diagnostic_log().lines().collect::<Vec<_>>(), vec!["doubled"]);

        let ctx = block_on(PublisherContext::<u32>::error(TransportError::Timeout).map(|v| v * 2));
        assert!(ctx.outcome().is_error());
    }

    #[test]
    fn completed_signal_cancels_pending_computation() {
        let ctx = block_on(
            PublisherContext::<u8>::new(future::pending())
                .with_cancellation(future::ready(()))
                .log(record("cancelled")),
        );
        assert!(ctx.outcome().is_cancelled());
        assert_eq!(ctx.diagnostic_log().entry_count(), 1);
    }

    #[test]
    fn pending_signal_does_not_interfere() {
        let ctx = block_on(PublisherContext::value(7u8).with_cancellation(future::pending()));
        assert_eq!(ctx.outcome(), &Outcome::Value(7));
    }
}
