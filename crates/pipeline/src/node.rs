//! The node contract.
//!
//! A chain is a fixed, acyclic, singly-linked sequence of nodes. Each
//! non-terminal node owns exactly one successor whose input type is this
//! node's output type; the constructor's signature enforces the match, so a
//! mistyped chain does not compile.
//!
//! Every node exposes the same transformation through two disciplines:
//!
//! - [`Node::process`] runs the whole remaining chain on the caller's thread
//!   and returns a resolved [`Context`].
//! - [`Node::make`] returns a [`PublisherContext`] that runs nothing until it
//!   is polled, then performs the same transformation and flat-maps into the
//!   successor's `make`.
//!
//! The two must never be mixed within one traversal: a node's `process`
//! calls its successor's `process`, its `make` calls its successor's `make`.

use crate::{Context, ObjectName, PublisherContext};

/// One stage of a processing chain, turning `In` into an outcome of `Out`.
///
/// Implementations hold no mutable state across invocations; the only state
/// they keep besides their successor is the [`ObjectName`] used in logs.
pub trait Node<In, Out>: Send + Sync {
    /// Transforms `input` and the rest of the chain synchronously.
    fn process(&self, input: In) -> Context<Out>;

    /// Returns a deferred computation equivalent to [`Node::process`].
    fn make(&self, input: In) -> PublisherContext<'_, Out>;

    /// Diagnostic identity of this node.
    fn object_name(&self) -> &ObjectName;
}

/// An owned, type-erased node.
pub type BoxNode<In, Out> = Box<dyn Node<In, Out>>;

impl<In, Out, N> Node<In, Out> for Box<N>
where
    N: Node<In, Out> + ?Sized,
{
    fn process(&self, input: In) -> Context<Out> {
        (**self).process(input)
    }

    fn make(&self, input: In) -> PublisherContext<'_, Out> {
        (**self).make(input)
    }

    fn object_name(&self) -> &ObjectName {
        (**self).object_name()
    }
}
