//! Terminal node wrapping a closure.

use pipeline::{Context, LogOrder, LogRecord, Node, NodeError, ObjectName, PublisherContext};

/// Finishes a chain with an ad-hoc mapping.
///
/// The closure's parameter type must be spelled out (`|r: NormalizedResponse| ...`)
/// because the node's input type is taken from it.
pub struct TransformNode<F> {
    transform: F,
    object_name: ObjectName,
}

impl<F> TransformNode<F> {
    pub fn new(transform: F) -> Self {
        Self {
            transform,
            object_name: ObjectName::of::<Self>(),
        }
    }

    fn apply<In, Out>(&self, input: In) -> Context<Out>
    where
        F: Fn(In) -> Result<Out, NodeError>,
    {
        let mut log = LogRecord::new(&self.object_name, LogOrder::TransformNode);
        match (self.transform)(input) {
            Ok(value) => {
                log.push("Transform applied");
                Context::value(value).log(log)
            }
            Err(error) => {
                log.push(format!("Transform failed: {error}"));
                Context::error(error).log(log)
            }
        }
    }
}

impl<In, Out, F> Node<In, Out> for TransformNode<F>
where
    In: Send + 'static,
    Out: Send + 'static,
    F: Fn(In) -> Result<Out, NodeError> + Send + Sync,
{
    fn process(&self, input: In) -> Context<Out> {
        self.apply(input)
    }

    fn make(&self, input: In) -> PublisherContext<'_, Out> {
        PublisherContext::new(async move { self.apply(input) })
    }

    fn object_name(&self) -> &ObjectName {
        &self.object_name
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pipeline::Outcome;

    use super::*;

    #[test]
    fn both_paths_apply_the_closure() {
        let node = TransformNode::new(|n: u32| -> Result<String, NodeError> { Ok(n.to_string()) });

        let ctx = node.process(7);
        assert_eq!(ctx.outcome(), &Outcome::Value(String::from("7")));
        assert_eq!(ctx.diagnostic_log().lines().collect::<Vec<_>>(), vec!["Transform applied"]);

        let ctx = block_on(node.make(8));
        assert_eq!(ctx.outcome(), &Outcome::Value(String::from("8")));
    }

    #[test]
    fn closure_error_is_recorded() {
        let node = TransformNode::new(|_: ()| -> Result<u8, NodeError> {
            Err(NodeError::custom("Mapper", "nope"))
        });

        let ctx = node.process(());
        assert!(ctx.outcome().is_error());
        assert_eq!(
            ctx.diagnostic_log().lines().collect::<Vec<_>>(),
            vec!["Transform failed: Mapper: nope"]
        );
    }
}
