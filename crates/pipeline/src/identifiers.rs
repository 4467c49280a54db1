//! Newtype identifiers used by the node chain.
//!
//! Nodes carry an [`ObjectName`] purely for diagnostics: it names the node type
//! and distinguishes two instances of the same type within one chain. Nothing
//! in the chain's behaviour depends on it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Human-readable name of a node type as shown in a rendered diagnostic log
    /// (e.g. `"ResponseProcessorNode"`).
    NodeName
}

string_id! {
    /// Absolute URL of an HTTP request, as handed to the transport layer.
    RequestUrl
}

// ---------------------------------------------------------------------------

/// Identifies one node instance for the lifetime of the chain it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeInstanceId(Uuid);

impl NodeInstanceId {
    /// Generates a new random instance identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for NodeInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Diagnostic identity of a node: its type name plus a per-instance id.
///
/// Assigned once when the node is constructed and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectName {
    /// View name shown in rendered logs.
    pub name: NodeName,
    /// Instance identifier, unique per constructed node.
    pub id: NodeInstanceId,
}

impl ObjectName {
    /// Creates an [`ObjectName`] for a node of type `N`.
    ///
    /// The view name is the unqualified type name with generic arguments
    /// stripped, so `nodes::ResponseProcessorNode<Foo>` becomes
    /// `ResponseProcessorNode`.
    pub fn of<N: ?Sized>() -> Self {
        let full = std::any::type_name::<N>();
        let without_generics = full.split('<').next().unwrap_or(full);
        let short = without_generics.rsplit("::").next().unwrap_or(without_generics);
        Self {
            name: NodeName::new(short).unwrap_or_else(|| NodeName(String::from("Node"))),
            id: NodeInstanceId::new_random(),
        }
    }
}

impl std::fmt::Display for ObjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
