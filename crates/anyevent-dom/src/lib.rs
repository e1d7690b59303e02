//! anyevent DOM - Observable element tree
//!
//! Arena-based node tree with the hooks the anyevent engine instruments:
//! attributes, intercepted properties, event listeners, `on<Name>` handler
//! slots and a mutation observer registry.

mod element_type;
mod event;
mod node;
mod observer;
mod property;
mod tree;

pub use element_type::ElementType;
pub use event::{callback, Event, EventCallback, ListenerKey};
pub use node::{ElementData, Node, NodeData, NodeType};
pub use observer::{MutationObserverInit, MutationRecord, MutationSource, MutationType, ObserverId};
pub use property::{native_accessor, PropertyAccessor, PropertySlot, ValueAccessor};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Property '{name}' on {node} is not configurable")]
    NonConfigurable { node: NodeId, name: String },

    #[error("Cannot insert {child} into {parent}: {reason}")]
    Hierarchy {
        parent: NodeId,
        child: NodeId,
        reason: &'static str,
    },

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}
