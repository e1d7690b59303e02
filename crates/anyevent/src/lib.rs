//! anyevent - Virtual events over an observed element tree
//!
//! Declare named virtual events that fire when given attributes or
//! properties change, or when given native events occur, on given element
//! types inside a subtree. Property writes are routed through the attribute
//! path, attribute records are deduplicated, and inserted nodes are
//! instrumented as they arrive.
//!
//! # Example
//! ```rust,ignore
//! use anyevent::{AnyEvent, EventSpec};
//! use anyevent_dom::{DomTree, ElementType};
//!
//! let banana = EventSpec::new("banana", |args| {
//!     Ok(args.property_value("value").unwrap_or_default().contains("banana"))
//! })
//! .attributes(["value"])
//! .events(["keyup"])
//! .element_types([ElementType::Input]);
//!
//! let mut tree = DomTree::new();
//! let root = tree.create_element("span");
//! let mut engine = AnyEvent::new([banana]);
//! engine.attach(&mut tree, root)?;
//! ```

mod any_event;
mod config;
mod dispatch;
mod intercept;
mod spec;
mod trigger;
mod walker;

pub use any_event::{AnyEvent, MAX_DELIVERY_ROUNDS};
pub use config::{Config, IndexTable, TriggerList};
pub use dispatch::{handle_attribute_change, handle_mutations, shadow_key, DeliveryReport};
pub use intercept::intercept_property;
pub use spec::{EventDecl, EventSpec, Predicate, TriggerArgs};
pub use trigger::{handler_names, invoke_trigger, TriggerId, WrappedTrigger};
pub use walker::{instrument_subtree, InstrumentReport};

pub use anyevent_dom as dom;

use anyevent_dom::{DomError, NodeId};

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum AnyEventError {
    #[error("Already attached to {0}")]
    AlreadyAttached(NodeId),

    #[error("Not attached to a root node")]
    NotAttached,

    #[error("Root {0} is not an element")]
    RootNotElement(NodeId),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}
