//! Event Specifications
//!
//! Caller-declared virtual events: which attributes and native events on
//! which element types should trigger them, and the predicate that
//! confirms a trigger.

use std::rc::Rc;

use anyevent_dom::{DomTree, ElementType, Event, NodeId};
use serde::{Deserialize, Serialize};

/// Trigger predicate
///
/// An `Err` is logged and treated as "do not fire".
pub type Predicate = Rc<dyn Fn(&TriggerArgs<'_>) -> anyhow::Result<bool>>;

/// Arguments handed to a trigger predicate
pub struct TriggerArgs<'a> {
    pub tree: &'a DomTree,
    pub target: NodeId,
    /// Native event, or the event synthesized for an attribute change
    pub event: &'a Event,
    /// Attribute or native event name that caused the call
    pub property: &'a str,
}

impl TriggerArgs<'_> {
    /// Read a property of the target
    pub fn property_value(&self, name: &str) -> Option<String> {
        self.tree.get_property(self.target, name)
    }

    /// Read an attribute of the target
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.tree.get_attribute(self.target, name)
    }

    pub fn element_type(&self) -> Option<ElementType> {
        self.tree.element_type(self.target)
    }
}

/// Declarative half of an [`EventSpec`], loadable from data files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDecl {
    pub name: String,
    #[serde(default)]
    pub trigger_by_attributes: Vec<String>,
    #[serde(default)]
    pub trigger_by_events: Vec<String>,
    #[serde(default)]
    pub subtree: bool,
    /// Empty means every element
    #[serde(default)]
    pub element_types: Vec<ElementType>,
}

/// Virtual event specification
#[derive(Clone)]
pub struct EventSpec {
    pub name: String,
    pub trigger_by_attributes: Vec<String>,
    pub trigger_by_events: Vec<String>,
    pub subtree: bool,
    /// Empty means every element
    pub element_types: Vec<ElementType>,
    pub trigger_fn: Predicate,
}

impl EventSpec {
    /// Create a spec with no triggers yet
    pub fn new<F>(name: impl Into<String>, trigger_fn: F) -> Self
    where
        F: Fn(&TriggerArgs<'_>) -> anyhow::Result<bool> + 'static,
    {
        Self {
            name: name.into(),
            trigger_by_attributes: Vec::new(),
            trigger_by_events: Vec::new(),
            subtree: false,
            element_types: Vec::new(),
            trigger_fn: Rc::new(trigger_fn),
        }
    }

    /// Bind a declaration to a predicate
    pub fn from_decl(decl: EventDecl, trigger_fn: Predicate) -> Self {
        Self {
            name: decl.name,
            trigger_by_attributes: decl.trigger_by_attributes,
            trigger_by_events: decl.trigger_by_events,
            subtree: decl.subtree,
            element_types: decl.element_types,
            trigger_fn,
        }
    }

    pub fn attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_by_attributes.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn events<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_by_events.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn element_types(mut self, types: impl IntoIterator<Item = ElementType>) -> Self {
        self.element_types.extend(types);
        self
    }

    pub fn subtree(mut self, subtree: bool) -> Self {
        self.subtree = subtree;
        self
    }

    /// Element types this spec registers under
    pub(crate) fn registered_types(&self) -> Vec<ElementType> {
        if self.element_types.is_empty() {
            vec![ElementType::Element]
        } else {
            self.element_types.clone()
        }
    }
}

impl std::fmt::Debug for EventSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSpec")
            .field("name", &self.name)
            .field("trigger_by_attributes", &self.trigger_by_attributes)
            .field("trigger_by_events", &self.trigger_by_events)
            .field("subtree", &self.subtree)
            .field("element_types", &self.element_types)
            .finish_non_exhaustive()
    }
}
