//! Element Properties
//!
//! Property slots with optional accessor pairs. A slot without an accessor
//! is a plain stored value that never reflects to an attribute.

use std::rc::Rc;

use crate::{DomError, DomTree, ElementType, NodeId};

/// Getter/setter pair installed on a property slot
pub trait PropertyAccessor {
    fn get(&self, tree: &DomTree, node: NodeId) -> Option<String>;

    fn set(&self, tree: &mut DomTree, node: NodeId, value: &str) -> Result<(), DomError>;
}

/// Property slot on an element
#[derive(Clone)]
pub struct PropertySlot {
    pub accessor: Option<Rc<dyn PropertyAccessor>>,
    /// Stored value (plain properties, or accessor backing storage)
    pub value: Option<String>,
    pub configurable: bool,
}

impl PropertySlot {
    /// Plain data slot
    pub fn data(value: impl Into<String>) -> Self {
        Self {
            accessor: None,
            value: Some(value.into()),
            configurable: true,
        }
    }

    /// Accessor slot
    pub fn accessor(accessor: Rc<dyn PropertyAccessor>, configurable: bool) -> Self {
        Self {
            accessor: Some(accessor),
            value: None,
            configurable,
        }
    }
}

impl Default for PropertySlot {
    fn default() -> Self {
        Self {
            accessor: None,
            value: None,
            configurable: true,
        }
    }
}

impl std::fmt::Debug for PropertySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySlot")
            .field("accessor", &self.accessor.is_some())
            .field("value", &self.value)
            .field("configurable", &self.configurable)
            .finish()
    }
}

/// Native `value` property of form controls
///
/// Holds a dirty value once written; until then reads the `value`
/// attribute.
#[derive(Debug, Default)]
pub struct ValueAccessor;

impl ValueAccessor {
    pub const PROPERTY: &'static str = "value";
}

impl PropertyAccessor for ValueAccessor {
    fn get(&self, tree: &DomTree, node: NodeId) -> Option<String> {
        tree.dirty_value(node)
            .or_else(|| tree.get_attribute(node, Self::PROPERTY).map(str::to_string))
    }

    fn set(&self, tree: &mut DomTree, node: NodeId, value: &str) -> Result<(), DomError> {
        tree.set_dirty_value(node, value)
    }
}

static VALUE_ACCESSOR: ValueAccessor = ValueAccessor;

/// Accessor an element type provides for `name` without an own slot
///
/// Own slots shadow it; `DomTree::property_accessor` never returns it.
pub fn native_accessor(element_type: ElementType, name: &str) -> Option<&'static dyn PropertyAccessor> {
    (name == ValueAccessor::PROPERTY && element_type.has_value_property())
        .then_some(&VALUE_ACCESSOR as &'static dyn PropertyAccessor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessor_falls_back_to_attribute() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        tree.set_attribute(input, "value", "initial").unwrap();

        assert_eq!(tree.get_property(input, "value").as_deref(), Some("initial"));

        tree.set_property(input, "value", "typed").unwrap();
        assert_eq!(tree.get_property(input, "value").as_deref(), Some("typed"));
        // Dirty value does not reflect
        assert_eq!(tree.get_attribute(input, "value"), Some("initial"));
    }

    #[test]
    fn test_native_accessor_is_not_an_own_slot() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        tree.set_property(input, "value", "typed").unwrap();

        assert!(tree.property_slot(input, "value").is_none());
        assert!(tree.property_accessor(input, "value").is_none());
        assert!(native_accessor(ElementType::Input, "value").is_some());
        assert!(native_accessor(ElementType::Div, "value").is_none());
        assert!(native_accessor(ElementType::Input, "checked").is_none());
    }

    #[test]
    fn test_plain_property_does_not_reflect() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_property(div, "secondValue", "x").unwrap();

        assert_eq!(tree.get_property(div, "secondValue").as_deref(), Some("x"));
        assert_eq!(tree.get_attribute(div, "secondValue"), None);
    }
}
