//! DOM Node
//!
//! Arena node: tree links plus node-specific data.

use std::collections::HashMap;

use crate::event::{EventCallback, Listener};
use crate::{ElementType, NodeId, PropertySlot};

/// Node type (numeric values follow `Node.nodeType`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
}

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (None if detached or root)
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str, element_type: ElementType) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag_name, element_type)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// Create a new comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Comment(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    fn with_data(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Element-specific data
pub struct ElementData {
    pub tag_name: String,
    pub element_type: ElementType,
    /// Attributes in insertion order
    pub attrs: Vec<(String, String)>,
    pub(crate) properties: HashMap<String, PropertySlot>,
    pub(crate) listeners: Vec<Listener>,
    pub(crate) handlers: HashMap<String, EventCallback>,
    /// Script-visible ad-hoc fields
    pub(crate) expando: HashMap<String, Option<String>>,
    /// Value written through the native `value` accessor
    pub(crate) dirty_value: Option<String>,
}

impl ElementData {
    pub fn new(tag_name: &str, element_type: ElementType) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            element_type,
            attrs: Vec::new(),
            properties: HashMap::new(),
            listeners: Vec::new(),
            handlers: HashMap::new(),
            expando: HashMap::new(),
            dirty_value: None,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, returning the previous value
    pub fn set_attr(&mut self, name: &str, value: &str) -> Option<String> {
        for (n, v) in self.attrs.iter_mut() {
            if n == name {
                return Some(std::mem::replace(v, value.to_string()));
            }
        }
        self.attrs.push((name.to_string(), value.to_string()));
        None
    }

    /// Remove an attribute, returning its value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(n, _)| n == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// Number of registered listeners for an event type
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .count()
    }
}

impl std::fmt::Debug for ElementData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut handlers: Vec<&String> = self.handlers.keys().collect();
        handlers.sort();
        f.debug_struct("ElementData")
            .field("tag_name", &self.tag_name)
            .field("element_type", &self.element_type)
            .field("attrs", &self.attrs)
            .field("properties", &self.properties)
            .field("listeners", &self.listeners)
            .field("handlers", &handlers)
            .field("expando", &self.expando)
            .field("dirty_value", &self.dirty_value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_roundtrip_keeps_order() {
        let mut el = ElementData::new("INPUT", ElementType::Input);
        assert_eq!(el.tag_name, "input");
        assert_eq!(el.set_attr("id", "a"), None);
        assert_eq!(el.set_attr("value", "x"), None);
        assert_eq!(el.set_attr("id", "b"), Some("a".to_string()));

        let names: Vec<&str> = el.attrs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["id", "value"]);
        assert_eq!(el.remove_attr("id"), Some("b".to_string()));
        assert_eq!(el.get_attr("id"), None);
    }

    #[test]
    fn test_node_types() {
        assert_eq!(Node::text("hi").node_type(), NodeType::Text);
        assert_eq!(Node::text("hi").as_text(), Some("hi"));
        assert_eq!(Node::comment("c").as_text(), None);
        assert_eq!(Node::comment("c").node_type(), NodeType::Comment);
        assert_eq!(Node::document().node_type(), NodeType::Document);
        assert!(Node::element("div", ElementType::Div).is_element());
        assert_eq!(NodeType::Element as u8, 1);
    }
}
