//! DOM Tree (arena-based allocation)
//!
//! Every mutation that an observer can see goes through this type so the
//! matching records are queued at the moment the change happens.

use std::rc::Rc;

use crate::event::Listener;
use crate::observer::MutationObserver;
use crate::{
    native_accessor, DomError, ElementData, ElementType, Event, EventCallback, ListenerKey,
    MutationObserverInit, MutationRecord, MutationSource, MutationType, Node, NodeData, NodeId,
    NodeType, ObserverId, PropertyAccessor, PropertySlot,
};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    observers: Vec<MutationObserver>,
    next_observer_id: u32,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    /// Document node
    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Node creation
    // ------------------------------------------------------------------

    /// Create a detached element, picking its interface from the tag name
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element_with_type(tag_name, ElementType::from_tag_name(tag_name))
    }

    /// Create a detached element with an explicit interface
    pub fn create_element_with_type(&mut self, tag_name: &str, element_type: ElementType) -> NodeId {
        self.push(Node::element(tag_name, element_type))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(Node::node_type)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        let node = self.get_mut(id).ok_or(DomError::NodeNotFound(id))?;
        node.as_element_mut().ok_or(DomError::NotAnElement(id))
    }

    pub fn element_type(&self, id: NodeId) -> Option<ElementType> {
        self.element(id).map(|e| e.element_type)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children in document order (empty for unknown nodes)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Node followed by its ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).map(|_| id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Inclusive descendant check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        let parent_type = self.node_type(parent).ok_or(DomError::NodeNotFound(parent))?;
        let child_type = self.node_type(child).ok_or(DomError::NodeNotFound(child))?;

        if !matches!(parent_type, NodeType::Element | NodeType::Document) {
            return Err(DomError::Hierarchy {
                parent,
                child,
                reason: "parent cannot have children",
            });
        }
        if child_type == NodeType::Document {
            return Err(DomError::Hierarchy {
                parent,
                child,
                reason: "document cannot be inserted",
            });
        }
        if self.contains(child, parent) {
            return Err(DomError::Hierarchy {
                parent,
                child,
                reason: "child is an ancestor of parent",
            });
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) || reference == child {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }

        if let Some(old_parent) = self.parent(child) {
            self.detach(old_parent, child);
        }

        let index = match reference {
            Some(reference) => self
                .children(parent)
                .iter()
                .position(|&c| c == reference)
                .unwrap_or(self.children(parent).len()),
            None => self.children(parent).len(),
        };

        let siblings = &mut self.nodes[parent.0 as usize].children;
        siblings.insert(index, child);
        let previous_sibling = index.checked_sub(1).and_then(|i| siblings.get(i).copied());
        let next_sibling = siblings.get(index + 1).copied();
        self.nodes[child.0 as usize].parent = Some(parent);

        tracing::trace!("Inserted {} into {}", child, parent);
        let mut record = MutationRecord::child_list(parent, vec![child], Vec::new());
        record.previous_sibling = previous_sibling;
        record.next_sibling = next_sibling;
        self.queue_record(record);
        Ok(())
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.get(parent).is_none() {
            return Err(DomError::NodeNotFound(parent));
        }
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(parent, child);
        Ok(())
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        let siblings = &mut self.nodes[parent.0 as usize].children;
        let Some(index) = siblings.iter().position(|&c| c == child) else {
            return;
        };
        siblings.remove(index);
        let previous_sibling = index.checked_sub(1).and_then(|i| siblings.get(i).copied());
        let next_sibling = siblings.get(index).copied();
        self.nodes[child.0 as usize].parent = None;

        let mut record = MutationRecord::child_list(parent, Vec::new(), vec![child]);
        record.previous_sibling = previous_sibling;
        record.next_sibling = next_sibling;
        self.queue_record(record);
    }

    /// Replace a text node's content
    pub fn set_text(&mut self, id: NodeId, content: &str) -> Result<(), DomError> {
        let node = self.get_mut(id).ok_or(DomError::NodeNotFound(id))?;
        let NodeData::Text(text) = &mut node.data else {
            return Err(DomError::Hierarchy {
                parent: id,
                child: id,
                reason: "not a text node",
            });
        };
        let old_value = std::mem::replace(text, content.to_string());
        self.queue_record(MutationRecord {
            mutation_type: MutationType::CharacterData,
            old_value: Some(old_value),
            ..MutationRecord::child_list(id, Vec::new(), Vec::new())
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attr(name))
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute
    ///
    /// Always queues an attribute record, even if the value is unchanged.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let old_value = self.element_mut(id)?.set_attr(name, value);
        self.queue_record(MutationRecord::attributes(id, name, old_value));
        Ok(())
    }

    /// Remove an attribute (records only when it was present)
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        if let Some(old_value) = self.element_mut(id)?.remove_attr(name) {
            self.queue_record(MutationRecord::attributes(id, name, Some(old_value)));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Read a property through its own slot, else the element type's
    /// native accessor
    pub fn get_property(&self, id: NodeId, name: &str) -> Option<String> {
        let element = self.element(id)?;
        match element.properties.get(name) {
            Some(slot) => match &slot.accessor {
                Some(accessor) => accessor.clone().get(self, id),
                None => slot.value.clone(),
            },
            None => native_accessor(element.element_type, name)?.get(self, id),
        }
    }

    /// Write a property through its own slot, else the element type's
    /// native accessor, else store it as a plain value
    pub fn set_property(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let element = self.element_mut(id)?;
        let (own, native) = match element.properties.get(name) {
            Some(slot) => (slot.accessor.clone(), None),
            None => (None, native_accessor(element.element_type, name)),
        };
        if let Some(accessor) = own {
            return accessor.set(self, id, value);
        }
        if let Some(accessor) = native {
            return accessor.set(self, id, value);
        }
        self.element_mut(id)?
            .properties
            .entry(name.to_string())
            .or_default()
            .value = Some(value.to_string());
        Ok(())
    }

    /// Own slot of a property (native accessors have none)
    pub fn property_slot(&self, id: NodeId, name: &str) -> Option<&PropertySlot> {
        self.element(id)?.properties.get(name)
    }

    /// Accessor installed on the element itself
    pub fn property_accessor(&self, id: NodeId, name: &str) -> Option<Rc<dyn PropertyAccessor>> {
        self.property_slot(id, name)?.accessor.clone()
    }

    /// Install an accessor on a property
    ///
    /// Fails if the existing slot is non-configurable. The stored value is
    /// kept so a replaced accessor's backing data survives.
    pub fn define_property(
        &mut self,
        id: NodeId,
        name: &str,
        accessor: Rc<dyn PropertyAccessor>,
        configurable: bool,
    ) -> Result<(), DomError> {
        let element = self.element_mut(id)?;
        let slot = element.properties.entry(name.to_string()).or_default();
        if !slot.configurable {
            return Err(DomError::NonConfigurable {
                node: id,
                name: name.to_string(),
            });
        }
        slot.accessor = Some(accessor);
        slot.configurable = configurable;
        Ok(())
    }

    pub(crate) fn dirty_value(&self, id: NodeId) -> Option<String> {
        self.element(id)?.dirty_value.clone()
    }

    pub(crate) fn set_dirty_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.dirty_value = Some(value.to_string());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Expando fields
    // ------------------------------------------------------------------

    /// Ad-hoc field; `Some(None)` means set to nothing, `None` means never set
    pub fn expando(&self, id: NodeId, key: &str) -> Option<Option<&str>> {
        self.element(id)?.expando.get(key).map(Option::as_deref)
    }

    pub fn set_expando(&mut self, id: NodeId, key: &str, value: Option<&str>) -> Result<(), DomError> {
        self.element_mut(id)?
            .expando
            .insert(key.to_string(), value.map(str::to_string));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        callback: EventCallback,
    ) -> Result<(), DomError> {
        self.element_mut(id)?.listeners.push(Listener {
            event_type: event_type.to_string(),
            key: None,
            callback,
        });
        Ok(())
    }

    /// Add a listener unless one with the same type and key exists
    ///
    /// Returns whether the listener was added.
    pub fn add_keyed_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        key: ListenerKey,
        callback: EventCallback,
    ) -> Result<bool, DomError> {
        let element = self.element_mut(id)?;
        if element
            .listeners
            .iter()
            .any(|l| l.key == Some(key) && l.event_type == event_type)
        {
            return Ok(false);
        }
        element.listeners.push(Listener {
            event_type: event_type.to_string(),
            key: Some(key),
            callback,
        });
        Ok(true)
    }

    pub fn listener_count(&self, id: NodeId, event_type: &str) -> usize {
        self.element(id).map_or(0, |e| e.listener_count(event_type))
    }

    /// Set an `on<Name>`-style handler slot
    pub fn set_event_handler(
        &mut self,
        id: NodeId,
        name: &str,
        callback: EventCallback,
    ) -> Result<(), DomError> {
        self.element_mut(id)?.handlers.insert(name.to_string(), callback);
        Ok(())
    }

    pub fn remove_event_handler(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        self.element_mut(id)?.handlers.remove(name);
        Ok(())
    }

    pub fn event_handler(&self, id: NodeId, name: &str) -> Option<EventCallback> {
        self.element(id)?.handlers.get(name).cloned()
    }

    /// Dispatch an event at `target`
    ///
    /// Runs the target's listeners, then the ancestors' when the event
    /// bubbles. Handler slots are not invoked. Returns `false` if the
    /// default action was prevented.
    pub fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> Result<bool, DomError> {
        if self.get(target).is_none() {
            return Err(DomError::NodeNotFound(target));
        }
        event.target = Some(target);

        let path = if event.bubbles {
            self.ancestors(target)
        } else {
            vec![target]
        };

        for node in path {
            let callbacks: Vec<EventCallback> = match self.element(node) {
                Some(element) => element
                    .listeners
                    .iter()
                    .filter(|l| l.event_type == event.event_type)
                    .map(|l| l.callback.clone())
                    .collect(),
                None => continue,
            };
            event.current_target = Some(node);
            for callback in callbacks {
                callback(self, event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }

        event.current_target = None;
        Ok(!event.is_default_prevented())
    }

    // ------------------------------------------------------------------
    // Mutation observers
    // ------------------------------------------------------------------

    /// Stop an observer and drop its queued records
    pub fn disconnect(&mut self, observer: ObserverId) {
        self.observers.retain(|o| o.id != observer);
    }

    /// Check whether an observer has queued records
    pub fn has_pending_records(&self, observer: ObserverId) -> bool {
        self.observers
            .iter()
            .any(|o| o.id == observer && !o.pending_records.is_empty())
    }

    fn queue_record(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let ancestors = self.ancestors(record.target);
        for observer in &mut self.observers {
            observer.record(&record, &ancestors);
        }
    }
}

impl MutationSource for DomTree {
    fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push(MutationObserver::new(id, target, options));
        id
    }

    fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|o| o.id == observer)
            .map(|o| std::mem::take(&mut o.pending_records))
            .unwrap_or_default()
    }
}
