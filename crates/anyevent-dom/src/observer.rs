//! Mutation Observer
//!
//! Observe tree changes. Records are queued per observer and drained with
//! `take_records`.

use crate::NodeId;

/// Mutation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

/// Mutation record
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    /// Attribute change record
    pub fn attributes(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some(name.to_string()),
            old_value,
        }
    }

    /// Child list change record
    pub fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: added,
            removed_nodes: removed,
            previous_sibling: None,
            next_sibling: None,
            attribute_name: None,
            old_value: None,
        }
    }
}

/// Mutation observer options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub character_data_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Check whether a record of this type passes the options
    pub(crate) fn accepts(&self, record: &MutationRecord) -> bool {
        match record.mutation_type {
            MutationType::Attributes => {
                if !self.attributes {
                    return false;
                }
                match (&self.attribute_filter, &record.attribute_name) {
                    (Some(filter), Some(name)) => filter.iter().any(|f| f == name),
                    _ => true,
                }
            }
            MutationType::CharacterData => self.character_data,
            MutationType::ChildList => self.child_list,
        }
    }
}

/// Observer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

/// Source of mutation record batches
pub trait MutationSource {
    /// Start observing `target`; returns the observer handle
    fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId;

    /// Drain the records queued for an observer
    fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord>;
}

/// Mutation observer watching one target
#[derive(Debug)]
pub(crate) struct MutationObserver {
    pub id: ObserverId,
    pub target: NodeId,
    pub options: MutationObserverInit,
    pub pending_records: Vec<MutationRecord>,
}

impl MutationObserver {
    pub fn new(id: ObserverId, target: NodeId, options: MutationObserverInit) -> Self {
        Self {
            id,
            target,
            options,
            pending_records: Vec::new(),
        }
    }

    /// Queue a record if the observation covers it
    ///
    /// `ancestors` is the record target followed by its ancestors.
    pub fn record(&mut self, mutation: &MutationRecord, ancestors: &[NodeId]) {
        let covered = match ancestors.iter().position(|n| *n == self.target) {
            Some(0) => true,
            Some(_) => self.options.subtree,
            None => false,
        };
        if !covered || !self.options.accepts(mutation) {
            return;
        }

        let mut mutation = mutation.clone();
        if mutation.mutation_type == MutationType::Attributes && !self.options.attribute_old_value {
            mutation.old_value = None;
        }
        self.pending_records.push(mutation);
    }
}
