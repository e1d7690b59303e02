//! Mutation Dispatch
//!
//! Consumes mutation record batches. Attribute records fire the matching
//! triggers once per real value change; child-list records instrument the
//! inserted nodes.

use anyevent_dom::{DomTree, MutationRecord, MutationType, NodeId};

use crate::{instrument_subtree, invoke_trigger, Config};

/// Outcome of processing mutation records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub records: usize,
    /// Attribute records that reached trigger evaluation
    pub changes: usize,
    /// Attribute records dropped because the value was already processed
    pub duplicates: usize,
    /// Predicates that held
    pub fired: usize,
    /// Elements instrumented from inserted nodes
    pub instrumented: usize,
}

impl std::ops::AddAssign for DeliveryReport {
    fn add_assign(&mut self, other: Self) {
        self.records += other.records;
        self.changes += other.changes;
        self.duplicates += other.duplicates;
        self.fired += other.fired;
        self.instrumented += other.instrumented;
    }
}

/// Expando key holding the last value of `attr` processed by engine `owner`
pub fn shadow_key(owner: u64, attr: &str) -> String {
    format!("old-{}@{}", attr, owner)
}

/// Process a batch of records in order
pub fn handle_mutations(
    tree: &mut DomTree,
    config: &Config,
    owner: u64,
    records: &[MutationRecord],
) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for record in records {
        report.records += 1;
        tracing::trace!("Mutation {:?} on {}", record.mutation_type, record.target);

        if record.mutation_type == MutationType::Attributes {
            if let Some(attr) = &record.attribute_name {
                report += handle_attribute_change(tree, config, owner, record.target, attr);
            }
        }
        for &node in &record.added_nodes {
            report.instrumented += instrument_subtree(tree, config, owner, node).elements;
        }
    }

    report
}

/// Handle one attribute change on `target`
///
/// Unindexed attributes are ignored. Otherwise triggers run only if the
/// value differs from the shadow value, and the shadow value is then set to
/// the value that was processed, whether or not anything fired.
pub fn handle_attribute_change(
    tree: &mut DomTree,
    config: &Config,
    owner: u64,
    target: NodeId,
    attr: &str,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    if !config.attr_index.contains_key(attr) {
        return report;
    }

    let key = shadow_key(owner, attr);
    let current = tree.get_attribute(target, attr).map(str::to_string);
    let shadow = tree.expando(target, &key).map(|v| v.map(str::to_string));

    if shadow.as_ref() == Some(&current) {
        report.duplicates = 1;
        return report;
    }

    report.changes = 1;
    if let Some(element_type) = tree.element_type(target) {
        for trigger in config.attr_index.matching(attr, element_type) {
            if invoke_trigger(tree, &trigger, target, None, attr) {
                report.fired += 1;
            }
        }
    }

    if let Err(err) = tree.set_expando(target, &key, current.as_deref()) {
        tracing::debug!("No shadow value for '{}' on {}: {}", attr, target, err);
    }
    report
}
