//! Subtree Instrumentation
//!
//! Walks a node and its descendants in document order. Every element whose
//! type is tracked gets its indexed properties intercepted and a listener
//! per registered trigger for each indexed native event. Non-element nodes
//! are skipped together with their descendants.

use std::rc::Rc;

use anyevent_dom::{callback, DomTree, ElementType, ListenerKey, NodeId};

use crate::{intercept_property, invoke_trigger, Config, WrappedTrigger};

/// Work done by one instrumentation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstrumentReport {
    pub elements: usize,
    pub properties: usize,
    pub listeners: usize,
}

impl std::ops::AddAssign for InstrumentReport {
    fn add_assign(&mut self, other: Self) {
        self.elements += other.elements;
        self.properties += other.properties;
        self.listeners += other.listeners;
    }
}

/// Instrument `node` and its element descendants
///
/// `owner` keys the listeners so a second pass over the same element adds
/// nothing.
pub fn instrument_subtree(tree: &mut DomTree, config: &Config, owner: u64, node: NodeId) -> InstrumentReport {
    let mut report = InstrumentReport::default();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        let Some(element_type) = tree.element_type(current) else {
            continue;
        };
        report += instrument_element(tree, config, owner, current, element_type);
        stack.extend(tree.children(current).iter().rev());
    }

    tracing::debug!(
        "Instrumented {} elements under {}: {} properties, {} listeners",
        report.elements,
        node,
        report.properties,
        report.listeners
    );
    report
}

fn instrument_element(
    tree: &mut DomTree,
    config: &Config,
    owner: u64,
    node: NodeId,
    element_type: ElementType,
) -> InstrumentReport {
    let mut report = InstrumentReport {
        elements: 1,
        ..Default::default()
    };

    for attr in config.attr_index.keys() {
        if config.attr_index.tracks(attr, element_type) && intercept_property(tree, node, attr) {
            report.properties += 1;
        }
    }

    for (event_name, types) in config.event_index.iter() {
        for (registered, triggers) in types {
            if !element_type.is_a(*registered) {
                continue;
            }
            for (position, trigger) in triggers.iter().enumerate() {
                let key = ListenerKey::new(owner, ((*registered as u64) << 32) | position as u64);
                match tree.add_keyed_listener(node, event_name, key, listener(trigger, event_name)) {
                    Ok(true) => report.listeners += 1,
                    Ok(false) => {}
                    Err(err) => tracing::warn!("Listener for '{}' on {}: {}", event_name, node, err),
                }
            }
        }
    }

    report
}

fn listener(trigger: &Rc<WrappedTrigger>, event_name: &str) -> anyevent_dom::EventCallback {
    let trigger = Rc::clone(trigger);
    let event_name = event_name.to_string();
    callback(move |tree, event| {
        let Some(target) = event.target else {
            return;
        };
        invoke_trigger(tree, &trigger, target, Some(event), &event_name);
    })
}
