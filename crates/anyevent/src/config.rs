//! Configuration Compiler
//!
//! Compiles the event specification list into two lookup tables:
//! attribute name → element type → triggers, and native event name →
//! element type → triggers. Keys and trigger lists keep declaration order.

use std::rc::Rc;

use anyevent_dom::{ElementType, MutationObserverInit};
use indexmap::IndexMap;

use crate::{EventSpec, TriggerId, WrappedTrigger};

/// Triggers registered under one key and element type, in declaration order
pub type TriggerList = Vec<Rc<WrappedTrigger>>;

/// Key → element type → triggers
#[derive(Debug, Clone, Default)]
pub struct IndexTable {
    entries: IndexMap<String, IndexMap<ElementType, TriggerList>>,
}

impl IndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trigger; the list is created with its first entry
    pub fn register(&mut self, key: &str, element_type: ElementType, trigger: Rc<WrappedTrigger>) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .entry(element_type)
            .or_default()
            .push(trigger);
    }

    pub fn get(&self, key: &str) -> Option<&IndexMap<ElementType, TriggerList>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in first-declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<ElementType, TriggerList>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Triggers registered under exactly this key and element type
    pub fn triggers(&self, key: &str, element_type: ElementType) -> &[Rc<WrappedTrigger>] {
        self.get(key)
            .and_then(|types| types.get(&element_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Triggers under `key` whose element type `node_type` satisfies,
    /// grouped by element type in registration order
    pub fn matching(&self, key: &str, node_type: ElementType) -> Vec<Rc<WrappedTrigger>> {
        self.get(key)
            .into_iter()
            .flat_map(|types| types.iter())
            .filter(|(ty, _)| node_type.is_a(**ty))
            .flat_map(|(_, list)| list.iter().cloned())
            .collect()
    }

    /// Check whether any element type under `key` matches `node_type`
    pub fn tracks(&self, key: &str, node_type: ElementType) -> bool {
        self.get(key)
            .is_some_and(|types| types.keys().any(|ty| node_type.is_a(*ty)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compiled lookup tables of one engine instance
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub attr_index: IndexTable,
    pub event_index: IndexTable,
    subtree: bool,
    trigger_count: usize,
}

impl Config {
    /// Compile an ordered spec list; `None` entries are skipped
    pub fn compile<I, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Option<EventSpec>>,
    {
        let mut config = Config::default();

        for (index, spec) in specs.into_iter().enumerate() {
            let Some(spec) = spec.into() else {
                continue;
            };
            let element_types = spec.registered_types();
            let trigger = Rc::new(WrappedTrigger::new(
                TriggerId(index),
                spec.name.as_str(),
                spec.trigger_fn.clone(),
            ));

            for attr in &spec.trigger_by_attributes {
                for ty in &element_types {
                    config.attr_index.register(attr, *ty, trigger.clone());
                }
            }
            for event in &spec.trigger_by_events {
                for ty in &element_types {
                    config.event_index.register(event, *ty, trigger.clone());
                }
            }
            config.subtree |= spec.subtree;
            config.trigger_count += 1;
        }

        tracing::debug!(
            "Compiled {} event specs: {} attribute keys, {} event keys",
            config.trigger_count,
            config.attr_index.len(),
            config.event_index.len()
        );
        config
    }

    /// Whether any spec asked for deep subtree coverage
    pub fn subtree(&self) -> bool {
        self.subtree
    }

    /// Number of specs compiled (including ones that registered nothing)
    pub fn trigger_count(&self) -> usize {
        self.trigger_count
    }

    /// Mutation registration for the observed root
    pub fn observer_init(&self) -> MutationObserverInit {
        MutationObserverInit {
            child_list: true,
            attributes: true,
            attribute_old_value: true,
            subtree: self.subtree,
            attribute_filter: Some(self.attr_index.keys().map(str::to_string).collect()),
            ..Default::default()
        }
    }
}
