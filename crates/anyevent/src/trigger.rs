//! Trigger Invocation
//!
//! A wrapped trigger is a predicate tagged with its event's name. The
//! invocation routine is shared by native-event listeners and attribute
//! change handling.

use anyevent_dom::{DomTree, Event, NodeId};
use convert_case::{Case, Casing};

use crate::{Predicate, TriggerArgs};

/// Identity of a wrapped trigger: position of its spec in the declaration list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(pub(crate) usize);

impl TriggerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Predicate carrying the name of the virtual event it fires
pub struct WrappedTrigger {
    id: TriggerId,
    name: String,
    predicate: Predicate,
}

impl WrappedTrigger {
    pub fn new(id: TriggerId, name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            id,
            name: name.into(),
            predicate,
        }
    }

    pub fn id(&self) -> TriggerId {
        self.id
    }

    /// Virtual event name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the predicate
    pub fn call(
        &self,
        tree: &DomTree,
        target: NodeId,
        event: &Event,
        property: &str,
    ) -> anyhow::Result<bool> {
        (self.predicate)(&TriggerArgs {
            tree,
            target,
            event,
            property,
        })
    }
}

impl std::fmt::Debug for WrappedTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedTrigger")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Handler slot names checked for an event, in lookup order
///
/// `banana` → `["onbanana", "onBanana"]`
pub fn handler_names(event_name: &str) -> [String; 2] {
    [
        format!("on{}", event_name.to_lowercase()),
        format!("on {}", event_name).to_case(Case::Camel),
    ]
}

/// Run a trigger against `target`
///
/// With no native `event`, one named after the trigger is synthesized.
/// When the predicate holds, a synthesized event is dispatched on the target
/// (a native one already was) and the target's `on<Name>` handler, if any,
/// is called with it. A failing predicate counts as `false`.
///
/// Returns whether the predicate held.
pub fn invoke_trigger(
    tree: &mut DomTree,
    trigger: &WrappedTrigger,
    target: NodeId,
    event: Option<&mut Event>,
    property: &str,
) -> bool {
    let synthesized = event.is_none();
    let mut own_event;
    let event = match event {
        Some(event) => event,
        None => {
            own_event = Event::new(trigger.name());
            &mut own_event
        }
    };

    let handler = handler_names(trigger.name())
        .iter()
        .find_map(|name| tree.event_handler(target, name));

    let fire = match trigger.call(tree, target, event, property) {
        Ok(fire) => fire,
        Err(err) => {
            tracing::warn!("Trigger '{}' failed on {}: {:#}", trigger.name(), target, err);
            false
        }
    };
    if !fire {
        return false;
    }

    tracing::debug!("Firing '{}' on {} ({})", trigger.name(), target, property);
    if synthesized {
        if let Err(err) = tree.dispatch_event(target, event) {
            tracing::warn!("Dispatch of '{}' failed: {}", trigger.name(), err);
        }
    }
    if let Some(handler) = handler {
        handler(tree, event);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyevent_dom::callback;
    use std::cell::Cell;
    use std::rc::Rc;

    fn trigger(name: &str, fire: bool) -> WrappedTrigger {
        WrappedTrigger::new(
            TriggerId(0),
            name,
            Rc::new(move |_: &TriggerArgs<'_>| -> anyhow::Result<bool> { Ok(fire) }),
        )
    }

    fn counting(tree: &mut DomTree, node: NodeId) -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let dispatched = Rc::new(Cell::new(0));
        let handled = Rc::new(Cell::new(0));
        let d = dispatched.clone();
        tree.add_event_listener(node, "banana", callback(move |_, _| d.set(d.get() + 1)))
            .unwrap();
        let h = handled.clone();
        tree.set_event_handler(node, "onBanana", callback(move |_, _| h.set(h.get() + 1)))
            .unwrap();
        (dispatched, handled)
    }

    #[test]
    fn test_handler_names() {
        assert_eq!(handler_names("banana"), ["onbanana", "onBanana"]);
        assert_eq!(handler_names("valueChanged"), ["onvaluechanged", "onValueChanged"]);
        assert_eq!(handler_names("my-event"), ["onmy-event", "onMyEvent"]);
    }

    #[test]
    fn test_id_keeps_full_declaration_index() {
        let index = usize::MAX;
        let wide = WrappedTrigger::new(TriggerId(index), "banana", trigger("banana", true).predicate);
        assert_eq!(wide.id().index(), index);
        assert_ne!(wide.id(), TriggerId(0));
    }

    #[test]
    fn test_true_predicate_dispatches_synthesized_event() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        let (dispatched, handled) = counting(&mut tree, input);

        assert!(invoke_trigger(&mut tree, &trigger("banana", true), input, None, "value"));
        assert_eq!(dispatched.get(), 1);
        assert_eq!(handled.get(), 1);
    }

    #[test]
    fn test_false_predicate_does_nothing() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        let (dispatched, handled) = counting(&mut tree, input);

        assert!(!invoke_trigger(&mut tree, &trigger("banana", false), input, None, "value"));
        assert_eq!(dispatched.get(), 0);
        assert_eq!(handled.get(), 0);
    }

    #[test]
    fn test_native_event_is_not_redispatched() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        let (dispatched, handled) = counting(&mut tree, input);

        let mut native = Event::new("keyup");
        native.target = Some(input);
        assert!(invoke_trigger(&mut tree, &trigger("banana", true), input, Some(&mut native), "keyup"));
        assert_eq!(dispatched.get(), 0);
        assert_eq!(handled.get(), 1);
    }

    #[test]
    fn test_failing_predicate_counts_as_false() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        let (dispatched, handled) = counting(&mut tree, input);
        let broken = WrappedTrigger::new(
            TriggerId(0),
            "banana",
            Rc::new(|_: &TriggerArgs<'_>| -> anyhow::Result<bool> { anyhow::bail!("no value") }),
        );

        assert!(!invoke_trigger(&mut tree, &broken, input, None, "value"));
        assert_eq!(dispatched.get() + handled.get(), 0);
    }

    #[test]
    fn test_lowercase_handler_wins() {
        let mut tree = DomTree::new();
        let input = tree.create_element("input");
        let (_, camel) = counting(&mut tree, input);
        let lower = Rc::new(Cell::new(0));
        let l = lower.clone();
        tree.set_event_handler(input, "onbanana", callback(move |_, _| l.set(l.get() + 1)))
            .unwrap();

        invoke_trigger(&mut tree, &trigger("banana", true), input, None, "value");
        assert_eq!(lower.get(), 1);
        assert_eq!(camel.get(), 0);
    }
}
