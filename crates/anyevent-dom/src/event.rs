//! DOM Events
//!
//! Named events, listener callbacks and listener registration keys.

use std::rc::Rc;

use crate::{DomTree, NodeId};

/// Listener / handler callback
///
/// Receives the tree mutably so listeners may write attributes or
/// properties while an event is being dispatched.
pub type EventCallback = Rc<dyn Fn(&mut DomTree, &mut Event)>;

/// Box a closure as an [`EventCallback`]
pub fn callback<F>(f: F) -> EventCallback
where
    F: Fn(&mut DomTree, &mut Event) + 'static,
{
    Rc::new(f)
}

/// Registration key for a listener
///
/// Registering a second listener with the same event type and key on the
/// same node is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey {
    pub owner: u64,
    pub slot: u64,
}

impl ListenerKey {
    pub fn new(owner: u64, slot: u64) -> Self {
        Self { owner, slot }
    }
}

/// DOM event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: String,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    pub timestamp: f64,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create a plain event (no bubbling, not cancelable)
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            target: None,
            current_target: None,
            bubbles: false,
            cancelable: false,
            timestamp: 0.0,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a bubbling event
    pub fn bubbling(event_type: impl Into<String>) -> Self {
        Self {
            bubbles: true,
            ..Self::new(event_type)
        }
    }

    /// Make the event cancelable
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Check if propagation was stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Registered listener
#[derive(Clone)]
pub(crate) struct Listener {
    pub event_type: String,
    pub key: Option<ListenerKey>,
    pub callback: EventCallback,
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("event_type", &self.event_type)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut event = Event::new("keyup");
        event.prevent_default();
        assert!(!event.is_default_prevented());

        let mut event = Event::new("keyup").with_cancelable(true);
        event.prevent_default();
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_bubbling_event() {
        let event = Event::bubbling("banana");
        assert!(event.bubbles);
        assert_eq!(event.event_type, "banana");
        assert_eq!(event.target, None);
    }
}
