//! Property Interception
//!
//! Replaces a property's accessor on one element so that writes go through
//! `set_attribute`. Property writes and attribute writes then produce the
//! same attribute mutation record.

use std::rc::Rc;

use anyevent_dom::{DomError, DomTree, NodeId, PropertyAccessor};

/// Accessor installed over an indexed property
struct InterceptedProperty {
    name: String,
    prior: Option<Rc<dyn PropertyAccessor>>,
}

impl PropertyAccessor for InterceptedProperty {
    fn get(&self, tree: &DomTree, node: NodeId) -> Option<String> {
        match &self.prior {
            Some(prior) => prior.get(tree, node),
            None => tree.get_attribute(node, &self.name).map(str::to_string),
        }
    }

    fn set(&self, tree: &mut DomTree, node: NodeId, value: &str) -> Result<(), DomError> {
        if let Some(prior) = &self.prior {
            prior.set(tree, node, value)?;
        }
        tree.set_attribute(node, &self.name, value)
    }
}

/// Intercept `name` on `node`
///
/// Only an accessor installed on the element itself is delegated to; the
/// element type's native accessor is shadowed, so reads follow the
/// attribute.
///
/// The intercepted property is left non-configurable, so intercepting the
/// same property twice is refused. Refusals are not errors: the property
/// then only reports declarative attribute changes. Returns whether the
/// accessor was installed.
pub fn intercept_property(tree: &mut DomTree, node: NodeId, name: &str) -> bool {
    let accessor = Rc::new(InterceptedProperty {
        name: name.to_string(),
        prior: tree.property_accessor(node, name),
    });

    match tree.define_property(node, name, accessor, false) {
        Ok(()) => {
            tracing::trace!("Intercepted '{}' on {}", name, node);
            true
        }
        Err(err) => {
            tracing::trace!("'{}' on {} left as is: {}", name, node, err);
            false
        }
    }
}
