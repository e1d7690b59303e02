//! Comprehensive tests for anyevent
//!
//! Every way a virtual event can be triggered: property writes, attribute
//! writes and native events, with matching and non-matching values.

use std::cell::Cell;
use std::rc::Rc;

use anyevent::{AnyEvent, EventSpec, TriggerArgs};
use anyevent_dom::{callback, DomTree, ElementType, Event, MutationRecord, NodeId};

// ============================================================================
// HELPERS
// ============================================================================

fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

/// Predicate that counts its calls and holds when `value` contains "banana"
fn banana_fn(calls: &Rc<Cell<u32>>) -> impl Fn(&TriggerArgs<'_>) -> anyhow::Result<bool> + 'static {
    let calls = calls.clone();
    move |args| {
        calls.set(calls.get() + 1);
        Ok(args.property_value("value").unwrap_or_default().contains("banana"))
    }
}

/// Counts both `banana` dispatches and `onBanana` handler calls on `node`
fn watch_banana(tree: &mut DomTree, node: NodeId, handler: bool) -> Rc<Cell<u32>> {
    let seen = counter();
    let s = seen.clone();
    tree.add_event_listener(node, "banana", callback(move |_, _| s.set(s.get() + 1)))
        .unwrap();
    if handler {
        let s = seen.clone();
        tree.set_event_handler(node, "onBanana", callback(move |_, _| s.set(s.get() + 1)))
            .unwrap();
    }
    seen
}

/// `<span>Not type 1 node<div><input/></div></span>`
fn nested_fixture(tree: &mut DomTree) -> (NodeId, NodeId) {
    let root = tree.create_element("span");
    let text = tree.create_text("Not type 1 node");
    let div = tree.create_element("div");
    let input = tree.create_element("input");
    tree.append_child(tree.document(), root).unwrap();
    tree.append_child(root, text).unwrap();
    tree.append_child(root, div).unwrap();
    tree.append_child(div, input).unwrap();
    (root, input)
}

/// `<span><input/>Not type 1 node</span>`
fn flat_fixture(tree: &mut DomTree) -> (NodeId, NodeId) {
    let root = tree.create_element("span");
    let input = tree.create_element("input");
    let text = tree.create_text("Not type 1 node");
    tree.append_child(tree.document(), root).unwrap();
    tree.append_child(root, input).unwrap();
    tree.append_child(root, text).unwrap();
    (root, input)
}

fn attribute_records(target: NodeId, names: &[&str]) -> Vec<MutationRecord> {
    names
        .iter()
        .map(|name| MutationRecord::attributes(target, name, None))
        .collect()
}

// ============================================================================
// ALL TRIGGER PATHS
// ============================================================================

#[test]
fn test_all_trigger_paths_with_valid_values() {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = nested_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .attributes(["value", "secondValue"])
        .events(["keyup"])
        .element_types([ElementType::Input, ElementType::Area])
        .subtree(true)]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, true);

    tree.set_property(input, "value", "banana").unwrap();
    tree.set_property(input, "secondValue", "banana").unwrap();
    tree.set_attribute(input, "value", "banana").unwrap();
    tree.set_attribute(input, "secondValue", "banana").unwrap();
    engine.deliver(&mut tree).unwrap();
    tree.dispatch_event(input, &mut Event::new("keyup")).unwrap();

    assert!(calls.get() > 0);
    // Two attribute changes (dispatch + handler each), one keyup (handler only)
    assert_eq!(seen.get(), 5);
    assert_eq!(tree.get_property(input, "value").as_deref(), Some("banana"));
    assert_eq!(tree.get_property(input, "secondValue").as_deref(), Some("banana"));
}

#[test]
fn test_all_trigger_paths_with_invalid_values() {
    let calls = counter();
    let never = counter();
    let never_fn = |count: &Rc<Cell<u32>>| {
        let count = count.clone();
        move |_: &TriggerArgs<'_>| -> anyhow::Result<bool> {
            count.set(count.get() + 1);
            Ok(false)
        }
    };
    let mut tree = DomTree::new();
    let (root, input) = flat_fixture(&mut tree);
    let mut engine = AnyEvent::new([
        EventSpec::new("willGiveArrayFromSeveralEvents", never_fn(&never))
            .attributes(["value", "secondValue"])
            .events(["keyup"]),
        EventSpec::new("willGiveArrayFromSeveralEvents", never_fn(&never))
            .attributes(["value", "secondValue"])
            .events(["keyup"]),
        EventSpec::new("banana", banana_fn(&calls))
            .attributes(["value", "secondValue"])
            .events(["keyup"])
            .element_types([ElementType::Input]),
    ]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, true);

    tree.set_property(input, "value", "apple").unwrap();
    tree.set_property(input, "secondValue", "apple").unwrap();
    tree.set_attribute(input, "value", "apple").unwrap();
    tree.set_attribute(input, "secondValue", "apple").unwrap();
    // Only direct children are covered without subtree, feed the records directly
    let records = attribute_records(input, &["value", "secondValue", "value", "secondValue"]);
    engine.handle_mutations(&mut tree, &records);
    tree.dispatch_event(input, &mut Event::new("blur")).unwrap();

    assert_eq!(calls.get(), 2);
    assert_eq!(never.get(), 4);
    assert_eq!(seen.get(), 0);
    assert_ne!(tree.get_property(input, "value").as_deref(), Some("banana"));
    assert_ne!(tree.get_property(input, "secondValue").as_deref(), Some("banana"));
}

#[test]
fn test_events_only_with_valid_values() {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = nested_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .events(["keyup"])
        .element_types([ElementType::Input])]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, true);

    tree.set_property(input, "value", "banana").unwrap();
    tree.set_property(input, "secondValue", "banana").unwrap();
    tree.set_attribute(input, "value", "banana").unwrap();
    tree.set_attribute(input, "secondValue", "banana").unwrap();
    let report = engine.deliver(&mut tree).unwrap();
    tree.dispatch_event(input, &mut Event::new("blur")).unwrap();

    assert_eq!(report.fired, 0);
    assert_eq!(calls.get(), 0);
    assert_eq!(seen.get(), 0);
    // Nothing intercepted: the secondValue property stays a plain value
    assert_eq!(tree.get_property(input, "value").as_deref(), Some("banana"));
    assert_eq!(tree.get_property(input, "secondValue").as_deref(), Some("banana"));
}

#[test]
fn test_events_only_with_invalid_values() {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = flat_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .events(["keyup"])
        .element_types([ElementType::Input])]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, true);

    tree.set_property(input, "value", "apple").unwrap();
    tree.set_attribute(input, "secondValue", "apple").unwrap();
    engine.deliver(&mut tree).unwrap();
    tree.dispatch_event(input, &mut Event::new("blur")).unwrap();

    assert_eq!(calls.get(), 0);
    assert_eq!(seen.get(), 0);

    // The registered native event still reaches the predicate
    tree.dispatch_event(input, &mut Event::new("keyup")).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(seen.get(), 0);
}

#[test]
fn test_attributes_only_with_valid_values() {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = flat_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .attributes(["value", "secondValue"])
        .element_types([ElementType::Input])
        .subtree(true)]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, false);

    tree.set_attribute(input, "value", "banana").unwrap();
    engine.deliver(&mut tree).unwrap();
    tree.set_property(input, "secondValue", "banana").unwrap();
    engine.deliver(&mut tree).unwrap();

    assert_eq!(calls.get(), 2);
    assert_eq!(seen.get(), 2);
    assert_eq!(tree.get_property(input, "value").as_deref(), Some("banana"));
    assert_eq!(tree.get_property(input, "secondValue").as_deref(), Some("banana"));
}

#[test]
fn test_attributes_only_with_invalid_values() {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = flat_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .attributes(["value", "secondValue"])
        .element_types([ElementType::Input])
        .subtree(true)]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, true);

    tree.set_attribute(input, "value", "apple1").unwrap();
    engine.deliver(&mut tree).unwrap();
    tree.set_property(input, "value", "apple2").unwrap();
    engine.deliver(&mut tree).unwrap();
    tree.set_attribute(input, "secondValue", "apple3").unwrap();
    engine.deliver(&mut tree).unwrap();
    tree.set_property(input, "secondValue", "apple4").unwrap();
    engine.deliver(&mut tree).unwrap();

    assert_eq!(calls.get(), 4);
    assert_eq!(seen.get(), 0);
}

#[test]
fn test_without_any_events() {
    let mut tree = DomTree::new();
    let (root, input) = flat_fixture(&mut tree);
    let mut engine = AnyEvent::default();

    let report = engine.attach(&mut tree, root).unwrap();
    assert_eq!(report.elements, 2);
    assert_eq!(report.properties + report.listeners, 0);

    tree.set_attribute(input, "value", "banana").unwrap();
    assert_eq!(engine.deliver(&mut tree).unwrap().records, 0);
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn fired_after(write: impl FnOnce(&mut DomTree, NodeId)) -> u32 {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = nested_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .attributes(["value"])
        .element_types([ElementType::Input])
        .subtree(true)]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, false);

    write(&mut tree, input);
    engine.deliver(&mut tree).unwrap();
    seen.get()
}

#[test]
fn test_property_and_attribute_writes_are_equivalent() {
    let by_property = fired_after(|tree, input| tree.set_property(input, "value", "banana").unwrap());
    let by_attribute = fired_after(|tree, input| tree.set_attribute(input, "value", "banana").unwrap());

    assert_eq!(by_property, 1);
    assert_eq!(by_property, by_attribute);
}

/// Cumulative firings after each write on one input; `true` writes the property
fn fired_sequence(writes: &[(bool, &str)]) -> Vec<u32> {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = nested_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .attributes(["value"])
        .element_types([ElementType::Input])
        .subtree(true)]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, false);

    writes
        .iter()
        .map(|&(by_property, value)| {
            if by_property {
                tree.set_property(input, "value", value).unwrap();
            } else {
                tree.set_attribute(input, "value", value).unwrap();
            }
            engine.deliver(&mut tree).unwrap();
            seen.get()
        })
        .collect()
}

#[test]
fn test_attribute_write_after_property_write_reads_attribute() {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = nested_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .attributes(["value"])
        .element_types([ElementType::Input])
        .subtree(true)]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, false);

    tree.set_property(input, "value", "banana").unwrap();
    engine.deliver(&mut tree).unwrap();
    assert_eq!(seen.get(), 1);

    tree.set_attribute(input, "value", "apple").unwrap();
    engine.deliver(&mut tree).unwrap();
    assert_eq!(seen.get(), 1);
    assert_eq!(tree.get_property(input, "value").as_deref(), Some("apple"));
    assert_eq!(tree.get_attribute(input, "value"), Some("apple"));
}

#[test]
fn test_mixed_writes_fire_like_attribute_writes() {
    let values = ["banana", "apple", "banana", "banana", "apple"];
    let mixed: Vec<_> = values.iter().enumerate().map(|(i, &v)| (i % 2 == 0, v)).collect();
    let attributes: Vec<_> = values.iter().map(|&v| (false, v)).collect();

    let by_mixed = fired_sequence(&mixed);
    assert_eq!(by_mixed, vec![1, 1, 2, 2, 2]);
    assert_eq!(by_mixed, fired_sequence(&attributes));
}

#[test]
fn test_resetting_same_value_does_not_trigger() {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = nested_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .attributes(["value"])
        .subtree(true)]);
    engine.attach(&mut tree, root).unwrap();

    tree.set_attribute(input, "value", "banana").unwrap();
    engine.deliver(&mut tree).unwrap();
    assert_eq!(calls.get(), 1);

    tree.set_attribute(input, "value", "banana").unwrap();
    tree.set_property(input, "value", "banana").unwrap();
    let report = engine.deliver(&mut tree).unwrap();

    assert_eq!(report.records, 2);
    assert_eq!(report.duplicates, 2);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_inserted_nodes_become_instrumented() {
    let calls = counter();
    let mut tree = DomTree::new();
    let root = tree.create_element("span");
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .attributes(["value"])
        .events(["keyup"])
        .element_types([ElementType::Input])
        .subtree(true)]);
    engine.attach(&mut tree, root).unwrap();

    let div = tree.create_element("div");
    let input = tree.create_element("input");
    tree.append_child(div, input).unwrap();
    tree.append_child(root, div).unwrap();
    let report = engine.deliver(&mut tree).unwrap();
    assert_eq!(report.instrumented, 2);
    assert_eq!(tree.listener_count(input, "keyup"), 1);

    let seen = watch_banana(&mut tree, input, false);
    tree.set_property(input, "value", "banana").unwrap();
    engine.deliver(&mut tree).unwrap();
    assert_eq!(seen.get(), 1);
}

#[test]
fn test_specs_sharing_a_key_fire_in_declaration_order() {
    let order = Rc::new(std::cell::RefCell::new(Vec::new()));
    let spec = |name: &'static str| {
        let order = order.clone();
        EventSpec::new(name, move |_| {
            order.borrow_mut().push(name);
            Ok(true)
        })
        .attributes(["value"])
        .element_types([ElementType::Input])
        .subtree(true)
    };
    let mut tree = DomTree::new();
    let (root, input) = nested_fixture(&mut tree);
    let mut engine = AnyEvent::new([spec("first"), spec("second"), spec("third")]);
    engine.attach(&mut tree, root).unwrap();

    tree.set_attribute(input, "value", "x").unwrap();
    let report = engine.deliver(&mut tree).unwrap();

    assert_eq!(report.fired, 3);
    assert_eq!(*order.borrow(), ["first", "second", "third"]);
}

#[test]
fn test_banana_example() {
    let calls = counter();
    let mut tree = DomTree::new();
    let (root, input) = nested_fixture(&mut tree);
    let mut engine = AnyEvent::new([EventSpec::new("banana", banana_fn(&calls))
        .attributes(["value"])
        .events(["keyup"])
        .element_types([ElementType::Input])
        .subtree(true)]);
    engine.attach(&mut tree, root).unwrap();
    let seen = watch_banana(&mut tree, input, false);

    tree.set_attribute(input, "value", "banana").unwrap();
    engine.deliver(&mut tree).unwrap();
    assert_eq!(seen.get(), 1);

    tree.set_attribute(input, "value", "apple").unwrap();
    engine.deliver(&mut tree).unwrap();
    assert_eq!(seen.get(), 1);

    // Back to banana, then a native keyup: the event path fires without
    // dispatching a synthesized event, so only the handler would see it
    tree.set_property(input, "value", "banana").unwrap();
    engine.deliver(&mut tree).unwrap();
    assert_eq!(seen.get(), 2);

    let handled = counter();
    let h = handled.clone();
    tree.set_event_handler(input, "onbanana", callback(move |_, _| h.set(h.get() + 1)))
        .unwrap();
    tree.dispatch_event(input, &mut Event::new("keyup")).unwrap();
    assert_eq!(handled.get(), 1);
    assert_eq!(seen.get(), 2);
}
