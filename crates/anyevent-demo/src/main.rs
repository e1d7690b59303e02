//! anyevent demo - Main Entry Point
//!
//! Loads event declarations from a JSON file (or uses a built-in one), binds
//! each to a "value contains the event name" predicate and drives them over
//! `<span>text<div><input/></div></span>`.

use std::rc::Rc;

use anyevent::{handler_names, AnyEvent, EventDecl, EventSpec, TriggerArgs};
use anyevent_dom::{callback, DomTree, Event};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

const DEFAULT_DECLS: &str = r#"[
    {
        "name": "banana",
        "triggerByAttributes": ["value"],
        "triggerByEvents": ["keyup"],
        "elementTypes": ["input", "textarea"],
        "subtree": true
    }
]"#;

fn load_decls(path: Option<String>) -> anyhow::Result<Vec<EventDecl>> {
    let source = match path {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?,
        None => DEFAULT_DECLS.to_string(),
    };
    serde_json::from_str(&source).context("parsing event declarations")
}

fn contains_name(decl: &EventDecl) -> EventSpec {
    let needle = decl.name.to_lowercase();
    let predicate = move |args: &TriggerArgs<'_>| -> anyhow::Result<bool> {
        let value = args
            .property_value("value")
            .with_context(|| format!("{} has no value", args.target))?;
        Ok(value.to_lowercase().contains(&needle))
    };
    EventSpec::from_decl(decl.clone(), Rc::new(predicate))
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let decls = load_decls(std::env::args().nth(1))?;
    tracing::info!("Loaded {} event declarations", decls.len());

    let mut tree = DomTree::new();
    let root = tree.create_element("span");
    let text = tree.create_text("Not type 1 node");
    let div = tree.create_element("div");
    let input = tree.create_element("input");
    tree.append_child(tree.document(), root)?;
    tree.append_child(root, text)?;
    tree.append_child(root, div)?;
    tree.append_child(div, input)?;

    for decl in &decls {
        let name = decl.name.clone();
        tree.add_event_listener(
            input,
            &decl.name,
            callback(move |_, event| tracing::info!("'{}' dispatched on {:?}", name, event.target)),
        )?;
        let [handler, _] = handler_names(&decl.name);
        let slot = handler.clone();
        tree.set_event_handler(
            input,
            &handler,
            callback(move |_, event| tracing::info!("{} called with '{}'", slot, event.event_type)),
        )?;
    }

    let mut engine = AnyEvent::new(decls.iter().map(contains_name));
    let report = engine.attach(&mut tree, root)?;
    tracing::info!(
        "Instrumented {} elements ({} properties, {} listeners)",
        report.elements,
        report.properties,
        report.listeners
    );

    for value in ["apple", "banana", "banana", "cherry"] {
        tree.set_property(input, "value", value)?;
        let delivered = engine.deliver(&mut tree)?;
        tracing::info!(
            "value={:?}: {} records, {} duplicates, {} fired",
            value,
            delivered.records,
            delivered.duplicates,
            delivered.fired
        );
    }

    tree.set_property(input, "value", "banana split")?;
    engine.deliver(&mut tree)?;
    tree.dispatch_event(input, &mut Event::new("keyup"))?;

    Ok(())
}
