//! Example: Moving a node between two containers
//!
//! This example builds two containers on a headless canvas, then long-presses
//! a node inside the first one and drops it onto the second one, printing how
//! the containers refit along the way.

use std::time::{Duration, Instant};

use corral::{
    EngineBuilder, GraphStore, MemoryStore, MemoryView, ScopeEngine, Viewport,
    geometry::{Insets, Point, Size},
    graph::Node,
    identifier::Id,
};

fn describe(engine: &ScopeEngine<MemoryStore, MemoryView>, id: Id) {
    let node = engine.store().node(id).expect("node exists");
    let position = engine.view().position(id).unwrap_or_default();
    let parent = node
        .parent()
        .map_or_else(|| "-".to_string(), |parent| parent.to_string());
    println!(
        "  {id:<8} at ({:>7.1}, {:>7.1})  size {:>6.1} x {:>6.1}  parent {parent}",
        position.x(),
        position.y(),
        node.width(),
        node.height(),
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = EngineBuilder::new()
        .with_padding(Insets::new(40.0, 20.0, 20.0, 20.0))
        .with_pick_delay(Duration::from_millis(250))
        .build(MemoryStore::new(), MemoryView::new());

    let left = Id::new("left");
    let right = Id::new("right");
    let task = Id::new("task");
    let note = Id::new("note");

    engine.add_node_at(Node::new(left, Size::default()), Point::new(0.0, 0.0))?;
    engine.add_node_at(Node::new(right, Size::new(220.0, 120.0)), Point::new(600.0, 0.0))?;
    engine.add_node_at(
        Node::new(task, Size::new(100.0, 50.0)).with_parent(left),
        Point::new(20.0, 60.0),
    )?;
    engine.add_node_at(
        Node::new(note, Size::new(100.0, 50.0)).with_parent(left),
        Point::new(170.0, 120.0),
    )?;

    println!("Initial layout:");
    for id in [left, right, task, note] {
        describe(&engine, id);
    }

    // Hold the pointer on "note" long enough to pick it up.
    let start = Instant::now();
    engine.pick_node(note, start)?;
    engine.tick(start + Duration::from_millis(300));
    println!("\nPicked: {:?}", engine.picked());

    // Drag it over "right" and let go.
    engine.drag_node(note, Point::new(640.0, 60.0), start + Duration::from_millis(400))?;
    engine.drop_node(note, Point::new(660.0, 80.0), start + Duration::from_millis(500))?;

    println!("\nAfter dropping note onto right:");
    for id in [left, right, task, note] {
        describe(&engine, id);
    }

    println!("\nEvents:");
    for event in engine.drain_events() {
        println!("  {} {event:?}", event.name());
    }

    Ok(())
}
