//! Integration tests for container fitting, move propagation and validation.

use std::{collections::HashMap, time::Instant};

use float_cmp::approx_eq;
use proptest::prelude::*;

use corral::{
    CorralError, EngineBuilder, GraphStore, MemoryStore, MemoryView, Reparent, ScopeEngine,
    Viewport,
    event::ScopeEvent,
    geometry::{Bounds, Insets, Point, Size},
    graph::{Connection, Node},
    identifier::Id,
};

type Engine = ScopeEngine<MemoryStore, MemoryView>;

fn engine(padding: Insets) -> Engine {
    EngineBuilder::new()
        .with_padding(padding)
        .build(MemoryStore::new(), MemoryView::new())
}

fn add(engine: &mut Engine, name: &str, size: Size, at: Point, parent: Option<&str>) {
    let mut node = Node::new(Id::new(name), size);
    if let Some(parent) = parent {
        node = node.with_parent(Id::new(parent));
    }
    engine.add_node_at(node, at).expect("node is added");
}

fn size_of(engine: &Engine, name: &str) -> Size {
    engine.store().node(Id::new(name)).expect("node exists").size()
}

fn position_of(engine: &Engine, name: &str) -> Point {
    engine.view().position(Id::new(name)).expect("node is mounted")
}

#[test]
fn test_container_wraps_children_with_padding() {
    let mut engine = engine(Insets::new(40.0, 20.0, 20.0, 20.0));
    add(&mut engine, "p", Size::default(), Point::default(), None);
    add(&mut engine, "a", Size::new(100.0, 50.0), Point::new(0.0, 0.0), Some("p"));
    add(&mut engine, "b", Size::new(100.0, 50.0), Point::new(150.0, 60.0), Some("p"));

    assert_eq!(size_of(&engine, "p"), Size::new(290.0, 170.0));
    assert_eq!(position_of(&engine, "p"), Point::new(-20.0, -40.0));
}

#[test]
fn test_translate_twice_moves_once() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "a", Size::new(10.0, 10.0), Point::default(), None);
    engine.view_mut().clear_log();

    engine.translate(Id::new("a"), Point::new(7.0, 7.0)).unwrap();
    engine.translate(Id::new("a"), Point::new(7.0, 7.0)).unwrap();

    assert_eq!(engine.view().moves(), &[(Id::new("a"), Point::new(7.0, 7.0))]);
}

#[test]
fn test_deep_chain_refits_each_ancestor_once() {
    let mut engine = engine(Insets::uniform(5.0));
    let depth = 40;
    add(&mut engine, "level0", Size::default(), Point::default(), None);
    for level in 1..depth {
        let parent = format!("level{}", level - 1);
        add(
            &mut engine,
            &format!("level{level}"),
            Size::default(),
            Point::default(),
            Some(&parent),
        );
    }
    let leaf_parent = format!("level{}", depth - 1);
    add(&mut engine, "leaf", Size::new(10.0, 10.0), Point::default(), Some(&leaf_parent));
    engine.view_mut().clear_log();

    engine
        .drag_node(Id::new("leaf"), Point::new(100.0, 100.0), Instant::now())
        .unwrap();

    let mut moves: HashMap<Id, usize> = HashMap::new();
    for (id, _) in engine.view().moves() {
        *moves.entry(*id).or_default() += 1;
    }
    assert_eq!(moves.len(), depth + 1);
    assert!(moves.values().all(|&count| count == 1));

    // Each level adds the padding once more around the leaf.
    let root_offset = 5.0 * depth as f32;
    assert_eq!(
        position_of(&engine, "level0"),
        Point::new(100.0 - root_offset, 100.0 - root_offset)
    );
}

#[test]
fn test_moved_container_carries_its_subtree() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "outer", Size::default(), Point::default(), None);
    add(&mut engine, "inner", Size::default(), Point::default(), Some("outer"));
    add(&mut engine, "leaf", Size::new(20.0, 20.0), Point::new(50.0, 50.0), Some("inner"));
    let before: Vec<Point> = ["inner", "leaf"]
        .iter()
        .map(|name| position_of(&engine, name))
        .collect();

    let delta = Point::new(-30.0, 15.0);
    let to = position_of(&engine, "outer").add_point(delta);
    engine.drag_node(Id::new("outer"), to, Instant::now()).unwrap();

    for (name, position) in ["inner", "leaf"].iter().zip(before) {
        assert_eq!(position_of(&engine, name), position.add_point(delta));
    }
}

#[test]
fn test_selected_ancestor_keeps_container_size() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "group", Size::default(), Point::default(), None);
    add(&mut engine, "a", Size::new(20.0, 20.0), Point::new(0.0, 0.0), Some("group"));
    let size = size_of(&engine, "group");

    engine.set_selected(Id::new("group"), true).unwrap();
    engine
        .drag_node(Id::new("a"), Point::new(300.0, 0.0), Instant::now())
        .unwrap();

    assert_eq!(size_of(&engine, "group"), size);
    assert!(engine.is_move_dependent(Id::new("a")).unwrap());
    assert!(engine.has_selected_ancestor(Id::new("a")).unwrap());
}

#[test]
fn test_resize_notifies_view_and_host() {
    let mut engine = engine(Insets::uniform(0.0));
    add(&mut engine, "p", Size::new(1.0, 1.0), Point::default(), None);
    engine.drain_events();

    add(&mut engine, "a", Size::new(30.0, 40.0), Point::default(), Some("p"));

    assert_eq!(engine.view().resizes(), &[(Id::new("p"), Size::new(30.0, 40.0))]);
    assert_eq!(
        engine.drain_events(),
        vec![ScopeEvent::Resized {
            id: Id::new("p"),
            previous: Size::new(1.0, 1.0),
            size: Size::new(30.0, 40.0),
        }]
    );
}

#[test]
fn test_failed_move_releases_lock() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "p", Size::default(), Point::default(), None);
    add(&mut engine, "a", Size::new(20.0, 20.0), Point::new(50.0, 50.0), Some("p"));
    engine.view_mut().fail_moves_of(Id::new("p"));

    let result = engine.drag_node(Id::new("a"), Point::new(90.0, 90.0), Instant::now());

    assert!(matches!(result, Err(CorralError::View(_))));
    assert!(!engine.is_translating(Id::new("p")));
    assert!(!result.unwrap_err().is_invariant_violation());
}

#[test]
fn test_create_requires_existing_parent() {
    let mut engine = engine(Insets::uniform(10.0));

    let orphan = Node::new(Id::new("orphan"), Size::default()).with_parent(Id::new("nowhere"));
    let result = engine.add_node(orphan);
    assert!(matches!(result, Err(CorralError::DanglingParent { .. })));
    assert!(!engine.store().contains(Id::new("orphan")));

    engine.add_node(Node::new(Id::new("home"), Size::default())).unwrap();
    let child = Node::new(Id::new("child"), Size::default()).with_parent(Id::new("home"));
    assert!(engine.add_node(child).is_ok());
}

#[test]
fn test_remove_requires_empty_container() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "p", Size::default(), Point::default(), None);
    add(&mut engine, "a", Size::new(20.0, 20.0), Point::new(10.0, 10.0), Some("p"));

    let result = engine.remove_node(Id::new("p"));
    assert!(matches!(
        result,
        Err(CorralError::HasChildren { children: 1, .. })
    ));
    assert!(result.unwrap_err().is_invariant_violation());

    let outcome = engine
        .reassign_parent(&[Id::new("a")], Point::new(-1000.0, -1000.0))
        .unwrap();
    assert_eq!(outcome, Reparent::Detached { nodes: vec![Id::new("a")] });

    engine.remove_node(Id::new("p")).unwrap();
    assert!(!engine.store().contains(Id::new("p")));
    assert_eq!(engine.view().position(Id::new("p")), None);
}

#[test]
fn test_removing_last_child_collapses_container() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "p", Size::default(), Point::default(), None);
    add(&mut engine, "a", Size::new(20.0, 20.0), Point::new(10.0, 10.0), Some("p"));

    engine.remove_node(Id::new("a")).unwrap();

    assert_eq!(size_of(&engine, "p"), Size::new(220.0, 120.0));
}

#[test]
fn test_childless_container_takes_configured_default_size() {
    let mut engine = EngineBuilder::new()
        .with_padding(Insets::uniform(10.0))
        .with_default_size(Size::new(80.0, 40.0))
        .build(MemoryStore::new(), MemoryView::new());
    add(&mut engine, "p", Size::default(), Point::default(), None);
    add(&mut engine, "a", Size::new(20.0, 20.0), Point::new(10.0, 10.0), Some("p"));

    engine.remove_node(Id::new("a")).unwrap();

    assert_eq!(size_of(&engine, "p"), Size::new(80.0, 40.0));
}

#[test]
fn test_padding_fn_is_applied_per_container() {
    let mut engine = EngineBuilder::new()
        .with_padding_fn(|node: &Node| {
            if node.id() == "wide" {
                Insets::uniform(30.0)
            } else {
                Insets::uniform(0.0)
            }
        })
        .build(MemoryStore::new(), MemoryView::new());
    add(&mut engine, "wide", Size::default(), Point::default(), None);
    add(&mut engine, "a", Size::new(10.0, 10.0), Point::default(), Some("wide"));
    add(&mut engine, "tight", Size::default(), Point::new(200.0, 0.0), None);
    add(&mut engine, "b", Size::new(10.0, 10.0), Point::new(200.0, 0.0), Some("tight"));

    assert_eq!(size_of(&engine, "wide"), Size::new(70.0, 70.0));
    assert_eq!(position_of(&engine, "wide"), Point::new(-30.0, -30.0));
    assert_eq!(size_of(&engine, "tight"), Size::new(10.0, 10.0));
    assert_eq!(position_of(&engine, "tight"), Point::new(200.0, 0.0));
}

#[test]
fn test_into_parts_returns_collaborators() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "a", Size::new(10.0, 10.0), Point::new(3.0, 4.0), None);

    let (store, view) = engine.into_parts();

    assert!(store.contains(Id::new("a")));
    assert_eq!(view.position(Id::new("a")), Some(Point::new(3.0, 4.0)));
}

#[test]
fn test_remove_node_drops_its_connections() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "a", Size::new(10.0, 10.0), Point::default(), None);
    add(&mut engine, "b", Size::new(10.0, 10.0), Point::new(50.0, 0.0), None);
    engine
        .add_connection(Connection::new(Id::new("ab"), Id::new("a"), Id::new("b")))
        .unwrap();

    engine.remove_node(Id::new("a")).unwrap();

    assert!(engine.store().connection(Id::new("ab")).is_none());
    assert!(matches!(
        engine.remove_connection(Id::new("ab")),
        Err(CorralError::MissingConnection(_))
    ));
}

#[test]
fn test_connection_requires_endpoints() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "a", Size::new(10.0, 10.0), Point::default(), None);

    let result = engine.add_connection(Connection::new(Id::new("ax"), Id::new("a"), Id::new("x")));
    assert!(matches!(result, Err(CorralError::MissingNode(id)) if id == "x"));
}

#[test]
fn test_clear_removes_nested_nodes() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "p", Size::default(), Point::default(), None);
    add(&mut engine, "a", Size::new(20.0, 20.0), Point::new(10.0, 10.0), Some("p"));
    add(&mut engine, "b", Size::new(20.0, 20.0), Point::new(50.0, 10.0), None);
    engine
        .add_connection(Connection::new(Id::new("ab"), Id::new("a"), Id::new("b")))
        .unwrap();
    // "p" is stored before its child, so it is removed while "a" still exists.
    let order: Vec<Id> = engine.store().nodes().map(Node::id).collect();
    assert_eq!(order[..2], [Id::new("p"), Id::new("a")]);

    engine.clear().unwrap();

    assert_eq!(engine.store().nodes().count(), 0);
    assert_eq!(engine.store().connections().count(), 0);
    assert_eq!(engine.view().stack().count(), 0);

    // The children check is back in force afterwards.
    add(&mut engine, "p", Size::default(), Point::default(), None);
    add(&mut engine, "a", Size::new(20.0, 20.0), Point::new(10.0, 10.0), Some("p"));
    assert!(engine.remove_node(Id::new("p")).is_err());
}

#[test]
fn test_duplicate_node_is_rejected() {
    let mut engine = engine(Insets::uniform(10.0));
    add(&mut engine, "a", Size::new(10.0, 10.0), Point::default(), None);

    let result = engine.add_node(Node::new(Id::new("a"), Size::default()));
    assert!(matches!(result, Err(CorralError::DuplicateNode(_))));
}

fn check_fit_is_order_independent(children: Vec<(f32, f32, f32, f32)>) -> Result<(), TestCaseError> {
    let padding = Insets::new(40.0, 20.0, 20.0, 20.0);
    let build = |order: &[(usize, (f32, f32, f32, f32))]| {
        let mut engine = engine(padding);
        add(&mut engine, "p", Size::default(), Point::new(-9999.0, -9999.0), None);
        for (index, (x, y, w, h)) in order {
            add(
                &mut engine,
                &format!("c{index}"),
                Size::new(*w, *h),
                Point::new(*x, *y),
                Some("p"),
            );
        }
        engine
    };

    let forward: Vec<_> = children.iter().copied().enumerate().collect();
    let backward: Vec<_> = forward.iter().rev().copied().collect();
    let first = build(&forward[..]);
    let second = build(&backward[..]);

    let expected = Bounds::union(
        children
            .iter()
            .map(|&(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h))),
    )
    .expect("at least one child")
    .add_padding(padding);

    for engine in [&first, &second] {
        let size = size_of(engine, "p");
        let position = position_of(engine, "p");
        prop_assert!(approx_eq!(f32, size.width(), expected.width(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, size.height(), expected.height(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, position.x(), expected.min_x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, position.y(), expected.min_y(), epsilon = 0.01));
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_fit_is_order_independent(
        children in prop::collection::vec(
            (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..200.0, 1.0f32..200.0),
            1..6,
        )
    ) {
        check_fit_is_order_independent(children)?;
    }
}
