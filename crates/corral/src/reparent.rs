//! Reparenting of picked nodes on drop.
//!
//! The drop target is the topmost node under the pointer that is not itself
//! being dropped. Dropped nodes are detached from their containers and, when
//! a target exists, attached to it. The target and every former container
//! are refitted afterwards.

use log::{debug, info, warn};

use corral_core::{
    geometry::{Bounds, Point},
    graph::Element,
    identifier::Id,
};

use crate::{
    engine::{ScopeEngine, display_ids},
    error::CorralError,
    hierarchy,
    store::GraphStore,
    view::Viewport,
};

/// Outcome of [`ScopeEngine::reassign_parent`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reparent {
    /// No listed node exists; nothing changed.
    Skipped,
    /// The nodes were detached and became roots.
    Detached { nodes: Vec<Id> },
    /// The nodes were attached to `parent`.
    Attached { parent: Id, nodes: Vec<Id> },
    /// The drop target lies inside a dropped node's own subtree; nothing changed.
    Rejected { target: Id },
}

impl<S, V> ScopeEngine<S, V>
where
    S: GraphStore,
    V: Viewport,
{
    /// Reassigns the parent of every node in `ids` to the topmost other node
    /// under `pointer`, or detaches them when there is none.
    ///
    /// Ids that are not in the store are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::MissingView`] if a node has no view position and
    /// [`CorralError::MissingNode`] if a former container is gone. Nothing is
    /// modified when an error is returned before the parents change.
    pub fn reassign_parent(&mut self, ids: &[Id], pointer: Point) -> Result<Reparent, CorralError> {
        let mut nodes: Vec<Id> = Vec::with_capacity(ids.len());
        for &id in ids {
            if self.store.contains(id) && !nodes.contains(&id) {
                nodes.push(id);
            }
        }
        if nodes.is_empty() {
            debug!("No nodes to reparent");
            return Ok(Reparent::Skipped);
        }

        let target = self.drop_target(&nodes, pointer)?;
        debug!(target_id:? = target.map(|id| id.to_string()); "Drop target resolved");

        if let Some(target) = target {
            for &id in &nodes {
                if hierarchy::is_descendant_of(&self.store, target, id)? {
                    warn!(node_id:% = id, target_id:% = target; "Drop target is inside the dropped node");
                    return Ok(Reparent::Rejected { target });
                }
            }
        }

        let mut former = Vec::new();
        for &id in &nodes {
            let parent = self.store.node(id).and_then(|node| node.parent());
            if let Some(parent) = parent {
                if !self.store.contains(parent) {
                    return Err(CorralError::MissingNode(parent));
                }
                if Some(parent) != target && !former.contains(&parent) {
                    former.push(parent);
                }
            }
        }

        for &id in &nodes {
            if let Some(node) = self.store.node_mut(id) {
                node.set_parent(target);
            }
        }

        let outcome = match target {
            Some(parent) => {
                info!(parent_id:% = parent, nodes:? = display_ids(&nodes); "Nodes attached");
                self.resize_parent(parent)?;
                Reparent::Attached { parent, nodes }
            }
            None => {
                info!(nodes:? = display_ids(&nodes); "Nodes detached");
                Reparent::Detached { nodes }
            }
        };

        for parent in former {
            self.resize_parent(parent)?;
        }

        Ok(outcome)
    }

    /// Returns the topmost node under `pointer` that is not being dropped.
    fn drop_target(&self, dropped: &[Id], pointer: Point) -> Result<Option<Id>, CorralError> {
        let mut best: Option<(Option<usize>, Id)> = None;

        for node in self.store.nodes() {
            let id = node.id();
            if dropped.contains(&id) {
                continue;
            }
            let position = self.view.position(id).ok_or(CorralError::MissingView(id))?;
            if !Bounds::new_from_top_left(position, node.size()).contains_point(pointer) {
                continue;
            }
            let index = self.view.stack_index(Element::Node(id));
            if best.is_none_or(|(top, _)| index > top) {
                best = Some((index, id));
            }
        }

        Ok(best.map(|(_, id)| id))
    }
}

#[cfg(test)]
mod tests {
    use corral_core::{geometry::Size, graph::Node};

    use crate::{EngineBuilder, MemoryStore, MemoryView, geometry::Insets};

    use super::*;

    fn engine() -> ScopeEngine<MemoryStore, MemoryView> {
        let mut engine = EngineBuilder::new()
            .with_padding(Insets::uniform(0.0))
            .build(MemoryStore::new(), MemoryView::new());
        engine
            .add_node_at(Node::new(Id::new("big"), Size::new(400.0, 400.0)), Point::default())
            .unwrap();
        engine
            .add_node_at(Node::new(Id::new("small"), Size::new(100.0, 100.0)), Point::new(50.0, 50.0))
            .unwrap();
        engine
            .add_node_at(Node::new(Id::new("item"), Size::new(20.0, 20.0)), Point::new(600.0, 600.0))
            .unwrap();
        engine
    }

    fn parent_of(engine: &ScopeEngine<MemoryStore, MemoryView>, name: &str) -> Option<Id> {
        engine.store().node(Id::new(name)).unwrap().parent()
    }

    #[test]
    fn test_topmost_node_wins() {
        let mut engine = engine();

        let outcome = engine
            .reassign_parent(&[Id::new("item")], Point::new(60.0, 60.0))
            .unwrap();

        assert_eq!(
            outcome,
            Reparent::Attached {
                parent: Id::new("small"),
                nodes: vec![Id::new("item")]
            }
        );
        assert_eq!(parent_of(&engine, "item"), Some(Id::new("small")));
    }

    #[test]
    fn test_drop_on_empty_canvas_detaches() {
        let mut engine = engine();
        engine
            .reassign_parent(&[Id::new("item")], Point::new(60.0, 60.0))
            .unwrap();

        let outcome = engine
            .reassign_parent(&[Id::new("item")], Point::new(-100.0, -100.0))
            .unwrap();

        assert_eq!(outcome, Reparent::Detached { nodes: vec![Id::new("item")] });
        assert_eq!(parent_of(&engine, "item"), None);
        assert_eq!(
            engine.store().node(Id::new("small")).unwrap().size(),
            Size::new(220.0, 120.0)
        );
    }

    #[test]
    fn test_pointer_on_edge_is_outside() {
        let mut engine = engine();

        let outcome = engine
            .reassign_parent(&[Id::new("item")], Point::new(0.0, 10.0))
            .unwrap();

        assert_eq!(outcome, Reparent::Detached { nodes: vec![Id::new("item")] });
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let mut engine = engine();

        let outcome = engine
            .reassign_parent(&[Id::new("ghost")], Point::new(60.0, 60.0))
            .unwrap();

        assert_eq!(outcome, Reparent::Skipped);
    }

    #[test]
    fn test_drop_into_own_descendant_is_rejected() {
        let mut engine = engine();
        engine
            .reassign_parent(&[Id::new("small")], Point::new(10.0, 10.0))
            .unwrap();
        assert_eq!(parent_of(&engine, "small"), Some(Id::new("big")));

        let small = engine.view().position(Id::new("small")).unwrap();
        let pointer = small.add_point(Point::new(1.0, 1.0));
        let outcome = engine.reassign_parent(&[Id::new("big")], pointer).unwrap();

        assert_eq!(outcome, Reparent::Rejected { target: Id::new("small") });
        assert_eq!(parent_of(&engine, "big"), None);
    }
}
