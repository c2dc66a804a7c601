//! Reaction to node moves.
//!
//! When a node is moved by someone other than the engine, the nodes it
//! contains move by the same delta and its container is refitted. Selected
//! nodes are skipped on the way down because the host moves every selected
//! node itself; the container refit is skipped while the node is being carried
//! along by a selected ancestor or by a pick.

use std::collections::HashSet;

use log::trace;

use corral_core::{geometry::Point, identifier::Id};

use crate::{
    engine::ScopeEngine, error::CorralError, hierarchy, store::GraphStore, view::Viewport,
};

impl<S, V> ScopeEngine<S, V>
where
    S: GraphStore,
    V: Viewport,
{
    pub(crate) fn on_node_translated(
        &mut self,
        id: Id,
        previous: Point,
        position: Point,
    ) -> Result<(), CorralError> {
        if self.is_translating(id) {
            trace!(node_id:% = id; "Engine-initiated move, not propagating");
            return Ok(());
        }

        let parent = self
            .store
            .node(id)
            .ok_or(CorralError::MissingNode(id))?
            .parent();

        self.carry_descendants(id, position.sub_point(previous))?;

        let Some(parent) = parent else {
            return Ok(());
        };
        let parent_selected = self
            .store
            .node(parent)
            .ok_or(CorralError::MissingNode(parent))?
            .is_selected();

        if parent_selected
            || hierarchy::has_selected_ancestor(&self.store, id)?
            || hierarchy::belongs_to(&self.store, id, self.picker.candidates())?
        {
            trace!(node_id:% = id; "Node moves with its scope, container left as is");
            return Ok(());
        }

        self.resize_parent(parent)
    }

    /// Moves every non-selected descendant of `id` by `delta`.
    ///
    /// Targets are computed from positions read before any move, so the
    /// cascades triggered by the moves cannot skew them.
    fn carry_descendants(&mut self, id: Id, delta: Point) -> Result<(), CorralError> {
        if delta.is_zero() {
            return Ok(());
        }

        let mut visited = HashSet::from([id]);
        let mut pending = self.store.children(id);
        let mut targets = Vec::new();

        while let Some(child) = pending.pop() {
            if !visited.insert(child) {
                continue;
            }
            let node = self.store.node(child).ok_or(CorralError::MissingNode(child))?;
            if node.is_selected() {
                continue;
            }
            let position = self
                .view
                .position(child)
                .ok_or(CorralError::MissingView(child))?;
            targets.push((child, position.add_point(delta)));
            pending.extend(self.store.children(child));
        }

        for (child, to) in targets {
            self.translate(child, to)?;
        }

        Ok(())
    }
}
