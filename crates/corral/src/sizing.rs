//! Container sizing.
//!
//! A container is sized to the bounding box of its children grown by its
//! padding, and placed so that its top-left corner sits at the padded box's
//! top-left corner. Refitting one container changes its geometry, so the
//! refit cascades up the parent chain until the root is reached.

use std::collections::HashSet;

use log::{debug, warn};

use corral_core::{
    event::ScopeEvent,
    geometry::{Bounds, Size},
    graph::Node,
    identifier::Id,
};

use crate::{engine::ScopeEngine, error::CorralError, store::GraphStore, view::Viewport};

impl<S, V> ScopeEngine<S, V>
where
    S: GraphStore,
    V: Viewport,
{
    /// Returns the smallest box containing every node in `ids`.
    ///
    /// Each node contributes its view position and its size, or the size
    /// given by the size override when one is installed. Returns `None` for
    /// an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::MissingNode`] or [`CorralError::MissingView`] if
    /// a listed node is unknown to the store or the view.
    pub fn bounding_box(&self, ids: &[Id]) -> Result<Option<Bounds>, CorralError> {
        let boxes = ids
            .iter()
            .map(|&id| {
                let node = self.store.node(id).ok_or(CorralError::MissingNode(id))?;
                let position = self.view.position(id).ok_or(CorralError::MissingView(id))?;
                Ok(Bounds::new_from_top_left(position, self.effective_size(node)))
            })
            .collect::<Result<Vec<_>, CorralError>>()?;

        Ok(Bounds::union(boxes))
    }

    /// Refits a container to its children, then every ancestor in turn.
    ///
    /// A container without children collapses to the default size and keeps
    /// its position. Each container on the chain is refitted exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError`] if a node on the chain or one of its children
    /// is missing from the store or the view, or if a move fails.
    pub fn resize_parent(&mut self, id: Id) -> Result<(), CorralError> {
        let mut visited = HashSet::new();
        let mut current = Some(id);

        while let Some(container) = current {
            if !visited.insert(container) {
                warn!(node_id:% = container; "Cycle in scope tree, stopping refit");
                break;
            }
            self.fit_to_children(container)?;
            current = self
                .store
                .node(container)
                .ok_or(CorralError::MissingNode(container))?
                .parent();
        }

        Ok(())
    }

    fn fit_to_children(&mut self, id: Id) -> Result<(), CorralError> {
        let container = self.store.node(id).ok_or(CorralError::MissingNode(id))?;
        let padding = self.padding.for_node(container);

        let children: Vec<Id> = self
            .store
            .children(id)
            .into_iter()
            .filter(|&child| !self.is_excluded(child))
            .collect();

        let Some(bounds) = self.bounding_box(&children)? else {
            debug!(node_id:% = id; "Container has no children, using default size");
            return self.apply_size(id, self.default_size);
        };

        let outer = bounds.add_padding(padding);
        debug!(
            node_id:% = id,
            children = children.len(),
            width = outer.width(),
            height = outer.height();
            "Fitting container to children"
        );
        self.apply_size(id, outer.to_size())?;
        self.translate(id, outer.min_point())
    }

    fn apply_size(&mut self, id: Id, size: Size) -> Result<(), CorralError> {
        let node = self.store.node_mut(id).ok_or(CorralError::MissingNode(id))?;
        let previous = node.size();
        if previous == size {
            return Ok(());
        }
        node.set_size(size);
        self.view.resized(id, previous, size);
        self.events.push(ScopeEvent::Resized { id, previous, size });
        Ok(())
    }

    fn effective_size(&self, node: &Node) -> Size {
        self.size_override
            .as_ref()
            .and_then(|size_override| size_override(node))
            .unwrap_or_else(|| node.size())
    }

    fn is_excluded(&self, id: Id) -> bool {
        match (&self.exclude, self.store.node(id)) {
            (Some(exclude), Some(node)) => exclude(node),
            _ => false,
        }
    }
}
