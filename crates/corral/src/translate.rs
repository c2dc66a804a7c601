//! Guarded translation.
//!
//! A translate issued by the engine holds a lock on the node for the duration
//! of the move. The node-translated handler sees the lock and treats the move
//! as engine-initiated: children are not dragged along and ancestors are not
//! refitted, since the cascade that issued the move already takes care of
//! both. Locks are counted so nested translates of the same node stay locked
//! until the outermost one returns, and they are released by [`Drop`] so an
//! error inside the move never leaves a node locked.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use log::trace;

use corral_core::{event::CanvasEvent, geometry::Point, identifier::Id};

use crate::{engine::ScopeEngine, error::CorralError, store::GraphStore, view::Viewport};

/// Set of nodes currently being moved by the engine.
#[derive(Debug, Clone, Default)]
pub(crate) struct TranslateLocks(Rc<RefCell<HashMap<Id, usize>>>);

impl TranslateLocks {
    pub(crate) fn acquire(&self, id: Id) -> TranslateGuard {
        *self.0.borrow_mut().entry(id).or_default() += 1;
        TranslateGuard {
            locks: self.clone(),
            id,
        }
    }

    pub(crate) fn is_locked(&self, id: Id) -> bool {
        self.0.borrow().contains_key(&id)
    }
}

/// Lock on one node, released on drop.
#[must_use]
pub(crate) struct TranslateGuard {
    locks: TranslateLocks,
    id: Id,
}

impl Drop for TranslateGuard {
    fn drop(&mut self) {
        let mut locks = self.locks.0.borrow_mut();
        if let Some(count) = locks.get_mut(&self.id) {
            *count -= 1;
            if *count == 0 {
                locks.remove(&self.id);
            }
        }
    }
}

impl<S, V> ScopeEngine<S, V>
where
    S: GraphStore,
    V: Viewport,
{
    /// Moves a node to `to` as an engine-initiated move.
    ///
    /// Moving a node to the position it already has does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::MissingView`] if the node has no view position,
    /// or the error of the move primitive. The lock is released either way.
    pub fn translate(&mut self, id: Id, to: Point) -> Result<(), CorralError> {
        let current = self.view.position(id).ok_or(CorralError::MissingView(id))?;
        if current == to {
            return Ok(());
        }
        let _guard = self.locks.acquire(id);
        trace!(node_id:% = id; "Translate lock acquired");
        self.move_node(id, to)
    }

    /// Returns true while an engine-initiated move of the node is in progress.
    pub fn is_translating(&self, id: Id) -> bool {
        self.locks.is_locked(id)
    }

    /// Moves a node through the view and dispatches the resulting event.
    pub(crate) fn move_node(&mut self, id: Id, to: Point) -> Result<(), CorralError> {
        let previous = self.view.position(id).ok_or(CorralError::MissingView(id))?;
        self.view.translate(id, to)?;
        trace!(node_id:% = id, x = to.x(), y = to.y(); "Node moved");
        self.dispatch(CanvasEvent::NodeTranslated {
            id,
            previous,
            position: to,
        })
    }
}
