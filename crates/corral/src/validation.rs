//! Structural checks on graph mutations.

use log::debug;

use corral_core::{graph::Node, identifier::Id};

use crate::{error::CorralError, store::GraphStore};

/// Rejects mutations that would break the scope tree.
///
/// While a bulk clear is in progress the "no children" check on removal is
/// suspended, since every node goes away at once.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    bulk: bool,
}

impl Validator {
    pub(crate) fn begin_bulk(&mut self) {
        self.bulk = true;
    }

    pub(crate) fn end_bulk(&mut self) {
        self.bulk = false;
    }

    /// Checks that `node` can be added to `store`.
    pub(crate) fn check_create(&self, store: &impl GraphStore, node: &Node) -> Result<(), CorralError> {
        let id = node.id();
        if store.contains(id) {
            return Err(CorralError::DuplicateNode(id));
        }
        match node.parent() {
            Some(parent) if !store.contains(parent) => {
                debug!(node_id:% = id, parent_id:% = parent; "Rejecting node with unknown parent");
                Err(CorralError::DanglingParent { node: id, parent })
            }
            _ => Ok(()),
        }
    }

    /// Checks that the node `id` can be removed from `store`.
    pub(crate) fn check_remove(&self, store: &impl GraphStore, id: Id) -> Result<(), CorralError> {
        if !store.contains(id) {
            return Err(CorralError::MissingNode(id));
        }
        if self.bulk {
            return Ok(());
        }
        let children = store.children(id).len();
        if children > 0 {
            debug!(node_id:% = id, children = children; "Rejecting removal of non-empty container");
            return Err(CorralError::HasChildren { id, children });
        }
        Ok(())
    }
}
