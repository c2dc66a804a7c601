//! Walks over the parent relation of the scope tree.
//!
//! Every walk keeps a visited set and stops at the first repeated node.

use std::collections::HashSet;

use log::warn;

use corral_core::identifier::Id;

use crate::{error::CorralError, store::GraphStore};

/// Returns the ancestors of `id`, nearest first.
///
/// # Errors
///
/// Returns [`CorralError::MissingNode`] if `id` or any referenced parent does
/// not exist.
pub(crate) fn ancestors(store: &impl GraphStore, id: Id) -> Result<Vec<Id>, CorralError> {
    let mut visited = HashSet::from([id]);
    let mut chain = Vec::new();
    let mut current = store.node(id).ok_or(CorralError::MissingNode(id))?;

    while let Some(parent_id) = current.parent() {
        if !visited.insert(parent_id) {
            warn!(node_id:% = id, parent_id:% = parent_id; "Cycle in scope tree, stopping walk");
            break;
        }
        chain.push(parent_id);
        current = store
            .node(parent_id)
            .ok_or(CorralError::MissingNode(parent_id))?;
    }

    Ok(chain)
}

/// Returns true if any ancestor of `id` is selected.
pub(crate) fn has_selected_ancestor(
    store: &impl GraphStore,
    id: Id,
) -> Result<bool, CorralError> {
    for ancestor in ancestors(store, id)? {
        if store.node(ancestor).is_some_and(|node| node.is_selected()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Returns true if `id` or one of its ancestors is listed in `ids`.
pub(crate) fn belongs_to(store: &impl GraphStore, id: Id, ids: &[Id]) -> Result<bool, CorralError> {
    if ids.contains(&id) {
        return Ok(true);
    }
    Ok(ancestors(store, id)?.iter().any(|ancestor| ids.contains(ancestor)))
}

/// Returns true if `ancestor` appears on the parent chain of `id`.
pub(crate) fn is_descendant_of(
    store: &impl GraphStore,
    id: Id,
    ancestor: Id,
) -> Result<bool, CorralError> {
    Ok(ancestors(store, id)?.contains(&ancestor))
}
