//! Error types for Corral operations.
//!
//! Every [`CorralError`] is an invariant violation: the host mutated shared
//! state in a way the engine cannot reconcile, or a collaborator failed.
//! Expected no-op situations (an empty candidate set, a drop with nothing
//! under the pointer, a move to the current position) are never errors.

use thiserror::Error;

use corral_core::{graph::Element, identifier::Id};

/// Failure reported by a [`Viewport`](crate::Viewport) move primitive.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("no rendered element for {0:?}")]
    MissingElement(Element),

    #[error("move rejected by view: {0}")]
    Rejected(String),
}

/// The main error type for Corral operations.
#[derive(Debug, Error)]
pub enum CorralError {
    #[error("node {0} has no view position")]
    MissingView(Id),

    #[error("node {0} does not exist")]
    MissingNode(Id),

    #[error("connection {0} does not exist")]
    MissingConnection(Id),

    #[error("node {node} references parent {parent} which does not exist")]
    DanglingParent { node: Id, parent: Id },

    #[error("cannot remove node {id}: it still contains {children} child node(s)")]
    HasChildren { id: Id, children: usize },

    #[error("node {0} already exists")]
    DuplicateNode(Id),

    #[error("view error: {0}")]
    View(#[from] ViewError),
}

impl CorralError {
    /// Returns true for errors caused by shared state violating a hierarchy
    /// or view invariant, as opposed to a collaborator failure.
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, Self::View(_))
    }
}
