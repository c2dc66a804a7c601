//! Event vocabulary of the canvas pipe.
//!
//! [`CanvasEvent`] is what the graph store and the view layer report to the
//! scope engine. [`ScopeEvent`] is what the engine reports back to hosts.
//! Both are closed enums so handlers match exhaustively on the variant.

use crate::{
    geometry::{Point, Size},
    identifier::Id,
};

/// Lifecycle and interaction events observed by the scope engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// A node was accepted by the graph store.
    NodeCreated { id: Id },
    /// A node was removed; `parent` is the parent it had before removal.
    NodeRemoved { id: Id, parent: Option<Id> },
    /// The view layer moved a node.
    NodeTranslated {
        id: Id,
        previous: Point,
        position: Point,
    },
    /// The pointer went down on a node.
    NodePicked { id: Id },
    /// A drag of the node ended with the pointer at `pointer`.
    NodeDragged { id: Id, pointer: Point },
    /// A connection was accepted by the graph store.
    ConnectionCreated { id: Id },
    /// A connection was removed from the graph store.
    ConnectionRemoved { id: Id },
    /// The whole graph was cleared in bulk.
    Cleared,
}

impl CanvasEvent {
    /// Returns the short name used for logging, e.g. `nodetranslated`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NodeCreated { .. } => "nodecreated",
            Self::NodeRemoved { .. } => "noderemoved",
            Self::NodeTranslated { .. } => "nodetranslated",
            Self::NodePicked { .. } => "nodepicked",
            Self::NodeDragged { .. } => "nodedragged",
            Self::ConnectionCreated { .. } => "connectioncreated",
            Self::ConnectionRemoved { .. } => "connectionremoved",
            Self::Cleared => "cleared",
        }
    }
}

/// Events emitted by the scope engine for hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeEvent {
    /// A long press matured into a candidate set for reparenting.
    Picked { ids: Vec<Id> },
    /// The candidate set was consumed by a drop.
    Released { ids: Vec<Id> },
    /// A container was refitted to its children.
    Resized { id: Id, previous: Size, size: Size },
}

impl ScopeEvent {
    /// Returns the short name used for logging, e.g. `scopepicked`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Picked { .. } => "scopepicked",
            Self::Released { .. } => "scopereleased",
            Self::Resized { .. } => "noderesized",
        }
    }
}
