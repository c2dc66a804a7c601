//! Node and connection model shared by the graph store and the scope engine.
//!
//! The graph store owns these values. The scope engine only ever reads
//! connections, and writes three node fields: size, parent and (through
//! hosts) the selection flag. Positions are not part of the model; they
//! belong to the view layer.

use crate::{geometry::Size, identifier::Id};

/// A node on the canvas.
///
/// A node whose `parent` is set is contained by that parent, which is then
/// called a *scope* or *container*. The parent relation forms a forest.
///
/// # Examples
///
/// ```
/// # use corral_core::{geometry::Size, graph::Node, identifier::Id};
/// let child = Node::new(Id::new("child"), Size::new(100.0, 50.0))
///     .with_parent(Id::new("group"))
///     .with_selected(true);
///
/// assert_eq!(child.parent(), Some(Id::new("group")));
/// assert!(child.is_selected());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    size: Size,
    parent: Option<Id>,
    selected: bool,
}

impl Node {
    /// Creates a top-level, unselected node.
    pub fn new(id: Id, size: Size) -> Self {
        Self {
            id,
            size,
            parent: None,
            selected: false,
        }
    }

    /// Returns the node with its parent set.
    pub fn with_parent(mut self, parent: Id) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Returns the node with its selection flag set.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width()
    }

    pub fn height(&self) -> f32 {
        self.size.height()
    }

    /// Returns the id of the containing node, if any.
    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn set_parent(&mut self, parent: Option<Id>) {
        self.parent = parent;
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    id: Id,
    source: Id,
    target: Id,
}

impl Connection {
    pub fn new(id: Id, source: Id, target: Id) -> Self {
        Self { id, source, target }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    /// Returns true if the given node is either endpoint of this connection.
    pub fn touches(&self, node: Id) -> bool {
        self.source == node || self.target == node
    }
}

/// A rendered element in the view layer's stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Node(Id),
    Connection(Id),
}
