//! Graph store collaborator.
//!
//! The scope engine does not own nodes; it reads and mutates them through
//! [`GraphStore`]. [`MemoryStore`] is an insertion-ordered in-memory
//! implementation for hosts that do not bring their own store, and for tests.

use indexmap::IndexMap;

use corral_core::{
    graph::{Connection, Node},
    identifier::Id,
};

/// Node and connection storage read and mutated by the scope engine.
pub trait GraphStore {
    /// Returns the node with the given id.
    fn node(&self, id: Id) -> Option<&Node>;

    /// Returns the node with the given id for mutation.
    fn node_mut(&mut self, id: Id) -> Option<&mut Node>;

    /// Returns all nodes.
    fn nodes(&self) -> impl Iterator<Item = &Node>;

    /// Returns the connection with the given id.
    fn connection(&self, id: Id) -> Option<&Connection>;

    /// Returns all connections.
    fn connections(&self) -> impl Iterator<Item = &Connection>;

    /// Stores a node, replacing any node with the same id.
    fn insert_node(&mut self, node: Node);

    /// Removes a node, returning it if it existed.
    fn remove_node(&mut self, id: Id) -> Option<Node>;

    /// Stores a connection, replacing any connection with the same id.
    fn insert_connection(&mut self, connection: Connection);

    /// Removes a connection, returning it if it existed.
    fn remove_connection(&mut self, id: Id) -> Option<Connection>;

    /// Removes every node and connection.
    fn clear(&mut self);

    /// Returns true if a node with the given id exists.
    fn contains(&self, id: Id) -> bool {
        self.node(id).is_some()
    }

    /// Returns the ids of the direct children of `parent`.
    fn children(&self, parent: Id) -> Vec<Id> {
        self.nodes()
            .filter(|node| node.parent() == Some(parent))
            .map(Node::id)
            .collect()
    }

    /// Returns the ids of connections that have `node` as an endpoint.
    fn connections_of(&self, node: Id) -> Vec<Id> {
        self.connections()
            .filter(|connection| connection.touches(node))
            .map(Connection::id)
            .collect()
    }

    /// Returns the ids of all selected nodes.
    fn selected(&self) -> Vec<Id> {
        self.nodes()
            .filter(|node| node.is_selected())
            .map(Node::id)
            .collect()
    }
}

/// In-memory [`GraphStore`] preserving insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: IndexMap<Id, Node>,
    connections: IndexMap<Id, Connection>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }
}

impl GraphStore for MemoryStore {
    fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: Id) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    fn connection(&self, id: Id) -> Option<&Connection> {
        self.connections.get(&id)
    }

    fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id(), node);
    }

    fn remove_node(&mut self, id: Id) -> Option<Node> {
        self.nodes.shift_remove(&id)
    }

    fn insert_connection(&mut self, connection: Connection) {
        self.connections.insert(connection.id(), connection);
    }

    fn remove_connection(&mut self, id: Id) -> Option<Connection> {
        self.connections.shift_remove(&id)
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
    }
}

#[cfg(test)]
mod tests {
    use corral_core::geometry::Size;

    use super::*;

    fn node(name: &str) -> Node {
        Node::new(Id::new(name), Size::new(10.0, 10.0))
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut store = MemoryStore::new();
        store.insert_node(node("a"));
        store.insert_node(node("b").with_parent(Id::new("a")));

        assert_eq!(store.nodes_count(), 2);
        assert!(store.contains(Id::new("a")));
        assert!(!store.contains(Id::new("missing")));
        assert_eq!(store.children(Id::new("a")), vec![Id::new("b")]);
        assert!(store.children(Id::new("b")).is_empty());
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let mut store = MemoryStore::new();
        for name in ["z", "y", "x"] {
            store.insert_node(node(name));
        }

        let order: Vec<Id> = store.nodes().map(Node::id).collect();
        assert_eq!(order, vec![Id::new("z"), Id::new("y"), Id::new("x")]);

        store.remove_node(Id::new("y"));
        let order: Vec<Id> = store.nodes().map(Node::id).collect();
        assert_eq!(order, vec![Id::new("z"), Id::new("x")]);
    }

    #[test]
    fn test_connections_of_and_selected() {
        let mut store = MemoryStore::new();
        store.insert_node(node("a").with_selected(true));
        store.insert_node(node("b"));
        store.insert_node(node("c"));
        store.insert_connection(Connection::new(Id::new("ab"), Id::new("a"), Id::new("b")));
        store.insert_connection(Connection::new(Id::new("bc"), Id::new("b"), Id::new("c")));

        assert_eq!(store.connections_of(Id::new("a")), vec![Id::new("ab")]);
        assert_eq!(
            store.connections_of(Id::new("b")),
            vec![Id::new("ab"), Id::new("bc")]
        );
        assert_eq!(store.selected(), vec![Id::new("a")]);

        store.clear();
        assert_eq!(store.nodes_count(), 0);
        assert!(store.connection(Id::new("ab")).is_none());
    }
}
