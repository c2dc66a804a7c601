//! Stacking order of nested elements.
//!
//! Children must always be drawn above their containers, and a connection
//! above the nodes it links. Bringing a node forward therefore raises the node,
//! then its connections, then each of its descendants in the same way.

use std::collections::HashSet;

use corral_core::{graph::Element, identifier::Id};

use crate::{engine::ScopeEngine, error::CorralError, store::GraphStore, view::Viewport};

impl<S, V> ScopeEngine<S, V>
where
    S: GraphStore,
    V: Viewport,
{
    /// Raises a node, its connections and its whole subtree to the top of
    /// the stacking order, parents below children.
    ///
    /// Elements without a rendered view are skipped.
    pub fn bring_forward(&mut self, id: Id) {
        let mut visited = HashSet::new();
        let mut pending = vec![id];

        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            self.view.raise(Element::Node(current));
            for connection in self.store.connections_of(current) {
                self.view.raise(Element::Connection(connection));
            }
            // Reversed so children are raised in store order.
            pending.extend(self.store.children(current).into_iter().rev());
        }
    }

    pub(crate) fn on_connection_created(&mut self, id: Id) -> Result<(), CorralError> {
        let connection = self
            .store
            .connection(id)
            .ok_or(CorralError::MissingConnection(id))?;
        let (source, target) = (connection.source(), connection.target());

        self.view.lower(Element::Connection(id));
        self.bring_forward(source);
        self.bring_forward(target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use corral_core::{
        geometry::{Point, Size},
        graph::{Connection, Node},
    };

    use crate::{EngineBuilder, MemoryStore, MemoryView};

    use super::*;

    fn node(name: &str) -> Element {
        Element::Node(Id::new(name))
    }

    fn engine() -> ScopeEngine<MemoryStore, MemoryView> {
        let mut engine = EngineBuilder::new().build(MemoryStore::new(), MemoryView::new());
        engine
            .add_node(Node::new(Id::new("group"), Size::default()))
            .unwrap();
        engine
            .add_node_at(
                Node::new(Id::new("inner"), Size::new(10.0, 10.0)).with_parent(Id::new("group")),
                Point::new(5.0, 5.0),
            )
            .unwrap();
        engine
            .add_node(Node::new(Id::new("other"), Size::new(10.0, 10.0)))
            .unwrap();
        engine
    }

    fn index(engine: &ScopeEngine<MemoryStore, MemoryView>, element: Element) -> usize {
        engine.view().stack_index(element).expect("element is mounted")
    }

    #[test]
    fn test_bring_forward_keeps_children_above_parent() {
        let mut engine = engine();

        engine.bring_forward(Id::new("group"));

        let order: Vec<Element> = engine.view().stack().collect();
        assert_eq!(order, vec![node("other"), node("group"), node("inner")]);
    }

    #[test]
    fn test_connection_is_drawn_above_its_nodes() {
        let mut engine = engine();
        engine
            .add_connection(Connection::new(
                Id::new("link"),
                Id::new("inner"),
                Id::new("other"),
            ))
            .unwrap();

        let link = index(&engine, Element::Connection(Id::new("link")));
        assert!(link > index(&engine, node("inner")));
        assert!(index(&engine, node("group")) < index(&engine, node("inner")));
    }

    #[test]
    fn test_bring_forward_raises_connections() {
        let mut engine = engine();
        engine
            .add_connection(Connection::new(
                Id::new("link"),
                Id::new("group"),
                Id::new("other"),
            ))
            .unwrap();

        engine.bring_forward(Id::new("group"));

        let link = index(&engine, Element::Connection(Id::new("link")));
        assert!(link > index(&engine, node("group")));
        assert!(index(&engine, node("inner")) > link);
    }

    #[test]
    fn test_bring_forward_unknown_node_is_noop() {
        let mut engine = engine();
        let before: Vec<Element> = engine.view().stack().collect();

        engine.bring_forward(Id::new("ghost"));

        assert_eq!(engine.view().stack().collect::<Vec<_>>(), before);
    }
}
