//! The scope engine and its builder.
//!
//! [`ScopeEngine`] composes the scope handlers on a single event pipe. The
//! graph store and the view layer report [`CanvasEvent`]s through
//! [`ScopeEngine::handle`]; each event is matched exhaustively and routed to
//! the layout, propagation, ordering, pick and reparenting logic. Hosts read
//! the resulting [`ScopeEvent`]s with [`ScopeEngine::drain_events`].
//!
//! The engine is single-threaded. Moves issued by the engine go through the
//! view's move primitive and their node-translated events are dispatched
//! re-entrantly, before the move returns, exactly as a view would emit them.

use std::{
    mem,
    rc::Rc,
    time::{Duration, Instant},
};

use log::{debug, info, trace};

use corral_core::{
    event::{CanvasEvent, ScopeEvent},
    geometry::{Insets, Point, Size},
    graph::{Connection, Element, Node},
    identifier::Id,
};

use crate::{
    config::{Padding, ScopeConfig},
    error::CorralError,
    hierarchy,
    pick::{PickMachine, PickState, PickTimer},
    store::GraphStore,
    translate::TranslateLocks,
    validation::Validator,
    view::Viewport,
};

/// Predicate excluding a child from its container's bounding box.
pub type ExclusionFn = Rc<dyn Fn(&Node) -> bool>;

/// Size used for a child in its container's bounding box instead of its own.
pub type SizeOverrideFn = Rc<dyn Fn(&Node) -> Option<Size>>;

/// Builder for [`ScopeEngine`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use corral::{EngineBuilder, MemoryStore, MemoryView, geometry::Insets};
///
/// let engine = EngineBuilder::new()
///     .with_padding(Insets::uniform(10.0))
///     .with_pick_delay(Duration::from_millis(500))
///     .with_exclusion(|node| node.id() == "minimap")
///     .build(MemoryStore::new(), MemoryView::new());
///
/// assert!(engine.picked().is_empty());
/// ```
pub struct EngineBuilder {
    padding: Padding,
    pick_delay: Duration,
    default_size: Size,
    exclude: Option<ExclusionFn>,
    size_override: Option<SizeOverrideFn>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::from_config(&ScopeConfig::default())
    }
}

impl EngineBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from plain-data settings.
    pub fn from_config(config: &ScopeConfig) -> Self {
        Self {
            padding: Padding::Fixed(config.padding()),
            pick_delay: config.pick_delay(),
            default_size: config.default_size(),
            exclude: None,
            size_override: None,
        }
    }

    /// Sets the padding policy; accepts [`Insets`] or a [`Padding`].
    pub fn with_padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Computes padding per container node.
    pub fn with_padding_fn(mut self, padding: impl Fn(&Node) -> Insets + 'static) -> Self {
        self.padding = Padding::PerNode(Rc::new(padding));
        self
    }

    pub fn with_pick_delay(mut self, delay: Duration) -> Self {
        self.pick_delay = delay;
        self
    }

    pub fn with_default_size(mut self, size: Size) -> Self {
        self.default_size = size;
        self
    }

    /// Excludes matching children from their container's bounding box.
    pub fn with_exclusion(mut self, exclude: impl Fn(&Node) -> bool + 'static) -> Self {
        self.exclude = Some(Rc::new(exclude));
        self
    }

    /// Overrides the size a child contributes to its container's bounding box.
    pub fn with_size_override(
        mut self,
        size_override: impl Fn(&Node) -> Option<Size> + 'static,
    ) -> Self {
        self.size_override = Some(Rc::new(size_override));
        self
    }

    /// Builds the engine over the given collaborators.
    pub fn build<S, V>(self, store: S, view: V) -> ScopeEngine<S, V>
    where
        S: GraphStore,
        V: Viewport,
    {
        debug!(padding:? = self.padding, pick_delay:? = self.pick_delay; "Building scope engine");
        ScopeEngine {
            store,
            view,
            padding: self.padding,
            default_size: self.default_size,
            exclude: self.exclude,
            size_override: self.size_override,
            locks: TranslateLocks::default(),
            picker: PickMachine::new(self.pick_delay),
            timer: None,
            validator: Validator::default(),
            events: Vec::new(),
            now: None,
        }
    }
}

/// Scope coordination engine over a graph store `S` and a view `V`.
pub struct ScopeEngine<S, V> {
    pub(crate) store: S,
    pub(crate) view: V,
    pub(crate) padding: Padding,
    pub(crate) default_size: Size,
    pub(crate) exclude: Option<ExclusionFn>,
    pub(crate) size_override: Option<SizeOverrideFn>,
    pub(crate) locks: TranslateLocks,
    pub(crate) picker: PickMachine,
    pub(crate) timer: Option<PickTimer>,
    pub(crate) validator: Validator,
    pub(crate) events: Vec<ScopeEvent>,
    pub(crate) now: Option<Instant>,
}

impl<S, V> ScopeEngine<S, V>
where
    S: GraphStore,
    V: Viewport,
{
    /// Returns the graph store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the graph store for mutation outside the engine.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Returns the view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Returns the view for mutation outside the engine.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Consumes the engine, returning its collaborators.
    pub fn into_parts(self) -> (S, V) {
        (self.store, self.view)
    }

    /// Takes the scope events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<ScopeEvent> {
        mem::take(&mut self.events)
    }

    /// Handles one event from the canvas pipe observed at `now`.
    ///
    /// A pending pick whose delay has elapsed by `now` matures before the
    /// event is handled.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError`] when an invariant is violated or the view's
    /// move primitive fails. The error aborts the handler where it occurred.
    pub fn handle(&mut self, event: CanvasEvent, now: Instant) -> Result<(), CorralError> {
        self.tick(now);
        self.dispatch(event)
    }

    /// Advances the engine clock, maturing a pending pick that is due.
    pub fn tick(&mut self, now: Instant) {
        let now = self.now.map_or(now, |last| last.max(now));
        self.now = Some(now);
        if let Some(origin) = self.picker.due(now) {
            self.mature_pick(origin);
        }
    }

    /// Fires a pick timer obtained from [`pending_timer`](Self::pending_timer).
    ///
    /// Firing a timer whose pick was cancelled, released or replaced is a no-op.
    pub fn expire(&mut self, timer: PickTimer) {
        if let Some(origin) = self.picker.current(timer) {
            self.mature_pick(origin);
        }
    }

    /// Returns the timer of the pending pick, for hosts that schedule wakeups.
    pub fn pending_timer(&self) -> Option<PickTimer> {
        match self.picker.state() {
            PickState::Pending { .. } => self.timer,
            _ => None,
        }
    }

    /// Returns the state of the pick gesture.
    pub fn pick_state(&self) -> &PickState {
        self.picker.state()
    }

    /// Returns the ids picked up for reparenting, empty outside a pick.
    pub fn picked(&self) -> &[Id] {
        self.picker.candidates()
    }

    /// Returns true if the node, or one of its ancestors, is selected or
    /// picked up, i.e. it will be moved by something other than the host.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::MissingNode`] if the node or an ancestor is missing.
    pub fn is_move_dependent(&self, id: Id) -> Result<bool, CorralError> {
        let node = self.store.node(id).ok_or(CorralError::MissingNode(id))?;
        Ok(node.is_selected()
            || hierarchy::has_selected_ancestor(&self.store, id)?
            || hierarchy::belongs_to(&self.store, id, self.picker.candidates())?)
    }

    /// Returns true if any ancestor of the node is selected.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::MissingNode`] if the node or an ancestor is missing.
    pub fn has_selected_ancestor(&self, id: Id) -> Result<bool, CorralError> {
        hierarchy::has_selected_ancestor(&self.store, id)
    }

    // =========================================================================
    // Graph mutations
    // =========================================================================

    /// Adds a node after validating its parent reference.
    ///
    /// The node's element is mounted at the view's default position.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::DanglingParent`] if the parent does not exist and
    /// [`CorralError::DuplicateNode`] if the id is taken.
    pub fn add_node(&mut self, node: Node) -> Result<(), CorralError> {
        self.validator.check_create(&self.store, &node)?;
        let id = node.id();
        info!(node_id:% = id, parent_id:? = node.parent().map(|p| p.to_string()); "Adding node");
        self.store.insert_node(node);
        self.view.mount(Element::Node(id));
        self.dispatch(CanvasEvent::NodeCreated { id })
    }

    /// Adds a node and places it at `position`, refitting its container.
    ///
    /// # Errors
    ///
    /// See [`add_node`](Self::add_node); also fails if the placement move fails.
    pub fn add_node_at(&mut self, node: Node, position: Point) -> Result<(), CorralError> {
        let id = node.id();
        self.add_node(node)?;
        self.move_node(id, position)
    }

    /// Removes a node that has no children, along with its connections.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::HasChildren`] if the node still contains nodes and
    /// [`CorralError::MissingNode`] if it does not exist.
    pub fn remove_node(&mut self, id: Id) -> Result<(), CorralError> {
        self.validator.check_remove(&self.store, id)?;
        for connection in self.store.connections_of(id) {
            self.remove_connection(connection)?;
        }
        let node = self
            .store
            .remove_node(id)
            .ok_or(CorralError::MissingNode(id))?;
        self.view.unmount(Element::Node(id));
        info!(node_id:% = id; "Removed node");
        self.dispatch(CanvasEvent::NodeRemoved {
            id,
            parent: node.parent(),
        })
    }

    /// Adds a connection between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::MissingNode`] if an endpoint does not exist.
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), CorralError> {
        for endpoint in [connection.source(), connection.target()] {
            if !self.store.contains(endpoint) {
                return Err(CorralError::MissingNode(endpoint));
            }
        }
        let id = connection.id();
        self.store.insert_connection(connection);
        self.view.mount(Element::Connection(id));
        self.dispatch(CanvasEvent::ConnectionCreated { id })
    }

    /// Removes a connection.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::MissingConnection`] if it does not exist.
    pub fn remove_connection(&mut self, id: Id) -> Result<(), CorralError> {
        self.store
            .remove_connection(id)
            .ok_or(CorralError::MissingConnection(id))?;
        self.view.unmount(Element::Connection(id));
        self.dispatch(CanvasEvent::ConnectionRemoved { id })
    }

    /// Removes every node and connection at once.
    ///
    /// Nodes are removed one by one in store order, so a container usually
    /// goes before its children. The "no children" check is suspended until
    /// the last node is gone. A held candidate set is released.
    pub fn clear(&mut self) -> Result<(), CorralError> {
        let connections: Vec<Id> = self.store.connections().map(Connection::id).collect();
        let nodes: Vec<Id> = self.store.nodes().map(Node::id).collect();
        info!(nodes_count = nodes.len(), connections_count = connections.len(); "Clearing graph");

        for id in connections {
            self.view.unmount(Element::Connection(id));
        }

        self.validator.begin_bulk();
        let removed = self.remove_all(&nodes);
        self.validator.end_bulk();
        removed?;

        self.store.clear();
        self.dispatch(CanvasEvent::Cleared)
    }

    fn remove_all(&mut self, nodes: &[Id]) -> Result<(), CorralError> {
        for &id in nodes {
            self.validator.check_remove(&self.store, id)?;
            self.store.remove_node(id);
            self.view.unmount(Element::Node(id));
        }
        Ok(())
    }

    /// Sets a node's selection flag.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::MissingNode`] if the node does not exist.
    pub fn set_selected(&mut self, id: Id, selected: bool) -> Result<(), CorralError> {
        self.store
            .node_mut(id)
            .ok_or(CorralError::MissingNode(id))?
            .set_selected(selected);
        Ok(())
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Reports that the pointer went down on a node.
    pub fn pick_node(&mut self, id: Id, now: Instant) -> Result<(), CorralError> {
        self.handle(CanvasEvent::NodePicked { id }, now)
    }

    /// Moves a node under direct user control.
    ///
    /// Unlike [`translate`](Self::translate), this move is not locked, so its
    /// children follow and its container refits.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError`] if the node has no view or a cascade fails.
    pub fn drag_node(&mut self, id: Id, to: Point, now: Instant) -> Result<(), CorralError> {
        self.tick(now);
        self.move_node(id, to)
    }

    /// Reports that a drag ended with the pointer at `pointer`.
    pub fn drop_node(&mut self, id: Id, pointer: Point, now: Instant) -> Result<(), CorralError> {
        self.handle(CanvasEvent::NodeDragged { id, pointer }, now)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    pub(crate) fn dispatch(&mut self, event: CanvasEvent) -> Result<(), CorralError> {
        trace!(event = event.name(); "Dispatching event");
        match event {
            CanvasEvent::NodeCreated { .. } | CanvasEvent::ConnectionRemoved { .. } => Ok(()),
            CanvasEvent::NodeRemoved { parent, .. } => match parent {
                Some(parent) if self.store.contains(parent) => self.resize_parent(parent),
                _ => Ok(()),
            },
            CanvasEvent::NodeTranslated {
                id,
                previous,
                position,
            } => {
                if self.picker.cancel() {
                    debug!(node_id:% = id; "Pick cancelled by translation");
                }
                self.on_node_translated(id, previous, position)
            }
            CanvasEvent::NodePicked { id } => {
                self.bring_forward(id);
                self.start_pick(id);
                Ok(())
            }
            CanvasEvent::NodeDragged { pointer, .. } => match self.picker.release() {
                Some(ids) => {
                    debug!(ids:? = display_ids(&ids); "Scope released");
                    self.events.push(ScopeEvent::Released { ids: ids.clone() });
                    self.reassign_parent(&ids, pointer).map(|_| ())
                }
                None => Ok(()),
            },
            CanvasEvent::ConnectionCreated { id } => self.on_connection_created(id),
            CanvasEvent::Cleared => {
                if let Some(ids) = self.picker.release() {
                    debug!(ids:? = display_ids(&ids); "Scope released by clear");
                    self.events.push(ScopeEvent::Released { ids });
                }
                self.timer = None;
                Ok(())
            }
        }
    }

    fn start_pick(&mut self, id: Id) {
        let now = self.now.unwrap_or_else(Instant::now);
        let (timer, displaced) = self.picker.pick(id, now);
        if let Some(ids) = displaced {
            debug!(ids:? = display_ids(&ids); "Stale scope released by new pick");
            self.events.push(ScopeEvent::Released { ids });
        }
        self.timer = Some(timer);
    }

    fn mature_pick(&mut self, origin: Id) {
        let selected = self.store.selected();
        let ids = if selected.is_empty() {
            vec![origin]
        } else {
            selected
        };
        debug!(origin:% = origin, ids:? = display_ids(&ids); "Scope picked");
        self.picker.mature(ids.clone());
        self.timer = None;
        self.events.push(ScopeEvent::Picked { ids });
    }
}

pub(crate) fn display_ids(ids: &[Id]) -> Vec<String> {
    ids.iter().map(Id::to_string).collect()
}
