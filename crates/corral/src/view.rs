//! View layer collaborator.
//!
//! The view layer owns on-screen positions and the stacking order of rendered
//! elements. The scope engine reaches it only through [`Viewport`], whose
//! [`translate`](Viewport::translate) is the move primitive. [`MemoryView`]
//! is a headless implementation that records moves and resize notifications.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use log::trace;

use corral_core::{
    geometry::{Point, Size},
    graph::Element,
    identifier::Id,
};

use crate::error::ViewError;

/// Positions, stacking order and the move primitive of a canvas view.
pub trait Viewport {
    /// Returns the current top-left position of a node's element.
    fn position(&self, id: Id) -> Option<Point>;

    /// Moves a node's element to `to`.
    ///
    /// Completion of this call corresponds to the view emitting a
    /// node-translated event; the engine dispatches that event itself.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the element cannot be moved.
    fn translate(&mut self, id: Id, to: Point) -> Result<(), ViewError>;

    /// Notifies the view that a node changed size.
    fn resized(&mut self, id: Id, previous: Size, size: Size);

    /// Creates the rendered element, on top of the stack.
    fn mount(&mut self, element: Element);

    /// Destroys the rendered element.
    fn unmount(&mut self, element: Element);

    /// Returns the element's index in the stacking order; higher is drawn later.
    fn stack_index(&self, element: Element) -> Option<usize>;

    /// Moves the element to the top of the stacking order.
    fn raise(&mut self, element: Element);

    /// Moves the element to the bottom of the stacking order.
    fn lower(&mut self, element: Element);
}

/// Headless [`Viewport`] keeping positions and stacking order in memory.
///
/// Every successful move and every resize notification is recorded so that
/// callers can assert on exactly what the engine asked the view to do.
#[derive(Debug, Default)]
pub struct MemoryView {
    positions: HashMap<Id, Point>,
    stack: IndexSet<Element>,
    moves: Vec<(Id, Point)>,
    resizes: Vec<(Id, Size)>,
    failing: HashSet<Id>,
}

impl MemoryView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded moves, oldest first.
    pub fn moves(&self) -> &[(Id, Point)] {
        &self.moves
    }

    /// Returns the recorded resize notifications, oldest first.
    pub fn resizes(&self) -> &[(Id, Size)] {
        &self.resizes
    }

    /// Forgets recorded moves and resizes.
    pub fn clear_log(&mut self) {
        self.moves.clear();
        self.resizes.clear();
    }

    /// Returns the stacking order from bottom to top.
    pub fn stack(&self) -> impl Iterator<Item = Element> + '_ {
        self.stack.iter().copied()
    }

    /// Makes every later move of `id` fail with [`ViewError::Rejected`].
    pub fn fail_moves_of(&mut self, id: Id) {
        self.failing.insert(id);
    }
}

impl Viewport for MemoryView {
    fn position(&self, id: Id) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    fn translate(&mut self, id: Id, to: Point) -> Result<(), ViewError> {
        if self.failing.contains(&id) {
            return Err(ViewError::Rejected(format!("moves of {id} are disabled")));
        }
        let position = self
            .positions
            .get_mut(&id)
            .ok_or(ViewError::MissingElement(Element::Node(id)))?;
        *position = to;
        self.moves.push((id, to));
        Ok(())
    }

    fn resized(&mut self, id: Id, _previous: Size, size: Size) {
        self.resizes.push((id, size));
    }

    fn mount(&mut self, element: Element) {
        if let Element::Node(id) = element {
            self.positions.entry(id).or_default();
        }
        self.stack.insert(element);
    }

    fn unmount(&mut self, element: Element) {
        if let Element::Node(id) = element {
            self.positions.remove(&id);
        }
        self.stack.shift_remove(&element);
    }

    fn stack_index(&self, element: Element) -> Option<usize> {
        self.stack.get_index_of(&element)
    }

    fn raise(&mut self, element: Element) {
        if let Some(index) = self.stack.get_index_of(&element) {
            trace!(element:?; "Raising element");
            self.stack.move_index(index, self.stack.len() - 1);
        }
    }

    fn lower(&mut self, element: Element) {
        if let Some(index) = self.stack.get_index_of(&element) {
            trace!(element:?; "Lowering element");
            self.stack.move_index(index, 0);
        }
    }
}
