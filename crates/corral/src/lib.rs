//! Corral - scope coordination for nested nodes on node-graph canvases.
//!
//! Nodes may contain other nodes. The [`ScopeEngine`] keeps every container
//! sized around its children, moves children with their containers, keeps
//! children drawn above their containers, and lets users reparent nodes by
//! long-pressing and dropping them onto another node.
//!
//! The engine works against two collaborators: a [`GraphStore`] holding nodes
//! and connections, and a [`Viewport`] holding positions and stacking order.
//! [`MemoryStore`] and [`MemoryView`] are headless implementations of both.
//!
//! # Examples
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use corral::{
//!     EngineBuilder, GraphStore, MemoryStore, MemoryView, Viewport,
//!     geometry::{Insets, Point, Size},
//!     graph::Node,
//!     identifier::Id,
//! };
//!
//! let mut engine = EngineBuilder::new()
//!     .with_padding(Insets::new(40.0, 20.0, 20.0, 20.0))
//!     .build(MemoryStore::new(), MemoryView::new());
//!
//! let group = Id::new("group");
//! engine.add_node_at(Node::new(group, Size::default()), Point::new(-50.0, -50.0))?;
//! for (name, at) in [("a", Point::new(0.0, 0.0)), ("b", Point::new(150.0, 60.0))] {
//!     let child = Node::new(Id::new(name), Size::new(100.0, 50.0)).with_parent(group);
//!     engine.add_node_at(child, at)?;
//! }
//!
//! // The container wraps both children with its padding.
//! assert_eq!(engine.store().node(group).unwrap().size(), Size::new(290.0, 170.0));
//! assert_eq!(engine.view().position(group), Some(Point::new(-20.0, -40.0)));
//!
//! // A long press picks "b" up; dropping it on empty canvas detaches it.
//! let start = Instant::now();
//! let b = Id::new("b");
//! engine.pick_node(b, start)?;
//! engine.tick(start + Duration::from_millis(300));
//! assert_eq!(engine.picked(), &[b]);
//!
//! engine.drop_node(b, Point::new(1000.0, 1000.0), start + Duration::from_millis(400))?;
//! assert_eq!(engine.store().node(b).unwrap().parent(), None);
//! # Ok::<(), corral::CorralError>(())
//! ```

pub mod config;

mod engine;
mod error;
mod hierarchy;
mod ordering;
mod pick;
mod propagation;
mod reparent;
mod sizing;
mod store;
mod translate;
mod validation;
mod view;

pub use corral_core::{event, geometry, graph, identifier};

pub use engine::{EngineBuilder, ExclusionFn, ScopeEngine, SizeOverrideFn};
pub use error::{CorralError, ViewError};
pub use pick::{PickState, PickTimer};
pub use reparent::Reparent;
pub use store::{GraphStore, MemoryStore};
pub use view::{MemoryView, Viewport};
