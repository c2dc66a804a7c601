//! Corral Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Corral scope
//! engine and its hosts. It includes:
//!
//! - **Identifiers**: Interned node and connection identifiers ([`identifier::Id`])
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Graph**: The node and connection model read by the engine ([`graph`] module)
//! - **Events**: The closed event vocabulary exchanged on the canvas pipe ([`event`] module)

pub mod event;
pub mod geometry;
pub mod graph;
pub mod identifier;
