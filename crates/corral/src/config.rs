//! Configuration types for the scope engine.
//!
//! [`ScopeConfig`] holds the plain-data settings and implements
//! [`serde::Deserialize`] so hosts can load it from a file. Settings that are
//! functions of a node (per-node padding, exclusion, size overrides) cannot be
//! deserialized and are installed through [`EngineBuilder`](crate::EngineBuilder)
//! instead.
//!
//! # Example
//!
//! ```
//! # use corral::config::ScopeConfig;
//! let config: ScopeConfig = Default::default();
//! assert_eq!(config.pick_delay().as_millis(), 250);
//! assert_eq!(config.padding().top(), 40.0);
//! ```

use std::{fmt, rc::Rc, time::Duration};

use serde::Deserialize;

use corral_core::{
    geometry::{Insets, Size},
    graph::Node,
};

/// Plain-data engine settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeConfig {
    /// Padding between a container's edges and its children.
    #[serde(default)]
    padding: PaddingConfig,

    /// Long-press threshold for picking a node up, in milliseconds.
    #[serde(default)]
    pick_delay_ms: PickDelay,

    /// Size a container collapses to when it has no children.
    #[serde(default)]
    default_size: SizeConfig,
}

impl ScopeConfig {
    /// Creates a new [`ScopeConfig`].
    ///
    /// # Arguments
    ///
    /// * `padding` - Insets applied around a container's children.
    /// * `pick_delay` - Hold time before a pick becomes a reparent gesture.
    /// * `default_size` - Size of a container without children.
    pub fn new(padding: Insets, pick_delay: Duration, default_size: Size) -> Self {
        Self {
            padding: PaddingConfig {
                top: padding.top(),
                left: padding.left(),
                right: padding.right(),
                bottom: padding.bottom(),
            },
            pick_delay_ms: PickDelay(u64::try_from(pick_delay.as_millis()).unwrap_or(u64::MAX)),
            default_size: SizeConfig {
                width: default_size.width(),
                height: default_size.height(),
            },
        }
    }

    /// Returns the configured padding as [`Insets`].
    pub fn padding(&self) -> Insets {
        let PaddingConfig {
            top,
            left,
            right,
            bottom,
        } = self.padding;
        Insets::new(top, right, bottom, left)
    }

    /// Returns the long-press threshold.
    pub fn pick_delay(&self) -> Duration {
        Duration::from_millis(self.pick_delay_ms.0)
    }

    /// Returns the size of a childless container.
    pub fn default_size(&self) -> Size {
        Size::new(self.default_size.width, self.default_size.height)
    }
}

/// Padding section of [`ScopeConfig`].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
struct PaddingConfig {
    top: f32,
    left: f32,
    right: f32,
    bottom: f32,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            top: 40.0,
            left: 20.0,
            right: 20.0,
            bottom: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(transparent)]
struct PickDelay(u64);

impl Default for PickDelay {
    fn default() -> Self {
        Self(250)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
struct SizeConfig {
    width: f32,
    height: f32,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            width: 220.0,
            height: 120.0,
        }
    }
}

/// Padding policy of a container.
#[derive(Clone)]
pub enum Padding {
    /// Same insets for every container.
    Fixed(Insets),
    /// Insets computed from the container node.
    PerNode(Rc<dyn Fn(&Node) -> Insets>),
}

impl Padding {
    /// Returns the insets to apply around the children of `container`.
    pub fn for_node(&self, container: &Node) -> Insets {
        match self {
            Self::Fixed(insets) => *insets,
            Self::PerNode(padding) => padding(container),
        }
    }
}

impl fmt::Debug for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(insets) => f.debug_tuple("Fixed").field(insets).finish(),
            Self::PerNode(_) => f.write_str("PerNode(..)"),
        }
    }
}

impl From<Insets> for Padding {
    fn from(insets: Insets) -> Self {
        Self::Fixed(insets)
    }
}
