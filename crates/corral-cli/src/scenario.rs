//! Scenario files.
//!
//! A scenario describes an initial canvas and a list of interaction steps to
//! replay against the scope engine on a virtual clock:
//!
//! ```toml
//! [config]
//! pick_delay_ms = 200
//!
//! [[nodes]]
//! id = "group"
//! width = 0.0
//! height = 0.0
//!
//! [[nodes]]
//! id = "task"
//! parent = "group"
//! width = 100.0
//! height = 50.0
//! x = 20.0
//! y = 60.0
//!
//! [[steps]]
//! action = "pick"
//! node = "task"
//!
//! [[steps]]
//! action = "wait"
//! ms = 300
//! ```

use serde::Deserialize;

use corral::{config::ScopeConfig, identifier::Id};

/// Parsed scenario file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Overrides the loaded configuration when present.
    #[serde(default)]
    pub config: Option<ScopeConfig>,

    #[serde(default)]
    pub nodes: Vec<NodeSpec>,

    #[serde(default)]
    pub connections: Vec<ConnectionSpec>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Parses a scenario from TOML source.
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

/// Initial node, created in file order.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub id: Id,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub parent: Option<Id>,
    #[serde(default)]
    pub selected: bool,
}

/// Initial connection.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSpec {
    pub id: Id,
    pub source: Id,
    pub target: Id,
}

/// One interaction replayed against the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Pointer down on a node.
    Pick { node: Id },
    /// User drag of a node to a position.
    Drag { node: Id, x: f32, y: f32 },
    /// End of a drag with the pointer at a position.
    Drop { node: Id, x: f32, y: f32 },
    /// Advance the virtual clock.
    Wait { ms: u64 },
    /// Change a node's selection flag.
    Select {
        node: Id,
        #[serde(default = "selected_default")]
        selected: bool,
    },
    /// Engine-initiated move of a node.
    Translate { node: Id, x: f32, y: f32 },
    /// Remove a node.
    Remove { node: Id },
    /// Add a connection.
    Connect { id: Id, source: Id, target: Id },
    /// Remove a connection.
    Disconnect { id: Id },
    /// Remove everything.
    Clear,
}

fn selected_default() -> bool {
    true
}

impl Step {
    /// Returns the action name used in the scenario file.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Pick { .. } => "pick",
            Self::Drag { .. } => "drag",
            Self::Drop { .. } => "drop",
            Self::Wait { .. } => "wait",
            Self::Select { .. } => "select",
            Self::Translate { .. } => "translate",
            Self::Remove { .. } => "remove",
            Self::Connect { .. } => "connect",
            Self::Disconnect { .. } => "disconnect",
            Self::Clear => "clear",
        }
    }
}
