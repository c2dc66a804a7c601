//! Replays a scenario against a headless scope engine.

use std::{
    fmt,
    time::{Duration, Instant},
};

use log::{debug, info};

use corral::{
    EngineBuilder, GraphStore, MemoryStore, MemoryView, ScopeEngine, Viewport,
    config::ScopeConfig,
    event::ScopeEvent,
    geometry::{Point, Size},
    graph::{Connection, Node},
    identifier::Id,
};

use crate::{
    error::CliError,
    scenario::{Scenario, Step},
};

type Engine = ScopeEngine<MemoryStore, MemoryView>;

/// Final state of a replayed scenario.
#[derive(Debug)]
pub struct Report {
    nodes: Vec<NodeReport>,
    events: Vec<ScopeEvent>,
}

#[derive(Debug)]
struct NodeReport {
    id: Id,
    position: Point,
    size: Size,
    parent: Option<Id>,
}

impl Report {
    /// Returns the scope events emitted while replaying, oldest first.
    pub fn events(&self) -> &[ScopeEvent] {
        &self.events
    }

    /// Returns the final parent of a node, `None` for roots and unknown ids.
    pub fn parent_of(&self, id: Id) -> Option<Id> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .and_then(|node| node.parent)
    }

    fn capture(engine: &mut Engine) -> Self {
        let nodes = engine
            .store()
            .nodes()
            .map(|node| NodeReport {
                id: node.id(),
                position: engine.view().position(node.id()).unwrap_or_default(),
                size: node.size(),
                parent: node.parent(),
            })
            .collect();
        Self {
            nodes,
            events: engine.drain_events(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:")?;
        for node in &self.nodes {
            let parent = node
                .parent
                .map_or_else(|| "-".to_string(), |parent| parent.to_string());
            writeln!(
                f,
                "  {} x={:.1} y={:.1} width={:.1} height={:.1} parent={parent}",
                node.id,
                node.position.x(),
                node.position.y(),
                node.size.width(),
                node.size.height(),
            )?;
        }

        writeln!(f, "events:")?;
        for event in &self.events {
            match event {
                ScopeEvent::Picked { ids } | ScopeEvent::Released { ids } => {
                    let ids: Vec<String> = ids.iter().map(Id::to_string).collect();
                    writeln!(f, "  {} {}", event.name(), ids.join(", "))?;
                }
                ScopeEvent::Resized { id, previous, size } => writeln!(
                    f,
                    "  {} {id} {:.1}x{:.1} -> {:.1}x{:.1}",
                    event.name(),
                    previous.width(),
                    previous.height(),
                    size.width(),
                    size.height(),
                )?,
            }
        }
        Ok(())
    }
}

/// Builds the scenario's canvas and replays its steps.
///
/// The scenario's own `[config]` table, when present, replaces `config`.
///
/// # Errors
///
/// Returns [`CliError::Setup`] if the initial canvas is inconsistent and
/// [`CliError::Step`] for the first step the engine rejects.
pub fn simulate(scenario: &Scenario, config: &ScopeConfig) -> Result<Report, CliError> {
    let config = scenario.config.as_ref().unwrap_or(config);
    let mut engine = EngineBuilder::from_config(config).build(MemoryStore::new(), MemoryView::new());

    for spec in &scenario.nodes {
        let mut node = Node::new(spec.id, Size::new(spec.width, spec.height))
            .with_selected(spec.selected);
        if let Some(parent) = spec.parent {
            node = node.with_parent(parent);
        }
        engine
            .add_node_at(node, Point::new(spec.x, spec.y))
            .map_err(|source| CliError::Setup {
                node: spec.id.to_string(),
                source,
            })?;
    }
    for spec in &scenario.connections {
        engine
            .add_connection(Connection::new(spec.id, spec.source, spec.target))
            .map_err(|source| CliError::Setup {
                node: spec.id.to_string(),
                source,
            })?;
    }
    // Fitting the initial canvas is not part of the replay.
    engine.drain_events();
    info!(
        nodes_count = scenario.nodes.len(),
        connections_count = scenario.connections.len(),
        steps_count = scenario.steps.len();
        "Scenario canvas ready"
    );

    let start = Instant::now();
    let mut elapsed = Duration::ZERO;
    for (index, step) in scenario.steps.iter().enumerate() {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        debug!(step = index + 1, action = step.action(), elapsed_ms = elapsed_ms; "Replaying step");
        apply(&mut engine, step, start, &mut elapsed).map_err(|source| CliError::Step {
            step: index + 1,
            action: step.action(),
            source,
        })?;
    }

    Ok(Report::capture(&mut engine))
}

fn apply(
    engine: &mut Engine,
    step: &Step,
    start: Instant,
    elapsed: &mut Duration,
) -> Result<(), corral::CorralError> {
    let now = start + *elapsed;
    match step {
        Step::Pick { node } => engine.pick_node(*node, now),
        Step::Drag { node, x, y } => engine.drag_node(*node, Point::new(*x, *y), now),
        Step::Drop { node, x, y } => engine.drop_node(*node, Point::new(*x, *y), now),
        Step::Wait { ms } => {
            *elapsed += Duration::from_millis(*ms);
            engine.tick(start + *elapsed);
            Ok(())
        }
        Step::Select { node, selected } => engine.set_selected(*node, *selected),
        Step::Translate { node, x, y } => engine.translate(*node, Point::new(*x, *y)),
        Step::Remove { node } => engine.remove_node(*node),
        Step::Connect { id, source, target } => {
            engine.add_connection(Connection::new(*id, *source, *target))
        }
        Step::Disconnect { id } => engine.remove_connection(*id),
        Step::Clear => engine.clear(),
    }
}
