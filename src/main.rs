//! Pac-Man Core Demo
//!
//! Replays a scripted key sequence through the action engine and drives a
//! player and a ghost around a small maze. No rendering: everything of
//! interest is logged.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pacman_core::{
    input::{Action, ActionConfig, ActionMap, ActionType, FrameClock, KeyCode, KeyboardState},
    maze::{Bounds, IntersectionNode, Maze, MovementConfig, NodeMovement},
    Direction4, Point, TICK_RATE, VERSION,
};

/// Demo length in ticks (2 seconds).
const DEMO_TICKS: u64 = 2 * TICK_RATE as u64;

/// Distance covered by a turbo jump.
const JUMP_DISTANCE: f32 = 3.0;

/// Logical commands bound in the demo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Command {
    Up,
    Right,
    Down,
    Left,
    Turbo,
}

impl Command {
    fn direction(self) -> Direction4 {
        match self {
            Command::Up => Direction4::Up,
            Command::Right => Direction4::Right,
            Command::Down => Direction4::Down,
            Command::Left => Direction4::Left,
            Command::Turbo => Direction4::Neutral,
        }
    }
}

/// Optional JSON configuration, read from `PACMAN_CONFIG`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    actions: ActionConfig,
    player: MovementConfig,
    ghost: MovementConfig,
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    info!("Pac-Man Core v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = load_config()?;
    demo(&config)
}

fn load_config() -> anyhow::Result<DemoConfig> {
    let Ok(path) = std::env::var("PACMAN_CONFIG") else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))?;
    info!("Loaded config from {}", path);
    Ok(config)
}

/// ```text
/// (0,8)───────(8,8)
///   │           │
/// (0,4)─(4,4)─(8,4)
///   │     │     │
/// (0,0)─(4,0)─(8,0)
/// ```
fn build_maze() -> anyhow::Result<Maze> {
    use Direction4::*;

    let nodes = vec![
        IntersectionNode::new(Point::new(0.0, 0.0), [Up, Right]).with_dots([Up, Right]),
        IntersectionNode::new(Point::new(4.0, 0.0), [Up, Right, Left]).with_dots([Right]),
        IntersectionNode::new(Point::new(8.0, 0.0), [Up, Left]),
        IntersectionNode::new(Point::new(0.0, 4.0), [Up, Right, Down]),
        IntersectionNode::new(Point::new(4.0, 4.0), [Right, Down, Left]).exit(),
        IntersectionNode::new(Point::new(8.0, 4.0), [Up, Down, Left]),
        IntersectionNode::new(Point::new(0.0, 8.0), [Right, Down]),
        IntersectionNode::new(Point::new(8.0, 8.0), [Down, Left]),
    ];
    let bounds = Bounds::new(Point::new(-1.0, -1.0), Point::new(9.0, 9.0));
    Ok(Maze::new(nodes, bounds)?)
}

fn build_bindings(config: &ActionConfig) -> ActionMap<Command> {
    let either = |arrow: KeyCode, letter: char| Action::press(arrow) | Action::press(KeyCode::Char(letter));

    let mut map = ActionMap::new();
    map.insert(Command::Up, either(KeyCode::Up, 'w'));
    map.insert(Command::Right, either(KeyCode::Right, 'd'));
    map.insert(Command::Down, either(KeyCode::Down, 's'));
    map.insert(Command::Left, either(KeyCode::Left, 'a'));
    map.insert(
        Command::Turbo,
        Action::with_config(KeyCode::Space, ActionType::MultiPress, 3, config),
    );
    map
}

/// Raw key transitions by tick.
fn key_script() -> BTreeMap<u64, Vec<(KeyCode, bool)>> {
    let mut script: BTreeMap<u64, Vec<(KeyCode, bool)>> = BTreeMap::new();
    let mut at = |tick: u64, key: KeyCode, down: bool| script.entry(tick).or_default().push((key, down));

    at(2, KeyCode::Char('d'), true);
    at(4, KeyCode::Char('d'), false);
    at(20, KeyCode::Up, true);
    at(24, KeyCode::Up, false);
    // Triple tap: turbo jump
    for (i, tick) in [70, 74, 78].into_iter().enumerate() {
        at(tick, KeyCode::Space, true);
        at(tick + 2, KeyCode::Space, false);
        debug!(tap = i + 1, tick, "scripted turbo tap");
    }
    at(90, KeyCode::Left, true);
    at(92, KeyCode::Left, false);
    script
}

/// Actor position plus movement state.
struct Actor {
    name: &'static str,
    position: Point,
    movement: NodeMovement,
    /// Node the actor was last handled at
    last_node: Option<Point>,
}

impl Actor {
    fn new(name: &'static str, position: Point, config: MovementConfig) -> Self {
        Self {
            name,
            position,
            movement: NodeMovement::new(config),
            last_node: None,
        }
    }

    /// Intersection the actor is passing over this tick, once per visit.
    fn arrive<'m>(&mut self, maze: &'m Maze, reach: f32) -> Option<&'m IntersectionNode> {
        let node = maze.node_at(self.position, reach);
        let position = node.map(|n| n.position);
        if position == self.last_node {
            return None;
        }
        self.last_node = position;
        node
    }

    fn step(&mut self, dt: f32) {
        self.position += self.movement.velocity() * dt;
    }
}

fn demo(config: &DemoConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo ===");

    let maze = build_maze()?;
    info!("Maze: {} nodes, {} corridors", maze.nodes().len(), maze.connections().len());

    let mut bindings = build_bindings(&config.actions);
    let script = key_script();
    let mut keys = KeyboardState::new();
    let mut clock = FrameClock::default();
    let dt = clock.dt().as_secs_f32();
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut player = Actor::new("player", Point::new(0.0, 0.0), config.player);
    let mut ghost = Actor::new("ghost", Point::new(4.0, 4.0), config.ghost);
    ghost.movement.set_current(Direction4::Left);

    for _ in 0..DEMO_TICKS {
        let tick = clock.advance();
        keys.begin_tick();
        for &(key, down) in script.get(&tick).into_iter().flatten() {
            keys.set(key, down);
        }
        let frame = clock.frame(&keys);

        // Parked on a node: only its exits may be requested
        let parked = if player.movement.current().is_neutral() {
            maze.node_at(player.position, 0.01)
        } else {
            None
        };

        for command in bindings.active_keys(&frame) {
            match command {
                Command::Turbo => {
                    let dir = player.movement.current();
                    if dir.is_neutral() {
                        continue;
                    }
                    if let Some(target) = maze.jump_target(player.position, dir, JUMP_DISTANCE)? {
                        info!(tick, from = %player.position, to = %target, "turbo jump");
                        player.movement.wait();
                        player.position = target;
                        player.last_node = None;
                        player.movement.resume();
                    }
                }
                direction => {
                    if let Some(change) = player.movement.request(direction.direction(), parked) {
                        info!(tick, from = %change.from, to = %change.to, "player turned");
                    }
                }
            }
        }

        // Speed * dt bounds how far an actor can overshoot a node in one tick
        player.step(dt);
        if let Some(node) = player.arrive(&maze, player.movement.config().speed * dt) {
            if let Some(change) = player.movement.on_node(node) {
                player.position = node.position;
                info!(tick, at = %node.position, from = %change.from, to = %change.to, "player at node");
            }
        }

        ghost.step(dt);
        if let Some(node) = ghost.arrive(&maze, ghost.movement.config().speed * dt) {
            if let Some(change) = ghost.movement.on_node_random(node, &mut rng) {
                ghost.position = node.position;
                debug!(tick, at = %node.position, to = %change.to, "ghost turned");
            }
        }
    }

    info!("=== Demo Results ===");
    for actor in [&player, &ghost] {
        info!(
            "{}: position {}, heading {}, distance to corridor {:.3}",
            actor.name,
            actor.position,
            actor.movement.current(),
            maze.distance_to_path(actor.position).unwrap_or(f32::NAN)
        );
    }
    Ok(())
}
