#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame update step and frame driver.
//!
//! [`Simulation::update`] runs the systems in a fixed order, applying the
//! commands each one emits before the next reads the world:
//!
//! 1. clock tick
//! 2. enemy movement and leaks
//! 3. targeting and firing
//! 4. projectile flight and impacts
//! 5. eviction of dead enemies and projectiles
//!
//! [`FrameDriver`] converts host timestamps into scaled frame durations.

use std::time::Duration;

use waypoint_defence_core::{Command, Event, TowerTarget};
use waypoint_defence_system_movement::Movement;
use waypoint_defence_system_projectiles::Projectiles;
use waypoint_defence_system_spawning::WaveSpawner;
use waypoint_defence_system_tower_combat::TowerCombat;
use waypoint_defence_system_tower_targeting::TowerTargeting;
use waypoint_defence_world::{self as world, query, World};

/// Appends the next wave of enemies at the path entrance and bumps the wave counter.
///
/// The caller decides when waves are released.
pub fn spawn_wave(world: &mut World, out_events: &mut Vec<Event>) {
    let Some(spawn) = query::spawn_cell(world) else {
        log::warn!("cannot spawn a wave on a level without a path");
        return;
    };
    let mut commands = Vec::new();
    WaveSpawner::new().plan(
        query::wave(world),
        spawn,
        query::cell_size(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, out_events);
    }
}

/// Ordered collection of the systems that make up one update step.
#[derive(Debug, Default)]
pub struct Simulation {
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    projectiles: Projectiles,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a simulation with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the world by `dt`, which must already include the time scale.
    ///
    /// Does nothing while the world is paused.
    pub fn update(&mut self, world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
        if !query::is_running(world) {
            return;
        }

        let mut tick_events = Vec::new();
        world::apply(world, Command::Tick { dt }, &mut tick_events);
        out_events.extend_from_slice(&tick_events);

        self.movement.handle(
            &tick_events,
            &query::enemy_view(world),
            query::path(world),
            query::cell_size(world),
            &mut self.commands,
        );
        self.flush(world, out_events);

        self.targeting.handle(
            &query::tower_view(world),
            &query::enemy_view(world),
            &mut self.targets,
        );
        self.combat.handle(
            query::clock(world),
            &query::tower_cooldowns(world),
            &self.targets,
            &mut self.commands,
        );
        self.flush(world, out_events);

        self.projectiles.handle(
            &tick_events,
            &query::projectile_view(world),
            &query::enemy_view(world),
            &mut self.commands,
        );
        self.flush(world, out_events);

        world::apply(world, Command::EvictDead, out_events);
    }

    fn flush(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(world, command, out_events);
        }
    }
}

/// Converts host timestamps into scaled frame durations.
#[derive(Debug, Default)]
pub struct FrameDriver {
    simulation: Simulation,
    last_timestamp: Option<Duration>,
}

impl FrameDriver {
    /// Creates a driver that has not seen a frame yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame for the host timestamp `timestamp`.
    ///
    /// The first frame advances nothing. The timestamp is recorded even while
    /// the world is paused, so resuming never releases the paused interval.
    pub fn frame(&mut self, world: &mut World, timestamp: Duration, out_events: &mut Vec<Event>) {
        let raw = self
            .last_timestamp
            .map_or(Duration::ZERO, |previous| timestamp.saturating_sub(previous));
        self.last_timestamp = Some(timestamp);

        let dt = scale(raw, query::time_scale(world));
        self.simulation.update(world, dt, out_events);
    }
}

fn scale(raw: Duration, time_scale: f32) -> Duration {
    Duration::try_from_secs_f64(raw.as_secs_f64() * f64::from(time_scale)).unwrap_or(Duration::MAX)
}
