#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Waypoint Defence.
//!
//! The [`World`] owns the grid, the enemy path, every live entity and the
//! scorekeeping economy. It is only ever mutated through [`apply`], which
//! executes a single [`Command`] and reports the outcome as [`Event`] values.
//! Readers use the [`query`] module.

mod grid;
mod level;
mod towers;

use std::time::Duration;

use glam::Vec2;
use waypoint_defence_core::{
    CellCoord, Command, EnemyId, Event, PlacementError, ProjectileId, Tile, TowerId, TowerKind,
    KILL_REWARD, PROJECTILE_SPEED, STARTING_GOLD, STARTING_LIFE,
};

pub use grid::Grid;
pub use level::{create_level, LevelConfig, LevelError};

use towers::TowerRegistry;

/// Represents the authoritative Waypoint Defence simulation state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    path: Vec<CellCoord>,
    cell_size: f32,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    gold: u32,
    life: u32,
    wave: u32,
    running: bool,
    time_scale: f32,
    clock: Duration,
    next_enemy_id: u32,
    next_projectile_id: u32,
}

impl World {
    pub(crate) fn from_level(grid: Grid, path: Vec<CellCoord>, cell_size: f32) -> Self {
        Self {
            grid,
            path,
            cell_size,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            gold: STARTING_GOLD,
            life: STARTING_LIFE,
            wave: 0,
            running: true,
            time_scale: 1.0,
            clock: Duration::ZERO,
            next_enemy_id: 1,
            next_projectile_id: 1,
        }
    }

    fn live_enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies
            .iter_mut()
            .find(|enemy| enemy.id == id && enemy.alive)
    }

    fn live_projectile_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.projectiles
            .iter_mut()
            .find(|projectile| projectile.id == id && projectile.alive)
    }

    fn validate_placement(&self, kind: TowerKind, cell: CellCoord) -> Result<(), PlacementError> {
        match self.grid.tile(cell) {
            None => return Err(PlacementError::OutOfBounds),
            Some(Tile::Path) => return Err(PlacementError::NotBuildable),
            Some(Tile::Buildable) => {}
        }
        if self.towers.occupant(cell).is_some() {
            return Err(PlacementError::Occupied);
        }
        if self.gold < kind.stats().cost {
            return Err(PlacementError::InsufficientGold);
        }
        Ok(())
    }

    fn place_tower(&mut self, kind: TowerKind, cell: CellCoord, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.validate_placement(kind, cell) {
            log::debug!("rejected {kind:?} tower at {cell:?}: {reason}");
            out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            return;
        }

        self.gold -= kind.stats().cost;
        let tower = self.towers.insert(kind, cell);
        log::debug!("placed {kind:?} tower {} at {cell:?}", tower.get());
        out_events.push(Event::TowerPlaced { tower, kind, cell });
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        if !self
            .enemies
            .iter()
            .any(|enemy| enemy.id == target && enemy.alive)
        {
            return;
        }

        let now = self.clock;
        let cell_size = self.cell_size;
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        state.last_shot_at = Some(now);
        let kind = state.kind;
        let origin = state.cell.center(cell_size);

        let projectile = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        self.projectiles.push(Projectile {
            id: projectile,
            position: origin,
            target,
            speed: PROJECTILE_SPEED,
            alive: true,
            kind,
        });
        out_events.push(Event::ProjectileFired {
            projectile,
            tower,
            target,
        });
    }

    fn resolve_impact(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) {
        let Some(state) = self.live_projectile_mut(projectile) else {
            return;
        };
        state.alive = false;
        let target = state.target;
        let damage = state.kind.stats().damage;

        let Some(enemy) = self.live_enemy_mut(target) else {
            out_events.push(Event::ProjectileDiscarded { projectile });
            return;
        };
        enemy.life = enemy.life.saturating_sub(damage);
        let remaining = enemy.life;
        out_events.push(Event::EnemyDamaged {
            enemy: target,
            damage,
            remaining,
        });

        if remaining == 0 {
            enemy.alive = false;
            self.gold = self.gold.saturating_add(KILL_REWARD);
            log::debug!("enemy {} destroyed, gold now {}", target.get(), self.gold);
            out_events.push(Event::EnemyDestroyed {
                enemy: target,
                reward: KILL_REWARD,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            if !world.running {
                return;
            }
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SetRunning { running } => {
            if world.running != running {
                world.running = running;
                out_events.push(Event::RunningChanged { running });
            }
        }
        Command::SetTimeScale { scale } => {
            if scale.is_finite() && scale > 0.0 {
                world.time_scale = scale;
                out_events.push(Event::TimeScaleChanged { scale });
            } else {
                log::warn!("ignoring invalid time scale {scale}");
                out_events.push(Event::TimeScaleRejected { scale });
            }
        }
        Command::PlaceTower { kind, cell } => world.place_tower(kind, cell, out_events),
        Command::SpawnEnemy {
            position,
            speed,
            life,
        } => {
            let id = EnemyId::new(world.next_enemy_id);
            world.next_enemy_id = world.next_enemy_id.saturating_add(1);
            world.enemies.push(Enemy {
                id,
                position,
                speed,
                life,
                alive: true,
                path_index: 0,
            });
            out_events.push(Event::EnemySpawned {
                enemy: id,
                position,
            });
        }
        Command::AdvanceWave => {
            world.wave = world.wave.saturating_add(1);
            log::debug!("wave {} spawned", world.wave);
            out_events.push(Event::WaveAdvanced { wave: world.wave });
        }
        Command::MoveEnemy {
            enemy,
            position,
            path_index,
        } => {
            if let Some(state) = world.live_enemy_mut(enemy) {
                state.position = position;
                state.path_index = path_index;
            }
        }
        Command::LeakEnemy { enemy } => {
            let Some(state) = world.live_enemy_mut(enemy) else {
                return;
            };
            state.alive = false;
            world.life = world.life.saturating_sub(1);
            log::debug!("enemy {} leaked, life now {}", enemy.get(), world.life);
            out_events.push(Event::EnemyLeaked {
                enemy,
                life: world.life,
            });
        }
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events)
        }
        Command::MoveProjectile {
            projectile,
            position,
        } => {
            if let Some(state) = world.live_projectile_mut(projectile) {
                state.position = position;
            }
        }
        Command::ResolveImpact { projectile } => world.resolve_impact(projectile, out_events),
        Command::DiscardProjectile { projectile } => {
            if let Some(state) = world.live_projectile_mut(projectile) {
                state.alive = false;
                out_events.push(Event::ProjectileDiscarded { projectile });
            }
        }
        Command::EvictDead => {
            world.enemies.retain(|enemy| enemy.alive);
            world.projectiles.retain(|projectile| projectile.alive);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Grid, World};
    use waypoint_defence_core::{
        CellCoord, EnemySnapshot, EnemyView, HudStats, ProjectileSnapshot, ProjectileView,
        TowerCooldownSnapshot, TowerCooldownView, TowerSnapshot, TowerView,
    };

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Ordered path cells from spawn to goal.
    #[must_use]
    pub fn path(world: &World) -> &[CellCoord] {
        &world.path
    }

    /// Cell where every wave enters the map.
    #[must_use]
    pub fn spawn_cell(world: &World) -> Option<CellCoord> {
        world.path.first().copied()
    }

    /// Cell enemies try to reach.
    #[must_use]
    pub fn goal_cell(world: &World) -> Option<CellCoord> {
        world.path.last().copied()
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub fn cell_size(world: &World) -> f32 {
        world.cell_size
    }

    /// Whether the update step currently advances the simulation.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.running
    }

    /// Multiplier applied to real time before it reaches the update step.
    #[must_use]
    pub fn time_scale(world: &World) -> f32 {
        world.time_scale
    }

    /// Total simulated time advanced while running.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Number of waves spawned so far.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Number of towers placed so far.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.towers.len()
    }

    /// Reports whether no enemy is left in play.
    #[must_use]
    pub fn is_field_clear(world: &World) -> bool {
        world.enemies.iter().all(|enemy| !enemy.alive)
    }

    /// Captures the scorekeeping values shown by heads-up displays.
    #[must_use]
    pub fn hud(world: &World) -> HudStats {
        HudStats {
            gold: world.gold,
            life: world.life,
            wave: world.wave,
            running: world.running,
            time_scale: world.time_scale,
            enemies: world.enemies.iter().filter(|enemy| enemy.alive).count(),
        }
    }

    /// Captures every enemy, dead or alive, in insertion order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    speed: enemy.speed,
                    life: enemy.life,
                    alive: enemy.alive,
                    path_index: enemy.path_index,
                })
                .collect(),
        )
    }

    /// Captures every tower in placement order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    cell: tower.cell,
                    center: tower.cell.center(world.cell_size),
                    level: tower.level,
                })
                .collect(),
        )
    }

    /// Captures when every tower last fired.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerCooldownSnapshot {
                    tower: tower.id,
                    kind: tower.kind,
                    last_shot_at: tower.last_shot_at,
                })
                .collect(),
        )
    }

    /// Captures every projectile, in flight or spent, in firing order.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    position: projectile.position,
                    target: projectile.target,
                    speed: projectile.speed,
                    alive: projectile.alive,
                    kind: projectile.kind,
                })
                .collect(),
        )
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    position: Vec2,
    speed: f32,
    life: u32,
    alive: bool,
    path_index: usize,
}

#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    position: Vec2,
    target: EnemyId,
    speed: f32,
    alive: bool,
    kind: TowerKind,
}
