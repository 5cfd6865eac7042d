#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Waypoint Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Systems read immutable views of the
//! world and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gold credited to the player when the simulation starts.
pub const STARTING_GOLD: u32 = 150;

/// Life points available to the player when the simulation starts.
pub const STARTING_LIFE: u32 = 10;

/// Gold credited for every enemy destroyed by a projectile.
pub const KILL_REWARD: u32 = 5;

/// Speed of every projectile measured in pixels per second.
pub const PROJECTILE_SPEED: f32 = 280.0;

/// Distance in pixels below which a projectile counts as having hit its target.
pub const IMPACT_RADIUS: f32 = 6.0;

/// Distance in pixels below which an enemy snaps onto its next waypoint.
pub const WAYPOINT_SNAP_DISTANCE: f32 = 1.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided, already scaled, delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Pauses or resumes the simulation.
    SetRunning {
        /// Whether the update step should advance the simulation.
        running: bool,
    },
    /// Changes the multiplier applied to real time before it reaches the update step.
    SetTimeScale {
        /// Requested multiplier; must be finite and strictly positive.
        scale: f32,
    },
    /// Requests purchase and placement of a tower on the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell the tower should occupy.
        cell: CellCoord,
    },
    /// Appends a new enemy at the provided pixel position.
    SpawnEnemy {
        /// Pixel-space position of the enemy.
        position: Vec2,
        /// Travel speed in pixels per second.
        speed: f32,
        /// Health points of the enemy.
        life: u32,
    },
    /// Marks the end of a wave batch and increments the wave counter.
    AdvanceWave,
    /// Moves an enemy along the path.
    MoveEnemy {
        /// Identifier of the enemy being moved.
        enemy: EnemyId,
        /// Pixel-space position reached during this frame.
        position: Vec2,
        /// Index of the last waypoint the enemy reached.
        path_index: usize,
    },
    /// Reports that an enemy reached the goal cell.
    LeakEnemy {
        /// Identifier of the enemy that leaked.
        enemy: EnemyId,
    },
    /// Requests that a tower fires a projectile at an enemy.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy the projectile homes toward.
        target: EnemyId,
    },
    /// Moves an in-flight projectile.
    MoveProjectile {
        /// Identifier of the projectile being moved.
        projectile: ProjectileId,
        /// Pixel-space position reached during this frame.
        position: Vec2,
    },
    /// Resolves a projectile hitting its target.
    ResolveImpact {
        /// Identifier of the projectile that reached its target.
        projectile: ProjectileId,
    },
    /// Discards a projectile whose target vanished.
    DiscardProjectile {
        /// Identifier of the orphaned projectile.
        projectile: ProjectileId,
    },
    /// Removes every dead enemy and projectile from the world.
    EvictDead,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the simulation was paused or resumed.
    RunningChanged {
        /// Whether the simulation is running after the change.
        running: bool,
    },
    /// Announces that a new time scale is active.
    TimeScaleChanged {
        /// Multiplier that became active.
        scale: f32,
    },
    /// Reports that a time scale request was rejected.
    TimeScaleRejected {
        /// Multiplier that was refused.
        scale: f32,
    },
    /// Confirms that a tower was purchased and placed.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that an enemy entered the map.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Pixel-space spawn position.
        position: Vec2,
    },
    /// Announces that a wave finished spawning.
    WaveAdvanced {
        /// Wave counter after the increment.
        wave: u32,
    },
    /// Reports that an enemy reached the goal and cost the player life.
    EnemyLeaked {
        /// Identifier of the enemy that leaked.
        enemy: EnemyId,
        /// Remaining player life.
        life: u32,
    },
    /// Confirms that a tower fired.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy targeted by the projectile.
        target: EnemyId,
    },
    /// Reports that a projectile damaged its target.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EnemyId,
        /// Damage dealt by the projectile.
        damage: u32,
        /// Life the enemy has left.
        remaining: u32,
    },
    /// Reports that an enemy was destroyed by a projectile.
    EnemyDestroyed {
        /// Enemy that was destroyed.
        enemy: EnemyId,
        /// Gold credited for the kill.
        reward: u32,
    },
    /// Reports that a projectile lost its target before impact.
    ProjectileDiscarded {
        /// Projectile that was discarded.
        projectile: ProjectileId,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Pixel-space centre of the cell for the provided cell size.
    #[must_use]
    pub fn center(self, cell_size: f32) -> Vec2 {
        Vec2::new(
            self.column as f32 * cell_size + cell_size / 2.0,
            self.row as f32 * cell_size + cell_size / 2.0,
        )
    }
}

/// Kind of a single grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Tile traversed by enemies; towers cannot be built here.
    Path,
    /// Tile eligible for tower placement.
    Buildable,
}

/// Closed set of map layouts the path generator knows how to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapShape {
    /// Down one side, across the bottom, up the other side.
    U,
    /// Horizontal traversals joined by switchbacks.
    S,
    /// Two stepped diagonals crossing each other, joined by a base leg.
    XBase,
    /// Randomised waypoints with crossing detours.
    Random,
}

impl MapShape {
    /// Every supported shape in presentation order.
    pub const ALL: [MapShape; 4] = [Self::U, Self::S, Self::XBase, Self::Random];

    /// Human readable label used by adapters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::U => "U shape",
            Self::S => "S shape",
            Self::XBase => "X with base",
            Self::Random => "Random",
        }
    }

    /// Reports whether the shape draws on a random number generator.
    #[must_use]
    pub const fn is_random(self) -> bool {
        matches!(self, Self::Random)
    }
}

/// Types of towers that can be constructed on buildable tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TowerKind {
    /// Long range, slow firing, heavy damage.
    Mage,
    /// Short range, fast firing, light damage.
    Combat,
}

impl TowerKind {
    /// Every constructible tower kind.
    pub const ALL: [TowerKind; 2] = [Self::Mage, Self::Combat];

    /// Returns the fixed stat block associated with the tower kind.
    ///
    /// Placement cost and projectile damage both read this table.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Mage => TowerStats {
                cost: 60,
                range: 120.0,
                fire_rate: 0.9,
                damage: 35,
            },
            Self::Combat => TowerStats {
                cost: 40,
                range: 96.0,
                fire_rate: 1.5,
                damage: 20,
            },
        }
    }
}

/// Fixed attributes of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Gold deducted when the tower is purchased.
    pub cost: u32,
    /// Targeting radius in pixels measured from the tower's cell centre.
    pub range: f32,
    /// Shots per second.
    pub fire_rate: f32,
    /// Life removed from the target by each projectile.
    pub damage: u32,
}

impl TowerStats {
    /// Minimum simulated time between two consecutive shots.
    ///
    /// A non-positive fire rate yields [`Duration::MAX`] so the tower never fires.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        if self.fire_rate.is_finite() && self.fire_rate > 0.0 {
            Duration::from_secs_f32(1.0 / self.fire_rate)
        } else {
            Duration::MAX
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// The requested cell is part of the enemy path.
    #[error("cell is not buildable")]
    NotBuildable,
    /// Another tower already occupies the requested cell.
    #[error("cell is already occupied by a tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("not enough gold")]
    InsufficientGold,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Pixel-space position of the enemy.
    pub position: Vec2,
    /// Travel speed in pixels per second.
    pub speed: f32,
    /// Remaining health points.
    pub life: u32,
    /// Whether the enemy is still in play.
    pub alive: bool,
    /// Index of the last waypoint the enemy reached.
    pub path_index: usize,
}

/// Read-only snapshot describing all enemies in insertion order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    ///
    /// Insertion order is preserved because targeting picks the first enemy found.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Finds the live enemy carrying the provided identifier.
    #[must_use]
    pub fn live(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.id == id && snapshot.alive)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Pixel-space centre of the occupied cell.
    pub center: Vec2,
    /// Upgrade level of the tower.
    pub level: u32,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Firing history of a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Identifier of the tower.
    pub tower: TowerId,
    /// Kind of the tower, which fixes its fire interval.
    pub kind: TowerKind,
    /// Simulation clock reading of the last shot, if the tower ever fired.
    pub last_shot_at: Option<Duration>,
}

/// Read-only snapshot describing every tower's cooldown.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view sorted by tower identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured cooldowns in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Cooldown state of the provided tower, if it exists.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerCooldownSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.tower)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Target assignment produced by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Pixel-space centre of the tower.
    pub tower_center: Vec2,
    /// Pixel-space position of the enemy when it was acquired.
    pub enemy_position: Vec2,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Pixel-space position of the projectile.
    pub position: Vec2,
    /// Enemy the projectile homes toward.
    pub target: EnemyId,
    /// Travel speed in pixels per second.
    pub speed: f32,
    /// Whether the projectile is still in flight.
    pub alive: bool,
    /// Kind of the tower that fired the projectile.
    pub kind: TowerKind,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Scorekeeping values shown by heads-up displays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudStats {
    /// Gold available to the player.
    pub gold: u32,
    /// Life points left.
    pub life: u32,
    /// Number of waves spawned so far.
    pub wave: u32,
    /// Whether the simulation is running.
    pub running: bool,
    /// Active time scale multiplier.
    pub time_scale: f32,
    /// Number of enemies still in play.
    pub enemies: usize,
}
