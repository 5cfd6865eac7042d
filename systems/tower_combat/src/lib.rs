#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fire-rate throttle that releases shots for targeted towers.

use std::time::Duration;

use waypoint_defence_core::{Command, TowerCooldownSnapshot, TowerCooldownView, TowerTarget};

/// Pure system that turns target assignments into shots.
///
/// A tower fires at most once per fire interval of its kind, measured on the
/// simulation clock from its previous shot. The world stamps that clock on
/// the tower when it executes the shot.
#[derive(Debug, Default)]
pub struct TowerCombat;

impl TowerCombat {
    /// Creates a new combat system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Pushes `Command::FireProjectile` for every target whose tower is ready at `now`.
    pub fn handle(
        &self,
        now: Duration,
        cooldowns: &TowerCooldownView,
        targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        for target in targets {
            let Some(tower) = cooldowns.get(target.tower) else {
                continue;
            };
            if ready_in(tower, now).is_zero() {
                out.push(Command::FireProjectile {
                    tower: target.tower,
                    target: target.enemy,
                });
            }
        }
    }
}

/// Simulated time left before `tower` may fire again.
#[must_use]
pub fn ready_in(tower: &TowerCooldownSnapshot, now: Duration) -> Duration {
    let Some(last_shot_at) = tower.last_shot_at else {
        return Duration::ZERO;
    };
    last_shot_at
        .checked_add(tower.kind.stats().fire_interval())
        .map_or(Duration::MAX, |ready_at| ready_at.saturating_sub(now))
}
