#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Homing projectile ballistics.

use std::time::Duration;

use waypoint_defence_core::{Command, EnemyView, Event, ProjectileView, IMPACT_RADIUS};

/// Pure system that steers projectiles toward their targets and reports impacts.
#[derive(Debug, Default)]
pub struct Projectiles;

impl Projectiles {
    /// Creates a new projectile system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits one command per live projectile.
    ///
    /// Projectiles whose target is gone are discarded. Projectiles closer than
    /// the impact radius resolve their hit. The rest move toward the target's
    /// current position without passing it.
    pub fn handle(
        &self,
        events: &[Event],
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        let elapsed = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        let seconds = elapsed.as_secs_f32();

        for projectile in projectiles.iter().filter(|projectile| projectile.alive) {
            let Some(target) = enemies.live(projectile.target) else {
                out.push(Command::DiscardProjectile {
                    projectile: projectile.id,
                });
                continue;
            };

            let offset = target.position - projectile.position;
            let distance = offset.length();
            if distance < IMPACT_RADIUS {
                out.push(Command::ResolveImpact {
                    projectile: projectile.id,
                });
                continue;
            }

            let step = projectile.speed * seconds;
            if step <= 0.0 {
                continue;
            }
            let position = if step >= distance {
                target.position
            } else {
                projectile.position + offset / distance * step
            };
            out.push(Command::MoveProjectile {
                projectile: projectile.id,
                position,
            });
        }
    }
}
