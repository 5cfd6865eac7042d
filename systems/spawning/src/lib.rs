#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave planner responsible for emitting enemy spawn commands.

use glam::Vec2;
use waypoint_defence_core::{CellCoord, Command};

const BASE_ENEMY_COUNT: u32 = 6;
const ENEMIES_PER_WAVE: u32 = 2;
const BASE_SPEED: f32 = 40.0;
const SPEED_PER_WAVE: f32 = 4.0;
const BASE_LIFE: u32 = 60;
const LIFE_PER_WAVE: u32 = 10;
const SPAWN_SPACING: f32 = 24.0;

/// Size and strength of the enemies released by one wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveProfile {
    /// Number of enemies in the wave.
    pub count: u32,
    /// Movement speed of every enemy in pixels per second.
    pub speed: f32,
    /// Starting life of every enemy.
    pub life: u32,
}

impl WaveProfile {
    /// Profile of the wave released while `wave` waves have already spawned.
    #[must_use]
    pub fn for_wave(wave: u32) -> Self {
        Self {
            count: BASE_ENEMY_COUNT.saturating_add(ENEMIES_PER_WAVE.saturating_mul(wave)),
            speed: BASE_SPEED + SPEED_PER_WAVE * wave as f32,
            life: BASE_LIFE.saturating_add(LIFE_PER_WAVE.saturating_mul(wave)),
        }
    }
}

/// Pure system that turns the current wave number into spawn commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaveSpawner;

impl WaveSpawner {
    /// Creates a new wave spawner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits one spawn per enemy of the next wave, then advances the wave counter.
    ///
    /// Enemies line up to the left of the spawn cell centre so they enter the
    /// path one after another.
    pub fn plan(&self, wave: u32, spawn_cell: CellCoord, cell_size: f32, out: &mut Vec<Command>) {
        let profile = WaveProfile::for_wave(wave);
        let origin = spawn_cell.center(cell_size);
        log::debug!(
            "planning wave {} with {} enemies at {origin}",
            wave.saturating_add(1),
            profile.count
        );

        out.reserve(profile.count as usize + 1);
        for index in 0..profile.count {
            out.push(Command::SpawnEnemy {
                position: origin - Vec2::new(index as f32 * SPAWN_SPACING, 0.0),
                speed: profile.speed,
                life: profile.life,
            });
        }
        out.push(Command::AdvanceWave);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_wave_profile_matches_base_values() {
        let profile = WaveProfile::for_wave(0);
        assert_eq!(profile.count, 6);
        assert!((profile.speed - 40.0).abs() < f32::EPSILON);
        assert_eq!(profile.life, 60);
    }

    #[test]
    fn profile_scales_linearly_with_wave() {
        let profile = WaveProfile::for_wave(3);
        assert_eq!(profile.count, 12);
        assert!((profile.speed - 52.0).abs() < f32::EPSILON);
        assert_eq!(profile.life, 90);
    }
}
