//! Headless session loop driven by synthetic timestamps.

use std::time::Duration;

use waypoint_defence_core::{Event, HudStats, TowerKind};
use waypoint_defence_simulation::{spawn_wave, FrameDriver};
use waypoint_defence_world::{query, World};

/// Decides when the next wave is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WavePolicy {
    /// Towers that must stand before the first wave.
    pub(crate) required_towers: usize,
    /// Number of waves in the session.
    pub(crate) total_waves: u32,
}

impl WavePolicy {
    /// Reports whether the first wave may be released.
    ///
    /// The requirement is waived once the player cannot afford any tower.
    pub(crate) fn first_wave_ready(&self, world: &World) -> bool {
        let cheapest = TowerKind::ALL
            .iter()
            .map(|kind| kind.stats().cost)
            .min()
            .unwrap_or(0);
        query::tower_count(world) >= self.required_towers || query::hud(world).gold < cheapest
    }

    /// Reports whether a wave should spawn before the next frame.
    pub(crate) fn should_spawn(&self, world: &World) -> bool {
        let wave = query::wave(world);
        if wave >= self.total_waves {
            return false;
        }
        if wave == 0 {
            return self.first_wave_ready(world);
        }
        query::is_field_clear(world)
    }

    /// Reports whether every wave has been released and resolved.
    pub(crate) fn is_finished(&self, world: &World) -> bool {
        query::wave(world) >= self.total_waves && query::is_field_clear(world)
    }
}

/// Pacing and limits for a headless run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunSettings {
    /// Host time between two frames.
    pub(crate) frame: Duration,
    /// Host time after which the run stops.
    pub(crate) time_limit: Duration,
    /// Wave release policy.
    pub(crate) policy: WavePolicy,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every wave was cleared with life to spare.
    Victory,
    /// Life reached zero.
    Defeat,
    /// The time limit elapsed first.
    TimedOut,
}

/// Summary printed after a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Report {
    pub(crate) outcome: Outcome,
    pub(crate) hud: HudStats,
    pub(crate) elapsed: Duration,
    pub(crate) kills: usize,
    /// Life lost to leaks; leaks past zero life are not counted.
    pub(crate) leaks: u32,
}

/// Runs frames until the session is won, lost or out of time.
pub(crate) fn run(world: &mut World, settings: &RunSettings) -> Report {
    let mut driver = FrameDriver::new();
    let mut events = Vec::new();
    let mut last_hud: Option<HudStats> = None;
    let mut timestamp = Duration::ZERO;
    let starting_life = query::hud(world).life;
    let mut kills = 0;

    let outcome = loop {
        if settings.policy.should_spawn(world) {
            spawn_wave(world, &mut events);
        }
        driver.frame(world, timestamp, &mut events);

        kills += events
            .drain(..)
            .filter(|event| matches!(event, Event::EnemyDestroyed { .. }))
            .count();

        let hud = query::hud(world);
        if last_hud != Some(hud) {
            log::info!(
                "gold {} | life {} | wave {} | enemies {}",
                hud.gold,
                hud.life,
                hud.wave,
                hud.enemies
            );
            last_hud = Some(hud);
        }

        if hud.life == 0 {
            break Outcome::Defeat;
        }
        if settings.policy.is_finished(world) {
            break Outcome::Victory;
        }
        if timestamp >= settings.time_limit {
            break Outcome::TimedOut;
        }
        timestamp = timestamp.saturating_add(settings.frame);
    };

    let hud = query::hud(world);
    Report {
        outcome,
        hud,
        elapsed: timestamp,
        kills,
        leaks: starting_life.saturating_sub(hud.life),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::{CellCoord, Command, STARTING_LIFE};
    use waypoint_defence_world::{self as world, create_level, LevelConfig};

    fn settings(required_towers: usize, total_waves: u32) -> RunSettings {
        RunSettings {
            frame: Duration::from_millis(16),
            time_limit: Duration::from_secs(600),
            policy: WavePolicy {
                required_towers,
                total_waves,
            },
        }
    }

    fn place(world: &mut World, kind: TowerKind, column: u32, row: u32) {
        let mut events = Vec::new();
        world::apply(
            world,
            Command::PlaceTower {
                kind,
                cell: CellCoord::new(column, row),
            },
            &mut events,
        );
    }

    #[test]
    fn first_wave_waits_for_required_towers() {
        let mut world = create_level(&LevelConfig::default()).expect("level builds");
        let policy = settings(2, 1).policy;
        assert!(!policy.should_spawn(&world));

        place(&mut world, TowerKind::Combat, 0, 0);
        assert!(!policy.should_spawn(&world));
        place(&mut world, TowerKind::Combat, 0, 1);
        assert!(policy.should_spawn(&world));
    }

    #[test]
    fn requirement_is_waived_when_nothing_is_affordable() {
        let mut world = create_level(&LevelConfig::default()).expect("level builds");
        let policy = settings(6, 1).policy;
        place(&mut world, TowerKind::Mage, 0, 0);
        place(&mut world, TowerKind::Mage, 0, 1);
        assert_eq!(query::hud(&world).gold, 30);
        assert!(policy.should_spawn(&world));
    }

    #[test]
    fn undefended_session_ends_in_defeat() {
        let mut world = create_level(&LevelConfig::default()).expect("level builds");
        let report = run(&mut world, &settings(0, 5));
        assert_eq!(report.outcome, Outcome::Defeat);
        assert_eq!(report.hud.life, 0);
        assert_eq!(report.leaks, 10);
        assert_eq!(report.kills, 0);
    }

    #[test]
    fn simultaneous_leaks_count_only_lost_life() {
        let mut world = create_level(&LevelConfig::default()).expect("level builds");
        let spawn = query::spawn_cell(&world).expect("level has a path");
        let position = spawn.center(query::cell_size(&world));
        let mut events = Vec::new();
        for _ in 0..12 {
            world::apply(
                &mut world,
                Command::SpawnEnemy {
                    position,
                    speed: 200.0,
                    life: 60,
                },
                &mut events,
            );
        }

        let report = run(&mut world, &settings(0, 0));

        assert_eq!(report.outcome, Outcome::Defeat);
        assert_eq!(report.hud.life, 0);
        assert_eq!(report.leaks, STARTING_LIFE);
    }

    #[test]
    fn zero_waves_is_an_immediate_victory() {
        let mut world = create_level(&LevelConfig::default()).expect("level builds");
        let report = run(&mut world, &settings(0, 0));
        assert_eq!(report.outcome, Outcome::Victory);
        assert_eq!(report.elapsed, Duration::ZERO);
    }
}
