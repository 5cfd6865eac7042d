#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks enemies along the path waypoints.

use std::time::Duration;

use waypoint_defence_core::{
    CellCoord, Command, EnemySnapshot, EnemyView, Event, WAYPOINT_SNAP_DISTANCE,
};

/// Pure system that reacts to elapsed time and emits enemy movement commands.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes world events and the enemy view to emit movement commands.
    ///
    /// Every live enemy heads for the centre of the waypoint after the one it
    /// last reached. Enemies never overshoot: a step that would pass the
    /// waypoint ends on it, and the snap happens on the following update.
    pub fn handle(
        &self,
        events: &[Event],
        enemies: &EnemyView,
        path: &[CellCoord],
        cell_size: f32,
        out: &mut Vec<Command>,
    ) {
        let elapsed = elapsed(events);
        let Some(last) = path.len().checked_sub(1) else {
            return;
        };

        for enemy in enemies.iter().filter(|enemy| enemy.alive) {
            step_enemy(enemy, path, last, cell_size, elapsed, out);
        }
    }
}

fn elapsed(events: &[Event]) -> Duration {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TimeAdvanced { dt } => Some(*dt),
            _ => None,
        })
        .fold(Duration::ZERO, Duration::saturating_add)
}

fn step_enemy(
    enemy: &EnemySnapshot,
    path: &[CellCoord],
    last: usize,
    cell_size: f32,
    elapsed: Duration,
    out: &mut Vec<Command>,
) {
    let target_index = enemy.path_index.saturating_add(1).min(last);
    let waypoint = path[target_index].center(cell_size);
    let offset = waypoint - enemy.position;
    let distance = offset.length();

    if distance < WAYPOINT_SNAP_DISTANCE {
        out.push(Command::MoveEnemy {
            enemy: enemy.id,
            position: waypoint,
            path_index: target_index,
        });
        if target_index >= last {
            out.push(Command::LeakEnemy { enemy: enemy.id });
        }
        return;
    }

    let step = enemy.speed * elapsed.as_secs_f32();
    if step <= 0.0 {
        return;
    }
    let position = if step >= distance {
        waypoint
    } else {
        enemy.position + offset / distance * step
    };
    out.push(Command::MoveEnemy {
        enemy: enemy.id,
        position,
        path_index: enemy.path_index,
    });
}
