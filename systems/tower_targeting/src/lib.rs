#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use glam::Vec2;
use waypoint_defence_core::{EnemyId, EnemyView, TowerKind, TowerTarget, TowerView};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower picks the first live enemy, in view order, whose distance to
    /// the tower centre does not exceed the tower's range. The output buffer is
    /// cleared before populating it with the latest assignments.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.iter().next().is_none() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in towers.iter() {
            let Some(candidate) = self.first_in_range(tower.kind, tower.center) else {
                continue;
            };
            out.push(TowerTarget {
                tower: tower.id,
                enemy: candidate.id,
                tower_center: tower.center,
                enemy_position: candidate.position,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.extend(
            enemies
                .iter()
                .filter(|enemy| enemy.alive)
                .map(|enemy| EnemyCandidate {
                    id: enemy.id,
                    position: enemy.position,
                }),
        );
    }

    fn first_in_range(&self, kind: TowerKind, center: Vec2) -> Option<&EnemyCandidate> {
        let range = kind.stats().range;
        let range_sq = range * range;
        self.enemy_workspace
            .iter()
            .find(|candidate| candidate.position.distance_squared(center) <= range_sq)
    }
}

#[derive(Clone, Copy, Debug)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::{CellCoord, EnemySnapshot, TowerId, TowerSnapshot};

    fn tower(id: u32, kind: TowerKind, center: Vec2) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            cell: CellCoord::new(0, 0),
            center,
            level: 1,
        }
    }

    fn enemy(id: u32, position: Vec2, alive: bool) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position,
            speed: 40.0,
            life: 60,
            alive,
            path_index: 0,
        }
    }

    #[test]
    fn no_enemies_yields_no_targets() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(0, TowerKind::Mage, Vec2::ZERO)]);
        let mut out = vec![TowerTarget {
            tower: TowerId::new(9),
            enemy: EnemyId::new(9),
            tower_center: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }];

        system.handle(&towers, &EnemyView::default(), &mut out);

        assert!(out.is_empty(), "stale targets must be cleared");
    }

    #[test]
    fn first_enemy_in_view_order_wins_over_closer_ones() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(0, TowerKind::Mage, Vec2::ZERO)]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy(1, Vec2::new(200.0, 0.0), true),
            enemy(2, Vec2::new(100.0, 0.0), true),
            enemy(3, Vec2::new(10.0, 0.0), true),
        ]);
        let mut out = Vec::new();

        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(2));
        assert_eq!(out[0].enemy_position, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(0, TowerKind::Combat, Vec2::ZERO)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(4, Vec2::new(0.0, 96.0), true)]);
        let mut out = Vec::new();

        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
    }

    #[test]
    fn dead_enemies_are_never_targeted() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(0, TowerKind::Mage, Vec2::ZERO)]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy(1, Vec2::new(5.0, 0.0), false),
            enemy(2, Vec2::new(50.0, 0.0), true),
        ]);
        let mut out = Vec::new();

        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn each_tower_uses_its_own_range() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![
            tower(0, TowerKind::Combat, Vec2::ZERO),
            tower(1, TowerKind::Mage, Vec2::ZERO),
        ]);
        let enemies = EnemyView::from_snapshots(vec![enemy(7, Vec2::new(110.0, 0.0), true)]);
        let mut out = Vec::new();

        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tower, TowerId::new(1));
    }
}
