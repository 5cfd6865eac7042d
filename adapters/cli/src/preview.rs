//! Plain-text rendering of a level.

use std::fmt::Write as _;

use waypoint_defence_core::{CellCoord, Tile, TowerKind};
use waypoint_defence_world::{query, World};

const SPAWN: char = 'S';
const GOAL: char = 'G';
const PATH: char = '#';
const BUILDABLE: char = '.';

fn tower_glyph(kind: TowerKind) -> char {
    match kind {
        TowerKind::Mage => 'M',
        TowerKind::Combat => 'C',
    }
}

/// Draws one character per tile, one line per row.
pub(crate) fn render(world: &World) -> String {
    let grid = query::grid(world);
    let spawn = query::spawn_cell(world);
    let goal = query::goal_cell(world);
    let towers = query::tower_view(world).into_vec();

    let mut output = String::new();
    for (row, tiles) in (0u32..).zip(grid.rows_iter()) {
        for (column, tile) in (0u32..).zip(tiles) {
            let cell = CellCoord::new(column, row);
            let glyph = if Some(cell) == spawn {
                SPAWN
            } else if Some(cell) == goal {
                GOAL
            } else if let Some(tower) = towers.iter().find(|tower| tower.cell == cell) {
                tower_glyph(tower.kind)
            } else {
                match tile {
                    Tile::Path => PATH,
                    Tile::Buildable => BUILDABLE,
                }
            };
            output.push(glyph);
        }
        output.push('\n');
    }

    let _ = writeln!(
        output,
        "path: {} cells, towers: {}",
        query::path(world).len(),
        towers.len()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::Command;
    use waypoint_defence_world::{self as world, create_level, LevelConfig};

    #[test]
    fn marks_spawn_goal_path_and_towers() {
        let mut world = create_level(&LevelConfig::default()).expect("level builds");
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::PlaceTower {
                kind: TowerKind::Mage,
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );

        let preview = render(&world);
        let lines: Vec<&str> = preview.lines().collect();

        assert_eq!(lines.len(), 21, "twenty rows plus the summary");
        assert!(lines[..20].iter().all(|line| line.chars().count() == 15));
        assert_eq!(preview.matches(SPAWN).count(), 1);
        assert_eq!(preview.matches(GOAL).count(), 1);
        assert!(lines[0].starts_with('M'));
        assert_eq!(lines[20], "path: 49 cells, towers: 1");
    }
}
