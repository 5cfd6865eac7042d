use waypoint_defence_core::{CellCoord, Command, Tile, TowerKind, TowerTarget};
use waypoint_defence_system_tower_targeting::TowerTargeting;
use waypoint_defence_world::{self as world, create_level, query, LevelConfig, World};

fn tower_next_to_path(world: &World) -> CellCoord {
    let grid = query::grid(world);
    let spawn = query::spawn_cell(world).expect("path has a spawn cell");
    let candidates = [
        CellCoord::new(spawn.column().saturating_sub(1), spawn.row()),
        CellCoord::new(spawn.column() + 1, spawn.row()),
        CellCoord::new(spawn.column(), spawn.row() + 1),
    ];
    candidates
        .into_iter()
        .find(|cell| grid.tile(*cell) == Some(Tile::Buildable))
        .expect("spawn has a buildable neighbour")
}

fn targets(world: &World) -> Vec<TowerTarget> {
    let mut system = TowerTargeting::new();
    let mut out = Vec::new();
    system.handle(
        &query::tower_view(world),
        &query::enemy_view(world),
        &mut out,
    );
    out
}

#[test]
fn towers_acquire_enemies_spawned_by_the_world() {
    let mut world = create_level(&LevelConfig::default()).expect("level builds");
    let cell = tower_next_to_path(&world);
    let spawn = query::spawn_cell(&world).expect("path has a spawn cell");
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Combat,
            cell,
        },
        &mut events,
    );
    assert!(targets(&world).is_empty(), "nothing to shoot yet");

    let cell_size = query::cell_size(&world);
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            position: spawn.center(cell_size),
            speed: 40.0,
            life: 60,
        },
        &mut events,
    );

    let acquired = targets(&world);
    assert_eq!(acquired.len(), 1);
    assert_eq!(
        acquired[0].tower_center,
        cell.center(query::cell_size(&world))
    );
}

#[test]
fn targeting_is_repeatable_for_identical_snapshots() {
    let mut world = create_level(&LevelConfig::default()).expect("level builds");
    let cell = tower_next_to_path(&world);
    let spawn = query::spawn_cell(&world).expect("path has a spawn cell");
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlaceTower {
            kind: TowerKind::Mage,
            cell,
        },
        &mut events,
    );
    for index in 0..4 {
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                position: spawn.center(36.0) - glam::Vec2::new(index as f32 * 24.0, 0.0),
                speed: 40.0,
                life: 60,
            },
            &mut events,
        );
    }

    assert_eq!(targets(&world), targets(&world));
}
