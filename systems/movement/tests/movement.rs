use std::time::Duration;

use glam::Vec2;
use waypoint_defence_core::{Command, Event};
use waypoint_defence_system_movement::Movement;
use waypoint_defence_world::{self as world, create_level, query, LevelConfig, World};

const FRAME: Duration = Duration::from_millis(16);

fn step(world: &mut World, movement: &Movement, log: &mut Vec<Event>) {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: FRAME }, &mut events);

    let mut commands = Vec::new();
    movement.handle(
        &events,
        &query::enemy_view(world),
        query::path(world),
        query::cell_size(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    log.extend(events);
}

fn spawn_at_start(world: &mut World, speed: f32) {
    let spawn = query::spawn_cell(world).expect("path has a spawn cell");
    let position = spawn.center(query::cell_size(world));
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            position,
            speed,
            life: 60,
        },
        &mut events,
    );
}

#[test]
fn enemy_follows_path_cells_in_order() {
    let mut world = create_level(&LevelConfig::default()).expect("level builds");
    spawn_at_start(&mut world, 120.0);
    let movement = Movement::new();
    let mut log = Vec::new();

    let mut last_index = 0;
    for _ in 0..200 {
        step(&mut world, &movement, &mut log);
        let view = query::enemy_view(&world);
        let Some(enemy) = view.iter().next() else {
            break;
        };
        assert!(
            enemy.path_index == last_index || enemy.path_index == last_index + 1,
            "path index jumped from {last_index} to {}",
            enemy.path_index
        );
        last_index = enemy.path_index;
    }

    assert!(last_index > 3, "enemy barely moved: index {last_index}");
}

#[test]
fn enemy_stays_on_segment_between_waypoints() {
    let mut world = create_level(&LevelConfig::default()).expect("level builds");
    spawn_at_start(&mut world, 200.0);
    let movement = Movement::new();
    let cell_size = query::cell_size(&world);
    let path = query::path(&world).to_vec();
    let mut log = Vec::new();

    for _ in 0..120 {
        step(&mut world, &movement, &mut log);
        let view = query::enemy_view(&world);
        let Some(enemy) = view.iter().find(|enemy| enemy.alive) else {
            break;
        };
        let from = path[enemy.path_index].center(cell_size);
        let to = path[(enemy.path_index + 1).min(path.len() - 1)].center(cell_size);
        let along = (enemy.position - from).length() + (to - enemy.position).length();
        assert!(
            (along - (to - from).length()).abs() < 1e-2,
            "enemy at {} left the segment {from} -> {to}",
            enemy.position
        );
    }
}

#[test]
fn enemy_reaching_goal_costs_one_life() {
    let config = LevelConfig {
        columns: 4,
        rows: 4,
        ..LevelConfig::default()
    };
    let mut world = create_level(&config).expect("level builds");
    spawn_at_start(&mut world, 400.0);
    let movement = Movement::new();
    let mut log = Vec::new();

    for _ in 0..600 {
        step(&mut world, &movement, &mut log);
    }

    let leaks = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyLeaked { .. }))
        .count();
    assert_eq!(leaks, 1);
    assert_eq!(query::hud(&world).life, 9);
    assert!(query::is_field_clear(&world));

    let enemy = query::enemy_view(&world).into_vec()[0];
    let goal = query::goal_cell(&world).expect("path has a goal");
    assert_eq!(enemy.position, goal.center(query::cell_size(&world)));
    assert_ne!(enemy.position, Vec2::ZERO);
}
