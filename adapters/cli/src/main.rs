#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Waypoint Defence session.

mod logging;
mod placement;
mod preview;
mod runner;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use waypoint_defence_core::{Command, Event, MapShape};
use waypoint_defence_system_path_generation::PathOptions;
use waypoint_defence_world::{self as world, create_level, query, LevelConfig, World};

use crate::{
    placement::{parse_shape, TowerPlacement},
    runner::{Outcome, RunSettings, WavePolicy},
    session::{LevelSection, SessionFile},
};

/// Headless Waypoint Defence session runner.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML session file with level settings and tower placements
    #[arg(long)]
    session: Option<PathBuf>,
    /// Number of tile columns
    #[arg(long)]
    columns: Option<u32>,
    /// Number of tile rows
    #[arg(long)]
    rows: Option<u32>,
    /// Tile side length in pixels
    #[arg(long)]
    cell_size: Option<f32>,
    /// Path layout: u, s, x-base or random
    #[arg(long, value_parser = parse_shape)]
    shape: Option<MapShape>,
    /// Seed for the random layout; drawn from entropy when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Keep random paths from crossing themselves
    #[arg(long)]
    forbid_revisits: bool,
    /// Tower to build before the session starts, as KIND@COLUMN,ROW
    #[arg(long = "tower", value_name = "KIND@COLUMN,ROW")]
    towers: Vec<TowerPlacement>,
    /// Towers required before the first wave
    #[arg(long, default_value_t = 6)]
    required_towers: usize,
    /// Number of waves to play
    #[arg(long, default_value_t = 3)]
    waves: u32,
    /// Time scale multiplier (the classic controls offer 1, 1.5 and 2)
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    /// Frames per second of the synthetic clock
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,
    /// Host seconds after which the session stops
    #[arg(long, default_value_t = 900)]
    time_limit: u64,
    /// Print the map and exit
    #[arg(long)]
    preview: bool,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Waypoint Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let session = match &args.session {
        Some(path) => SessionFile::load(path)?,
        None => SessionFile::default(),
    };

    let config = level_config(&args, &session.level);
    let mut world = create_level(&config).context("failed to build the level")?;
    log::info!(
        "{} map {}x{} (seed {}), path of {} cells",
        config.shape.label(),
        config.columns,
        config.rows,
        config.seed,
        query::path(&world).len()
    );

    for placement in session.towers.iter().chain(&args.towers) {
        place_tower(&mut world, placement);
    }
    set_time_scale(&mut world, args.speed)?;

    if args.preview {
        print!("{}", preview::render(&world));
        return Ok(());
    }

    let policy = WavePolicy {
        required_towers: args.required_towers,
        total_waves: args.waves,
    };
    if args.waves > 0 && !policy.first_wave_ready(&world) {
        bail!(
            "{} of {} required towers placed and gold remains; add placements with --tower",
            query::tower_count(&world),
            args.required_towers
        );
    }

    let settings = RunSettings {
        frame: Duration::from_secs(1) / args.fps,
        time_limit: Duration::from_secs(args.time_limit),
        policy,
    };
    let report = runner::run(&mut world, &settings);

    let verdict = match report.outcome {
        Outcome::Victory => "victory",
        Outcome::Defeat => "defeat",
        Outcome::TimedOut => "time limit reached",
    };
    println!(
        "{verdict} after {:.1}s: wave {}, life {}, gold {}, {} kills, {} leaks",
        report.elapsed.as_secs_f32(),
        report.hud.wave,
        report.hud.life,
        report.hud.gold,
        report.kills,
        report.leaks
    );
    Ok(())
}

fn level_config(args: &Args, level: &LevelSection) -> LevelConfig {
    let defaults = LevelConfig::default();
    LevelConfig {
        columns: args.columns.or(level.columns).unwrap_or(defaults.columns),
        rows: args.rows.or(level.rows).unwrap_or(defaults.rows),
        cell_size: args.cell_size.or(level.cell_size).unwrap_or(defaults.cell_size),
        shape: args.shape.or(level.shape).unwrap_or(defaults.shape),
        seed: args.seed.or(level.seed).unwrap_or_else(rand::random),
        path_options: PathOptions {
            allow_revisits: !(args.forbid_revisits || level.forbid_revisits.unwrap_or(false)),
        },
    }
}

fn place_tower(world: &mut World, placement: &TowerPlacement) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::PlaceTower {
            kind: placement.kind,
            cell: placement.cell(),
        },
        &mut events,
    );
    for event in events {
        match event {
            Event::TowerPlaced { kind, cell, .. } => {
                log::info!("placed {kind:?} tower at {},{}", cell.column(), cell.row());
            }
            Event::TowerPlacementRejected { kind, cell, reason } => {
                log::warn!(
                    "cannot place {kind:?} tower at {},{}: {reason}",
                    cell.column(),
                    cell.row()
                );
            }
            _ => {}
        }
    }
}

fn set_time_scale(world: &mut World, scale: f32) -> Result<()> {
    let mut events = Vec::new();
    world::apply(world, Command::SetTimeScale { scale }, &mut events);
    if events
        .iter()
        .any(|event| matches!(event, Event::TimeScaleRejected { .. }))
    {
        bail!("time scale {scale} must be positive and finite");
    }
    Ok(())
}
