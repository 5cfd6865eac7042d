#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path generation for the enemy lane.
//!
//! Every shape is assembled from a list of waypoints joined by [`connect`],
//! which walks one axis fully before the other. Contiguity therefore holds by
//! construction: consecutive cells always differ by a single step along a
//! single axis.

use rand::{seq::index, Rng};
use thiserror::Error;
use waypoint_defence_core::{CellCoord, MapShape};

const MIN_INTERIOR_WAYPOINTS: usize = 2;
const MAX_INTERIOR_WAYPOINTS: usize = 4;
const MIN_CROSSINGS: usize = 1;
const MAX_CROSSINGS: usize = 2;

/// Tuning switches for the path generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathOptions {
    /// Whether the random shape may cross over cells it already visited.
    pub allow_revisits: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            allow_revisits: true,
        }
    }
}

/// Order in which [`connect`] walks the two axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisOrder {
    /// Walk along the row to the target column, then along the column.
    HorizontalFirst,
    /// Walk along the column to the target row, then along the row.
    VerticalFirst,
}

impl AxisOrder {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::HorizontalFirst
        } else {
            Self::VerticalFirst
        }
    }
}

/// Reasons path generation can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// One of the grid axes has no cells.
    #[error("a {columns}x{rows} grid leaves no room for a path")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}

/// Generates the ordered list of cells enemies traverse.
///
/// `U`, `S` and `XBase` ignore `rng` and always yield the same path for the
/// same dimensions. `Random` draws every decision from `rng`.
pub fn generate_path<R: Rng + ?Sized>(
    shape: MapShape,
    columns: u32,
    rows: u32,
    options: PathOptions,
    rng: &mut R,
) -> Result<Vec<CellCoord>, PathError> {
    if columns == 0 || rows == 0 {
        return Err(PathError::EmptyGrid { columns, rows });
    }

    let mut path = match shape {
        MapShape::U => u_shape(columns, rows),
        MapShape::S => s_shape(columns, rows),
        MapShape::XBase => x_base_shape(columns, rows),
        MapShape::Random => random_shape(columns, rows, options, rng),
    };
    path.dedup();

    log::debug!(
        "generated {} path on a {columns}x{rows} grid with {} cells",
        shape.label(),
        path.len()
    );
    Ok(path)
}

/// Appends every cell between the last path cell and `to`.
///
/// An empty path simply receives `to` as its first cell.
pub fn connect(path: &mut Vec<CellCoord>, to: CellCoord, order: AxisOrder) {
    let Some(&from) = path.last() else {
        path.push(to);
        return;
    };

    let corner = match order {
        AxisOrder::HorizontalFirst => CellCoord::new(to.column(), from.row()),
        AxisOrder::VerticalFirst => CellCoord::new(from.column(), to.row()),
    };
    walk(path, corner);
    walk(path, to);
}

/// Reports whether every consecutive pair of cells is exactly one axis step apart.
#[must_use]
pub fn is_contiguous(path: &[CellCoord]) -> bool {
    path.windows(2)
        .all(|pair| pair[0].manhattan_distance(pair[1]) == 1)
}

fn walk(path: &mut Vec<CellCoord>, to: CellCoord) {
    let Some(mut current) = path.last().copied() else {
        path.push(to);
        return;
    };

    while current != to {
        current = if current.column() != to.column() {
            CellCoord::new(step_toward(current.column(), to.column()), current.row())
        } else {
            CellCoord::new(current.column(), step_toward(current.row(), to.row()))
        };
        path.push(current);
    }
}

fn step_toward(value: u32, target: u32) -> u32 {
    if value < target {
        value + 1
    } else if value > target {
        value - 1
    } else {
        value
    }
}

fn inset(length: u32) -> u32 {
    if length >= 3 {
        1
    } else {
        0
    }
}

fn u_shape(columns: u32, rows: u32) -> Vec<CellCoord> {
    let left = inset(columns);
    let right = columns - 1 - left;
    let bottom = rows - 1 - inset(rows);

    let mut path = vec![CellCoord::new(left, 0)];
    connect(&mut path, CellCoord::new(left, bottom), AxisOrder::VerticalFirst);
    connect(&mut path, CellCoord::new(right, bottom), AxisOrder::HorizontalFirst);
    connect(&mut path, CellCoord::new(right, 0), AxisOrder::VerticalFirst);
    path
}

fn s_shape(columns: u32, rows: u32) -> Vec<CellCoord> {
    let left = inset(columns);
    let right = columns - 1 - left;
    let top = if rows >= 7 { 1 } else { 0 };
    let bottom = rows - 1 - top;
    let middle = rows / 2;

    let mut path = vec![CellCoord::new(columns - 1, top)];
    connect(&mut path, CellCoord::new(left, top), AxisOrder::HorizontalFirst);
    connect(&mut path, CellCoord::new(left, middle), AxisOrder::VerticalFirst);
    connect(&mut path, CellCoord::new(right, middle), AxisOrder::HorizontalFirst);
    connect(&mut path, CellCoord::new(right, bottom), AxisOrder::VerticalFirst);
    connect(&mut path, CellCoord::new(0, bottom), AxisOrder::HorizontalFirst);
    path
}

fn x_base_shape(columns: u32, rows: u32) -> Vec<CellCoord> {
    let last_column = columns - 1;
    let last_row = rows - 1;

    let mut path = vec![CellCoord::new(0, 0)];
    stepped_diagonal(
        &mut path,
        CellCoord::new(last_column, last_row),
        AxisOrder::HorizontalFirst,
    );
    connect(&mut path, CellCoord::new(0, last_row), AxisOrder::HorizontalFirst);
    // Climbing vertically first keeps the second diagonal off the base leg.
    stepped_diagonal(
        &mut path,
        CellCoord::new(last_column, 0),
        AxisOrder::VerticalFirst,
    );
    path
}

fn stepped_diagonal(path: &mut Vec<CellCoord>, to: CellCoord, order: AxisOrder) {
    let Some(&from) = path.last() else {
        path.push(to);
        return;
    };

    let dx = i64::from(to.column()) - i64::from(from.column());
    let dy = i64::from(to.row()) - i64::from(from.row());
    let steps = dx.abs().max(dy.abs());

    for step in 1..=steps {
        let column = i64::from(from.column()) + dx * step / steps;
        let row = i64::from(from.row()) + dy * step / steps;
        let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
            continue;
        };
        connect(path, CellCoord::new(column, row), order);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Travel {
    Down,
    Right,
}

impl Travel {
    fn cell(self, along: u32, across: u32) -> CellCoord {
        match self {
            Self::Down => CellCoord::new(across, along),
            Self::Right => CellCoord::new(along, across),
        }
    }

    fn along(self, cell: CellCoord) -> u32 {
        match self {
            Self::Down => cell.row(),
            Self::Right => cell.column(),
        }
    }

    fn monotone_order(self) -> AxisOrder {
        match self {
            Self::Down => AxisOrder::HorizontalFirst,
            Self::Right => AxisOrder::VerticalFirst,
        }
    }
}

fn random_shape<R: Rng + ?Sized>(
    columns: u32,
    rows: u32,
    options: PathOptions,
    rng: &mut R,
) -> Vec<CellCoord> {
    let travel = if rng.gen_bool(0.5) {
        Travel::Down
    } else {
        Travel::Right
    };
    let (length, breadth) = match travel {
        Travel::Down => (rows, columns),
        Travel::Right => (columns, rows),
    };

    let mut waypoints = vec![travel.cell(0, rng.gen_range(0..breadth))];

    let available = usize::try_from(length.saturating_sub(2)).unwrap_or(0);
    let wanted = rng
        .gen_range(MIN_INTERIOR_WAYPOINTS..=MAX_INTERIOR_WAYPOINTS)
        .min(available);
    let mut interior: Vec<u32> = index::sample(rng, available, wanted)
        .into_iter()
        .filter_map(|offset| u32::try_from(offset + 1).ok())
        .collect();
    interior.sort_unstable();
    for along in interior {
        waypoints.push(travel.cell(along, rng.gen_range(0..breadth)));
    }

    waypoints.push(travel.cell(length - 1, rng.gen_range(0..breadth)));

    let mut path = Vec::new();
    if options.allow_revisits {
        inject_crossings(&mut waypoints, travel, breadth, rng);
        for waypoint in waypoints {
            let order = AxisOrder::random(rng);
            connect(&mut path, waypoint, order);
        }
    } else {
        // Strictly increasing waypoints joined travel-axis-last never touch a
        // row (or column) twice.
        for waypoint in waypoints {
            connect(&mut path, waypoint, travel.monotone_order());
        }
    }
    path
}

fn inject_crossings<R: Rng + ?Sized>(
    waypoints: &mut Vec<CellCoord>,
    travel: Travel,
    breadth: u32,
    rng: &mut R,
) {
    let crossings = rng.gen_range(MIN_CROSSINGS..=MAX_CROSSINGS);
    for _ in 0..crossings {
        if waypoints.len() < 2 {
            return;
        }
        let segment = rng.gen_range(0..waypoints.len() - 1);
        let start = travel.along(waypoints[segment]);
        let end = travel.along(waypoints[segment + 1]);
        let along = rng.gen_range(start.min(end)..=start.max(end));
        let detour = travel.cell(along, rng.gen_range(0..breadth));
        waypoints.insert(segment + 1, detour);
    }
}
