//! Dense tile grid describing where enemies walk and towers may stand.

use waypoint_defence_core::{CellCoord, Tile};

/// Row-major grid of tiles fixed at level creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Allocates a grid where every tile is buildable.
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tiles: vec![Tile::Buildable; capacity],
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile stored at the provided cell, if the cell lies inside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Iterator over every row, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Tile]> {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.tiles.chunks(width)
    }

    /// Marks the cell as part of the path, returning `false` when it lies outside the grid.
    pub(crate) fn mark_path(&mut self, cell: CellCoord) -> bool {
        match self.index(cell).and_then(|index| self.tiles.get_mut(index)) {
            Some(tile) => {
                *tile = Tile::Path;
                true
            }
            None => false,
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_buildable_everywhere() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.rows_iter().count(), 2);
        assert!(grid
            .rows_iter()
            .flatten()
            .all(|tile| *tile == Tile::Buildable));
    }

    #[test]
    fn marking_outside_the_grid_is_refused() {
        let mut grid = Grid::new(3, 3);
        assert!(!grid.mark_path(CellCoord::new(3, 0)));
        assert!(grid.mark_path(CellCoord::new(2, 1)));
        assert_eq!(grid.tile(CellCoord::new(2, 1)), Some(Tile::Path));
        assert_eq!(grid.tile(CellCoord::new(0, 3)), None);
    }
}
