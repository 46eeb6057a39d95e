//! Grid state: the authoritative cell → tile mapping
//!
//! Storage is a row-major array of optional tiles keyed by `Cell`, so the
//! one-tile-per-cell invariant holds by construction. Rendering positions ride
//! along on each tile but never influence game semantics.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::cell_center;

/// A grid coordinate (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell one `step` away, or `None` past the grid edge
    pub fn offset(self, step: (isize, isize), rows: usize, cols: usize) -> Option<Cell> {
        let row = self.row.checked_add_signed(step.0)?;
        let col = self.col.checked_add_signed(step.1)?;
        (row < rows && col < cols).then_some(Cell { row, col })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stable tile handle. Two tiles with equal value and cell are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// Two values merge when they match and their sum still fits a tile
#[inline]
pub fn can_merge(a: u32, b: u32) -> bool {
    a == b && a.checked_mul(2).is_some()
}

/// A numbered tile on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    /// Displayed number (a power of two)
    pub value: u32,
    /// Authoritative grid location
    pub cell: Cell,
    /// Pixel-space centre used for drawing
    pub render_pos: IVec2,
}

/// The board: at most one tile per cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cell_size: i32,
    cells: Vec<Option<Tile>>,
    next_id: u32,
}

impl Grid {
    /// Create an empty grid
    pub fn new(rows: usize, cols: usize, cell_size: i32) -> Self {
        assert!(rows > 0 && cols > 0, "grid must have at least one cell");
        Self {
            rows,
            cols,
            cell_size,
            cells: vec![None; rows * cols],
            next_id: 1,
        }
    }

    /// Build a grid from rows of values, 0 meaning empty
    pub fn from_rows<const C: usize>(rows: &[[u32; C]], cell_size: i32) -> Self {
        let mut grid = Self::new(rows.len(), C, cell_size);
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value != 0 {
                    grid.spawn(value, Cell::new(row, col));
                }
            }
        }
        grid
    }

    /// Empty grid with the same shape that continues this grid's id sequence
    pub(crate) fn empty_successor(&self) -> Self {
        Self {
            cells: vec![None; self.rows * self.cols],
            ..*self
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        assert!(self.contains(cell), "cell {cell} outside {}x{} grid", self.rows, self.cols);
        cell.row * self.cols + cell.col
    }

    pub fn get(&self, cell: Cell) -> Option<&Tile> {
        if !self.contains(cell) {
            return None;
        }
        self.cells[self.index(cell)].as_ref()
    }

    /// Look a tile up by handle
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles().find(|t| t.id == id)
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    /// All empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Cell> {
        (0..self.capacity())
            .filter(|&i| self.cells[i].is_none())
            .map(|i| Cell::new(i / self.cols, i % self.cols))
            .collect()
    }

    /// Place a new tile, allocating its handle
    pub fn spawn(&mut self, value: u32, cell: Cell) -> TileId {
        assert!(value.is_power_of_two() && value >= 2, "tile value {value} is not a power of two");
        let id = TileId(self.next_id);
        self.next_id += 1;
        self.place(Tile {
            id,
            value,
            cell,
            render_pos: cell_center(cell, self.cell_size),
        });
        id
    }

    /// Insert an existing tile at its own cell. Overlap is a caller defect.
    pub(crate) fn place(&mut self, tile: Tile) {
        let idx = self.index(tile.cell);
        assert!(
            self.cells[idx].is_none(),
            "cell {} already holds a tile",
            tile.cell
        );
        self.cells[idx] = Some(tile);
    }

    /// Panic if any slot disagrees with its tile or a handle repeats
    pub fn assert_invariants(&self) {
        let mut seen = Vec::with_capacity(self.capacity());
        for (idx, slot) in self.cells.iter().enumerate() {
            if let Some(tile) = slot {
                let cell = Cell::new(idx / self.cols, idx % self.cols);
                assert_eq!(tile.cell, cell, "tile {:?} keyed at {cell} claims {}", tile.id, tile.cell);
                assert!(!seen.contains(&tile.id), "tile {:?} appears twice", tile.id);
                seen.push(tile.id);
            }
        }
    }

    /// True if any row- or column-neighbouring pair can merge
    pub fn has_adjacent_equal(&self) -> bool {
        self.tiles().any(|tile| {
            [(0, 1), (1, 0)].into_iter().any(|step| {
                tile.cell
                    .offset(step, self.rows, self.cols)
                    .and_then(|next| self.get(next))
                    .is_some_and(|other| can_merge(other.value, tile.value))
            })
        })
    }

    /// No empty cell and no merge available: no move can change the board
    pub fn is_stuck(&self) -> bool {
        self.is_full() && !self.has_adjacent_equal()
    }

    pub fn max_value(&self) -> u32 {
        self.tiles().map(|t| t.value).max().unwrap_or(0)
    }

    pub fn total_value(&self) -> u64 {
        self.tiles().map(|t| u64::from(t.value)).sum()
    }

    /// Values as rows, 0 for empty cells
    pub fn values(&self) -> Vec<Vec<u32>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.as_ref().map_or(0, |t| t.value)).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values() {
            let line: Vec<String> = row
                .iter()
                .map(|&v| if v == 0 { ".".to_string() } else { v.to_string() })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_and_values() {
        let grid = Grid::from_rows(&[[2, 0, 4], [0, 8, 0]], 100);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.values(), vec![vec![2, 0, 4], vec![0, 8, 0]]);
        assert_eq!(grid.get(Cell::new(1, 1)).map(|t| t.value), Some(8));
        assert!(grid.get(Cell::new(5, 5)).is_none());
    }

    #[test]
    fn test_spawn_sets_render_position_and_unique_ids() {
        let mut grid = Grid::new(4, 4, 200);
        let a = grid.spawn(2, Cell::new(0, 0));
        let b = grid.spawn(2, Cell::new(3, 3));
        assert_ne!(a, b);
        assert_eq!(grid.tile(b).map(|t| t.render_pos), Some(IVec2::new(700, 700)));
        grid.assert_invariants();
    }

    #[test]
    #[should_panic(expected = "already holds a tile")]
    fn test_spawn_on_occupied_cell_panics() {
        let mut grid = Grid::new(4, 4, 200);
        grid.spawn(2, Cell::new(1, 1));
        grid.spawn(4, Cell::new(1, 1));
    }

    #[test]
    #[should_panic(expected = "not a power of two")]
    fn test_spawn_rejects_non_power_of_two() {
        let mut grid = Grid::new(4, 4, 200);
        grid.spawn(3, Cell::new(0, 0));
    }

    #[test]
    fn test_empty_cells_row_major() {
        let grid = Grid::from_rows(&[[2, 0], [0, 2]], 100);
        assert_eq!(grid.empty_cells(), vec![Cell::new(0, 1), Cell::new(1, 0)]);
    }

    #[test]
    fn test_offset_respects_bounds() {
        assert_eq!(Cell::new(0, 0).offset((-1, 0), 4, 4), None);
        assert_eq!(Cell::new(0, 3).offset((0, 1), 4, 4), None);
        assert_eq!(Cell::new(2, 2).offset((1, 0), 4, 4), Some(Cell::new(3, 2)));
    }

    #[test]
    fn test_stuck_requires_full_and_no_adjacent_pair() {
        let checker = Grid::from_rows(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]], 200);
        assert!(checker.is_full());
        assert!(!checker.has_adjacent_equal());
        assert!(checker.is_stuck());

        // Full, but a vertical pair exists in the last column
        let mergeable = Grid::from_rows(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 8], [4, 2, 4, 8]], 200);
        assert!(mergeable.is_full());
        assert!(!mergeable.is_stuck());

        // Not full, no pairs
        let sparse = Grid::from_rows(&[[2, 4, 2, 0], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]], 200);
        assert!(!sparse.is_stuck());
    }

    #[test]
    fn test_large_grid_cells_do_not_collide() {
        // (1, 11) and (11, 1) would share a concatenated "111" key
        let mut grid = Grid::new(12, 12, 10);
        grid.spawn(2, Cell::new(1, 11));
        grid.spawn(4, Cell::new(11, 1));
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.get(Cell::new(1, 11)).map(|t| t.value), Some(2));
        assert_eq!(grid.get(Cell::new(11, 1)).map(|t| t.value), Some(4));
    }

    #[test]
    fn test_largest_tiles_never_merge() {
        let top = 1u32 << 31;
        assert!(can_merge(1 << 30, 1 << 30));
        assert!(!can_merge(top, top));
        let grid = Grid::from_rows(&[[top, top]], 100);
        assert!(!grid.has_adjacent_equal());
        assert!(grid.is_stuck());
    }

    #[test]
    fn test_totals() {
        let grid = Grid::from_rows(&[[2, 4], [8, 0]], 100);
        assert_eq!(grid.max_value(), 8);
        assert_eq!(grid.total_value(), 14);
        assert_eq!(grid.to_string(), "2 4\n8 .\n");
    }
}
