//! Move resolution
//!
//! `resolve` computes every tile's destination and every merge for one slide
//! without touching the committed grid. Merge bookkeeping happens on a working
//! copy; `MoveResult::apply` then produces the post-move grid in one pass.

use serde::Serialize;

use super::direction::{Axis, Direction};
use super::grid::{Cell, Grid, Tile, TileId, can_merge};
use crate::cell_center;

/// Where one pre-move tile ends up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileMove {
    pub id: TileId,
    pub from: Cell,
    pub to: Cell,
    /// Value before the move
    pub value: u32,
    /// Value after the move (doubled for merge survivors)
    pub target_value: u32,
    /// Merged away into the tile at `to`
    pub consumed: bool,
}

impl TileMove {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// One merge: `consumed` slid into `survivor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Merge {
    pub survivor: TileId,
    pub consumed: TileId,
    pub cell: Cell,
    /// Value of the survivor after the merge
    pub value: u32,
}

/// Outcome of resolving one slide
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResult {
    pub direction: Direction,
    /// One entry per pre-move tile, in scan order
    pub moves: Vec<TileMove>,
    pub merges: Vec<Merge>,
    /// Any tile moved or merged
    pub changed: bool,
}

impl MoveResult {
    pub fn merge_count(&self) -> usize {
        self.merges.len()
    }

    pub fn is_consumed(&self, id: TileId) -> bool {
        self.merges.iter().any(|m| m.consumed == id)
    }

    pub fn get(&self, id: TileId) -> Option<&TileMove> {
        self.moves.iter().find(|m| m.id == id)
    }

    /// Commit this result onto the grid it was resolved from.
    ///
    /// Consumed tiles are dropped, survivors take their target cell and value,
    /// and render positions snap to the new cell centres.
    pub fn apply(&self, grid: &Grid) -> Grid {
        let mut next = grid.empty_successor();
        for mv in self.moves.iter().filter(|m| !m.consumed) {
            let Some(tile) = grid.tile(mv.id) else {
                panic!("move result references tile {:?} missing from grid", mv.id);
            };
            next.place(Tile {
                id: tile.id,
                value: mv.target_value,
                cell: mv.to,
                render_pos: cell_center(mv.to, grid.cell_size()),
            });
        }
        next
    }
}

/// Per-move scratch state for one tile
#[derive(Debug, Clone)]
struct Working {
    id: TileId,
    value: u32,
    from: Cell,
    target: Cell,
    target_value: u32,
    merge_lock: bool,
    consumed: bool,
}

/// Resolve a slide of every tile on `grid` toward `direction`
pub fn resolve(grid: &Grid, direction: Direction) -> MoveResult {
    grid.assert_invariants();

    let motion = direction.motion();
    let (rows, cols) = (grid.rows(), grid.cols());

    let mut work: Vec<Working> = grid
        .tiles()
        .map(|t| Working {
            id: t.id,
            value: t.value,
            from: t.cell,
            target: t.cell,
            target_value: t.value,
            merge_lock: false,
            consumed: false,
        })
        .collect();

    // Nearest-to-wall first. Stable sort keeps row-major order among ties.
    let key = |w: &Working| match motion.order.axis {
        Axis::Row => w.from.row,
        Axis::Col => w.from.col,
    };
    if motion.order.ascending {
        work.sort_by_key(key);
    } else {
        work.sort_by_key(|w| std::cmp::Reverse(key(w)));
    }

    // Working occupancy: cell -> index into `work`
    let mut occupancy: Vec<Option<usize>> = vec![None; rows * cols];
    for (i, w) in work.iter().enumerate() {
        occupancy[w.from.row * cols + w.from.col] = Some(i);
    }

    let mut merges = Vec::new();

    for i in 0..work.len() {
        let from = work[i].from;
        let value = work[i].value;
        let mut target = from;
        let mut merged_into = None;

        let mut next = from.offset(motion.step, rows, cols);
        while let Some(cell) = next {
            match occupancy[cell.row * cols + cell.col] {
                None => {
                    target = cell;
                    next = cell.offset(motion.step, rows, cols);
                }
                Some(j) if can_merge(work[j].value, value) && !work[j].merge_lock => {
                    target = cell;
                    merged_into = Some(j);
                    break;
                }
                Some(_) => break,
            }
        }

        occupancy[from.row * cols + from.col] = None;
        work[i].target = target;

        if let Some(j) = merged_into {
            work[j].target_value *= 2;
            work[j].merge_lock = true;
            work[i].consumed = true;
            log::trace!("{:?} at {from} merges into {:?} at {target}", work[i].id, work[j].id);
            merges.push(Merge {
                survivor: work[j].id,
                consumed: work[i].id,
                cell: target,
                value: work[j].target_value,
            });
        } else {
            occupancy[target.row * cols + target.col] = Some(i);
            if target != from {
                log::trace!("{:?} slides {from} -> {target}", work[i].id);
            }
        }
    }

    let changed = !merges.is_empty() || work.iter().any(|w| w.target != w.from);

    let moves: Vec<TileMove> = work
        .into_iter()
        .map(|w| TileMove {
            id: w.id,
            from: w.from,
            to: w.target,
            value: w.value,
            target_value: w.target_value,
            consumed: w.consumed,
        })
        .collect();

    log::debug!(
        "resolved {}: {} tiles, {} merges, changed={changed}",
        direction.as_str(),
        moves.len(),
        merges.len()
    );

    MoveResult {
        direction,
        moves,
        merges,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide<const C: usize>(rows: &[[u32; C]], direction: Direction) -> (Vec<Vec<u32>>, MoveResult) {
        let grid = Grid::from_rows(rows, 200);
        let result = resolve(&grid, direction);
        (result.apply(&grid).values(), result)
    }

    #[test]
    fn test_pair_merges_and_packs() {
        let (after, result) = slide(&[[2, 2, 4, 0]], Direction::Left);
        assert_eq!(after, vec![vec![4, 4, 0, 0]]);
        assert_eq!(result.merge_count(), 1);
        assert!(result.changed);
    }

    #[test]
    fn test_four_equal_make_two_merges() {
        let (after, result) = slide(&[[2, 2, 2, 2]], Direction::Left);
        assert_eq!(after, vec![vec![4, 4, 0, 0]]);
        assert_eq!(result.merge_count(), 2);
        // Each survivor absorbed exactly one tile
        assert_ne!(result.merges[0].survivor, result.merges[1].survivor);
    }

    #[test]
    fn test_three_equal_make_one_merge() {
        let (after, result) = slide(&[[2, 2, 2, 0]], Direction::Left);
        assert_eq!(after, vec![vec![4, 2, 0, 0]]);
        assert_eq!(result.merge_count(), 1);

        let (after, _) = slide(&[[0, 2, 2, 2]], Direction::Right);
        assert_eq!(after, vec![vec![0, 0, 2, 4]]);
    }

    #[test]
    fn test_packed_mismatch_is_unchanged() {
        let (after, result) = slide(&[[2, 4, 2, 0]], Direction::Left);
        assert_eq!(after, vec![vec![2, 4, 2, 0]]);
        assert!(!result.changed);
        assert!(result.merges.is_empty());
        assert!(result.moves.iter().all(|m| !m.moved()));
    }

    #[test]
    fn test_merged_tile_does_not_absorb_again() {
        // 4 4 8 → the fresh 8 must not swallow the existing 8
        let (after, result) = slide(&[[4, 4, 8, 0]], Direction::Left);
        assert_eq!(after, vec![vec![8, 8, 0, 0]]);
        assert_eq!(result.merge_count(), 1);
    }

    #[test]
    fn test_gap_then_merge() {
        let (after, _) = slide(&[[2, 0, 0, 2]], Direction::Left);
        assert_eq!(after, vec![vec![4, 0, 0, 0]]);
        let (after, _) = slide(&[[2, 0, 0, 2]], Direction::Right);
        assert_eq!(after, vec![vec![0, 0, 0, 4]]);
    }

    #[test]
    fn test_vertical_moves() {
        let rows = [[2, 0], [2, 4], [0, 0], [4, 4]];
        let (up, _) = slide(&rows, Direction::Up);
        assert_eq!(up, vec![vec![4, 8], vec![4, 0], vec![0, 0], vec![0, 0]]);
        let (down, _) = slide(&rows, Direction::Down);
        assert_eq!(down, vec![vec![0, 0], vec![0, 0], vec![4, 0], vec![4, 8]]);
    }

    #[test]
    fn test_blocked_tile_does_not_stop_others() {
        // Left column is packed, right column can still move
        let (after, result) = slide(&[[2, 0], [4, 0], [2, 8]], Direction::Up);
        assert_eq!(after, vec![vec![2, 8], vec![4, 0], vec![2, 0]]);
        assert!(result.changed);
    }

    #[test]
    fn test_resolve_does_not_mutate_grid() {
        let grid = Grid::from_rows(&[[2, 2, 4, 4], [0, 0, 0, 2]], 200);
        let before = grid.clone();
        let _ = resolve(&grid, Direction::Left);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_consumed_tiles_target_survivor_cell() {
        let grid = Grid::from_rows(&[[0, 2, 0, 2]], 200);
        let result = resolve(&grid, Direction::Left);
        let merge = result.merges[0];
        let consumed = result.get(merge.consumed).unwrap();
        let survivor = result.get(merge.survivor).unwrap();
        assert!(consumed.consumed);
        assert_eq!(consumed.to, survivor.to);
        assert_eq!(survivor.to, Cell::new(0, 0));
        assert_eq!(survivor.target_value, 4);
        assert_eq!(consumed.target_value, 2);
    }

    #[test]
    fn test_apply_keeps_ids_and_snaps_render_positions() {
        let grid = Grid::from_rows(&[[0, 0, 0, 8]], 200);
        let id = grid.tiles().next().unwrap().id;
        let result = resolve(&grid, Direction::Left);
        let after = result.apply(&grid);
        let tile = after.tile(id).unwrap();
        assert_eq!(tile.cell, Cell::new(0, 0));
        assert_eq!(tile.render_pos, cell_center(Cell::new(0, 0), 200));
        after.assert_invariants();
    }

    #[test]
    fn test_large_non_square_grid() {
        let mut rows = [[0u32; 11]; 10];
        rows[9][10] = 2;
        rows[0][10] = 2;
        rows[5][10] = 4;
        let (after, result) = slide(&rows, Direction::Up);
        assert_eq!(after[0][10], 2);
        assert_eq!(after[1][10], 4);
        assert_eq!(after[2][10], 2);
        assert_eq!(result.merge_count(), 0);

        let (after, result) = slide(&rows, Direction::Left);
        assert_eq!(after[0][0], 2);
        assert_eq!(after[5][0], 4);
        assert_eq!(after[9][0], 2);
        assert!(result.changed);
    }

    #[test]
    fn test_top_value_pair_stays_apart() {
        let top = 1u32 << 31;
        let (after, result) = slide(&[[0, top, top]], Direction::Left);
        assert_eq!(after, vec![vec![top, top, 0]]);
        assert_eq!(result.merge_count(), 0);

        let (after, result) = slide(&[[1 << 30, 1 << 30]], Direction::Right);
        assert_eq!(after, vec![vec![0, top]]);
        assert_eq!(result.merge_count(), 1);
    }

    #[test]
    fn test_empty_grid_never_changes() {
        let grid = Grid::new(4, 4, 200);
        for dir in Direction::ALL {
            let result = resolve(&grid, dir);
            assert!(!result.changed);
            assert!(result.moves.is_empty());
        }
    }
}
