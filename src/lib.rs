//! Slide 2048 - A sliding-tile merge puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid state, move resolution, animation, progression)
//! - `renderer`: Rendering sink interface and a text renderer
//! - `platform`: Input source, frame clock and the fixed-rate run loop
//! - `settings`: Startup configuration

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::IVec2;

use sim::Cell;

/// Game configuration constants
pub mod consts {
    /// Reference grid dimensions
    pub const GRID_ROWS: usize = 4;
    pub const GRID_COLS: usize = 4;

    /// Edge length of one square cell in pixels
    pub const CELL_SIZE: i32 = 200;
    /// Tile animation speed (pixels per tick). Must divide CELL_SIZE.
    pub const MOVE_VELOCITY: i32 = 20;

    /// Frame clock rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Value of every tile placed at game start
    pub const START_TILE_VALUE: u32 = 2;
    /// Number of tiles placed at game start
    pub const START_TILE_COUNT: usize = 2;
    /// Chance that a spawned tile is a 4 instead of a 2
    pub const SPAWN_FOUR_PROBABILITY: f64 = 0.1;

    /// Tile value that wins the game
    pub const WIN_THRESHOLD: u32 = 2048;
}

/// Pixel-space centre of a cell for the given cell size
#[inline]
pub fn cell_center(cell: Cell, cell_size: i32) -> IVec2 {
    IVec2::new(
        cell.col as i32 * cell_size + cell_size / 2,
        cell.row as i32 * cell_size + cell_size / 2,
    )
}

/// Nearest cell to a pixel position (used by renderers that draw on a cell lattice)
#[inline]
pub fn nearest_cell(pos: IVec2, cell_size: i32) -> (i32, i32) {
    let row = (pos.y as f32 / cell_size as f32 - 0.5).round() as i32;
    let col = (pos.x as f32 / cell_size as f32 - 0.5).round() as i32;
    (row, col)
}
