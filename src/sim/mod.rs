//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed ticks only, animation progress is measured in pixels
//! - Seeded RNG only
//! - Stable iteration order (row-major, then scan order)
//! - No rendering or platform dependencies

pub mod animate;
pub mod direction;
pub mod frame;
pub mod grid;
pub mod resolve;
pub mod state;
pub mod tick;

pub use animate::{AnimatedTile, Animation};
pub use direction::{Axis, Direction, Motion, ScanOrder};
pub use frame::{Frame, Overlay, TileSprite};
pub use grid::{Cell, Grid, Tile, TileId, can_merge};
pub use resolve::{Merge, MoveResult, TileMove, resolve};
pub use state::{AnimationState, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
