//! Slide animation
//!
//! Turns a resolved move into a finite sequence of interpolated frames. Each
//! tick moves every tile toward its target by a fixed pixel velocity per axis,
//! never overshooting. Completion is decided by distance, not wall-clock time,
//! so a move always settles in `ceil(max_distance / velocity)` ticks.

use glam::IVec2;

use super::frame::{Frame, Overlay, TileSprite};
use super::grid::{Grid, TileId};
use super::resolve::MoveResult;
use crate::cell_center;

/// One tile in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedTile {
    pub id: TileId,
    /// Pre-move value, shown until the grid commits
    pub value: u32,
    pub pos: IVec2,
    pub target: IVec2,
    /// Merged away; dropped once the animation ends
    pub consumed: bool,
}

impl AnimatedTile {
    pub fn arrived(&self) -> bool {
        self.pos == self.target
    }

    /// Advance at most `velocity` pixels along each axis
    fn advance(&mut self, velocity: i32) {
        let delta = self.target - self.pos;
        let step = IVec2::new(
            delta.x.signum() * delta.x.abs().min(velocity),
            delta.y.signum() * delta.y.abs().min(velocity),
        );
        self.pos += step;
    }
}

/// Interpolation from the pre-move grid to a resolved move's targets
#[derive(Debug, Clone)]
pub struct Animation {
    tiles: Vec<AnimatedTile>,
    velocity: i32,
    ticks: u32,
}

impl Animation {
    pub fn new(before: &Grid, result: &MoveResult, velocity: i32) -> Self {
        assert!(velocity > 0, "animation velocity must be positive");
        let cell_size = before.cell_size();
        let tiles = result
            .moves
            .iter()
            .map(|mv| {
                let pos = before
                    .tile(mv.id)
                    .map(|t| t.render_pos)
                    .unwrap_or_else(|| cell_center(mv.from, cell_size));
                AnimatedTile {
                    id: mv.id,
                    value: mv.value,
                    pos,
                    target: cell_center(mv.to, cell_size),
                    consumed: mv.consumed,
                }
            })
            .collect();
        Self {
            tiles,
            velocity,
            ticks: 0,
        }
    }

    pub fn tiles(&self) -> &[AnimatedTile] {
        &self.tiles
    }

    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    /// Ticks advanced so far
    pub fn ticks_elapsed(&self) -> u32 {
        self.ticks
    }

    /// Total ticks needed from the current positions
    pub fn ticks_remaining(&self) -> u32 {
        let max_distance = self
            .tiles
            .iter()
            .map(|t| {
                let d = (t.target - t.pos).abs();
                d.x.max(d.y)
            })
            .max()
            .unwrap_or(0);
        (max_distance as u32).div_ceil(self.velocity as u32)
    }

    /// Ticks from start to settle (fixed at construction time)
    pub fn ticks_to_settle(&self) -> u32 {
        self.ticks + self.ticks_remaining()
    }

    pub fn is_settled(&self) -> bool {
        self.tiles.iter().all(AnimatedTile::arrived)
    }

    /// Current interpolated frame, consumed tiles included
    pub fn frame(&self, overlay: Overlay) -> Frame {
        let sprites = self
            .tiles
            .iter()
            .map(|t| TileSprite { value: t.value, pos: t.pos })
            .collect();
        Frame::from_sprites(sprites, overlay, self.is_settled())
    }

    /// Advance one tick. Returns false once every tile has arrived.
    pub fn step(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }
        for tile in &mut self.tiles {
            tile.advance(self.velocity);
        }
        self.ticks += 1;
        log::trace!("animation tick {} ({} remaining)", self.ticks, self.ticks_remaining());
        true
    }
}

impl Iterator for Animation {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        self.step().then(|| self.frame(Overlay::None))
    }
}
