//! Visual snapshot handed to the rendering sink

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// Overlay drawn on top of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Overlay {
    #[default]
    None,
    Won,
    Lost,
}

/// A tile as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSprite {
    pub value: u32,
    /// Pixel-space centre
    pub pos: IVec2,
}

/// Full visual state for one render call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Sprites in draw order (ascending value, smaller tiles first)
    pub tiles: Vec<TileSprite>,
    pub overlay: Overlay,
    /// False while tiles are mid-slide
    pub settled: bool,
}

impl Frame {
    pub fn from_sprites(mut tiles: Vec<TileSprite>, overlay: Overlay, settled: bool) -> Self {
        tiles.sort_by_key(|t| t.value);
        Self { tiles, overlay, settled }
    }

    /// Settled frame of the committed grid
    pub fn from_grid(grid: &Grid, overlay: Overlay) -> Self {
        let sprites = grid
            .tiles()
            .map(|t| TileSprite { value: t.value, pos: t.render_pos })
            .collect();
        Self::from_sprites(sprites, overlay, true)
    }
}
