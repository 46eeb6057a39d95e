//! Game state and progression types
//!
//! `GameState` exclusively owns the grid between moves. While a move animates
//! the pending `MoveResult` travels with the animation and nothing else may
//! touch the grid until it commits.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animate::Animation;
use super::direction::Direction;
use super::frame::{Frame, Overlay};
use super::grid::{Cell, Grid};
use super::resolve::MoveResult;
use crate::consts::{START_TILE_COUNT, START_TILE_VALUE};
use crate::settings::{Settings, SettingsError};

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting moves
    Playing,
    /// Win threshold reached, waiting for continue or restart
    Won,
    /// No move can change the board, waiting for restart
    Lost,
}

impl GamePhase {
    pub fn overlay(self) -> Overlay {
        match self {
            GamePhase::Playing => Overlay::None,
            GamePhase::Won => Overlay::Won,
            GamePhase::Lost => Overlay::Lost,
        }
    }
}

/// Whether a move is currently being played out
#[derive(Debug, Clone, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Animating {
        animation: Animation,
        /// Committed once the animation settles
        result: MoveResult,
    },
}

/// What a tick did, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// A move changed the board and started animating
    Slid { direction: Direction, merges: usize },
    /// A move changed nothing
    Blocked { direction: Direction },
    /// The animation finished and the grid was committed
    Settled { merges: usize },
    Spawned { cell: Cell, value: u32 },
    Won { value: u32 },
    Lost,
    Continued,
    Restarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Seed the RNG was created from
    pub seed: u64,
    pub grid: Grid,
    pub phase: GamePhase,
    /// Player chose to keep going after a win; further threshold tiles do not retrigger it
    pub keep_playing: bool,
    pub animation: AnimationState,
    /// Ticks processed
    pub time_ticks: u64,
    /// Moves committed since the last restart
    pub moves: u32,
    /// Committed grid of the last settled move, before its spawn
    settled_frame: Option<Frame>,
    rng: Pcg32,
}

impl GameState {
    /// Default 4x4 game with the given seed
    pub fn new(seed: u64) -> Self {
        Self::build(Settings::default(), seed)
    }

    /// Game with custom settings, rejected if they cannot drive a game
    pub fn with_settings(settings: Settings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::build(settings, seed))
    }

    /// Game starting from a prepared grid (no initial spawn)
    pub fn from_grid(settings: Settings, grid: Grid, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        grid.assert_invariants();
        assert_eq!(
            (grid.rows(), grid.cols(), grid.cell_size()),
            (settings.rows, settings.cols, settings.cell_size),
            "grid shape disagrees with settings"
        );
        let mut state = Self::build(settings, seed);
        state.grid = grid;
        state.phase = if state.grid.is_stuck() {
            GamePhase::Lost
        } else {
            GamePhase::Playing
        };
        Ok(state)
    }

    fn build(settings: Settings, seed: u64) -> Self {
        let grid = Grid::new(settings.rows, settings.cols, settings.cell_size);
        let mut state = Self {
            settings,
            seed,
            grid,
            phase: GamePhase::Playing,
            keep_playing: false,
            animation: AnimationState::Idle,
            time_ticks: 0,
            moves: 0,
            settled_frame: None,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.spawn_start_tiles();
        state
    }

    /// Fresh grid, back to `Playing`, keep-playing flag cleared.
    /// The RNG stream continues so consecutive games differ.
    pub fn restart(&mut self) {
        self.grid = Grid::new(self.settings.rows, self.settings.cols, self.settings.cell_size);
        self.phase = GamePhase::Playing;
        self.keep_playing = false;
        self.animation = AnimationState::Idle;
        self.moves = 0;
        self.settled_frame = None;
        self.spawn_start_tiles();
    }

    fn spawn_start_tiles(&mut self) {
        for _ in 0..START_TILE_COUNT.min(self.grid.capacity()) {
            self.spawn_at_random(START_TILE_VALUE);
        }
    }

    fn spawn_at_random(&mut self, value: u32) -> Option<Cell> {
        let empty = self.grid.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let cell = empty[self.rng.random_range(0..empty.len())];
        self.grid.spawn(value, cell);
        Some(cell)
    }

    /// Spawn a 2 or 4 at a uniformly random empty cell
    pub fn spawn_random_tile(&mut self) -> Option<(Cell, u32)> {
        let value = if self.rng.random_bool(self.settings.spawn_four_probability) {
            4
        } else {
            2
        };
        self.spawn_at_random(value).map(|cell| (cell, value))
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.animation, AnimationState::Animating { .. })
    }

    pub fn overlay(&self) -> Overlay {
        self.phase.overlay()
    }

    /// The frame a renderer should draw right now
    pub fn frame(&self) -> Frame {
        match &self.animation {
            AnimationState::Animating { animation, .. } => animation.frame(self.overlay()),
            AnimationState::Idle => Frame::from_grid(&self.grid, self.overlay()),
        }
    }

    /// Snapshot the just-committed grid so it can be drawn on its own
    pub(crate) fn record_settled_frame(&mut self) {
        self.settled_frame = Some(Frame::from_grid(&self.grid, self.overlay()));
    }

    /// The committed grid of a move that settled this tick, spawn not yet placed.
    /// Returns `None` once taken.
    pub fn take_settled_frame(&mut self) -> Option<Frame> {
        self.settled_frame.take()
    }

    /// True once a tile has reached the win threshold
    pub fn threshold_reached(&self) -> bool {
        self.grid.max_value() >= self.settings.win_threshold
    }
}
