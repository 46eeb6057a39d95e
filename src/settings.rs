//! Game settings
//!
//! Read once at startup (JSON via `Settings::load`), never mutated while a
//! game is running.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a settings block cannot drive a game
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("grid must have at least one row and column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("cell size must be positive (got {0})")]
    CellSize(i32),
    /// Velocity must be positive and divide the cell size so tiles land exactly
    #[error("velocity {velocity} must be positive and divide the cell size {cell_size}")]
    Velocity { velocity: i32, cell_size: i32 },
    #[error("tick rate must be positive (got {0})")]
    TickRate(u32),
    #[error("spawn probability must be within [0, 1] (got {0})")]
    SpawnProbability(f64),
    #[error("win threshold must be a power of two of at least 4 (got {0})")]
    WinThreshold(u32),
}

/// Startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    pub rows: usize,
    pub cols: usize,

    // === Animation ===
    /// Square cell edge in pixels
    pub cell_size: i32,
    /// Pixels per tick
    pub velocity: i32,
    /// Frame clock rate in Hz
    pub tick_rate: u32,

    // === Rules ===
    /// Chance a spawned tile is a 4 (otherwise 2)
    pub spawn_four_probability: f64,
    /// Reaching this value wins (unless the player chose to keep playing)
    pub win_threshold: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            cols: GRID_COLS,

            cell_size: CELL_SIZE,
            velocity: MOVE_VELOCITY,
            tick_rate: TICK_RATE,

            spawn_four_probability: SPAWN_FOUR_PROBABILITY,
            win_threshold: WIN_THRESHOLD,
        }
    }
}

impl Settings {
    /// Grid of the given shape, everything else default
    pub fn with_grid(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SettingsError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.cell_size <= 0 {
            return Err(SettingsError::CellSize(self.cell_size));
        }
        if self.velocity <= 0 || self.cell_size % self.velocity != 0 {
            return Err(SettingsError::Velocity {
                velocity: self.velocity,
                cell_size: self.cell_size,
            });
        }
        if self.tick_rate == 0 {
            return Err(SettingsError::TickRate(self.tick_rate));
        }
        if !(0.0..=1.0).contains(&self.spawn_four_probability) {
            return Err(SettingsError::SpawnProbability(self.spawn_four_probability));
        }
        if !self.win_threshold.is_power_of_two() || self.win_threshold < 4 {
            return Err(SettingsError::WinThreshold(self.win_threshold));
        }
        Ok(())
    }

    /// Duration of one frame clock tick
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate.max(1)))
    }

    /// Parse settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load settings from a JSON file, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read {}: {e}; using default settings", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => match settings.validate() {
                Ok(()) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not parse {}: {e}; using default settings", path.display());
                Self::default()
            }
        }
    }
}
