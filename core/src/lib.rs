//! Game state engine for Sum Fun: numbered tiles drained from a queue into a
//! bordered grid, cleared when neighbors sum to a target, under a move budget
//! and an optional per-turn countdown.
#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use error::*;
pub use generator::*;
pub use grid::*;
pub use hint::*;
pub use queue::*;
pub use resolver::*;
pub use session::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod error;
mod generator;
mod grid;
mod hint;
mod queue;
mod resolver;
mod session;
mod snapshot;
mod tile;
mod types;

/// Inclusive range of values the queue draws from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    low: TileValue,
    high: TileValue,
}

impl TileRange {
    pub const fn new(low: TileValue, high: TileValue) -> Self {
        Self { low, high }
    }

    pub const fn bounds(self) -> (TileValue, TileValue) {
        (self.low, self.high)
    }

    pub const fn is_empty(self) -> bool {
        self.low > self.high
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length N, border included.
    pub grid_size: Coord,
    pub max_moves: MoveCount,
    pub timed_game: bool,
    /// Seconds per turn on the countdown, also what it restarts from.
    pub turn_seconds: Seconds,
    pub target_sum: u16,
    pub queue_capacity: u8,
    pub tile_range: TileRange,
}

impl GameConfig {
    pub const fn standard() -> Self {
        Self {
            grid_size: 9,
            max_moves: 50,
            timed_game: false,
            turn_seconds: 10,
            target_sum: 10,
            queue_capacity: 5,
            tile_range: TileRange::new(1, 9),
        }
    }

    pub const fn timed() -> Self {
        Self {
            timed_game: true,
            ..Self::standard()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 3 {
            return Err(GameError::InvalidConfig("grid_size must be at least 3"));
        }
        if self.max_moves == 0 {
            return Err(GameError::InvalidConfig("max_moves must be at least 1"));
        }
        if self.queue_capacity == 0 {
            return Err(GameError::InvalidConfig("queue_capacity must be at least 1"));
        }
        if self.target_sum == 0 {
            return Err(GameError::InvalidConfig("target_sum must be at least 1"));
        }
        if self.tile_range.is_empty() {
            return Err(GameError::InvalidConfig("tile_range is empty"));
        }
        if self.timed_game && self.turn_seconds == 0 {
            return Err(GameError::InvalidConfig("turn_seconds must be at least 1"));
        }
        Ok(())
    }

    pub const fn queue_len(&self) -> usize {
        self.queue_capacity as usize
    }

    /// Cells that can ever hold a tile.
    pub const fn fillable_cells(&self) -> usize {
        let inner = (self.grid_size as usize).saturating_sub(2);
        inner * inner
    }
}
