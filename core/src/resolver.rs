use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells cleared by one placement and the score it earns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub cleared: BTreeSet<Coord2>,
    pub score_delta: Score,
}

impl Resolution {
    pub fn is_clear(&self) -> bool {
        self.score_delta > 0
    }
}

/// Sum-to-target combination rule.
///
/// Any group of occupied orthogonal neighbors whose values plus the placed
/// value add up to `target_sum` is a match. Every matching group is cleared
/// together with the placed tile, and each cleared tile is worth one point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationResolver {
    target_sum: u16,
}

impl CombinationResolver {
    pub const fn new(target_sum: u16) -> Self {
        Self { target_sum }
    }

    pub const fn target_sum(&self) -> u16 {
        self.target_sum
    }

    /// Resolves the tile already sitting at `placed`.
    pub fn resolve(&self, grid: &Grid, placed: Coord2) -> Resolution {
        match grid.value_at(placed) {
            Some(value) => self.resolve_with(grid, placed, value),
            None => Resolution::default(),
        }
    }

    /// Resolves as if `value` sat at `placed`, without touching the grid.
    pub fn resolve_with(&self, grid: &Grid, placed: Coord2, value: TileValue) -> Resolution {
        let neighbors: Vec<(Coord2, u16)> = grid
            .neighbors_of(placed)
            .filter_map(|pos| grid.value_at(pos).map(|v| (pos, u16::from(v))))
            .collect();

        let target = u32::from(self.target_sum);
        let mut cleared = BTreeSet::new();

        // at most four neighbors, so at most fifteen groups
        for mask in 1u32..(1 << neighbors.len()) {
            let group = neighbors
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, &entry)| entry);

            let sum: u32 = group
                .clone()
                .map(|(_, v)| u32::from(v))
                .sum::<u32>()
                + u32::from(value);

            if sum == target {
                cleared.extend(group.map(|(pos, _)| pos));
            }
        }

        if !cleared.is_empty() {
            cleared.insert(placed);
        }

        let score_delta = cleared.len().try_into().unwrap_or(Score::MAX);
        Resolution {
            cleared,
            score_delta,
        }
    }
}
