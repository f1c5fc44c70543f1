use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintResult {
    pub target_cell: Option<Coord2>,
}

impl HintResult {
    pub const NONE: Self = Self { target_cell: None };

    pub const fn found(&self) -> bool {
        self.target_cell.is_some()
    }
}

/// Read-only advisor: where would the queue head clear something?
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HintEngine {
    resolver: CombinationResolver,
}

impl HintEngine {
    pub const fn new(resolver: CombinationResolver) -> Self {
        Self { resolver }
    }

    /// First open cell in row-major order where the queue head would score.
    pub fn suggest(&self, grid: &Grid, queue: &TileQueue) -> HintResult {
        let Ok(head) = queue.peek_head() else {
            return HintResult::NONE;
        };

        let target_cell = grid
            .iter_open_cells()
            .find(|&coords| self.resolver.resolve_with(grid, coords, head).is_clear());

        HintResult { target_cell }
    }
}
