use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Why a placement was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    OutOfBounds,
    NotFillable,
    Occupied,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementOutcome {
    Accepted,
    Rejected(Rejection),
}

impl PlacementOutcome {
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub const fn rejection(self) -> Option<Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// The N×N board plus the per-board counters.
///
/// Only [`GameSession`] mutates a grid; everything else gets a shared reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Tile>,
    score: Score,
    moves_taken: MoveCount,
    last_move_valid: bool,
}

impl Grid {
    pub fn new(size: Coord) -> Self {
        let n = usize::from(size);
        let last = n.saturating_sub(1);
        let cells = Array2::from_shape_fn((n, n), |(row, col)| {
            let border = row == 0 || row == last || col == 0 || col == last;
            Tile::new(!border)
        });

        Self {
            cells,
            score: 0,
            moves_taken: 0,
            last_move_valid: true,
        }
    }

    /// Side length N.
    pub fn size(&self) -> Coord {
        self.cells.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn moves_taken(&self) -> MoveCount {
        self.moves_taken
    }

    pub fn last_move_valid(&self) -> bool {
        self.last_move_valid
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size && coords.1 < size
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<Tile> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn value_at(&self, coords: Coord2) -> Option<TileValue> {
        self.tile_at(coords).and_then(Tile::value)
    }

    pub fn neighbors_of(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Fillable empty cells in row-major order.
    pub fn iter_open_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_tiles()
            .filter(|(_, tile)| tile.accepts_placement())
            .map(|(coords, _)| coords)
    }

    /// All tiles with their coordinates in row-major order.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (Coord2, Tile)> + '_ {
        self.cells.indexed_iter().map(|((row, col), &tile)| {
            // indices stay below the side length, which is a `Coord`
            ((row as Coord, col as Coord), tile)
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|tile| !tile.is_empty()).count()
    }

    pub fn values(&self) -> Array2<Option<TileValue>> {
        self.cells.map(|tile| tile.value())
    }

    pub fn fillable_mask(&self) -> Array2<bool> {
        self.cells.map(|tile| tile.is_fillable())
    }

    pub(crate) fn place(&mut self, coords: Coord2, value: TileValue) -> PlacementOutcome {
        use PlacementOutcome::*;

        let outcome = match self.cells.get_mut(coords.to_nd_index()) {
            None => Rejected(Rejection::OutOfBounds),
            Some(tile) if !tile.is_fillable() => Rejected(Rejection::NotFillable),
            Some(tile) if !tile.is_empty() => Rejected(Rejection::Occupied),
            Some(tile) => {
                tile.set(value);
                Accepted
            }
        };

        self.last_move_valid = outcome.is_accepted();
        outcome
    }

    pub(crate) fn clear<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Coord2>,
    {
        for coords in cells {
            if let Some(tile) = self.cells.get_mut(coords.to_nd_index()) {
                tile.clear();
            }
        }
    }

    pub(crate) fn add_score(&mut self, delta: Score) {
        self.score = self.score.saturating_add(delta);
    }

    pub(crate) fn record_move(&mut self) {
        self.moves_taken = self.moves_taken.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn border_cells_are_never_fillable() {
        for size in 3..=9 {
            let grid = Grid::new(size);
            for ((row, col), tile) in grid.iter_tiles() {
                let border = row == 0 || col == 0 || row == size - 1 || col == size - 1;
                assert_eq!(tile.is_fillable(), !border, "({row}, {col}) on {size}x{size}");
                assert!(tile.is_empty());
            }
        }
    }

    #[test]
    fn place_rejects_border_occupied_and_out_of_bounds() {
        let mut grid = Grid::new(5);

        assert_eq!(
            grid.place((0, 0), 4),
            PlacementOutcome::Rejected(Rejection::NotFillable)
        );
        assert!(!grid.last_move_valid());

        assert_eq!(grid.place((2, 2), 4), PlacementOutcome::Accepted);
        assert!(grid.last_move_valid());
        assert_eq!(grid.value_at((2, 2)), Some(4));

        assert_eq!(
            grid.place((2, 2), 6),
            PlacementOutcome::Rejected(Rejection::Occupied)
        );
        assert_eq!(grid.value_at((2, 2)), Some(4));

        assert_eq!(
            grid.place((9, 1), 6),
            PlacementOutcome::Rejected(Rejection::OutOfBounds)
        );
        assert!(!grid.last_move_valid());
    }

    #[test]
    fn clear_empties_listed_cells_only() {
        let mut grid = Grid::new(5);
        grid.place((1, 1), 1);
        grid.place((1, 2), 2);
        grid.place((3, 3), 3);

        grid.clear([(1, 1), (3, 3), (40, 40)]);

        assert_eq!(grid.value_at((1, 1)), None);
        assert_eq!(grid.value_at((1, 2)), Some(2));
        assert_eq!(grid.value_at((3, 3)), None);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn out_of_range_queries_answer_none() {
        let grid = Grid::new(4);

        assert!(!grid.contains((4, 0)));
        assert!(!grid.contains((0, 255)));
        assert_eq!(grid.tile_at((4, 0)), None);
        assert_eq!(grid.value_at((255, 255)), None);
        assert_eq!(grid.neighbors_of((200, 200)).count(), 0);
    }

    #[test]
    fn open_cells_scan_row_major() {
        let mut grid = Grid::new(4);
        grid.place((1, 1), 5);

        let open: Vec<_> = grid.iter_open_cells().collect();

        assert_eq!(open, [(1, 2), (2, 1), (2, 2)]);
    }
}
