use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a view needs to redraw after a mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub size: Coord,
    pub cells: Array2<Option<TileValue>>,
    pub fillable: Array2<bool>,
    pub queue: Vec<TileValue>,
    pub score: Score,
    pub moves_taken: MoveCount,
    pub moves_remaining: MoveCount,
    /// `None` for untimed games.
    pub time_remaining: Option<Seconds>,
    pub last_move_valid: bool,
    pub refresh_available: bool,
    pub state: SessionState,
}

impl SessionSnapshot {
    pub fn value_at(&self, (row, col): Coord2) -> Option<TileValue> {
        self.cells
            .get((usize::from(row), usize::from(col)))
            .copied()
            .flatten()
    }

    pub fn queue_head(&self) -> Option<TileValue> {
        self.queue.first().copied()
    }

    pub fn time_display(&self) -> TimeDisplay {
        TimeDisplay(self.time_remaining)
    }
}

/// Clock readout: `m:ss`, or `--:--` when the game is untimed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeDisplay(pub Option<Seconds>);

impl fmt::Display for TimeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(secs) => write!(f, "{}:{:02}", secs / 60, secs % 60),
            None => f.write_str("--:--"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn time_display_formats() {
        assert_eq!(TimeDisplay(None).to_string(), "--:--");
        assert_eq!(TimeDisplay(Some(7)).to_string(), "0:07");
        assert_eq!(TimeDisplay(Some(125)).to_string(), "2:05");
    }

    #[test]
    fn snapshot_serializes() {
        let game = GameSession::new(GameConfig::standard(), ScriptedValues::new([2, 4])).unwrap();
        let snapshot = game.snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back, snapshot);
        assert_eq!(back.queue_head(), Some(2));
        assert_eq!(back.value_at((4, 4)), None);
    }
}
