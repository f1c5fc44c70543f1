use serde::Serialize;
use sumfun_core::{GameSession, MoveCount, Result, Score, SessionState, ValueSource};

use crate::ScoreSink;

/// How an autoplayed game stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum PlayOutcome {
    /// The session reached a terminal state.
    Finished(SessionState),
    /// No open cell was left while moves remained; the session is still in progress.
    Stalled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub seed: u64,
    pub score: Score,
    pub moves_taken: MoveCount,
    pub moves_remaining: MoveCount,
    pub hinted_moves: u32,
    pub ticks_delivered: u32,
    pub refreshed: bool,
    pub outcome: PlayOutcome,
}

impl GameReport {
    pub const fn is_finished(&self) -> bool {
        matches!(self.outcome, PlayOutcome::Finished(_))
    }
}

/// Plays `game` with the hint engine as the policy.
///
/// Falls back to the single queue refresh, then to the first open cell.
/// `ticks_per_move` countdown ticks precede every move, and only timed sessions get them.
pub fn autoplay<S: ValueSource>(
    mut game: GameSession<S>,
    seed: u64,
    ticks_per_move: u32,
) -> Result<GameReport> {
    let mut hinted_moves = 0;
    let mut ticks_delivered = 0;
    let mut refreshed = false;

    let outcome = loop {
        if game.is_timed() {
            for _ in 0..ticks_per_move {
                if game.is_terminal() {
                    break;
                }
                game.on_tick()?;
                ticks_delivered += 1;
            }
        }
        if game.is_terminal() {
            break PlayOutcome::Finished(game.state());
        }

        let mut hint = game.suggest().target_cell;
        if hint.is_none() && !refreshed && game.queue().refresh_available() {
            refreshed = game.refresh_queue()?;
            hint = game.suggest().target_cell;
        }

        let cell = match hint {
            Some(cell) => {
                hinted_moves += 1;
                Some(cell)
            }
            None => game.grid().iter_open_cells().next(),
        };

        let Some(cell) = cell else {
            log::info!(
                "Game {seed}: board full with {} moves left",
                game.moves_remaining()
            );
            break PlayOutcome::Stalled;
        };
        let result = game.apply_move(cell)?;
        debug_assert!(result.accepted(), "policy picked an unplayable cell");
        log::debug!(
            "Game {seed}: {} at {cell:?} scored {}",
            result.value,
            result.score_delta
        );
    };

    Ok(GameReport {
        seed,
        score: game.score(),
        moves_taken: game.grid().moves_taken(),
        moves_remaining: game.moves_remaining(),
        hinted_moves,
        ticks_delivered,
        refreshed,
        outcome,
    })
}

/// Hands the score of a finished game to `sink`. Stalled games are skipped.
pub fn record_finished(sink: &mut impl ScoreSink, report: &GameReport) -> bool {
    if !report.is_finished() {
        log::debug!("Game {}: not finished, score not recorded", report.seed);
        return false;
    }
    sink.record(report.score);
    true
}
