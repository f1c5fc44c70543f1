use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of a session.
///
/// Valid transitions:
/// - InProgress -> Lost
/// - InProgress -> Won
///
/// Nothing leaves a terminal state; a new game replaces the whole session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    InProgress,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Result of one `apply_move`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub cell: Coord2,
    pub value: TileValue,
    pub placement: PlacementOutcome,
    pub cleared: BTreeSet<Coord2>,
    pub score_delta: Score,
    pub state: SessionState,
}

impl MoveResult {
    pub const fn accepted(&self) -> bool {
        self.placement.is_accepted()
    }
}

/// Result of one clock tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Session is untimed, nothing happened.
    Untimed,
    /// One second came off the clock.
    Counted,
    /// The clock ran out: one move was forfeited and the clock restarted.
    Penalty,
    /// The forfeited move was the last one.
    Lost,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        use TickOutcome::*;
        match self {
            Untimed => false,
            Counted => true,
            Penalty => true,
            Lost => true,
        }
    }
}

/// One game: grid, queue, counters and the optional countdown.
#[derive(Clone, Debug)]
pub struct GameSession<S = RandomValues> {
    config: GameConfig,
    resolver: CombinationResolver,
    grid: Grid,
    queue: TileQueue,
    source: S,
    moves_remaining: MoveCount,
    time_remaining: Option<Seconds>,
    timed_game: bool,
    state: SessionState,
}

impl GameSession<RandomValues> {
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(config, RandomValues::new(seed))
    }
}

impl<S: ValueSource> GameSession<S> {
    pub fn new(config: GameConfig, mut source: S) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.grid_size);
        let queue = TileQueue::new(config.queue_len(), config.tile_range, &mut source);

        Ok(Self {
            config,
            resolver: CombinationResolver::new(config.target_sum),
            grid,
            queue,
            source,
            moves_remaining: config.max_moves,
            time_remaining: config.timed_game.then_some(config.turn_seconds),
            timed_game: config.timed_game,
            state: SessionState::InProgress,
        })
    }

    /// Replaces the grid, queue and every counter. The value source carries on.
    pub fn new_game(&mut self, config: GameConfig) -> Result<()> {
        config.validate()?;
        log::debug!("New game: {config:?}");

        self.config = config;
        self.resolver = CombinationResolver::new(config.target_sum);
        self.grid = Grid::new(config.grid_size);
        self.queue = TileQueue::new(config.queue_len(), config.tile_range, &mut self.source);
        self.moves_remaining = config.max_moves;
        self.time_remaining = config.timed_game.then_some(config.turn_seconds);
        self.timed_game = config.timed_game;
        self.state = SessionState::InProgress;
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn queue(&self) -> &TileQueue {
        &self.queue
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn score(&self) -> Score {
        self.grid.score()
    }

    pub fn max_moves(&self) -> MoveCount {
        self.config.max_moves
    }

    pub fn moves_remaining(&self) -> MoveCount {
        self.moves_remaining
    }

    pub fn time_remaining(&self) -> Option<Seconds> {
        self.time_remaining
    }

    pub fn is_timed(&self) -> bool {
        self.timed_game
    }

    pub fn apply_move(&mut self, cell: Coord2) -> Result<MoveResult> {
        self.check_in_progress()?;
        let value = self.queue.peek_head()?;

        let placement = self.grid.place(cell, value);
        if !placement.is_accepted() {
            log::debug!("Rejected {value} at {cell:?}: {placement:?}");
            return Ok(MoveResult {
                cell,
                value,
                placement,
                cleared: BTreeSet::new(),
                score_delta: 0,
                state: self.state,
            });
        }

        let Resolution {
            cleared,
            score_delta,
        } = self.resolver.resolve(&self.grid, cell);
        self.grid.clear(cleared.iter().copied());
        self.grid.add_score(score_delta);
        self.grid.record_move();
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        self.queue.advance(&mut self.source);

        if self.moves_remaining == 0 {
            self.finish(SessionState::Lost);
        }

        Ok(MoveResult {
            cell,
            value,
            placement,
            cleared,
            score_delta,
            state: self.state,
        })
    }

    /// Returns `Ok(false)` once the single refresh of this game is spent.
    pub fn refresh_queue(&mut self) -> Result<bool> {
        self.check_in_progress()?;
        let refreshed = self.queue.refresh(&mut self.source);
        if !refreshed {
            log::debug!("Queue refresh already used this game");
        }
        Ok(refreshed)
    }

    pub fn on_tick(&mut self) -> Result<TickOutcome> {
        self.check_in_progress()?;

        let Some(remaining) = self.time_remaining else {
            log::warn!("Tick delivered to an untimed session, ignored");
            return Ok(TickOutcome::Untimed);
        };

        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.time_remaining = Some(remaining);
            return Ok(TickOutcome::Counted);
        }

        self.time_remaining = Some(self.config.turn_seconds);
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        if self.moves_remaining == 0 {
            self.finish(SessionState::Lost);
            Ok(TickOutcome::Lost)
        } else {
            Ok(TickOutcome::Penalty)
        }
    }

    /// Switches the countdown on or off mid-game. Turning it on restarts the turn clock.
    pub fn set_timed(&mut self, timed: bool) -> Result<()> {
        self.check_in_progress()?;
        if timed && self.config.turn_seconds == 0 {
            return Err(GameError::InvalidConfig("turn_seconds must be at least 1"));
        }

        self.timed_game = timed;
        self.time_remaining = timed.then_some(self.config.turn_seconds);
        Ok(())
    }

    pub fn suggest(&self) -> HintResult {
        HintEngine::new(self.resolver).suggest(&self.grid, &self.queue)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            size: self.grid.size(),
            cells: self.grid.values(),
            fillable: self.grid.fillable_mask(),
            queue: self.queue.to_vec(),
            score: self.grid.score(),
            moves_taken: self.grid.moves_taken(),
            moves_remaining: self.moves_remaining,
            time_remaining: self.time_remaining,
            last_move_valid: self.grid.last_move_valid(),
            refresh_available: self.queue.refresh_available(),
            state: self.state,
        }
    }

    /// Moves into a terminal state. Only the move budget ends games today,
    /// a win rule would call this with `Won`.
    fn finish(&mut self, state: SessionState) {
        if self.state.is_terminal() || !state.is_terminal() {
            return;
        }

        self.state = state;
        log::info!(
            "Game over ({:?}) with score {} after {} moves",
            self.state,
            self.grid.score(),
            self.grid.moves_taken()
        );
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.state.is_terminal() {
            Err(GameError::SessionTerminated)
        } else {
            Ok(())
        }
    }
}
