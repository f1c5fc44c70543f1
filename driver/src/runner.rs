use sumfun_core::{
    Coord2, GameConfig, GameSession, HintResult, MoveResult, RandomValues, SessionSnapshot,
    ValueSource,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;

use crate::*;

/// Commands accepted by the runner, each with a reply slot.
#[derive(Debug)]
pub(crate) enum Command {
    ApplyMove {
        cell: Coord2,
        reply: oneshot::Sender<sumfun_core::Result<MoveResult>>,
    },
    RefreshQueue {
        reply: oneshot::Sender<sumfun_core::Result<bool>>,
    },
    Suggest {
        reply: oneshot::Sender<HintResult>,
    },
    NewGame {
        config: GameConfig,
        reply: oneshot::Sender<sumfun_core::Result<()>>,
    },
    SetTimed {
        timed: bool,
        reply: oneshot::Sender<sumfun_core::Result<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown,
}

/// Everything that can mutate the session goes through one queue.
#[derive(Debug)]
pub(crate) enum Event {
    Command(Command),
    Tick { epoch: u64 },
}

/// Owns a session and applies moves and clock ticks one at a time.
pub struct GameRunner<S = RandomValues> {
    session: GameSession<S>,
    events: UnboundedReceiver<Event>,
    sender: WeakUnboundedSender<Event>,
    clock: CountdownClock,
    observers: Vec<Box<dyn SessionObserver>>,
    score_sink: Option<Box<dyn ScoreSink>>,
    score_recorded: bool,
}

impl<S: ValueSource> GameRunner<S> {
    pub fn new(session: GameSession<S>) -> (Self, GameHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = Self {
            session,
            events: rx,
            sender: tx.downgrade(),
            clock: CountdownClock::default(),
            observers: Vec::new(),
            score_sink: None,
            score_recorded: false,
        };
        (runner, GameHandle { events: tx })
    }

    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn with_score_sink(mut self, sink: impl ScoreSink + 'static) -> Self {
        self.score_sink = Some(Box::new(sink));
        self
    }

    /// Processes events until shutdown or until every handle is dropped, then
    /// hands the session back.
    pub async fn run(mut self) -> GameSession<S> {
        self.sync_clock();

        while let Some(event) = self.events.recv().await {
            match event {
                Event::Tick { epoch } => self.handle_tick(epoch),
                Event::Command(Command::Shutdown) => break,
                Event::Command(command) => self.handle_command(command),
            }
        }

        log::debug!("Game runner stopping");
        self.clock.stop();
        self.session
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::ApplyMove { cell, reply } => {
                let result = self.session.apply_move(cell);
                if result.is_ok() {
                    self.after_change(UpdateCause::Move);
                }
                let _ = reply.send(result);
            }
            Command::RefreshQueue { reply } => {
                let result = self.session.refresh_queue();
                if result == Ok(true) {
                    self.after_change(UpdateCause::Refresh);
                }
                let _ = reply.send(result);
            }
            Command::Suggest { reply } => {
                let _ = reply.send(self.session.suggest());
            }
            Command::NewGame { config, reply } => {
                let result = self.session.new_game(config);
                if result.is_ok() {
                    self.score_recorded = false;
                    self.sync_clock();
                    self.after_change(UpdateCause::NewGame);
                }
                let _ = reply.send(result);
            }
            Command::SetTimed { timed, reply } => {
                let result = self.session.set_timed(timed);
                if result.is_ok() {
                    self.sync_clock();
                    self.after_change(UpdateCause::TimedChanged);
                }
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    fn handle_tick(&mut self, epoch: u64) {
        if !self.clock.accepts(epoch) {
            log::trace!("Dropped stale tick from epoch {epoch}");
            return;
        }

        match self.session.on_tick() {
            Ok(outcome) if outcome.has_update() => self.after_change(UpdateCause::Tick(outcome)),
            Ok(_) => {}
            Err(err) => log::warn!("Tick rejected: {err}"),
        }
    }

    /// Restarts the clock when the session wants one, stops it otherwise.
    fn sync_clock(&mut self) {
        self.clock.stop();
        if self.session.is_timed() && !self.session.is_terminal() {
            self.clock.start(self.sender.clone());
        }
    }

    fn after_change(&mut self, cause: UpdateCause) {
        if self.session.is_terminal() {
            if self.clock.is_running() {
                self.clock.stop();
            }
            if !self.score_recorded {
                self.score_recorded = true;
                if let Some(sink) = self.score_sink.as_mut() {
                    sink.record(self.session.score());
                }
            }
        }

        if self.observers.is_empty() {
            return;
        }
        let update = Update {
            cause,
            snapshot: self.session.snapshot(),
        };
        for observer in self.observers.iter_mut() {
            observer.on_update(&update);
        }
    }
}

/// Cloneable command side of a [`GameRunner`].
#[derive(Clone, Debug)]
pub struct GameHandle {
    events: UnboundedSender<Event>,
}

impl GameHandle {
    pub async fn apply_move(&self, cell: Coord2) -> Result<MoveResult> {
        Ok(self
            .request(|reply| Command::ApplyMove { cell, reply })
            .await??)
    }

    pub async fn refresh_queue(&self) -> Result<bool> {
        Ok(self
            .request(|reply| Command::RefreshQueue { reply })
            .await??)
    }

    pub async fn suggest(&self) -> Result<HintResult> {
        self.request(|reply| Command::Suggest { reply }).await
    }

    pub async fn new_game(&self, config: GameConfig) -> Result<()> {
        Ok(self
            .request(|reply| Command::NewGame { config, reply })
            .await??)
    }

    pub async fn set_timed(&self, timed: bool) -> Result<()> {
        Ok(self
            .request(|reply| Command::SetTimed { timed, reply })
            .await??)
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub fn shutdown(&self) -> Result<()> {
        self.submit(Command::Shutdown)
    }

    fn submit(&self, command: Command) -> Result<()> {
        self.events
            .send(Event::Command(command))
            .map_err(|_| DriverError::Closed)
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.submit(command(reply))?;
        response.await.map_err(|_| DriverError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use sumfun_core::{
        GameError, MoveCount, ScriptedValues, SessionState, TickOutcome, TileRange, TileValue,
    };
    use tokio::time;

    fn config(max_moves: MoveCount, timed: bool) -> GameConfig {
        GameConfig {
            grid_size: 7,
            max_moves,
            timed_game: timed,
            turn_seconds: 3,
            target_sum: 10,
            queue_capacity: 5,
            tile_range: TileRange::new(1, 9),
        }
    }

    fn spawn(
        config: GameConfig,
        values: &[TileValue],
    ) -> (
        GameHandle,
        tokio::task::JoinHandle<GameSession<ScriptedValues>>,
        Arc<Mutex<Vec<Update>>>,
    ) {
        let session = GameSession::new(config, ScriptedValues::new(values)).unwrap();
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&updates);
        let (runner, handle) = GameRunner::new(session);
        let runner = runner.with_observer(move |update: &Update| {
            sink.lock().unwrap().push(update.clone());
        });
        (handle, tokio::spawn(runner.run()), updates)
    }

    #[tokio::test]
    async fn moves_are_applied_and_observed() {
        let (handle, task, updates) = spawn(config(20, false), &[7, 3, 2, 5, 6, 1]);

        handle.apply_move((3, 3)).await.unwrap();
        let result = handle.apply_move((3, 4)).await.unwrap();
        let rejected = handle.apply_move((0, 0)).await.unwrap();

        assert_eq!(result.score_delta, 2);
        assert!(!rejected.accepted());

        let updates = updates.lock().unwrap().clone();
        assert_eq!(updates.len(), 3);
        assert!(updates.iter().all(|u| u.cause == UpdateCause::Move));
        assert_eq!(updates[1].snapshot.score, 2);
        assert!(!updates[2].snapshot.last_move_valid);

        handle.shutdown().unwrap();
        let session = task.await.unwrap();
        assert_eq!(session.moves_remaining(), 18);
    }

    #[tokio::test]
    async fn refresh_and_hint_round_trip() {
        let (handle, task, updates) = spawn(config(20, false), &[6, 4, 4, 4, 4, 4]);

        handle.apply_move((2, 2)).await.unwrap();
        let hint = handle.suggest().await.unwrap();
        assert_eq!(hint.target_cell, Some((1, 2)));

        assert!(handle.refresh_queue().await.unwrap());
        assert!(!handle.refresh_queue().await.unwrap());
        assert!(!handle.snapshot().await.unwrap().refresh_available);

        // move + one successful refresh
        assert_eq!(updates.lock().unwrap().len(), 2);
        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn clock_costs_a_move_per_expired_turn() {
        let (handle, task, updates) = spawn(config(5, true), &[1]);

        time::sleep(Duration::from_millis(3500)).await;
        let snapshot = handle.snapshot().await.unwrap();

        assert_eq!(snapshot.time_remaining, Some(3));
        assert_eq!(snapshot.moves_remaining, 4);
        let causes: Vec<_> = updates.lock().unwrap().iter().map(|u| u.cause).collect();
        assert_eq!(
            causes,
            [
                UpdateCause::Tick(TickOutcome::Counted),
                UpdateCause::Tick(TickOutcome::Counted),
                UpdateCause::Tick(TickOutcome::Penalty),
            ]
        );

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_switching_to_untimed() {
        let (handle, task, _) = spawn(config(5, true), &[1]);

        time::sleep(Duration::from_millis(1500)).await;
        handle.set_timed(false).await.unwrap();
        time::sleep(Duration::from_secs(30)).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.time_remaining, None);
        assert_eq!(snapshot.moves_remaining, 5);

        handle.set_timed(true).await.unwrap();
        assert_eq!(handle.snapshot().await.unwrap().time_remaining, Some(3));

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn new_game_restarts_clock_from_scratch() {
        let (handle, task, _) = spawn(config(5, true), &[1]);

        time::sleep(Duration::from_millis(2500)).await;
        handle.new_game(config(8, true)).await.unwrap();
        assert_eq!(handle.snapshot().await.unwrap().time_remaining, Some(3));

        time::sleep(Duration::from_millis(1500)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.time_remaining, Some(2));
        assert_eq!(snapshot.moves_remaining, 8);

        handle.new_game(config(8, false)).await.unwrap();
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.snapshot().await.unwrap().moves_remaining, 8);

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn clock_loss_records_score_once_and_stops() {
        let scores = Arc::new(Mutex::new(HighScores::default()));
        let session = GameSession::new(config(1, true), ScriptedValues::new([1])).unwrap();
        let (runner, handle) = GameRunner::new(session);
        let task = tokio::spawn(runner.with_score_sink(Arc::clone(&scores)).run());

        time::sleep(Duration::from_secs(10)).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.state, SessionState::Lost);
        assert_eq!(snapshot.time_remaining, Some(3));
        assert_eq!(scores.lock().unwrap().entries(), [0]);
        assert_eq!(
            handle.apply_move((2, 2)).await,
            Err(DriverError::Game(GameError::SessionTerminated))
        );

        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn handle_reports_closed_runner() {
        let (handle, task, _) = spawn(config(5, false), &[1]);
        handle.shutdown().unwrap();
        task.await.unwrap();

        assert_eq!(handle.snapshot().await, Err(DriverError::Closed));
    }
}
