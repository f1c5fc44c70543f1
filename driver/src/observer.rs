use serde::{Deserialize, Serialize};
use sumfun_core::{SessionSnapshot, TickOutcome};

/// What produced an [`Update`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateCause {
    /// A move attempt, accepted or not; check `last_move_valid`.
    Move,
    Refresh,
    Tick(TickOutcome),
    NewGame,
    TimedChanged,
}

/// Pushed to observers after every state change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub cause: UpdateCause,
    pub snapshot: SessionSnapshot,
}

/// Presentation-side subscriber. Runs on the runner task, so keep it quick.
pub trait SessionObserver: Send {
    fn on_update(&mut self, update: &Update);
}

impl<F> SessionObserver for F
where
    F: FnMut(&Update) + Send,
{
    fn on_update(&mut self, update: &Update) {
        self(update)
    }
}
