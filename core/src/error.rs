use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid game configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("Tile queue is empty")]
    EmptyQueue,
    #[error("Game already ended, no new moves are accepted")]
    SessionTerminated,
}

pub type Result<T> = core::result::Result<T, GameError>;
