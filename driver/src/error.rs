use sumfun_core::GameError;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Game runner has shut down")]
    Closed,
}

pub type Result<T> = core::result::Result<T, DriverError>;
