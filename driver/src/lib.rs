//! Serialized execution context around a [`sumfun_core::GameSession`]: player
//! commands and countdown ticks share one event queue, observers get a
//! snapshot after every change, finished games feed a score sink.

pub use autoplay::*;
pub use clock::*;
pub use error::*;
pub use observer::*;
pub use runner::GameHandle;
pub use runner::GameRunner;
pub use scores::*;

mod autoplay;
mod clock;
mod error;
mod observer;
mod runner;
mod scores;
