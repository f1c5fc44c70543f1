use crate::*;
pub use random::*;
pub use scripted::*;

mod random;
mod scripted;

/// Supplies fresh values for the tile queue.
pub trait ValueSource {
    /// Produces one value within `range` (inclusive on both ends).
    fn next_value(&mut self, range: TileRange) -> TileValue;
}

impl<S: ValueSource + ?Sized> ValueSource for &mut S {
    fn next_value(&mut self, range: TileRange) -> TileValue {
        (**self).next_value(range)
    }
}
