use rand::prelude::*;

use super::*;

/// Uniform values from a seeded small RNG, so a seed replays the same queue.
#[derive(Clone, Debug)]
pub struct RandomValues {
    rng: SmallRng,
}

impl RandomValues {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl ValueSource for RandomValues {
    fn next_value(&mut self, range: TileRange) -> TileValue {
        let (low, high) = range.bounds();
        self.rng.random_range(low..=high)
    }
}
