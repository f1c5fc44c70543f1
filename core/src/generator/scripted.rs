use alloc::vec::Vec;

use super::*;

/// Replays a fixed list of values, wrapping around at the end.
///
/// Values are handed out verbatim, the requested range is not applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedValues {
    values: Vec<TileValue>,
    cursor: usize,
}

impl ScriptedValues {
    pub fn new(values: impl Into<Vec<TileValue>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl ValueSource for ScriptedValues {
    fn next_value(&mut self, range: TileRange) -> TileValue {
        if self.values.is_empty() {
            log::warn!("Scripted value list is empty, falling back to the range minimum");
            return range.bounds().0;
        }

        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around() {
        let range = TileRange::new(1, 9);
        let mut source = ScriptedValues::new([3, 7]);

        let values: Vec<_> = (0..5).map(|_| source.next_value(range)).collect();

        assert_eq!(values, [3, 7, 3, 7, 3]);
    }
}
