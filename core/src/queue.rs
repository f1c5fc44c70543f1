use alloc::collections::VecDeque;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-capacity list of pending tile values, head first.
///
/// Holds exactly `capacity` values between operations. One full refresh is
/// available per game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileQueue {
    pending: VecDeque<TileValue>,
    capacity: usize,
    range: TileRange,
    refresh_available: bool,
}

impl TileQueue {
    pub fn new(capacity: usize, range: TileRange, source: &mut impl ValueSource) -> Self {
        let pending = (0..capacity).map(|_| source.next_value(range)).collect();
        Self {
            pending,
            capacity,
            range,
            refresh_available: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn refresh_available(&self) -> bool {
        self.refresh_available
    }

    pub fn peek_head(&self) -> Result<TileValue> {
        self.pending.front().copied().ok_or(GameError::EmptyQueue)
    }

    pub fn iter(&self) -> impl Iterator<Item = TileValue> + '_ {
        self.pending.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<TileValue> {
        self.iter().collect()
    }

    /// Drops the head and appends one fresh value at the tail.
    pub(crate) fn advance(&mut self, source: &mut impl ValueSource) {
        self.pending.pop_front();
        self.pending.push_back(source.next_value(self.range));
        debug_assert_eq!(self.pending.len(), self.capacity);
    }

    /// Regenerates every slot, once per game. Returns whether it happened.
    pub(crate) fn refresh(&mut self, source: &mut impl ValueSource) -> bool {
        if !self.refresh_available {
            return false;
        }

        for slot in self.pending.iter_mut() {
            *slot = source.next_value(self.range);
        }
        self.refresh_available = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(values: &[TileValue]) -> (TileQueue, ScriptedValues) {
        let mut source = ScriptedValues::new(values);
        let queue = TileQueue::new(5, TileRange::new(1, 9), &mut source);
        (queue, source)
    }

    #[test]
    fn new_queue_is_full() {
        let (queue, _) = queue(&[1, 2, 3, 4, 5, 6]);

        assert_eq!(queue.len(), 5);
        assert_eq!(queue.to_vec(), [1, 2, 3, 4, 5]);
        assert_eq!(queue.peek_head(), Ok(1));
        assert!(queue.refresh_available());
    }

    #[test]
    fn advance_drops_head_and_appends_tail() {
        let (mut queue, mut source) = queue(&[1, 2, 3, 4, 5, 6]);

        queue.advance(&mut source);

        assert_eq!(queue.to_vec(), [2, 3, 4, 5, 6]);
        assert_eq!(queue.len(), queue.capacity());
    }

    #[test]
    fn refresh_is_single_use() {
        let (mut queue, mut source) = queue(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);

        assert!(queue.refresh(&mut source));
        assert_eq!(queue.to_vec(), [6, 7, 8, 9, 1]);
        assert!(!queue.refresh_available());

        let before = queue.clone();
        assert!(!queue.refresh(&mut source));
        assert_eq!(queue, before);
    }

    #[test]
    fn zero_capacity_reports_empty_queue() {
        let mut source = ScriptedValues::new([1]);
        let queue = TileQueue::new(0, TileRange::new(1, 9), &mut source);

        assert_eq!(queue.peek_head(), Err(GameError::EmptyQueue));
    }
}
