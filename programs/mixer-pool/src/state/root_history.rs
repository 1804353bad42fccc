//! Rolling window of recent Merkle roots
//!
//! Withdrawal proofs are built off-chain against some root; deposits that
//! land in between must not invalidate them. The pool therefore accepts any
//! of the last [`ROOT_HISTORY_SIZE`] roots.
//!
//! Slot for a root = `leaf_index % ROOT_HISTORY_SIZE`, where `leaf_index` is
//! the leaf whose insertion produced it. Slots never written hold `None` and
//! match nothing, so the all-zero value is never accepted by default.

use crate::crypto::field::FieldBytes;

/// Number of roots retained.
pub const ROOT_HISTORY_SIZE: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootHistory {
    slots: [Option<FieldBytes>; ROOT_HISTORY_SIZE],
    /// Leaf index of the most recent record
    last_index: Option<u32>,
}

impl Default for RootHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl RootHistory {
    pub fn new() -> Self {
        Self {
            slots: [None; ROOT_HISTORY_SIZE],
            last_index: None,
        }
    }

    /// Record the root produced by inserting leaf `leaf_index`.
    pub fn record(&mut self, root: FieldBytes, leaf_index: u32) {
        self.slots[Self::slot(leaf_index)] = Some(root);
        self.last_index = Some(leaf_index);
    }

    /// Check if a root is in the recent history.
    pub fn is_valid(&self, root: &FieldBytes) -> bool {
        self.slots.iter().flatten().any(|known| known == root)
    }

    /// Most recently recorded root.
    pub fn latest(&self) -> Option<FieldBytes> {
        self.last_index.and_then(|index| self.slots[Self::slot(index)])
    }

    /// Recorded roots, oldest first.
    pub fn window(&self) -> Vec<FieldBytes> {
        let Some(last) = self.last_index else {
            return Vec::new();
        };
        let newest = Self::slot(last);
        (1..=ROOT_HISTORY_SIZE)
            .filter_map(|offset| self.slots[(newest + offset) % ROOT_HISTORY_SIZE])
            .collect()
    }

    /// Number of history slots.
    pub fn capacity(&self) -> usize {
        ROOT_HISTORY_SIZE
    }

    pub fn last_index(&self) -> Option<u32> {
        self.last_index
    }

    pub(crate) fn slots(&self) -> &[Option<FieldBytes>; ROOT_HISTORY_SIZE] {
        &self.slots
    }

    pub(crate) fn from_parts(
        slots: [Option<FieldBytes>; ROOT_HISTORY_SIZE],
        last_index: Option<u32>,
    ) -> Self {
        Self { slots, last_index }
    }

    fn slot(leaf_index: u32) -> usize {
        leaf_index as usize % ROOT_HISTORY_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::field::u64_to_field;

    #[test]
    fn test_empty_history_accepts_nothing() {
        let history = RootHistory::new();
        assert!(!history.is_valid(&[0u8; 32]));
        assert_eq!(history.latest(), None);
        assert!(history.window().is_empty());
        assert_eq!(history.capacity(), 30);
    }

    #[test]
    fn test_window_slides() {
        let mut history = RootHistory::new();
        for i in 0..31u32 {
            history.record(u64_to_field(i as u64 + 100), i);
        }

        // leaf 30 overwrote slot 0
        assert!(!history.is_valid(&u64_to_field(100)));
        assert!(history.is_valid(&u64_to_field(101)));
        assert!(history.is_valid(&u64_to_field(130)));
        assert_eq!(history.latest(), Some(u64_to_field(130)));

        let window = history.window();
        assert_eq!(window.len(), ROOT_HISTORY_SIZE);
        assert_eq!(window.first(), Some(&u64_to_field(101)));
        assert_eq!(window.last(), Some(&u64_to_field(130)));
    }

    #[test]
    fn test_partial_window_ordered() {
        let mut history = RootHistory::new();
        for i in 0..3u32 {
            history.record(u64_to_field(i as u64 + 1), i);
        }
        assert_eq!(
            history.window(),
            vec![u64_to_field(1), u64_to_field(2), u64_to_field(3)]
        );
    }
}
