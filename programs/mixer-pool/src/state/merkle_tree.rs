//! Incremental Merkle Tree for commitment storage
//!
//! Implements an append-only Merkle tree of fixed depth. Uses the
//! filled_subtrees pattern for O(depth) insertions: only one node per level
//! is retained instead of every leaf.
//!
//! # Insertion
//! For leaf index `k` and level `i`, `parity = (k >> i) & 1`:
//! - parity 0: the running node is the left input, the default node of that
//!   level (an empty subtree) is the right input, and the running node is
//!   cached as the next left sibling for this level.
//! - parity 1: the cached left sibling is the left input and the running
//!   node the right input.
//!
//! The cache slot of a level is only overwritten when the running node sits
//! at an even position. Overwriting every slot on every insertion breaks the
//! root from the fourth leaf onward (an odd node at level 1 would pair with
//! its own half-filled subtree).

use borsh::{BorshDeserialize, BorshSerialize};

use crate::crypto::field::FieldBytes;
use crate::crypto::poseidon::{hash_nodes, NodeHasher};
use crate::error::{PoolError, Result};
use crate::require;

/// Maximum supported tree depth (2^10 = 1024 leaves)
pub const MAX_TREE_DEPTH: u8 = 10;

/// Canonical empty leaf value.
pub const EMPTY_LEAF: FieldBytes = [0u8; 32];

/// Result of a single insertion.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Insertion {
    /// Index of the inserted leaf
    pub leaf_index: u32,
    /// `levels + 1` nodes from the leaf (element 0) to the root (last element)
    pub path: Vec<FieldBytes>,
    /// `levels` flags: 0 when the new node was the left hash input
    pub directions: Vec<u8>,
    /// The other hash input used at each level
    pub siblings: Vec<FieldBytes>,
}

impl Insertion {
    /// Root produced by this insertion.
    pub fn root(&self) -> FieldBytes {
        // path always holds at least the leaf
        self.path[self.path.len() - 1]
    }
}

/// Incremental Merkle accumulator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleAccumulator {
    /// Tree depth (immutable after construction)
    levels: u8,

    /// Next leaf index to be filled (also = total leaves inserted)
    next_leaf_index: u32,

    /// Most recent left node at each level
    /// Length = levels
    filled_subtrees: Vec<FieldBytes>,

    /// Root of an empty subtree for each level
    /// zeros[0] = empty leaf, zeros[i] = hash(zeros[i-1], zeros[i-1])
    /// Length = levels
    zeros: Vec<FieldBytes>,

    /// Root of the all-empty tree
    empty_root: FieldBytes,

    /// Path produced by the most recent insertion (empty before the first)
    last_path: Vec<FieldBytes>,
}

impl MerkleAccumulator {
    /// Build an empty tree of depth `levels`.
    ///
    /// # Errors
    /// * `TreeTooDeep` if `levels > MAX_TREE_DEPTH`
    pub fn new<H: NodeHasher + ?Sized>(levels: u8, hasher: &H) -> Result<Self> {
        require!(
            levels <= MAX_TREE_DEPTH,
            PoolError::TreeTooDeep {
                levels,
                max: MAX_TREE_DEPTH
            }
        );

        let (zeros, empty_root) = Self::compute_zero_values(levels, hasher)?;

        Ok(Self {
            levels,
            next_leaf_index: 0,
            filled_subtrees: zeros.clone(),
            zeros,
            empty_root,
            last_path: Vec::new(),
        })
    }

    /// Compute the default node for each level, plus the empty root.
    ///
    /// These MUST match the circuit's zero values exactly.
    fn compute_zero_values<H: NodeHasher + ?Sized>(
        levels: u8,
        hasher: &H,
    ) -> Result<(Vec<FieldBytes>, FieldBytes)> {
        let mut zeros = Vec::with_capacity(levels as usize);
        let mut current = EMPTY_LEAF;

        for _ in 0..levels {
            zeros.push(current);
            current = hash_nodes(hasher, &current, &current)?;
        }

        Ok((zeros, current))
    }

    /// Insert a new commitment leaf into the tree.
    ///
    /// Every hash is computed before any state is touched, so a failure
    /// leaves the accumulator exactly as it was.
    ///
    /// # Errors
    /// * `CapacityExceeded` if the tree holds `2^levels` leaves
    /// * `OutOfField` if the leaf is not a canonical field element
    pub fn insert<H: NodeHasher + ?Sized>(
        &mut self,
        leaf: FieldBytes,
        hasher: &H,
    ) -> Result<Insertion> {
        require!(!self.is_full(), PoolError::CapacityExceeded);

        let leaf_index = self.next_leaf_index;
        let levels = self.levels as usize;

        let mut path = Vec::with_capacity(levels + 1);
        let mut directions = Vec::with_capacity(levels);
        let mut siblings = Vec::with_capacity(levels);
        path.push(leaf);

        for level in 0..levels {
            let current = path[level];
            let parity = (leaf_index >> level) & 1;

            let parent = if parity == 0 {
                siblings.push(self.zeros[level]);
                hash_nodes(hasher, &current, &self.zeros[level])?
            } else {
                siblings.push(self.filled_subtrees[level]);
                hash_nodes(hasher, &self.filled_subtrees[level], &current)?
            };

            directions.push(parity as u8);
            path.push(parent);
        }

        // levels == 0 is a single-leaf tree; the leaf is the root
        if levels == 0 {
            crate::crypto::field::check_in_field(&leaf)?;
        }

        // ========== COMMIT ==========

        for level in 0..levels {
            if directions[level] == 0 {
                self.filled_subtrees[level] = path[level];
            }
        }

        self.next_leaf_index = self
            .next_leaf_index
            .checked_add(1)
            .ok_or(PoolError::ArithmeticOverflow)?;
        self.last_path = path.clone();

        Ok(Insertion {
            leaf_index,
            path,
            directions,
            siblings,
        })
    }

    /// Current root: the last inserted path's root, or the empty root.
    pub fn root(&self) -> FieldBytes {
        self.last_path.last().copied().unwrap_or(self.empty_root)
    }

    /// Root of the tree before any insertion.
    pub fn empty_root(&self) -> FieldBytes {
        self.empty_root
    }

    pub fn levels(&self) -> u8 {
        self.levels
    }

    /// Get the next leaf index (useful for clients tracking their position).
    pub fn next_leaf_index(&self) -> u32 {
        self.next_leaf_index
    }

    /// Get tree capacity.
    pub fn capacity(&self) -> u32 {
        1u32 << self.levels
    }

    /// Check if tree is full.
    pub fn is_full(&self) -> bool {
        self.next_leaf_index >= self.capacity()
    }

    /// Default (empty subtree) node for `level`.
    pub fn default_node(&self, level: usize) -> Option<FieldBytes> {
        self.zeros.get(level).copied()
    }

    pub fn default_nodes(&self) -> &[FieldBytes] {
        &self.zeros
    }

    pub fn filled_subtrees(&self) -> &[FieldBytes] {
        &self.filled_subtrees
    }

    /// Path produced by the most recent insertion.
    pub fn last_path(&self) -> &[FieldBytes] {
        &self.last_path
    }

    /// Rebuild an accumulator from persisted parts.
    pub(crate) fn from_parts<H: NodeHasher + ?Sized>(
        levels: u8,
        next_leaf_index: u32,
        filled_subtrees: Vec<FieldBytes>,
        last_path: Vec<FieldBytes>,
        hasher: &H,
    ) -> Result<Self> {
        let mut tree = Self::new(levels, hasher)?;
        let invalid = |what: &str| PoolError::InvalidSnapshot(what.to_string());

        if next_leaf_index > tree.capacity() {
            return Err(invalid("leaf count exceeds capacity"));
        }
        if filled_subtrees.len() != levels as usize {
            return Err(invalid("filled subtree count does not match depth"));
        }
        let expected_path = if next_leaf_index == 0 { 0 } else { levels as usize + 1 };
        if last_path.len() != expected_path {
            return Err(invalid("last path length does not match depth"));
        }

        tree.next_leaf_index = next_leaf_index;
        tree.filled_subtrees = filled_subtrees;
        tree.last_path = last_path;
        Ok(tree)
    }
}
