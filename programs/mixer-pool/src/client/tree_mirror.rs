//! Off-chain tree mirror
//!
//! Rebuilds the commitment tree from the deposit event stream and produces
//! Merkle membership witnesses for the withdraw circuit. Stores every leaf,
//! which the pool itself never does.

use crate::crypto::field::FieldBytes;
use crate::crypto::poseidon::{hash_nodes, NodeHasher};
use crate::error::{PoolError, Result};
use crate::events::DepositEvent;
use crate::require;
use crate::state::MerkleAccumulator;

/// Sibling path proving that `leaf` sits at `leaf_index` under `root`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleWitness {
    pub leaf: FieldBytes,
    pub leaf_index: u32,
    pub siblings: Vec<FieldBytes>,
    /// 1 when the running node is the right input at that level
    pub directions: Vec<u8>,
    pub root: FieldBytes,
}

impl MerkleWitness {
    /// Fold the path and compare with `root`.
    pub fn verify<H: NodeHasher + ?Sized>(&self, hasher: &H) -> Result<bool> {
        if self.siblings.len() != self.directions.len() {
            return Ok(false);
        }
        let mut node = self.leaf;
        for (sibling, direction) in self.siblings.iter().zip(&self.directions) {
            node = if *direction == 0 {
                hash_nodes(hasher, &node, sibling)?
            } else {
                hash_nodes(hasher, sibling, &node)?
            };
        }
        Ok(node == self.root)
    }
}

pub struct TreeMirror<H> {
    hasher: H,
    levels: u8,
    zeros: Vec<FieldBytes>,
    empty_root: FieldBytes,
    leaves: Vec<FieldBytes>,
}

impl<H: NodeHasher> TreeMirror<H> {
    pub fn new(levels: u8, hasher: H) -> Result<Self> {
        let empty = MerkleAccumulator::new(levels, &hasher)?;
        Ok(Self {
            levels,
            zeros: empty.default_nodes().to_vec(),
            empty_root: empty.empty_root(),
            leaves: Vec::new(),
            hasher,
        })
    }

    /// Replay one deposit event.
    ///
    /// # Errors
    /// * `InvalidSnapshot` if events arrive out of order or the event's
    ///   root disagrees with the mirror
    pub fn apply(&mut self, event: &DepositEvent) -> Result<()> {
        require!(
            event.leaf_index as usize == self.leaves.len(),
            PoolError::InvalidSnapshot(format!(
                "expected leaf {}, got {}",
                self.leaves.len(),
                event.leaf_index
            ))
        );
        self.insert(event.commitment)?;
        if self.root()? != event.root {
            self.leaves.pop();
            return Err(PoolError::InvalidSnapshot(format!(
                "root mismatch at leaf {}",
                event.leaf_index
            )));
        }
        Ok(())
    }

    /// Append a leaf without an event.
    pub fn insert(&mut self, leaf: FieldBytes) -> Result<u32> {
        require!(
            (self.leaves.len() as u64) < (1u64 << self.levels),
            PoolError::CapacityExceeded
        );
        let index = self.leaves.len() as u32;
        self.leaves.push(leaf);
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn position(&self, commitment: &FieldBytes) -> Option<u32> {
        self.leaves
            .iter()
            .position(|leaf| leaf == commitment)
            .map(|index| index as u32)
    }

    /// Root recomputed from every stored leaf.
    pub fn root(&self) -> Result<FieldBytes> {
        let layers = self.layers()?;
        Ok(layers
            .last()
            .and_then(|top| top.first().copied())
            .unwrap_or(self.empty_root))
    }

    /// Membership witness for `leaf_index` against the current root.
    pub fn witness(&self, leaf_index: u32) -> Result<MerkleWitness> {
        let leaf = *self
            .leaves
            .get(leaf_index as usize)
            .ok_or_else(|| PoolError::InvalidSnapshot(format!("unknown leaf {leaf_index}")))?;

        let layers = self.layers()?;
        let mut siblings = Vec::with_capacity(self.levels as usize);
        let mut directions = Vec::with_capacity(self.levels as usize);
        let mut index = leaf_index as usize;

        for level in 0..self.levels as usize {
            siblings.push(
                layers[level]
                    .get(index ^ 1)
                    .copied()
                    .unwrap_or(self.zeros[level]),
            );
            directions.push((index & 1) as u8);
            index >>= 1;
        }

        Ok(MerkleWitness {
            leaf,
            leaf_index,
            siblings,
            directions,
            root: layers
                .last()
                .and_then(|top| top.first().copied())
                .unwrap_or(self.empty_root),
        })
    }

    /// Nodes per level, leaves first; absent right children are default
    /// nodes.
    fn layers(&self) -> Result<Vec<Vec<FieldBytes>>> {
        let mut layers = Vec::with_capacity(self.levels as usize + 1);
        layers.push(self.leaves.clone());

        for level in 0..self.levels as usize {
            let below = &layers[level];
            let mut above = Vec::with_capacity(below.len().div_ceil(2));
            for pair in below.chunks(2) {
                let right = pair.get(1).unwrap_or(&self.zeros[level]);
                above.push(hash_nodes(&self.hasher, &pair[0], right)?);
            }
            layers.push(above);
        }
        Ok(layers)
    }
}
