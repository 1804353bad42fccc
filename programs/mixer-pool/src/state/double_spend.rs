//! Double-spend guard
//!
//! Two disjoint append-only sets:
//! - commitments already inserted as leaves
//! - nullifier hashes already spent by a withdrawal
//!
//! # Anti-Double-Spend Mechanism
//! 1. Depositor commits to `Poseidon(nullifier, secret)`
//! 2. Withdrawer reveals `nullifier_hash = Poseidon(nullifier)` and proves
//!    it belongs to some committed leaf
//! 3. If the hash is already marked the withdrawal is rejected
//! 4. Otherwise it is marked; it is never unmarked by a public operation

use std::collections::HashSet;

use crate::crypto::field::FieldBytes;
use crate::error::{PoolError, Result};
use crate::require;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoubleSpendGuard {
    commitments: HashSet<FieldBytes>,
    nullifiers: HashSet<FieldBytes>,
}

impl DoubleSpendGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a commitment as inserted.
    ///
    /// # Errors
    /// * `CommitmentReused` if it was already marked
    pub fn mark_commitment(&mut self, commitment: FieldBytes) -> Result<()> {
        require!(
            self.commitments.insert(commitment),
            PoolError::CommitmentReused
        );
        Ok(())
    }

    /// Mark a nullifier hash as spent.
    ///
    /// # Errors
    /// * `NullifierAlreadyUsed` if it was already marked
    pub fn mark_nullifier(&mut self, nullifier_hash: FieldBytes) -> Result<()> {
        require!(
            self.nullifiers.insert(nullifier_hash),
            PoolError::NullifierAlreadyUsed
        );
        Ok(())
    }

    pub fn is_commitment_used(&self, commitment: &FieldBytes) -> bool {
        self.commitments.contains(commitment)
    }

    pub fn is_nullifier_used(&self, nullifier_hash: &FieldBytes) -> bool {
        self.nullifiers.contains(nullifier_hash)
    }

    pub fn commitment_count(&self) -> usize {
        self.commitments.len()
    }

    pub fn nullifier_count(&self) -> usize {
        self.nullifiers.len()
    }

    /// Undo a mark made earlier in the same withdrawal (payout rollback).
    pub(crate) fn release_nullifier(&mut self, nullifier_hash: &FieldBytes) {
        self.nullifiers.remove(nullifier_hash);
    }

    /// Sorted contents, for deterministic snapshots.
    pub(crate) fn sorted_commitments(&self) -> Vec<FieldBytes> {
        let mut items: Vec<_> = self.commitments.iter().copied().collect();
        items.sort_unstable();
        items
    }

    pub(crate) fn sorted_nullifiers(&self) -> Vec<FieldBytes> {
        let mut items: Vec<_> = self.nullifiers.iter().copied().collect();
        items.sort_unstable();
        items
    }

    pub(crate) fn from_parts(commitments: Vec<FieldBytes>, nullifiers: Vec<FieldBytes>) -> Self {
        Self {
            commitments: commitments.into_iter().collect(),
            nullifiers: nullifiers.into_iter().collect(),
        }
    }
}
