//! The pool: owns all state and serializes every mutation
//!
//! # State
//! - Merkle accumulator of commitments
//! - Root history window
//! - Double-spend guard (commitments + nullifier hashes)
//! - Balance and statistics
//! - Retained events
//!
//! # Reentrancy
//! `deposit` and `withdraw` take a lock flag on entry and release it on every
//! exit path. A [`Payout`] receives the pool by exclusive reference; any
//! nested `deposit`/`withdraw` it attempts fails with `ReentrantCall` before
//! touching state.

use core::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;
use tracing::warn;

use crate::address::Address;
use crate::crypto::field::FieldBytes;
use crate::crypto::groth16_verifier::{Groth16Proof, ProofVerifier};
use crate::crypto::poseidon::NodeHasher;
use crate::error::{PoolError, Result};
use crate::events::PoolEvent;
use crate::instructions::{self, DepositReceipt, WithdrawReceipt, WithdrawalStage};
use crate::require;
use crate::state::{
    DoubleSpendGuard, MerkleAccumulator, PoolConfig, PoolSnapshot, RootHistory,
    ROOT_HISTORY_SIZE,
};

// ============================================================================
// PAYOUT SEAM
// ============================================================================

/// Rejection reported by a payout target.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PayoutRejected(pub String);

/// Moves the denomination to the claimant.
///
/// Called after the nullifier is marked and the balance debited. Returning
/// an error rolls both back.
pub trait Payout {
    fn pay(
        &mut self,
        pool: &mut Pool,
        claimant: &Address,
        amount: u64,
    ) -> core::result::Result<(), PayoutRejected>;
}

// ============================================================================
// STATISTICS
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PoolStats {
    /// Total number of deposits processed
    pub total_deposits: u64,

    /// Total number of withdrawals processed
    pub total_withdrawals: u64,
}

// ============================================================================
// POOL
// ============================================================================

pub struct Pool {
    pub(crate) config: PoolConfig,
    pub(crate) hasher: Box<dyn NodeHasher>,
    pub(crate) verifier: Box<dyn ProofVerifier>,
    pub(crate) tree: MerkleAccumulator,
    pub(crate) roots: RootHistory,
    pub(crate) guard: DoubleSpendGuard,
    pub(crate) balance: u64,
    pub(crate) stats: PoolStats,
    pub(crate) events: Vec<PoolEvent>,
    pub(crate) last_withdrawal: Vec<WithdrawalStage>,
    locked: bool,
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("config", &self.config)
            .field("next_leaf_index", &self.tree.next_leaf_index())
            .field("root", &hex::encode(self.tree.root()))
            .field("balance", &self.balance)
            .field("stats", &self.stats)
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

impl Pool {
    /// Create an empty pool.
    ///
    /// # Errors
    /// * `TreeTooDeep` if `config.levels > 10`
    /// * `ZeroDenomination` if `config.denomination == 0`
    pub fn new(
        config: PoolConfig,
        hasher: Box<dyn NodeHasher>,
        verifier: Box<dyn ProofVerifier>,
    ) -> Result<Self> {
        config.validate()?;
        let tree = MerkleAccumulator::new(config.levels, hasher.as_ref())?;

        Ok(Self {
            config,
            hasher,
            verifier,
            tree,
            roots: RootHistory::new(),
            guard: DoubleSpendGuard::new(),
            balance: 0,
            stats: PoolStats::default(),
            events: Vec::new(),
            last_withdrawal: Vec::new(),
            locked: false,
        })
    }

    // ========== OPERATIONS ==========

    /// Insert `commitment` as the next leaf, paying exactly the denomination.
    pub fn deposit(&mut self, commitment: FieldBytes, paid_amount: u64) -> Result<DepositReceipt> {
        self.enter()?;
        let result = instructions::deposit::handler(self, commitment, paid_amount);
        self.locked = false;
        result
    }

    /// Claim the denomination to `claimant` with a proof of membership.
    pub fn withdraw(
        &mut self,
        proof: &Groth16Proof,
        root: FieldBytes,
        nullifier_hash: FieldBytes,
        claimant: Address,
        payout: &mut dyn Payout,
    ) -> Result<WithdrawReceipt> {
        self.enter()?;
        let result =
            instructions::withdraw::handler(self, proof, root, nullifier_hash, claimant, payout);
        self.locked = false;
        result
    }

    /// Same as [`Pool::withdraw`] with a raw `A || B || C` proof blob.
    pub fn withdraw_with_proof_bytes(
        &mut self,
        proof_data: &[u8],
        root: FieldBytes,
        nullifier_hash: FieldBytes,
        claimant: Address,
        payout: &mut dyn Payout,
    ) -> Result<WithdrawReceipt> {
        let proof = Groth16Proof::from_bytes(proof_data)?;
        self.withdraw(&proof, root, nullifier_hash, claimant, payout)
    }

    fn enter(&mut self) -> Result<()> {
        if self.locked {
            warn!("reentrant pool call rejected");
            return Err(PoolError::ReentrantCall);
        }
        self.locked = true;
        Ok(())
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PoolEvent> {
        core::mem::take(&mut self.events)
    }

    // ========== ACCESSORS ==========

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn levels(&self) -> u8 {
        self.config.levels
    }

    pub fn denomination(&self) -> u64 {
        self.config.denomination
    }

    pub fn next_leaf_index(&self) -> u32 {
        self.tree.next_leaf_index()
    }

    pub fn capacity(&self) -> u32 {
        self.tree.capacity()
    }

    pub fn current_root(&self) -> FieldBytes {
        self.tree.root()
    }

    pub fn is_known_root(&self, root: &FieldBytes) -> bool {
        self.roots.is_valid(root)
    }

    pub fn is_commitment_used(&self, commitment: &FieldBytes) -> bool {
        self.guard.is_commitment_used(commitment)
    }

    pub fn is_nullifier_used(&self, nullifier_hash: &FieldBytes) -> bool {
        self.guard.is_nullifier_used(nullifier_hash)
    }

    /// Accepted roots, oldest first.
    pub fn root_history(&self) -> Vec<FieldBytes> {
        self.roots.window()
    }

    pub fn root_history_slots(&self) -> usize {
        self.roots.capacity()
    }

    pub fn last_tree_path(&self) -> &[FieldBytes] {
        self.tree.last_path()
    }

    pub fn filled_subtrees(&self) -> &[FieldBytes] {
        self.tree.filled_subtrees()
    }

    pub fn default_node(&self, level: usize) -> Option<FieldBytes> {
        self.tree.default_node(level)
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Stages passed through by the most recent withdrawal attempt.
    pub fn last_withdrawal_stages(&self) -> &[WithdrawalStage] {
        &self.last_withdrawal
    }

    pub fn pending_events(&self) -> &[PoolEvent] {
        &self.events
    }

    // ========== PERSISTENCE ==========

    /// Export all durable state. Retained events are not included.
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            config: self.config.clone(),
            next_leaf_index: self.tree.next_leaf_index(),
            filled_subtrees: self.tree.filled_subtrees().to_vec(),
            last_path: self.tree.last_path().to_vec(),
            root_slots: self.roots.slots().to_vec(),
            root_last_index: self.roots.last_index(),
            commitments: self.guard.sorted_commitments(),
            nullifiers: self.guard.sorted_nullifiers(),
            balance: self.balance,
            stats: self.stats,
        }
    }

    /// Rebuild a pool from a snapshot with fresh collaborators.
    ///
    /// # Errors
    /// * `InvalidSnapshot` if the parts are inconsistent with each other
    pub fn restore(
        snapshot: PoolSnapshot,
        hasher: Box<dyn NodeHasher>,
        verifier: Box<dyn ProofVerifier>,
    ) -> Result<Self> {
        let invalid = |what: &str| PoolError::InvalidSnapshot(what.to_string());
        snapshot.config.validate()?;

        let tree = MerkleAccumulator::from_parts(
            snapshot.config.levels,
            snapshot.next_leaf_index,
            snapshot.filled_subtrees,
            snapshot.last_path,
            hasher.as_ref(),
        )?;

        let slots: [Option<FieldBytes>; ROOT_HISTORY_SIZE] = snapshot
            .root_slots
            .try_into()
            .map_err(|_| invalid("root history slot count"))?;
        let roots = RootHistory::from_parts(slots, snapshot.root_last_index);

        // Sorted and duplicate-free, as exported
        require!(
            is_strictly_increasing(&snapshot.commitments),
            invalid("commitments not sorted or contain duplicates")
        );
        require!(
            is_strictly_increasing(&snapshot.nullifiers),
            invalid("nullifiers not sorted or contain duplicates")
        );
        require!(
            snapshot.commitments.len() as u64 == u64::from(tree.next_leaf_index()),
            invalid("commitment count does not match leaf count")
        );
        require!(
            snapshot.nullifiers.len() as u64 == snapshot.stats.total_withdrawals,
            invalid("nullifier count does not match withdrawal count")
        );
        if tree.next_leaf_index() > 0 {
            require!(
                roots.latest() == Some(tree.root()),
                invalid("latest root does not match tree")
            );
        }

        let expected_balance = snapshot
            .stats
            .total_deposits
            .checked_sub(snapshot.stats.total_withdrawals)
            .and_then(|n| n.checked_mul(snapshot.config.denomination));
        require!(
            expected_balance == Some(snapshot.balance),
            invalid("balance does not match statistics")
        );

        Ok(Self {
            config: snapshot.config,
            hasher,
            verifier,
            tree,
            roots,
            guard: DoubleSpendGuard::from_parts(snapshot.commitments, snapshot.nullifiers),
            balance: snapshot.balance,
            stats: snapshot.stats,
            events: Vec::new(),
            last_withdrawal: Vec::new(),
            locked: false,
        })
    }
}

fn is_strictly_increasing(items: &[FieldBytes]) -> bool {
    items.windows(2).all(|w| w[0] < w[1])
}
