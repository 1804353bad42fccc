//! Deposit Instruction
//!
//! Locks exactly one denomination under a commitment and inserts the
//! commitment into the Merkle tree.
//!
//! # Commitment Model (Off-Chain)
//!
//! The commitment is computed OFF-CHAIN by the depositor:
//! ```text
//! commitment = Poseidon(nullifier, secret)
//! ```
//!
//! The pool never sees `nullifier` or `secret`. Lost secrets = lost funds
//! (no recovery possible). See [`crate::client::DepositNote`].
//!
//! # Order of Checks
//! 1. Tree has capacity
//! 2. Commitment not already used
//! 3. Paid amount equals the denomination
//! 4. Insert leaf (fails on out-of-field commitment, no state change)
//! 5. Record root, mark commitment, credit balance, emit event

use tracing::info;

use crate::crypto::field::FieldBytes;
use crate::error::{PoolError, Result};
use crate::events::{DepositEvent, PoolEvent};
use crate::pool::Pool;
use crate::require;

/// What a depositor needs to later build a membership proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositReceipt {
    pub leaf_index: u32,
    pub root: FieldBytes,
    pub tree_path: Vec<FieldBytes>,
    pub hash_directions: Vec<u8>,
}

/// Handler for deposit.
///
/// # Arguments
/// * `commitment` - Pre-computed commitment hash (32 bytes, big-endian)
/// * `paid_amount` - Value supplied with the call
pub(crate) fn handler(
    pool: &mut Pool,
    commitment: FieldBytes,
    paid_amount: u64,
) -> Result<DepositReceipt> {
    // ========== VALIDATION ==========

    require!(!pool.tree.is_full(), PoolError::CapacityExceeded);

    require!(
        !pool.guard.is_commitment_used(&commitment),
        PoolError::CommitmentReused
    );

    require!(
        paid_amount == pool.config.denomination,
        PoolError::WrongDenomination {
            expected: pool.config.denomination,
            paid: paid_amount,
        }
    );

    let new_balance = pool
        .balance
        .checked_add(paid_amount)
        .ok_or(PoolError::ArithmeticOverflow)?;
    let total_deposits = pool
        .stats
        .total_deposits
        .checked_add(1)
        .ok_or(PoolError::ArithmeticOverflow)?;

    // ========== MERKLE TREE UPDATE ==========

    let insertion = pool.tree.insert(commitment, pool.hasher.as_ref())?;
    let root = insertion.root();

    // ========== STATE UPDATE ==========

    pool.roots.record(root, insertion.leaf_index);
    pool.guard.mark_commitment(commitment)?;
    pool.balance = new_balance;
    pool.stats.total_deposits = total_deposits;

    // ========== EVENT EMISSION ==========

    pool.events.push(PoolEvent::Deposit(DepositEvent {
        commitment,
        leaf_index: insertion.leaf_index,
        tree_path: insertion.path.clone(),
        hash_directions: insertion.directions.clone(),
        root,
    }));

    info!(
        leaf_index = insertion.leaf_index,
        amount = paid_amount,
        // Only log first 8 bytes for privacy
        commitment = %hex::encode(&commitment[..8]),
        "deposit accepted"
    );

    Ok(DepositReceipt {
        leaf_index: insertion.leaf_index,
        root,
        tree_path: insertion.path,
        hash_directions: insertion.directions,
    })
}
