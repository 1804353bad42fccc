//! Withdraw Instruction
//!
//! Pays one denomination to a claimant who proves, with a Groth16
//! zero-knowledge proof, knowledge of the opening of some committed leaf.
//!
//! # Architecture
//! 1. User generates ZK proof off-chain proving:
//!    - Knowledge of (nullifier, secret) for a commitment in the tree
//!    - The nullifier_hash is correctly derived from that nullifier
//!    - The claimant address is bound into the proof
//!
//! 2. User (or relayer) submits:
//!    - Proof data (256 bytes: A || B || C curve points)
//!    - Public inputs (root, nullifier_hash, claimant)
//!
//! 3. Verification:
//!    - Check root is in recent history
//!    - Check nullifier not already spent
//!    - Verify Groth16 proof over `[root, nullifier_hash, claimant]`
//!    - Mark nullifier as spent
//!    - Transfer the denomination to the claimant
//!
//! # State Machine
//! ```text
//! Pending -> RootChecked -> NullifierChecked -> ProofVerified -> Paid
//!    \___________\_______________\__________________\______> Rejected
//! ```
//! A rejected withdrawal leaves no trace in pool state. A payout failure
//! after the nullifier was marked rolls the mark and the debit back.

use tracing::{debug, info, warn};

use crate::address::Address;
use crate::crypto::field::FieldBytes;
use crate::crypto::groth16_verifier::Groth16Proof;
use crate::crypto::public_inputs::WithdrawPublicInputs;
use crate::error::{PoolError, Result};
use crate::events::{PoolEvent, WithdrawEvent};
use crate::pool::{Payout, Pool};
use crate::require;

// ============================================================================
// WITHDRAWAL STAGES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WithdrawalStage {
    Pending,
    RootChecked,
    NullifierChecked,
    ProofVerified,
    Paid,
    Rejected,
}

impl WithdrawalStage {
    /// Next stage on the success path, `None` for terminal stages.
    pub fn next(self) -> Option<Self> {
        match self {
            WithdrawalStage::Pending => Some(WithdrawalStage::RootChecked),
            WithdrawalStage::RootChecked => Some(WithdrawalStage::NullifierChecked),
            WithdrawalStage::NullifierChecked => Some(WithdrawalStage::ProofVerified),
            WithdrawalStage::ProofVerified => Some(WithdrawalStage::Paid),
            WithdrawalStage::Paid | WithdrawalStage::Rejected => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

/// Records the stages a single withdrawal passes through.
struct StageTrace {
    stages: Vec<WithdrawalStage>,
}

impl StageTrace {
    fn start() -> Self {
        Self {
            stages: vec![WithdrawalStage::Pending],
        }
    }

    fn current(&self) -> WithdrawalStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(WithdrawalStage::Pending)
    }

    fn advance(&mut self) {
        if let Some(next) = self.current().next() {
            debug!(from = ?self.current(), to = ?next, "withdrawal stage");
            self.stages.push(next);
        }
    }

    fn reject(&mut self, err: &PoolError) {
        warn!(stage = ?self.current(), code = err.code(), error = %err, "withdrawal rejected");
        self.stages.push(WithdrawalStage::Rejected);
    }
}

/// What the claimant gets back on success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub nullifier_hash: FieldBytes,
    pub claimant: Address,
    pub amount: u64,
    pub root: FieldBytes,
}

// ============================================================================
// HANDLER
// ============================================================================

/// Handler for withdraw.
///
/// # Arguments
/// * `proof` - Groth16 proof over `[root, nullifier_hash, claimant]`
/// * `root` - Root to prove membership against
/// * `nullifier_hash` - Hash of nullifier (prevents double-spend)
/// * `claimant` - Address to receive the denomination
/// * `payout` - Value transfer to the claimant
pub(crate) fn handler(
    pool: &mut Pool,
    proof: &Groth16Proof,
    root: FieldBytes,
    nullifier_hash: FieldBytes,
    claimant: Address,
    payout: &mut dyn Payout,
) -> Result<WithdrawReceipt> {
    let mut trace = StageTrace::start();
    let result = run(pool, &mut trace, proof, root, nullifier_hash, claimant, payout);
    if let Err(err) = &result {
        trace.reject(err);
    }
    pool.last_withdrawal = trace.stages;
    result
}

fn run(
    pool: &mut Pool,
    trace: &mut StageTrace,
    proof: &Groth16Proof,
    root: FieldBytes,
    nullifier_hash: FieldBytes,
    claimant: Address,
    payout: &mut dyn Payout,
) -> Result<WithdrawReceipt> {
    let amount = pool.config.denomination;

    // ========== VALIDATION CHECKS ==========

    require!(pool.roots.is_valid(&root), PoolError::StaleOrUnknownRoot);
    trace.advance();

    // Check only; marked after the proof passes
    require!(
        !pool.guard.is_nullifier_used(&nullifier_hash),
        PoolError::NullifierAlreadyUsed
    );
    trace.advance();

    // ========== ZK PROOF VERIFICATION ==========

    let public_inputs = WithdrawPublicInputs::new(root, nullifier_hash, claimant);
    public_inputs.validate()?;

    require!(
        pool.verifier.verify(proof, &public_inputs.to_signals()),
        PoolError::InvalidProof
    );
    trace.advance();

    // ========== STATE UPDATES ==========

    let balance_before = pool.balance;
    let new_balance = balance_before
        .checked_sub(amount)
        .ok_or(PoolError::InsufficientBalance {
            balance: balance_before,
            amount,
        })?;
    let total_withdrawals = pool
        .stats
        .total_withdrawals
        .checked_add(1)
        .ok_or(PoolError::ArithmeticOverflow)?;

    pool.guard.mark_nullifier(nullifier_hash)?;
    pool.balance = new_balance;

    if let Err(rejected) = payout.pay(pool, &claimant, amount) {
        pool.guard.release_nullifier(&nullifier_hash);
        pool.balance = balance_before;
        return Err(PoolError::PayoutFailed(rejected.to_string()));
    }
    trace.advance();

    pool.stats.total_withdrawals = total_withdrawals;

    // ========== EVENT EMISSION ==========

    let event_claimant = pool
        .config
        .withdraw_event_includes_claimant
        .then_some(claimant);
    pool.events.push(PoolEvent::Withdraw(WithdrawEvent {
        nullifier_hash,
        claimant: event_claimant,
        amount,
    }));

    info!(
        amount,
        nullifier_hash = %hex::encode(&nullifier_hash[..8]),
        "withdrawal paid"
    );

    Ok(WithdrawReceipt {
        nullifier_hash,
        claimant,
        amount,
        root,
    })
}
