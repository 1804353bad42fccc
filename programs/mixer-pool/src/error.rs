//! Unified error types for the mixer pool
//!
//! Error codes are stable across versions for client compatibility.
//! Every error aborts the whole operation; no partial state survives.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PoolError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    // ========== Deposit Errors (6000-6009) ==========

    /// Merkle tree has reached `2^levels` leaves
    #[error("Merkle tree is full")]
    CapacityExceeded, // 6000

    /// Commitment was already inserted as a leaf
    #[error("Commitment already exists in tree")]
    CommitmentReused, // 6001

    /// Deposit value differs from the pool denomination
    #[error("Incorrect deposit amount: expected {expected}, got {paid}")]
    WrongDenomination { expected: u64, paid: u64 }, // 6002

    // ========== Field Errors (6010-6019) ==========

    /// Value is not below the BN254 scalar field modulus
    #[error("Value is not a canonical field element")]
    OutOfField, // 6010

    /// Hash collaborator reported a failure
    #[error("Hasher failed: {0}")]
    Hasher(String), // 6011

    // ========== Withdrawal Errors (6020-6029) ==========

    /// Merkle root not found in recent history
    #[error("Merkle root not in recent history")]
    StaleOrUnknownRoot, // 6020

    /// Nullifier has already been spent (double-spend attempt)
    #[error("Nullifier already spent")]
    NullifierAlreadyUsed, // 6021

    /// ZK proof verification failed
    #[error("Invalid proof: verification failed")]
    InvalidProof, // 6022

    /// Value transfer to the claimant failed; the withdrawal was rolled back
    #[error("Payout failed: {0}")]
    PayoutFailed(String), // 6023

    /// A deposit or withdrawal was entered while another was in flight
    #[error("Reentrant call rejected")]
    ReentrantCall, // 6024

    /// Pool holds less than one denomination; only reachable when the
    /// verifier accepts a proof no deposit backs
    #[error("Insufficient pool balance: have {balance}, need {amount}")]
    InsufficientBalance { balance: u64, amount: u64 }, // 6025

    // ========== Proof Format Errors (6030-6039) ==========

    /// Proof data has incorrect format or length
    #[error("Invalid proof format: expected 256 bytes (A: 64, B: 128, C: 64)")]
    InvalidProofFormat, // 6030

    /// Verification key points are malformed or of the wrong arity
    #[error("Invalid verifying key: {0}")]
    InvalidVerifyingKey(String), // 6031

    // ========== Configuration Errors (6040-6049) ==========

    /// Tree depth above the supported maximum
    #[error("Tree depth must be at most {max}, got {levels}")]
    TreeTooDeep { levels: u8, max: u8 }, // 6040

    /// Denomination must be positive
    #[error("Invalid denomination: must be greater than zero")]
    ZeroDenomination, // 6041

    /// Configuration could not be read or parsed
    #[error("Invalid configuration: {0}")]
    Config(String), // 6042

    // ========== Persistence / Client Errors (6050-6059) ==========

    /// Snapshot bytes do not describe a consistent pool
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String), // 6050

    /// Deposit note text could not be parsed
    #[error("Invalid note: {0}")]
    InvalidNote(String), // 6051

    // ========== Overflow / Computation Errors (6060-6069) ==========

    /// Arithmetic overflow occurred
    #[error("Arithmetic overflow")]
    ArithmeticOverflow, // 6060
}

impl PoolError {
    /// Stable numeric code for off-chain tooling.
    pub fn code(&self) -> u32 {
        match self {
            PoolError::CapacityExceeded => 6000,
            PoolError::CommitmentReused => 6001,
            PoolError::WrongDenomination { .. } => 6002,
            PoolError::OutOfField => 6010,
            PoolError::Hasher(_) => 6011,
            PoolError::StaleOrUnknownRoot => 6020,
            PoolError::NullifierAlreadyUsed => 6021,
            PoolError::InvalidProof => 6022,
            PoolError::PayoutFailed(_) => 6023,
            PoolError::ReentrantCall => 6024,
            PoolError::InsufficientBalance { .. } => 6025,
            PoolError::InvalidProofFormat => 6030,
            PoolError::InvalidVerifyingKey(_) => 6031,
            PoolError::TreeTooDeep { .. } => 6040,
            PoolError::ZeroDenomination => 6041,
            PoolError::Config(_) => 6042,
            PoolError::InvalidSnapshot(_) => 6050,
            PoolError::InvalidNote(_) => 6051,
            PoolError::ArithmeticOverflow => 6060,
        }
    }

    /// Whether a caller can expect success by rebuilding the proof against
    /// a fresher root.
    pub fn is_stale_root(&self) -> bool {
        matches!(self, PoolError::StaleOrUnknownRoot)
    }
}

/// Return early with `$err` unless `$cond` holds.
#[macro_export]
macro_rules! require {
    ($cond:expr, $err:expr $(,)?) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}
