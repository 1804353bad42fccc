//! Mixer Pool - fixed-denomination anonymizing pool
//!
//! Depositors lock exactly one denomination under a hiding commitment; the
//! commitment becomes a leaf of an append-only Merkle tree. Withdrawers later
//! prove in zero knowledge that they know the opening of *some* leaf and
//! claim the denomination to an address of their choosing.
//!
//! # Components
//! - [`state::MerkleAccumulator`]: incremental tree, O(depth) insertion
//! - [`state::RootHistory`]: last 30 roots accepted for withdrawal
//! - [`state::DoubleSpendGuard`]: used commitments and nullifier hashes
//! - [`Pool`]: deposit and withdrawal state machine over the above
//!
//! # Collaborators
//! - [`NodeHasher`]: Poseidon over BN254 in production
//! - [`ProofVerifier`]: Groth16 over BN254 in production
//! - [`Payout`]: moves the denomination to the claimant

pub mod address;
pub mod client;
pub mod crypto;
pub mod error;
pub mod events;
pub mod instructions;
pub mod pool;
pub mod state;

#[cfg(any(test, feature = "dev-mode"))]
pub mod testing;


pub use address::Address;
pub use crypto::{
    FieldBytes, Groth16Proof, Groth16Verifier, NodeHasher, PoseidonHasher, ProofVerifier,
    VerifyingKeyBytes,
};
pub use error::{PoolError, Result};
pub use events::{DepositEvent, PoolEvent, WithdrawEvent};
pub use instructions::{DepositReceipt, WithdrawReceipt, WithdrawalStage};
pub use pool::{Payout, PayoutRejected, Pool, PoolStats};
pub use state::{PoolConfig, PoolSnapshot};
