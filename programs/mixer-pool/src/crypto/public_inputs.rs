//! Public Inputs for the withdraw circuit
//!
//! # Withdrawal Circuit Public Inputs (3 total)
//! 1. root - Tree root the membership proof was built against
//! 2. nullifier_hash - Prevents double-spending
//! 3. claimant - Address receiving funds
//!
//! The claimant is bound into the signals so a valid proof cannot be
//! intercepted and resubmitted with a different payout address.
//!
//! # Field Element Encoding
//! All values are encoded as 32-byte big-endian field elements in the BN254
//! scalar field.

use crate::address::Address;
use crate::crypto::field::{check_in_field, FieldBytes};
use crate::error::Result;

/// Ordered public signal vector handed to the verifier.
pub type PublicSignals = [FieldBytes; WithdrawPublicInputs::COUNT];

/// Public inputs for withdrawal proof verification.
///
/// These must match exactly what was used to generate the proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawPublicInputs {
    /// Merkle root of the commitment tree
    pub root: FieldBytes,

    /// Nullifier hash (prevents double-spend)
    pub nullifier_hash: FieldBytes,

    /// Claimant address (who receives the denomination)
    pub claimant: Address,
}

impl WithdrawPublicInputs {
    /// Number of public inputs for verification
    pub const COUNT: usize = 3;

    pub fn new(root: FieldBytes, nullifier_hash: FieldBytes, claimant: Address) -> Self {
        Self {
            root,
            nullifier_hash,
            claimant,
        }
    }

    /// Reject any signal outside the scalar field.
    pub fn validate(&self) -> Result<()> {
        for signal in self.to_signals().iter() {
            check_in_field(signal)?;
        }
        Ok(())
    }

    /// Field elements in the order expected by the circuit.
    pub fn to_signals(&self) -> PublicSignals {
        [self.root, self.nullifier_hash, self.claimant.to_field()]
    }
}
