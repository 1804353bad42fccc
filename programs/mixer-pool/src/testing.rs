//! Deterministic collaborators for tests
//!
//! Compiled for unit tests and for the `dev-mode` feature.
//! NEVER use in production: [`SignalEchoVerifier`] accepts forged proofs.

use crate::address::Address;
use crate::crypto::field::FieldBytes;
use crate::crypto::groth16_verifier::{Groth16Proof, ProofVerifier};
use crate::crypto::public_inputs::PublicSignals;
use crate::error::PoolError;
use crate::pool::{Payout, PayoutRejected, Pool};

/// Accepts a proof iff it echoes the public signals:
/// `a = root || nullifier_hash`, `b[..32] = claimant`.
///
/// Enough to test that the pool binds each signal into verification.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignalEchoVerifier;

impl SignalEchoVerifier {
    /// Build the proof this verifier accepts for the given signals.
    pub fn proof_for(root: &FieldBytes, nullifier_hash: &FieldBytes, claimant: &Address) -> Groth16Proof {
        let mut proof = Groth16Proof {
            a: [0u8; 64],
            b: [0u8; 128],
            c: [0u8; 64],
        };
        proof.a[..32].copy_from_slice(root);
        proof.a[32..].copy_from_slice(nullifier_hash);
        proof.b[..32].copy_from_slice(&claimant.to_field());
        proof
    }
}

impl ProofVerifier for SignalEchoVerifier {
    fn verify(&self, proof: &Groth16Proof, public_signals: &PublicSignals) -> bool {
        proof.a[..32] == public_signals[0]
            && proof.a[32..] == public_signals[1]
            && proof.b[..32] == public_signals[2]
    }
}

/// Rejects every proof.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectAllVerifier;

impl ProofVerifier for RejectAllVerifier {
    fn verify(&self, _proof: &Groth16Proof, _public_signals: &PublicSignals) -> bool {
        false
    }
}

/// Records every payment it accepts.
#[derive(Clone, Debug, Default)]
pub struct RecordingPayout {
    pub payments: Vec<(Address, u64)>,
}

impl RecordingPayout {
    pub fn total_paid(&self) -> u64 {
        self.payments.iter().map(|(_, amount)| amount).sum()
    }
}

impl Payout for RecordingPayout {
    fn pay(&mut self, _pool: &mut Pool, claimant: &Address, amount: u64) -> Result<(), PayoutRejected> {
        self.payments.push((*claimant, amount));
        Ok(())
    }
}

/// Fails the next `remaining` payments, then succeeds.
#[derive(Clone, Debug, Default)]
pub struct FailingPayout {
    pub remaining: usize,
    pub inner: RecordingPayout,
}

impl FailingPayout {
    pub fn times(remaining: usize) -> Self {
        Self {
            remaining,
            inner: RecordingPayout::default(),
        }
    }
}

impl Payout for FailingPayout {
    fn pay(&mut self, pool: &mut Pool, claimant: &Address, amount: u64) -> Result<(), PayoutRejected> {
        if self.remaining > 0 {
            self.remaining -= 1;
            return Err(PayoutRejected("claimant refused transfer".to_string()));
        }
        self.inner.pay(pool, claimant, amount)
    }
}

/// Tries to re-enter the pool from inside the payout and records what the
/// nested call returned.
#[derive(Clone, Debug, Default)]
pub struct ReentrantPayout {
    pub nested_commitment: FieldBytes,
    pub nested_errors: Vec<PoolError>,
}

impl Payout for ReentrantPayout {
    fn pay(&mut self, pool: &mut Pool, _claimant: &Address, amount: u64) -> Result<(), PayoutRejected> {
        if let Err(err) = pool.deposit(self.nested_commitment, amount) {
            self.nested_errors.push(err);
        }
        Ok(())
    }
}
