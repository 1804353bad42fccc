//! Groth16 Zero-Knowledge Proof Verifier
//!
//! The pool only consumes a boolean predicate over a proof and the three
//! public signals; [`ProofVerifier`] is that seam. [`Groth16Verifier`] is the
//! production implementation over BN254:
//!
//! ```text
//! e(A, B) = e(α, β) · e(vk_x, γ) · e(C, δ)
//! vk_x    = IC[0] + Σ public_input[i] · IC[i+1]
//! ```
//!
//! Proof and key bytes use the uncompressed big-endian layout documented in
//! [`crate::crypto::curve_utils`]. Any decoding failure makes the proof
//! invalid; the verifier never panics on attacker-supplied bytes.

use ark_bn254::{Bn254, Fr};
use ark_ff::PrimeField;
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, Proof, VerifyingKey};
use tracing::debug;

use crate::crypto::curve_utils::{g1_from_be_bytes, g2_from_be_bytes, G1Point, G2Point};
use crate::crypto::field::check_in_field;
use crate::crypto::public_inputs::{PublicSignals, WithdrawPublicInputs};
use crate::error::{PoolError, Result};
use crate::require;

// ============================================================================
// PROOF STRUCTURE
// ============================================================================

/// Expected proof data length in bytes.
/// A = 64 bytes (G1 uncompressed)
/// B = 128 bytes (G2 uncompressed)
/// C = 64 bytes (G1 uncompressed)
pub const PROOF_DATA_LEN: usize = 256;

/// Groth16 proof: A, C ∈ G1 and B ∈ G2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Groth16Proof {
    /// Point A ∈ G1 (uncompressed, 64 bytes)
    pub a: G1Point,

    /// Point B ∈ G2 (uncompressed, 128 bytes)
    pub b: G2Point,

    /// Point C ∈ G1 (uncompressed, 64 bytes)
    pub c: G1Point,
}

impl Groth16Proof {
    /// Parse proof from raw `A || B || C` bytes.
    ///
    /// # Errors
    /// * `InvalidProofFormat` unless exactly 256 bytes are supplied
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        require!(data.len() == PROOF_DATA_LEN, PoolError::InvalidProofFormat);

        let mut proof = Groth16Proof {
            a: [0u8; 64],
            b: [0u8; 128],
            c: [0u8; 64],
        };

        proof.a.copy_from_slice(&data[0..64]);
        proof.b.copy_from_slice(&data[64..192]);
        proof.c.copy_from_slice(&data[192..256]);

        Ok(proof)
    }

    /// Serialize proof to bytes.
    pub fn to_bytes(&self) -> [u8; PROOF_DATA_LEN] {
        let mut bytes = [0u8; PROOF_DATA_LEN];
        bytes[0..64].copy_from_slice(&self.a);
        bytes[64..192].copy_from_slice(&self.b);
        bytes[192..256].copy_from_slice(&self.c);
        bytes
    }
}

// ============================================================================
// VERIFIER SEAM
// ============================================================================

/// Boolean predicate: is `proof` valid for exactly these public signals.
pub trait ProofVerifier {
    fn verify(&self, proof: &Groth16Proof, public_signals: &PublicSignals) -> bool;
}

// ============================================================================
// VERIFICATION KEY
// ============================================================================

/// Verification key in the uncompressed byte layout produced by the
/// trusted setup export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKeyBytes {
    pub alpha_g1: G1Point,
    pub beta_g2: G2Point,
    pub gamma_g2: G2Point,
    pub delta_g2: G2Point,
    /// IC[0..=n] for n public inputs
    pub ic: Vec<G1Point>,
}

impl VerifyingKeyBytes {
    fn decode(&self) -> Result<VerifyingKey<Bn254>> {
        let invalid = |what: &str| PoolError::InvalidVerifyingKey(what.to_string());

        let gamma_abc_g1 = self
            .ic
            .iter()
            .map(|point| g1_from_be_bytes(point).map_err(|_| invalid("ic point")))
            .collect::<Result<Vec<_>>>()?;

        Ok(VerifyingKey {
            alpha_g1: g1_from_be_bytes(&self.alpha_g1).map_err(|_| invalid("alpha_g1"))?,
            beta_g2: g2_from_be_bytes(&self.beta_g2).map_err(|_| invalid("beta_g2"))?,
            gamma_g2: g2_from_be_bytes(&self.gamma_g2).map_err(|_| invalid("gamma_g2"))?,
            delta_g2: g2_from_be_bytes(&self.delta_g2).map_err(|_| invalid("delta_g2"))?,
            gamma_abc_g1,
        })
    }
}

// ============================================================================
// GROTH16 VERIFIER
// ============================================================================

/// Groth16 verifier over BN254 for the three-signal withdraw circuit.
#[derive(Clone, Debug)]
pub struct Groth16Verifier {
    pvk: PreparedVerifyingKey<Bn254>,
}

impl Groth16Verifier {
    /// Build a verifier from an exported key.
    ///
    /// # Errors
    /// * `InvalidVerifyingKey` if a point fails to decode or the key does not
    ///   carry exactly one IC point per public signal plus the base point
    pub fn new(key: &VerifyingKeyBytes) -> Result<Self> {
        Self::from_key(&key.decode()?)
    }

    /// Build a verifier from an arkworks key.
    pub fn from_key(key: &VerifyingKey<Bn254>) -> Result<Self> {
        require!(
            key.gamma_abc_g1.len() == WithdrawPublicInputs::COUNT + 1,
            PoolError::InvalidVerifyingKey(format!(
                "expected {} IC points, got {}",
                WithdrawPublicInputs::COUNT + 1,
                key.gamma_abc_g1.len()
            ))
        );
        Ok(Self {
            pvk: prepare_verifying_key(key),
        })
    }

    fn try_verify(&self, proof: &Groth16Proof, public_signals: &PublicSignals) -> Result<bool> {
        let proof = Proof::<Bn254> {
            a: g1_from_be_bytes(&proof.a)?,
            b: g2_from_be_bytes(&proof.b)?,
            c: g1_from_be_bytes(&proof.c)?,
        };

        let mut inputs = Vec::with_capacity(public_signals.len());
        for signal in public_signals.iter() {
            check_in_field(signal)?;
            inputs.push(Fr::from_be_bytes_mod_order(signal));
        }

        Groth16::<Bn254>::verify_proof(&self.pvk, &proof, &inputs)
            .map_err(|e| PoolError::InvalidVerifyingKey(e.to_string()))
    }
}

impl ProofVerifier for Groth16Verifier {
    fn verify(&self, proof: &Groth16Proof, public_signals: &PublicSignals) -> bool {
        match self.try_verify(proof, public_signals) {
            Ok(valid) => valid,
            Err(err) => {
                debug!(error = %err, "groth16 proof rejected before pairing check");
                false
            }
        }
    }
}
