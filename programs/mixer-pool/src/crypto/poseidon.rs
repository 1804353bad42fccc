//! Hash Functions for the mixer pool
//!
//! # Hash Function Architecture
//!
//! ## Tree nodes
//! The accumulator only needs a two-to-one compression function over the
//! BN254 scalar field. It is consumed through the [`NodeHasher`] trait so the
//! tree can be exercised with any deterministic combiner.
//!
//! [`PoseidonHasher`] is the production combiner:
//! ```text
//! node = Poseidon(left, right)
//! ```
//! using circomlib-compatible parameters (BN254 scalar field, t = 3,
//! RF = 8, RP = 57), so roots match the withdraw circuit exactly.
//!
//! ## Notes (off-chain)
//! ```text
//! commitment     = Poseidon(nullifier, secret)
//! nullifier_hash = Poseidon(nullifier)
//! ```
//!
//! # Circuit Compatibility
//! All inputs and outputs are 32-byte big-endian field elements.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonBytesHasher};

use crate::crypto::field::{check_in_field, FieldBytes};
use crate::error::{PoolError, Result};

// ============================================================================
// NODE HASHER SEAM
// ============================================================================

/// Two-input compression function used to combine tree nodes.
///
/// Implementations must be pure and deterministic and return a canonical
/// field element. Callers go through [`hash_nodes`], which applies the field
/// guard to both operands first.
pub trait NodeHasher {
    /// Combine a left and right child into their parent node.
    fn combine(&self, left: &FieldBytes, right: &FieldBytes) -> Result<FieldBytes>;
}

/// Field-guarded node hash: `Hash(left, right)`.
///
/// # Errors
/// * `OutOfField` if either operand is not below the scalar modulus
pub fn hash_nodes<H: NodeHasher + ?Sized>(
    hasher: &H,
    left: &FieldBytes,
    right: &FieldBytes,
) -> Result<FieldBytes> {
    check_in_field(left)?;
    check_in_field(right)?;
    hasher.combine(left, right)
}

// ============================================================================
// POSEIDON (circom-compatible)
// ============================================================================

/// Circom-compatible Poseidon over BN254, width 3.
#[derive(Clone, Copy, Debug, Default)]
pub struct PoseidonHasher;

impl NodeHasher for PoseidonHasher {
    fn combine(&self, left: &FieldBytes, right: &FieldBytes) -> Result<FieldBytes> {
        poseidon_be(&[left, right])
    }
}

/// Poseidon over 1..=12 big-endian field elements.
pub fn poseidon_be(inputs: &[&FieldBytes]) -> Result<FieldBytes> {
    let mut poseidon =
        Poseidon::<Fr>::new_circom(inputs.len()).map_err(|e| PoolError::Hasher(e.to_string()))?;
    let slices: Vec<&[u8]> = inputs.iter().map(|input| input.as_slice()).collect();
    poseidon
        .hash_bytes_be(&slices)
        .map_err(|e| PoolError::Hasher(e.to_string()))
}

/// Compute a note commitment: `Poseidon(nullifier, secret)`.
pub fn hash_commitment(nullifier: &FieldBytes, secret: &FieldBytes) -> Result<FieldBytes> {
    check_in_field(nullifier)?;
    check_in_field(secret)?;
    poseidon_be(&[nullifier, secret])
}

/// Compute the public nullifier hash: `Poseidon(nullifier)`.
pub fn hash_nullifier(nullifier: &FieldBytes) -> Result<FieldBytes> {
    check_in_field(nullifier)?;
    poseidon_be(&[nullifier])
}

// ============================================================================
// TESTS
// ============================================================================
