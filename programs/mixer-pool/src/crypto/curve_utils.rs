//! Elliptic Curve Utility Functions
//!
//! Encoding helpers for BN254 points in the uncompressed big-endian layout
//! used by EVM-style verifiers and snarkjs exports:
//! - G1: `x || y` (64 bytes)
//! - G2: `x.c1 || x.c0 || y.c1 || y.c0` (128 bytes)
//!
//! The all-zero encoding is the point at infinity. Decoding rejects
//! non-canonical coordinates, off-curve points and points outside the prime
//! order subgroup.

use ark_bn254::{Fq, Fq2, G1Affine, G2Affine};
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::error::{PoolError, Result};
use crate::require;

// ============================================================================
// BN254 CURVE PARAMETERS
// ============================================================================

/// BN254 base field modulus (p), big-endian.
/// p = 21888242871839275222246405745257275088696311157297823662689037894645226208583
pub const BN254_FIELD_MODULUS_BE: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29,
    0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x97, 0x81, 0x6a, 0x91, 0x68, 0x71, 0xca, 0x8d,
    0x3c, 0x20, 0x8c, 0x16, 0xd8, 0x7c, 0xfd, 0x47,
];

/// G1 point in uncompressed form (64 bytes: x || y).
pub type G1Point = [u8; 64];

/// G2 point in uncompressed form (128 bytes).
pub type G2Point = [u8; 128];

pub const G1_IDENTITY: G1Point = [0u8; 64];
pub const G2_IDENTITY: G2Point = [0u8; 128];

// ============================================================================
// BASE FIELD
// ============================================================================

fn fq_from_be(bytes: &[u8]) -> Result<Fq> {
    require!(
        BigUint::from_bytes_be(bytes) < BigUint::from_bytes_be(&BN254_FIELD_MODULUS_BE),
        PoolError::InvalidProofFormat
    );
    Ok(Fq::from_be_bytes_mod_order(bytes))
}

fn fq_to_be(value: &Fq) -> [u8; 32] {
    let raw = value.into_bigint().to_bytes_be();
    let mut bytes = [0u8; 32];
    bytes[32 - raw.len()..].copy_from_slice(&raw);
    bytes
}

// ============================================================================
// G1 POINT OPERATIONS
// ============================================================================

/// Check if a G1 point is the identity (point at infinity).
pub fn is_g1_identity(point: &G1Point) -> bool {
    point.iter().all(|&b| b == 0)
}

/// Decode and validate a G1 point.
pub fn g1_from_be_bytes(point: &G1Point) -> Result<G1Affine> {
    if is_g1_identity(point) {
        return Ok(G1Affine::identity());
    }

    let decoded = G1Affine::new_unchecked(fq_from_be(&point[..32])?, fq_from_be(&point[32..])?);
    require!(
        decoded.is_on_curve() && decoded.is_in_correct_subgroup_assuming_on_curve(),
        PoolError::InvalidProofFormat
    );
    Ok(decoded)
}

/// Encode a G1 point.
pub fn g1_to_be_bytes(point: &G1Affine) -> G1Point {
    let mut bytes = G1_IDENTITY;
    if point.infinity {
        return bytes;
    }
    bytes[..32].copy_from_slice(&fq_to_be(&point.x));
    bytes[32..].copy_from_slice(&fq_to_be(&point.y));
    bytes
}

// ============================================================================
// G2 POINT OPERATIONS
// ============================================================================

/// Check if a G2 point is the identity.
pub fn is_g2_identity(point: &G2Point) -> bool {
    point.iter().all(|&b| b == 0)
}

/// Decode and validate a G2 point.
pub fn g2_from_be_bytes(point: &G2Point) -> Result<G2Affine> {
    if is_g2_identity(point) {
        return Ok(G2Affine::identity());
    }

    let x = Fq2::new(fq_from_be(&point[32..64])?, fq_from_be(&point[..32])?);
    let y = Fq2::new(fq_from_be(&point[96..])?, fq_from_be(&point[64..96])?);
    let decoded = G2Affine::new_unchecked(x, y);
    require!(
        decoded.is_on_curve() && decoded.is_in_correct_subgroup_assuming_on_curve(),
        PoolError::InvalidProofFormat
    );
    Ok(decoded)
}

/// Encode a G2 point.
pub fn g2_to_be_bytes(point: &G2Affine) -> G2Point {
    let mut bytes = G2_IDENTITY;
    if point.infinity {
        return bytes;
    }
    bytes[..32].copy_from_slice(&fq_to_be(&point.x.c1));
    bytes[32..64].copy_from_slice(&fq_to_be(&point.x.c0));
    bytes[64..96].copy_from_slice(&fq_to_be(&point.y.c1));
    bytes[96..].copy_from_slice(&fq_to_be(&point.y.c0));
    bytes
}
