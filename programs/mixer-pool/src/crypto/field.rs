//! Field guard for the BN254 scalar field
//!
//! The off-chain circuit computes over the BN254 scalar field. A value at or
//! above the modulus would silently wrap inside the circuit but not in plain
//! integer semantics, so hash inputs and public signals are rejected before
//! they reach the hasher or the verifier.
//!
//! All field elements are 32-byte big-endian encodings.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{PoolError, Result};
use crate::require;

/// 32-byte big-endian field element.
pub type FieldBytes = [u8; 32];

/// BN254 scalar field modulus (r), big-endian.
/// r = 21888242871839275222246405745257275088548364400416034343698204186575808495617
pub const BN254_SCALAR_MODULUS_BE: FieldBytes = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29,
    0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91,
    0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

/// Decimal form of the modulus, as published with the circuit.
pub const BN254_SCALAR_MODULUS_DEC: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Whether `value` is strictly below the scalar field modulus.
pub fn is_in_field(value: &FieldBytes) -> bool {
    BigUint::from_bytes_be(value) < BigUint::from_bytes_be(&BN254_SCALAR_MODULUS_BE)
}

/// Reject `value` with [`PoolError::OutOfField`] unless it is a canonical
/// field element.
pub fn check_in_field(value: &FieldBytes) -> Result<()> {
    require!(is_in_field(value), PoolError::OutOfField);
    Ok(())
}

/// Check if a 32-byte value is all zeros.
#[inline]
pub fn is_zero(value: &FieldBytes) -> bool {
    BigUint::from_bytes_be(value).is_zero()
}

/// Convert u64 to a 32-byte big-endian field element.
#[inline]
pub fn u64_to_field(value: u64) -> FieldBytes {
    let mut bytes = [0u8; 32];
    bytes[24..32].copy_from_slice(&value.to_be_bytes());
    bytes
}

/// Parse a decimal string into a canonical field element.
pub fn field_from_decimal(text: &str) -> Result<FieldBytes> {
    let value = BigUint::parse_bytes(text.trim().as_bytes(), 10).ok_or(PoolError::OutOfField)?;
    let raw = value.to_bytes_be();
    require!(raw.len() <= 32, PoolError::OutOfField);

    let mut bytes = [0u8; 32];
    bytes[32 - raw.len()..].copy_from_slice(&raw);
    check_in_field(&bytes)?;
    Ok(bytes)
}

/// Render a field element in decimal, the form circuits and provers consume.
pub fn field_to_decimal(value: &FieldBytes) -> String {
    BigUint::from_bytes_be(value).to_str_radix(10)
}
