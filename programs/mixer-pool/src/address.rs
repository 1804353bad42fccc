//! Claimant addresses
//!
//! Addresses are 20 bytes wide so that their field encoding (left-padded to
//! 32 bytes) is always a canonical BN254 scalar and can be bound into the
//! withdraw proof without reduction.

use core::fmt;
use core::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::crypto::field::FieldBytes;
use crate::error::PoolError;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Recipient of a withdrawal.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    /// Field encoding used in the public signals: big-endian, left-padded.
    pub fn to_field(&self) -> FieldBytes {
        let mut bytes = [0u8; 32];
        bytes[32 - ADDRESS_LEN..].copy_from_slice(&self.0);
        bytes
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| PoolError::Config(format!("invalid address {s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}
