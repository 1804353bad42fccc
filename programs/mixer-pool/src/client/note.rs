//! Deposit notes
//!
//! A note is the private half of a deposit: the `(nullifier, secret)` pair
//! whose Poseidon hash is the public commitment. Whoever holds the note can
//! withdraw, so it is the only thing a depositor must back up.
//!
//! Text form: `mixer-<denomination>-0x<nullifier><secret>` (hex, 64 bytes).

use core::fmt;
use core::str::FromStr;

use rand::{CryptoRng, RngCore};

use crate::crypto::field::{check_in_field, FieldBytes};
use crate::crypto::poseidon::{hash_commitment, hash_nullifier};
use crate::error::{PoolError, Result};

const NOTE_PREFIX: &str = "mixer";

/// Random bytes per value; 31 bytes always fit below the scalar modulus.
pub const NOTE_VALUE_BYTES: usize = 31;

#[derive(Clone, PartialEq, Eq)]
pub struct DepositNote {
    pub denomination: u64,
    nullifier: FieldBytes,
    secret: FieldBytes,
}

impl fmt::Debug for DepositNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print the opening
        f.debug_struct("DepositNote")
            .field("denomination", &self.denomination)
            .finish_non_exhaustive()
    }
}

impl DepositNote {
    /// Draw a fresh note from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(denomination: u64, rng: &mut R) -> Self {
        Self {
            denomination,
            nullifier: random_value(rng),
            secret: random_value(rng),
        }
    }

    /// Draw a fresh note from the thread-local CSPRNG.
    pub fn random(denomination: u64) -> Self {
        Self::generate(denomination, &mut rand::thread_rng())
    }

    /// Rebuild a note from its opening.
    ///
    /// # Errors
    /// * `OutOfField` if either value is not a canonical field element
    pub fn from_parts(denomination: u64, nullifier: FieldBytes, secret: FieldBytes) -> Result<Self> {
        check_in_field(&nullifier)?;
        check_in_field(&secret)?;
        Ok(Self {
            denomination,
            nullifier,
            secret,
        })
    }

    pub fn nullifier(&self) -> &FieldBytes {
        &self.nullifier
    }

    pub fn secret(&self) -> &FieldBytes {
        &self.secret
    }

    /// Public commitment to deposit: `Poseidon(nullifier, secret)`.
    pub fn commitment(&self) -> Result<FieldBytes> {
        hash_commitment(&self.nullifier, &self.secret)
    }

    /// Public nullifier hash revealed on withdrawal: `Poseidon(nullifier)`.
    pub fn nullifier_hash(&self) -> Result<FieldBytes> {
        hash_nullifier(&self.nullifier)
    }
}

fn random_value<R: RngCore + CryptoRng>(rng: &mut R) -> FieldBytes {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes[32 - NOTE_VALUE_BYTES..]);
    bytes
}

impl fmt::Display for DepositNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{NOTE_PREFIX}-{}-0x{}{}",
            self.denomination,
            hex::encode(self.nullifier),
            hex::encode(self.secret)
        )
    }
}

impl FromStr for DepositNote {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |what: &str| PoolError::InvalidNote(what.to_string());

        let mut parts = s.trim().splitn(3, '-');
        let (Some(prefix), Some(denomination), Some(opening)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected prefix, denomination and opening"));
        };
        if prefix != NOTE_PREFIX {
            return Err(invalid("unknown prefix"));
        }

        let denomination: u64 = denomination
            .parse()
            .map_err(|_| invalid("denomination is not an integer"))?;

        let digits = opening.strip_prefix("0x").unwrap_or(opening);
        let mut raw = [0u8; 64];
        hex::decode_to_slice(digits, &mut raw).map_err(|e| PoolError::InvalidNote(e.to_string()))?;

        let mut nullifier = [0u8; 32];
        let mut secret = [0u8; 32];
        nullifier.copy_from_slice(&raw[..32]);
        secret.copy_from_slice(&raw[32..]);

        Self::from_parts(denomination, nullifier, secret)
            .map_err(|_| invalid("opening is not a pair of field elements"))
    }
}
