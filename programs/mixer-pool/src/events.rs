//! Pool events
//!
//! Emitted on every successful deposit and withdrawal and retained by the
//! pool until drained. Events are Borsh-encoded for indexers; a deposit
//! event carries everything a client needs to rebuild its Merkle witness.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::address::Address;
use crate::crypto::field::FieldBytes;
use crate::error::{PoolError, Result};

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DepositEvent {
    pub commitment: FieldBytes,
    pub leaf_index: u32,
    /// Leaf-to-root path, `levels + 1` nodes
    pub tree_path: Vec<FieldBytes>,
    pub hash_directions: Vec<u8>,
    pub root: FieldBytes,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct WithdrawEvent {
    pub nullifier_hash: FieldBytes,
    /// Present unless the pool is configured to omit it
    pub claimant: Option<Address>,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum PoolEvent {
    Deposit(DepositEvent),
    Withdraw(WithdrawEvent),
}

impl PoolEvent {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        borsh::to_vec(self).map_err(|e| PoolError::InvalidSnapshot(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        borsh::from_slice(data).map_err(|e| PoolError::InvalidSnapshot(e.to_string()))
    }

    pub fn as_deposit(&self) -> Option<&DepositEvent> {
        match self {
            PoolEvent::Deposit(event) => Some(event),
            PoolEvent::Withdraw(_) => None,
        }
    }

    pub fn as_withdraw(&self) -> Option<&WithdrawEvent> {
        match self {
            PoolEvent::Withdraw(event) => Some(event),
            PoolEvent::Deposit(_) => None,
        }
    }
}
