//! Pool snapshots
//!
//! Borsh export of every durable part of a pool. Collaborators (hasher,
//! verifier) are not persisted; [`crate::Pool::restore`] takes fresh ones and
//! recomputes the default nodes from the hasher.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::crypto::field::FieldBytes;
use crate::error::{PoolError, Result};
use crate::pool::PoolStats;
use crate::state::PoolConfig;

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PoolSnapshot {
    pub config: PoolConfig,
    pub next_leaf_index: u32,
    pub filled_subtrees: Vec<FieldBytes>,
    pub last_path: Vec<FieldBytes>,
    /// One entry per history slot
    pub root_slots: Vec<Option<FieldBytes>>,
    pub root_last_index: Option<u32>,
    /// Sorted
    pub commitments: Vec<FieldBytes>,
    /// Sorted
    pub nullifiers: Vec<FieldBytes>,
    pub balance: u64,
    pub stats: PoolStats,
}

impl PoolSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        borsh::to_vec(self).map_err(|e| PoolError::InvalidSnapshot(e.to_string()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        borsh::from_slice(data).map_err(|e| PoolError::InvalidSnapshot(e.to_string()))
    }
}
