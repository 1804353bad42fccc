//! State definitions for the mixer pool

pub mod double_spend;
pub mod merkle_tree;
pub mod pool_config;
pub mod root_history;
pub mod snapshot;

pub use double_spend::DoubleSpendGuard;
pub use merkle_tree::{Insertion, MerkleAccumulator, MAX_TREE_DEPTH};
pub use pool_config::PoolConfig;
pub use root_history::{RootHistory, ROOT_HISTORY_SIZE};
pub use snapshot::PoolSnapshot;
