//! Off-chain client helpers
//!
//! Nothing here touches pool state. These build the inputs a depositor or
//! withdrawer hands to the pool and to the prover.

pub mod note;
pub mod tree_mirror;

pub use note::DepositNote;
pub use tree_mirror::{MerkleWitness, TreeMirror};
