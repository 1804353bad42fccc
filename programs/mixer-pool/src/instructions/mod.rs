//! Operation handlers for the mixer pool
//!
//! Each handler runs with the pool's reentrancy lock held and either
//! completes every state change or none.

pub mod deposit;
pub mod withdraw;

pub use deposit::DepositReceipt;
pub use withdraw::{WithdrawReceipt, WithdrawalStage};
