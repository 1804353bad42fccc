//! Cryptographic primitives for the mixer pool
//!
//! The pool consumes two external primitives through narrow seams:
//! - [`NodeHasher`]: two-input compression over the BN254 scalar field
//! - [`ProofVerifier`]: boolean predicate over a proof and its public signals
//!
//! Production adapters are circom-compatible Poseidon and Groth16 over BN254.
//!
//! # Security Note
//! Every operand is field-checked before it reaches the hasher, and every
//! public signal before it reaches the verifier. Verification is
//! FAIL-CLOSED: malformed bytes make a proof invalid.

pub mod curve_utils;
pub mod field;
pub mod groth16_verifier;
pub mod poseidon;
pub mod public_inputs;

pub use field::{check_in_field, is_in_field, FieldBytes};
pub use groth16_verifier::{Groth16Proof, Groth16Verifier, ProofVerifier, VerifyingKeyBytes};
pub use poseidon::{hash_commitment, hash_nodes, hash_nullifier, NodeHasher, PoseidonHasher};
pub use public_inputs::{PublicSignals, WithdrawPublicInputs};
