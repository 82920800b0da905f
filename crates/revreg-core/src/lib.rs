//! # revreg-core — Foundational Types for the Revocation Registry Controller
//!
//! Defines the primitives every other crate in the workspace builds on. It
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Caller input stays as supplied until validated.** Request types such
//!    as [`RevocationKeyPath`] carry the caller's strings verbatim. The
//!    [`validation`] module is the only path from those strings to the typed
//!    [`Address`] / [`Bytes32`] values used on the wire, so a malformed field
//!    can never reach a remote call.
//!
//! 2. **Explicit absence.** Fields that must be explicitly set (`revoked`,
//!    `nonce`) are `Option`s; `None` is a validation error distinct from
//!    `false` or `0`.
//!
//! 3. **One set of chain primitives.** [`Address`], [`B256`] and
//!    [`keccak256`] are alloy's, re-exported so every crate above shares
//!    them with the ABI and EIP-712 machinery in `alloy-sol-types`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `revreg-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod operation;
pub mod path;
pub mod primitives;
pub mod validation;

pub use error::ValidationError;
pub use operation::SignedOperation;
pub use path::{
    KeyLocation, ListLocation, RevocationKeyInstruction, RevocationKeyPath, RevocationListPath,
};
pub use primitives::{keccak256, Address, BlockTag, Bytes32, B256};
