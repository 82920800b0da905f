//! # revreg-crypto — Typed Structured Data
//!
//! Builds the authenticated payloads for off-chain-signed status changes:
//!
//! - **EIP-712**: the signing domain, the `ChangeStatus` and
//!   `ChangeStatusDelegated` schemas declared with alloy's `sol!`, and the
//!   final signing hash through `SolStruct::eip712_signing_hash`.
//! - **Signatures**: an opaque byte container with hex rendering.
//!
//! ## Crate Policy
//!
//! - Depends only on `revreg-core` internally.
//! - Holds no key material. Producing the raw signature is the job of a
//!   signer implementation elsewhere.

pub mod eip712;
pub mod signature;

pub use eip712::{
    ChangeStatusMessage, SigningSchema, TypedData, TypedDataDomain, REGISTRY_DOMAIN_NAME,
};
pub use signature::Signature;
