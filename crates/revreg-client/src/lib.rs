//! # revreg-client — Revocation Registry Controller
//!
//! Typed, validated access to a deployed EIP-5539 revocation registry:
//!
//! - **Controller** ([`RevocationRegistryController`]): validates every
//!   request, then forwards it to the contract.
//! - **Timeline** ([`timeline`]): reconstructs a key's revocation state at a
//!   past instant from the contract's event log.
//! - **Signed operations** ([`signed`]): builds EIP-712 signed status changes
//!   that any party can relay, and checks the signer's nonce before
//!   relaying.
//! - **JSON-RPC binding** ([`rpc`], [`bindings`], [`contract`]): the contract
//!   surface over an Ethereum node.
//!
//! ## Crate Policy
//!
//! - No key material. Signatures come from a [`TypedDataSigner`];
//!   node-submitted writes are signed by the node.
//! - Write operations return a [`PendingTransaction`] as soon as the node
//!   accepts the transaction. Receipts are not awaited.
//! - No retries. A failed remote call is returned to the caller.
//!
//! ## Example
//!
//! ```rust,no_run
//! use revreg_client::{ControllerConfig, IsRevokedOptions, RevocationRegistryController};
//! use revreg_core::RevocationKeyPath;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ControllerConfig::new()
//!     .with_rpc_url("http://127.0.0.1:8545".parse()?)
//!     .with_address("0x0000000000000000000000000000000000000000");
//! let controller = RevocationRegistryController::new(config)?;
//! let path = RevocationKeyPath::new(
//!     "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
//!     "0x3458b9bfc7963978b7d40ef225177c45193c2889902357db3b043a4e319a9628",
//!     "0x89343794d2fb7dd5d0fba9593a4bb13beaff93a61577029176d0117b0c53b8e6",
//! );
//! let revoked = controller.is_revoked(&path, IsRevokedOptions::default()).await?;
//! # let _ = revoked;
//! # Ok(())
//! # }
//! ```

pub mod bindings;
pub mod config;
pub mod contract;
pub mod controller;
pub mod error;
pub mod mock;
pub mod rpc;
pub mod signed;
pub mod signer;
pub mod timeline;

pub use config::{ChainSelector, ConfigError, ControllerConfig, DEFAULT_REGISTRY_ADDRESS};
pub use contract::{
    ContractBinding, JsonRpcRegistry, PendingTransaction, RegistryContract, StatusChangeEvent,
};
pub use controller::{IsRevokedOptions, RevocationRegistryController};
pub use error::{RegistryError, RpcError};
pub use rpc::JsonRpcProvider;
pub use signer::{JsonRpcSigner, SigningError, TypedDataSigner};
