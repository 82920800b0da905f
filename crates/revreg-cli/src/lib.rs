//! # revreg-cli — Revocation Registry Command Line
//!
//! Provides the `revreg` command-line interface over
//! [`revreg_client::RevocationRegistryController`].
//!
//! ## Subcommands
//!
//! - `revreg is-revoked`: live or historical status of a key.
//! - `revreg change-status`, `revreg change-statuses`: node-signed status
//!   changes of one key or a batch within a list.
//! - `revreg sign-change-status`: build an EIP-712 signed payload.
//! - `revreg submit-signed`: relay a signed payload.
//! - `revreg change-list-owner`, `revreg add-list-delegate`,
//!   `revreg remove-list-delegate`: list administration.
//!
//! Every command shares the connection flags, which fall back to the
//! `REVREG_*` environment variables:
//!
//! ```bash
//! revreg --rpc-url http://127.0.0.1:8545 --registry 0x... \
//!     is-revoked 0xNAMESPACE 0xLIST 0xKEY --at 2024-05-01T12:00:00Z
//! ```
//!
//! Write commands print the transaction hash; they do not wait for it to
//! be mined.

pub mod connection;
pub mod list;
pub mod query;
pub mod signed;
pub mod status;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use revreg_core::{RevocationKeyPath, RevocationListPath};

/// A revocation list, as positional arguments.
#[derive(Args, Debug, Clone)]
pub struct ListPathArgs {
    /// Namespace (list owner address).
    pub namespace: String,
    /// List identifier (bytes32).
    pub list: String,
}

impl ListPathArgs {
    pub fn to_path(&self) -> RevocationListPath {
        RevocationListPath::new(self.namespace.clone(), self.list.clone())
    }
}

/// A revocation key, as positional arguments.
#[derive(Args, Debug, Clone)]
pub struct KeyPathArgs {
    /// Namespace (list owner address).
    pub namespace: String,
    /// List identifier (bytes32).
    pub list: String,
    /// Revocation key (bytes32).
    pub key: String,
}

impl KeyPathArgs {
    pub fn to_path(&self) -> RevocationKeyPath {
        RevocationKeyPath::new(self.namespace.clone(), self.list.clone(), self.key.clone())
    }
}

/// Read a file, or standard input when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
            .context("failed to read standard input")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
