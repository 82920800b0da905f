//! # Revocation Paths
//!
//! A revocation list is addressed by its owner namespace and a 32-byte list
//! identifier; a revocation key adds a 32-byte key identifier within that
//! list.
//!
//! The `*Path` types are caller input and hold raw strings. The
//! `*Location` types are their validated, typed counterparts produced by
//! [`crate::validation`].

use serde::{Deserialize, Serialize};

use crate::primitives::{Address, Bytes32};

/// Caller-supplied reference to a revocation list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationListPath {
    /// Owner namespace (an address string).
    #[serde(default)]
    pub namespace: String,
    /// List identifier (a bytes32 string).
    #[serde(default)]
    pub list: String,
}

/// Caller-supplied reference to a single revocation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationKeyPath {
    /// Owner namespace (an address string).
    #[serde(default)]
    pub namespace: String,
    /// List identifier (a bytes32 string).
    #[serde(default)]
    pub list: String,
    /// Key identifier within the list (a bytes32 string).
    #[serde(default)]
    pub revocation_key: String,
}

impl RevocationListPath {
    pub fn new(namespace: impl Into<String>, list: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            list: list.into(),
        }
    }
}

impl RevocationKeyPath {
    pub fn new(
        namespace: impl Into<String>,
        list: impl Into<String>,
        revocation_key: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            list: list.into(),
            revocation_key: revocation_key.into(),
        }
    }

    /// The list this key belongs to.
    pub fn list_path(&self) -> RevocationListPath {
        RevocationListPath::new(self.namespace.clone(), self.list.clone())
    }
}

/// One entry of a bulk status update.
///
/// `revoked` is an `Option` so that an absent flag can be told apart from an
/// explicit `false`; absence fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationKeyInstruction {
    /// Key identifier within the list (a bytes32 string).
    #[serde(default)]
    pub revocation_key: String,
    /// Target status.
    #[serde(default)]
    pub revoked: Option<bool>,
}

impl RevocationKeyInstruction {
    pub fn new(revocation_key: impl Into<String>, revoked: bool) -> Self {
        Self {
            revocation_key: revocation_key.into(),
            revoked: Some(revoked),
        }
    }
}

/// Validated location of a revocation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListLocation {
    /// Owner address that scopes the list.
    pub namespace: Address,
    /// List identifier within the namespace.
    pub list: Bytes32,
}

/// Validated location of a revocation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyLocation {
    /// Owner address that scopes the list.
    pub namespace: Address,
    /// List identifier within the namespace.
    pub list: Bytes32,
    /// Revocation key within the list.
    pub key: Bytes32,
}

impl KeyLocation {
    /// The list this key belongs to.
    pub fn list_location(&self) -> ListLocation {
        ListLocation {
            namespace: self.namespace,
            list: self.list,
        }
    }
}
