//! # Signed Operations
//!
//! An off-chain-signed status change, ready to be relayed by any party.
//! The value is a plain serde type so that it can travel as JSON between the
//! signer and the relayer.

use serde::{Deserialize, Serialize};

use crate::path::RevocationKeyPath;

/// Caller intent plus proof of authorization for a status change.
///
/// `revoked` and `nonce` are optional on the wire so that a relayed payload
/// missing either is rejected by validation instead of being silently
/// defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOperation {
    /// Target status.
    #[serde(default)]
    pub revoked: Option<bool>,
    /// The key whose status changes.
    #[serde(default)]
    pub revocation_key_path: RevocationKeyPath,
    /// Address of the authorizing signer.
    #[serde(default)]
    pub signer: String,
    /// `0x` hex signature over the typed-data payload.
    #[serde(default)]
    pub signature: String,
    /// The signer's on-chain nonce the signature was bound to.
    #[serde(default)]
    pub nonce: Option<u64>,
}
