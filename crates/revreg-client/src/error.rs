//! Controller and JSON-RPC error types.

use revreg_core::{BlockTag, ValidationError};

use crate::signer::SigningError;

/// Errors from a JSON-RPC round trip or from decoding its result.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// HTTP transport error.
    #[error("HTTP error calling {method}: {source}")]
    Http {
        method: String,
        source: reqwest::Error,
    },
    /// The endpoint answered with a non-2xx status.
    #[error("{method} returned HTTP {status}: {body}")]
    Status {
        method: String,
        status: u16,
        body: String,
    },
    /// The node answered with a JSON-RPC error object.
    #[error("{method} failed with JSON-RPC error {code}: {message}")]
    Node {
        method: String,
        code: i64,
        message: String,
    },
    /// The response could not be interpreted.
    #[error("malformed response to {method}: {reason}")]
    Malformed { method: String, reason: String },
    /// The endpoint serves a different chain than the one configured.
    #[error("chain id mismatch: expected {expected}, endpoint reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

impl RpcError {
    pub(crate) fn malformed(method: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the registry controller.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Malformed caller input; raised before any remote call.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Missing signer, provider or endpoint.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The event log needed for a historical query could not be read.
    #[error("cannot fetch revocation state due to an error fetching events of contract: {source}")]
    Fetch { source: RpcError },

    /// The signed payload was bound to a nonce the signer no longer holds.
    #[error(
        "nonce in the payload is out of date or invalid (expected: '{expected}'; current: '{current}')"
    )]
    StaleNonce { expected: u64, current: u64 },

    /// The contract gave no definitive answer for a live query.
    #[error("revocation status couldn't be fetched for {block_tag}")]
    Query { block_tag: BlockTag },

    /// A forwarded contract call failed.
    #[error("contract call failed: {0}")]
    Rpc(#[from] RpcError),

    /// The signer could not produce a signature.
    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),
}
