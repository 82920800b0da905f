//! # Signed Operations
//!
//! Building and relaying off-chain-signed status changes.
//!
//! A payload is bound to the signer's nonce at build time. The registry
//! increments that nonce on every accepted signed operation, so a payload
//! is usable exactly once. Before relaying, the current nonce is re-read
//! and a mismatch is rejected locally, saving a transaction that would
//! revert on chain.
//!
//! Nothing is retained between building and relaying: a [`SignedOperation`]
//! may be relayed by a different process than the one that built it.

use revreg_core::validation::{validate_revocation_key_path, validate_signaturish};
use revreg_core::{Address, KeyLocation, RevocationKeyPath, SignedOperation, ValidationError};
use revreg_crypto::{ChangeStatusMessage, SigningSchema, TypedData, TypedDataDomain};

use crate::contract::{PendingTransaction, RegistryContract};
use crate::error::RegistryError;
use crate::signer::TypedDataSigner;

/// A relayed [`SignedOperation`] that passed every shape check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedOperation {
    pub revoked: bool,
    pub key: KeyLocation,
    pub signer: Address,
    pub signature: Vec<u8>,
    pub nonce: u64,
}

/// The typed-data payload a status change is signed over.
pub fn status_change_typed_data(
    domain: &TypedDataDomain,
    schema: SigningSchema,
    revoked: bool,
    key: &KeyLocation,
    signer: Address,
    nonce: u64,
) -> TypedData {
    TypedData::new(
        domain.clone(),
        schema,
        ChangeStatusMessage {
            revoked,
            namespace: key.namespace,
            revocation_list: key.list,
            revocation_key: key.key,
            signer,
            nonce,
        },
    )
}

/// Sign a status change for `key` with the signer's current nonce.
pub async fn build_signed_operation<C, S>(
    registry: &C,
    signer: &S,
    domain: &TypedDataDomain,
    schema: SigningSchema,
    revoked: bool,
    path: &RevocationKeyPath,
    key: &KeyLocation,
) -> Result<SignedOperation, RegistryError>
where
    C: RegistryContract,
    S: TypedDataSigner,
{
    let signer_address = signer.address().await?;
    let nonce = registry.nonces(&signer_address).await?;
    let typed = status_change_typed_data(domain, schema, revoked, key, signer_address, nonce);
    let signature = signer.sign_typed_data(&typed).await?;

    tracing::debug!(
        signer = %signer_address,
        nonce,
        schema = schema.primary_type(),
        "built signed status change"
    );

    Ok(SignedOperation {
        revoked: Some(revoked),
        revocation_key_path: path.clone(),
        signer: signer_address.to_checksum(None),
        signature: signature.to_hex(),
        nonce: Some(nonce),
    })
}

/// Shape-check a relayed payload: `revoked` set, then signer, signature and
/// nonce, then the key path.
pub fn check_signed_operation(op: &SignedOperation) -> Result<CheckedOperation, ValidationError> {
    let revoked = op.revoked.ok_or(ValidationError::Missing { field: "revoked" })?;
    let signaturish = validate_signaturish(&op.signer, &op.signature, op.nonce)?;
    let key = validate_revocation_key_path(&op.revocation_key_path)?;
    Ok(CheckedOperation {
        revoked,
        key,
        signer: signaturish.signer,
        signature: signaturish.signature,
        nonce: signaturish.nonce,
    })
}

/// Confirm the payload's nonce is still current, then forward it to the
/// entry point matching `schema`.
pub async fn submit_signed_operation<C: RegistryContract>(
    registry: &C,
    op: &CheckedOperation,
    schema: SigningSchema,
) -> Result<PendingTransaction, RegistryError> {
    let current = registry.nonces(&op.signer).await?;
    if current != op.nonce {
        tracing::warn!(signer = %op.signer, expected = op.nonce, current, "stale signed payload");
        return Err(RegistryError::StaleNonce {
            expected: op.nonce,
            current,
        });
    }

    let tx = match schema {
        SigningSchema::ChangeStatus => {
            registry
                .change_status_signed(op.revoked, &op.key, &op.signer, &op.signature)
                .await?
        }
        SigningSchema::ChangeStatusDelegated => {
            registry
                .change_status_delegated_signed(op.revoked, &op.key, &op.signer, &op.signature)
                .await?
        }
    };
    Ok(tx)
}
