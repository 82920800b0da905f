//! Typed-data signers.
//!
//! The controller never holds key material. It hands a [`TypedData`] payload
//! to a [`TypedDataSigner`] and relays whatever signature comes back.

use revreg_core::Address;
use revreg_crypto::{Signature, TypedData};

use crate::error::RpcError;
use crate::rpc::JsonRpcProvider;

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("signer has no accounts")]
    NoAccount,
    #[error("signer request failed: {0}")]
    Rpc(#[from] RpcError),
    #[error("{0}")]
    Backend(String),
}

/// Produces EIP-712 signatures for one account.
#[allow(async_fn_in_trait)]
pub trait TypedDataSigner {
    /// Address whose signatures this signer produces.
    async fn address(&self) -> Result<Address, SigningError>;

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, SigningError>;

    /// The signer's own chain connection, if it has one.
    fn provider(&self) -> Option<&JsonRpcProvider> {
        None
    }
}

/// Signer backed by an account the JSON-RPC node manages.
#[derive(Debug, Clone)]
pub struct JsonRpcSigner {
    provider: JsonRpcProvider,
    account: Option<Address>,
}

impl JsonRpcSigner {
    /// Sign with the node's first account.
    pub fn new(provider: JsonRpcProvider) -> Self {
        Self {
            provider,
            account: None,
        }
    }

    /// Sign with a specific node-managed account.
    pub fn with_account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }
}

impl TypedDataSigner for JsonRpcSigner {
    async fn address(&self) -> Result<Address, SigningError> {
        if let Some(account) = self.account {
            return Ok(account);
        }
        self.provider
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(SigningError::NoAccount)
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, SigningError> {
        let account = self.address().await?;
        let signature = self.provider.sign_typed_data(&account, typed_data).await?;
        tracing::debug!(
            %account,
            schema = typed_data.schema.primary_type(),
            signature = ?signature,
            "typed data signed"
        );
        Ok(signature)
    }

    fn provider(&self) -> Option<&JsonRpcProvider> {
        Some(&self.provider)
    }
}
