//! # Registry Controller
//!
//! The public facade over a deployed revocation registry. Every operation
//! validates caller input first; a malformed request never reaches the
//! network.
//!
//! ## Binding
//!
//! Construction resolves the configuration once into a
//! [`ContractBinding`]: an injected contract is used as-is, otherwise a
//! [`JsonRpcRegistry`] is built from the first available of the configured
//! provider, the signer's own connection, or `rpc_url`.
//!
//! ## Signing Domain
//!
//! The EIP-712 domain is read from the contract on first use and memoized
//! for the controller's lifetime. A contract upgrade that changes
//! `version()` is not observed by an existing controller.

use chrono::{DateTime, Utc};
use revreg_core::validation::{
    address_shaped, validate_future_expiry, validate_instructions, validate_revocation_key_path,
    validate_revocation_list_path,
};
use revreg_core::{
    Address, BlockTag, RevocationKeyInstruction, RevocationKeyPath, RevocationListPath,
    SignedOperation,
};
use revreg_crypto::{SigningSchema, TypedDataDomain};
use tokio::sync::OnceCell;

use crate::config::{ControllerConfig, DEFAULT_REGISTRY_ADDRESS};
use crate::contract::{ContractBinding, JsonRpcRegistry, PendingTransaction, RegistryContract};
use crate::error::RegistryError;
use crate::rpc::JsonRpcProvider;
use crate::signed;
use crate::signer::{JsonRpcSigner, TypedDataSigner};
use crate::timeline;

/// Per-call options for [`RevocationRegistryController::is_revoked`].
///
/// When `timestamp` is set the answer is reconstructed from events and
/// `block_tag` is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsRevokedOptions {
    pub timestamp: Option<DateTime<Utc>>,
    pub block_tag: Option<BlockTag>,
}

impl IsRevokedOptions {
    /// Query the state at a point in time.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            block_tag: None,
        }
    }

    /// Query the live state at a block.
    pub fn at_block(block_tag: BlockTag) -> Self {
        Self {
            timestamp: None,
            block_tag: Some(block_tag),
        }
    }
}

/// Validated, typed access to one revocation registry.
pub struct RevocationRegistryController<C = JsonRpcRegistry, S = JsonRpcSigner> {
    registry: ContractBinding<C>,
    signer: Option<S>,
    domain: OnceCell<TypedDataDomain>,
}

impl<C, S> std::fmt::Debug for RevocationRegistryController<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let binding = match &self.registry {
            ContractBinding::Injected(_) => "injected",
            ContractBinding::JsonRpc(_) => "json-rpc",
        };
        f.debug_struct("RevocationRegistryController")
            .field("binding", &binding)
            .field("signer", &self.signer.is_some())
            .field("domain", &self.domain.get())
            .finish()
    }
}

impl<C: RegistryContract, S: TypedDataSigner> RevocationRegistryController<C, S> {
    /// Resolve `config` into a contract binding.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Configuration`] when neither a contract, a
    ///   provider, a signer connection nor an `rpc_url` is configured.
    /// - [`RegistryError::Validation`] when a contract is to be built and
    ///   the registry address is malformed.
    pub fn new(config: ControllerConfig<C, S>) -> Result<Self, RegistryError> {
        let ControllerConfig {
            contract,
            provider,
            signer,
            rpc_url,
            chain_name_or_id,
            address,
            from,
            timeout_secs,
        } = config;

        let registry = match contract {
            Some(contract) => {
                if address.is_some() {
                    tracing::debug!("registry address ignored for an injected contract");
                }
                ContractBinding::Injected(contract)
            }
            None => {
                let provider = match provider
                    .or_else(|| signer.as_ref().and_then(|s| s.provider().cloned()))
                {
                    Some(provider) => provider,
                    None => {
                        let url = rpc_url.ok_or_else(|| {
                            RegistryError::Configuration(
                                "either a contract, a provider or an rpc_url is required".to_string(),
                            )
                        })?;
                        JsonRpcProvider::new(
                            url,
                            chain_name_or_id,
                            std::time::Duration::from_secs(timeout_secs),
                        )?
                    }
                };
                let address = address_shaped(
                    "registry address",
                    address.as_deref().unwrap_or(DEFAULT_REGISTRY_ADDRESS),
                )?;
                ContractBinding::JsonRpc(JsonRpcRegistry::new(provider, address).with_from(from))
            }
        };

        tracing::debug!(registry = %registry.address(), "registry controller ready");
        Ok(Self {
            registry,
            signer,
            domain: OnceCell::new(),
        })
    }

    /// The contract this controller is bound to.
    pub fn registry(&self) -> &ContractBinding<C> {
        &self.registry
    }

    pub fn registry_address(&self) -> Address {
        self.registry.address()
    }

    pub fn signer(&self) -> Option<&S> {
        self.signer.as_ref()
    }

    pub async fn version(&self) -> Result<String, RegistryError> {
        Ok(self.registry.version().await?)
    }

    pub async fn version_major(&self) -> Result<u64, RegistryError> {
        Ok(self.registry.version_major().await?)
    }

    /// The EIP-712 domain, read from the contract on first call.
    pub async fn signing_domain(&self) -> Result<&TypedDataDomain, RegistryError> {
        self.domain
            .get_or_try_init(|| async {
                let (version, chain_id) =
                    futures::try_join!(self.registry.version(), self.registry.chain_id())?;
                tracing::debug!(%version, chain_id, "signing domain resolved");
                Ok::<_, RegistryError>(TypedDataDomain::revocation_registry(
                    version,
                    chain_id,
                    self.registry.address(),
                ))
            })
            .await
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether the key is revoked, live at a block or historically at a
    /// timestamp.
    pub async fn is_revoked(
        &self,
        path: &RevocationKeyPath,
        options: IsRevokedOptions,
    ) -> Result<bool, RegistryError> {
        let key = validate_revocation_key_path(path)?;
        if let Some(at) = options.timestamp {
            return timeline::key_revoked_at(&self.registry, &key, at).await;
        }
        let block_tag = options.block_tag.unwrap_or_default();
        self.registry
            .is_revoked(&key, block_tag)
            .await?
            .ok_or(RegistryError::Query { block_tag })
    }

    // -----------------------------------------------------------------------
    // Direct writes
    // -----------------------------------------------------------------------

    pub async fn change_status(
        &self,
        revoked: bool,
        path: &RevocationKeyPath,
    ) -> Result<PendingTransaction, RegistryError> {
        let key = validate_revocation_key_path(path)?;
        Ok(self.registry.change_status(revoked, &key).await?)
    }

    pub async fn change_status_delegated(
        &self,
        revoked: bool,
        path: &RevocationKeyPath,
    ) -> Result<PendingTransaction, RegistryError> {
        let key = validate_revocation_key_path(path)?;
        Ok(self.registry.change_status_delegated(revoked, &key).await?)
    }

    /// Change several keys of one list in a single transaction.
    ///
    /// The whole batch is rejected if any instruction is malformed.
    pub async fn change_statuses_in_list(
        &self,
        path: &RevocationListPath,
        instructions: &[RevocationKeyInstruction],
    ) -> Result<PendingTransaction, RegistryError> {
        let list = validate_revocation_list_path(path)?;
        let (statuses, keys) = validate_instructions(instructions)?;
        Ok(self
            .registry
            .change_statuses_in_list(&statuses, &list, &keys)
            .await?)
    }

    pub async fn change_statuses_in_list_delegated(
        &self,
        path: &RevocationListPath,
        instructions: &[RevocationKeyInstruction],
    ) -> Result<PendingTransaction, RegistryError> {
        let list = validate_revocation_list_path(path)?;
        let (statuses, keys) = validate_instructions(instructions)?;
        Ok(self
            .registry
            .change_statuses_in_list_delegated(&statuses, &list, &keys)
            .await?)
    }

    pub async fn change_list_owner(
        &self,
        path: &RevocationListPath,
        new_owner: &str,
    ) -> Result<PendingTransaction, RegistryError> {
        let list = validate_revocation_list_path(path)?;
        let new_owner = address_shaped("newOwner", new_owner)?;
        Ok(self.registry.change_list_owner(&list, &new_owner).await?)
    }

    /// Authorize `delegate` on the list until `expiry`, which must lie in the
    /// future.
    pub async fn add_list_delegate(
        &self,
        path: &RevocationListPath,
        delegate: &str,
        expiry: DateTime<Utc>,
    ) -> Result<PendingTransaction, RegistryError> {
        let list = validate_revocation_list_path(path)?;
        let delegate = address_shaped("delegate", delegate)?;
        let expiry_secs = validate_future_expiry(expiry, Utc::now())?;
        Ok(self
            .registry
            .add_list_delegate(&list, &delegate, expiry_secs)
            .await?)
    }

    pub async fn remove_list_delegate(
        &self,
        path: &RevocationListPath,
        delegate: &str,
    ) -> Result<PendingTransaction, RegistryError> {
        let list = validate_revocation_list_path(path)?;
        let delegate = address_shaped("delegate", delegate)?;
        Ok(self.registry.remove_list_delegate(&list, &delegate).await?)
    }

    // -----------------------------------------------------------------------
    // Signed operations
    // -----------------------------------------------------------------------

    /// Sign a status change for the list owner to be relayed by anyone.
    pub async fn generate_change_status_signed_payload(
        &self,
        revoked: bool,
        path: &RevocationKeyPath,
    ) -> Result<SignedOperation, RegistryError> {
        self.build_payload(SigningSchema::ChangeStatus, revoked, path)
            .await
    }

    /// Sign a status change for a list delegate to be relayed by anyone.
    pub async fn generate_change_status_delegated_signed_payload(
        &self,
        revoked: bool,
        path: &RevocationKeyPath,
    ) -> Result<SignedOperation, RegistryError> {
        self.build_payload(SigningSchema::ChangeStatusDelegated, revoked, path)
            .await
    }

    /// Relay an owner-signed status change.
    pub async fn change_status_signed(
        &self,
        operation: &SignedOperation,
    ) -> Result<PendingTransaction, RegistryError> {
        let checked = signed::check_signed_operation(operation)?;
        signed::submit_signed_operation(&self.registry, &checked, SigningSchema::ChangeStatus).await
    }

    /// Relay a delegate-signed status change.
    pub async fn change_status_delegated_signed(
        &self,
        operation: &SignedOperation,
    ) -> Result<PendingTransaction, RegistryError> {
        let checked = signed::check_signed_operation(operation)?;
        signed::submit_signed_operation(
            &self.registry,
            &checked,
            SigningSchema::ChangeStatusDelegated,
        )
        .await
    }

    async fn build_payload(
        &self,
        schema: SigningSchema,
        revoked: bool,
        path: &RevocationKeyPath,
    ) -> Result<SignedOperation, RegistryError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            RegistryError::Configuration("a signer is required to build signed payloads".to_string())
        })?;
        let key = validate_revocation_key_path(path)?;
        let domain = self.signing_domain().await?;
        signed::build_signed_operation(&self.registry, signer, domain, schema, revoked, path, &key)
            .await
    }
}
