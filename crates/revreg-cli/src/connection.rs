//! Connection flags shared by every subcommand.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use url::Url;

use revreg_client::config::DEFAULT_TIMEOUT_SECS;
use revreg_client::{
    ChainSelector, ControllerConfig, JsonRpcProvider, JsonRpcSigner, RevocationRegistryController,
};
use revreg_core::validation::address_shaped;
use revreg_core::{Address, ValidationError};

/// Where the registry lives and who sends transactions.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// JSON-RPC endpoint of an Ethereum node.
    #[arg(long, env = "REVREG_RPC_URL", global = true)]
    pub rpc_url: Option<Url>,

    /// Expected chain: `any`, a chain id, or a network name such as `sepolia`.
    #[arg(long, env = "REVREG_CHAIN", default_value = "any", global = true)]
    pub chain: ChainSelector,

    /// Address of the deployed registry.
    #[arg(long, env = "REVREG_REGISTRY_ADDRESS", global = true)]
    pub registry: Option<String>,

    /// Node-managed account that sends and signs. Defaults to the node's first account.
    #[arg(long, env = "REVREG_FROM", global = true, value_parser = parse_from)]
    pub from: Option<Address>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "REVREG_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,
}

/// `0x` + 40 hex digits, checksummed when mixed case.
fn parse_from(raw: &str) -> Result<Address, ValidationError> {
    address_shaped("--from", raw)
}

impl ConnectionArgs {
    /// Connect to the node and bind a controller with a node-managed signer.
    pub fn controller(&self) -> Result<RevocationRegistryController> {
        let url = self
            .rpc_url
            .clone()
            .context("--rpc-url (or REVREG_RPC_URL) is required")?;
        let provider = JsonRpcProvider::new(url, self.chain, Duration::from_secs(self.timeout_secs))
            .context("failed to create JSON-RPC client")?;

        let mut signer = JsonRpcSigner::new(provider.clone());
        if let Some(from) = self.from {
            signer = signer.with_account(from);
        }

        let mut config = ControllerConfig::new()
            .with_provider(provider)
            .with_signer(signer)
            .with_timeout_secs(self.timeout_secs);
        if let Some(registry) = &self.registry {
            config = config.with_address(registry.clone());
        }
        if let Some(from) = self.from {
            config = config.with_from(from);
        }

        tracing::debug!(chain = %self.chain, registry = ?self.registry, "connecting to registry");
        RevocationRegistryController::new(config).context("failed to initialize registry controller")
    }
}
