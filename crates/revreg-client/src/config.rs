//! Controller configuration.
//!
//! A controller is bound to a registry either through an injected contract
//! or through a JSON-RPC endpoint. Every field is optional; construction
//! decides which binding the supplied values resolve to.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use revreg_core::validation::address_shaped;
use revreg_core::Address;
use url::Url;

use crate::contract::JsonRpcRegistry;
use crate::rpc::JsonRpcProvider;
use crate::signer::JsonRpcSigner;

/// Registry address used when none is configured.
pub const DEFAULT_REGISTRY_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const KNOWN_CHAINS: &[(&str, u64)] = &[
    ("mainnet", 1),
    ("homestead", 1),
    ("sepolia", 11_155_111),
    ("goerli", 5),
    ("holesky", 17_000),
    ("polygon", 137),
    ("matic", 137),
    ("amoy", 80_002),
    ("arbitrum", 42_161),
    ("optimism", 10),
    ("base", 8_453),
];

/// The chain an endpoint is expected to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainSelector {
    /// Accept whatever chain the endpoint reports.
    #[default]
    Any,
    /// Require this chain id.
    Id(u64),
}

impl ChainSelector {
    pub fn expected_id(&self) -> Option<u64> {
        match self {
            Self::Any => None,
            Self::Id(id) => Some(*id),
        }
    }
}

impl FromStr for ChainSelector {
    type Err = ConfigError;

    /// `any`, a decimal or `0x` chain id, or a known network name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "any" {
            return Ok(Self::Any);
        }
        if let Some((_, id)) = KNOWN_CHAINS.iter().find(|(n, _)| *n == name) {
            return Ok(Self::Id(*id));
        }
        let parsed = match name.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => name.parse(),
        };
        parsed
            .map(Self::Id)
            .map_err(|_| ConfigError::UnknownChain(s.to_string()))
    }
}

impl fmt::Display for ChainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Construction parameters for a
/// [`RevocationRegistryController`](crate::RevocationRegistryController).
///
/// Binding precedence: an injected `contract` wins; otherwise a provider is
/// taken from `provider`, then from the signer's own connection, then built
/// from `rpc_url` and `chain_name_or_id`.
pub struct ControllerConfig<C = JsonRpcRegistry, S = JsonRpcSigner> {
    /// Pre-bound contract handle.
    pub contract: Option<C>,
    /// Existing JSON-RPC connection.
    pub provider: Option<JsonRpcProvider>,
    /// Signer for building signed operations.
    pub signer: Option<S>,
    /// Endpoint used when no provider is available.
    pub rpc_url: Option<Url>,
    /// Expected chain of `rpc_url`.
    pub chain_name_or_id: ChainSelector,
    /// Registry address; [`DEFAULT_REGISTRY_ADDRESS`] when absent.
    pub address: Option<String>,
    /// Sender for node-signed writes.
    pub from: Option<Address>,
    /// Per-request timeout for a provider built from `rpc_url`.
    pub timeout_secs: u64,
}

impl<C, S> fmt::Debug for ControllerConfig<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("contract", &self.contract.as_ref().map(|_| "<injected>"))
            .field("provider", &self.provider)
            .field("signer", &self.signer.as_ref().map(|_| "<configured>"))
            .field("rpc_url", &self.rpc_url.as_ref().map(redact_url))
            .field("chain_name_or_id", &self.chain_name_or_id)
            .field("address", &self.address)
            .field("from", &self.from)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Endpoint URLs often embed an API key in the path or query; log the
/// origin only.
pub(crate) fn redact_url(url: &Url) -> String {
    match url.host_str() {
        Some(host) => format!("{}://{host}/[REDACTED]", url.scheme()),
        None => "[REDACTED]".to_string(),
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerConfig {
    /// An empty configuration bound to the JSON-RPC contract and signer
    /// types.
    pub fn new() -> Self {
        Self {
            contract: None,
            provider: None,
            signer: None,
            rpc_url: None,
            chain_name_or_id: ChainSelector::Any,
            address: None,
            from: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `REVREG_RPC_URL` (optional)
    /// - `REVREG_CHAIN` (default: `any`)
    /// - `REVREG_REGISTRY_ADDRESS` (default: the zero address)
    /// - `REVREG_FROM` (optional)
    /// - `REVREG_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();
        if let Ok(raw) = std::env::var("REVREG_RPC_URL") {
            config.rpc_url = Some(
                Url::parse(&raw)
                    .map_err(|e| ConfigError::InvalidUrl("REVREG_RPC_URL".to_string(), e.to_string()))?,
            );
        }
        if let Ok(raw) = std::env::var("REVREG_CHAIN") {
            config.chain_name_or_id = raw.parse()?;
        }
        config.address = std::env::var("REVREG_REGISTRY_ADDRESS").ok();
        if let Ok(raw) = std::env::var("REVREG_FROM") {
            config.from = Some(
                address_shaped("REVREG_FROM", &raw)
                    .map_err(|_| ConfigError::InvalidAddress("REVREG_FROM".to_string(), raw))?,
            );
        }
        config.timeout_secs = std::env::var("REVREG_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(config)
    }
}

impl<C, S> ControllerConfig<C, S> {
    /// Bind to an already-constructed contract.
    pub fn with_contract<C2>(self, contract: C2) -> ControllerConfig<C2, S> {
        ControllerConfig {
            contract: Some(contract),
            provider: self.provider,
            signer: self.signer,
            rpc_url: self.rpc_url,
            chain_name_or_id: self.chain_name_or_id,
            address: self.address,
            from: self.from,
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn with_signer<S2>(self, signer: S2) -> ControllerConfig<C, S2> {
        ControllerConfig {
            contract: self.contract,
            provider: self.provider,
            signer: Some(signer),
            rpc_url: self.rpc_url,
            chain_name_or_id: self.chain_name_or_id,
            address: self.address,
            from: self.from,
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn with_provider(mut self, provider: JsonRpcProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_rpc_url(mut self, url: Url) -> Self {
        self.rpc_url = Some(url);
        self
    }

    pub fn with_chain(mut self, chain: ChainSelector) -> Self {
        self.chain_name_or_id = chain;
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("unknown chain name or id: {0:?}")]
    UnknownChain(String),
    #[error("invalid address for {0}: {1:?}")]
    InvalidAddress(String, String),
}
