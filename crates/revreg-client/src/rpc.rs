//! # JSON-RPC Transport
//!
//! A thin Ethereum JSON-RPC 2.0 client over reqwest. Each method maps one
//! node call to typed inputs and outputs; interpretation of contract data is
//! left to [`crate::contract`].
//!
//! | Method | Node call |
//! |--------|-----------|
//! | [`JsonRpcProvider::chain_id`] | `eth_chainId` |
//! | [`JsonRpcProvider::call`] | `eth_call` |
//! | [`JsonRpcProvider::send_transaction`] | `eth_sendTransaction` |
//! | [`JsonRpcProvider::get_logs`] | `eth_getLogs` |
//! | [`JsonRpcProvider::block_timestamp`] | `eth_getBlockByHash` |
//! | [`JsonRpcProvider::accounts`] | `eth_accounts` |
//! | [`JsonRpcProvider::sign_typed_data`] | `eth_signTypedData_v4` |
//!
//! No retries: a failed call surfaces as [`RpcError`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::hex;
use revreg_core::{Address, BlockTag, Bytes32};
use revreg_crypto::{Signature, TypedData};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::config::{redact_url, ChainSelector};
use crate::error::RpcError;

/// Connection to an Ethereum JSON-RPC endpoint.
///
/// Cloning shares the underlying HTTP connection pool.
#[derive(Clone)]
pub struct JsonRpcProvider {
    http: reqwest::Client,
    url: Url,
    chain: ChainSelector,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for JsonRpcProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcProvider")
            .field("url", &redact_url(&self.url))
            .field("chain", &self.chain)
            .finish()
    }
}

/// Log filter for `eth_getLogs`. Absent topics match anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub address: Address,
    pub topics: Vec<Option<Bytes32>>,
    pub from_block: BlockTag,
    pub to_block: BlockTag,
}

impl LogFilter {
    fn to_param(&self) -> Value {
        let topics: Vec<Value> = self
            .topics
            .iter()
            .map(|t| t.map_or(Value::Null, |t| Value::String(t.to_string())))
            .collect();
        json!({
            "address": hex_data(self.address.as_slice()),
            "topics": topics,
            "fromBlock": self.from_block.to_rpc_param(),
            "toBlock": self.to_block.to_rpc_param(),
        })
    }
}

/// A log entry as returned by `eth_getLogs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
    pub block_number: Option<String>,
    pub block_hash: Option<String>,
    pub transaction_hash: Option<String>,
    pub log_index: Option<String>,
    #[serde(default)]
    pub removed: bool,
}

impl JsonRpcProvider {
    /// Create a provider for `url` expecting `chain`.
    pub fn new(url: Url, chain: ChainSelector, timeout: Duration) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| RpcError::Http {
                method: "client_init".to_string(),
                source,
            })?;
        Ok(Self {
            http,
            url,
            chain,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn chain(&self) -> ChainSelector {
        self.chain
    }

    /// Issue one JSON-RPC request and return its `result` member.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });
        tracing::debug!(method, id, "JSON-RPC request");

        let resp = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| RpcError::Http {
                method: method.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RpcError::Status {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp.json().await.map_err(|source| RpcError::Http {
            method: method.to_string(),
            source,
        })?;

        if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error")
                .to_string();
            tracing::debug!(method, code, %message, "JSON-RPC error");
            return Err(RpcError::Node {
                method: method.to_string(),
                code,
                message,
            });
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| RpcError::malformed(method, "missing result field"))
    }

    /// The chain id the endpoint reports, checked against the expected one.
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let result = self.request("eth_chainId", json!([])).await?;
        let actual = quantity("eth_chainId", &result)?;
        match self.chain.expected_id() {
            Some(expected) if expected != actual => {
                Err(RpcError::ChainMismatch { expected, actual })
            }
            _ => Ok(actual),
        }
    }

    /// `eth_call` against `to` at `block`; returns the raw return data.
    pub async fn call(&self, to: &Address, data: &[u8], block: BlockTag) -> Result<Vec<u8>, RpcError> {
        let tx = json!({
            "to": hex_data(to.as_slice()),
            "data": hex_data(data),
        });
        let result = self
            .request("eth_call", json!([tx, block.to_rpc_param()]))
            .await?;
        bytes("eth_call", &result)
    }

    /// Submit a transaction for the node to sign; returns its hash.
    pub async fn send_transaction(
        &self,
        from: Option<&Address>,
        to: &Address,
        data: &[u8],
    ) -> Result<Bytes32, RpcError> {
        let mut tx = json!({
            "to": hex_data(to.as_slice()),
            "data": hex_data(data),
        });
        if let Some(from) = from {
            tx["from"] = Value::String(hex_data(from.as_slice()));
        }
        let result = self.request("eth_sendTransaction", json!([tx])).await?;
        bytes32("eth_sendTransaction", &result)
    }

    /// Logs matching `filter`, excluding entries removed by a reorg.
    pub async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<RawLog>, RpcError> {
        let result = self.request("eth_getLogs", json!([filter.to_param()])).await?;
        let logs: Vec<RawLog> = serde_json::from_value(result)
            .map_err(|e| RpcError::malformed("eth_getLogs", e.to_string()))?;
        Ok(logs.into_iter().filter(|l| !l.removed).collect())
    }

    /// Timestamp, in seconds, of the block with `hash`.
    pub async fn block_timestamp(&self, hash: &Bytes32) -> Result<u64, RpcError> {
        let method = "eth_getBlockByHash";
        let block = self.request(method, json!([hash.to_string(), false])).await?;
        if block.is_null() {
            return Err(RpcError::malformed(method, format!("unknown block {hash}")));
        }
        let timestamp = block
            .get("timestamp")
            .ok_or_else(|| RpcError::malformed(method, "block has no timestamp"))?;
        quantity(method, timestamp)
    }

    /// Accounts managed by the node.
    pub async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        let method = "eth_accounts";
        let result = self.request(method, json!([])).await?;
        let raw: Vec<String> = serde_json::from_value(result)
            .map_err(|e| RpcError::malformed(method, e.to_string()))?;
        raw.iter()
            .map(|a| {
                a.parse::<Address>()
                    .map_err(|e| RpcError::malformed(method, e.to_string()))
            })
            .collect()
    }

    /// Ask the node to sign typed data with a managed account.
    pub async fn sign_typed_data(
        &self,
        account: &Address,
        typed_data: &TypedData,
    ) -> Result<Signature, RpcError> {
        let method = "eth_signTypedData_v4";
        let payload = serde_json::to_string(typed_data)
            .map_err(|e| RpcError::malformed(method, e.to_string()))?;
        let result = self
            .request(method, json!([hex_data(account.as_slice()), payload]))
            .await?;
        bytes(method, &result).map(Signature::from_bytes)
    }
}

/// Lowercase `0x` hex, the node's data and address form.
pub(crate) fn hex_data(data: &[u8]) -> String {
    hex::encode_prefixed(data)
}

fn as_str<'a>(method: &str, value: &'a Value) -> Result<&'a str, RpcError> {
    value
        .as_str()
        .ok_or_else(|| RpcError::malformed(method, format!("expected a string, got {value}")))
}

/// Parse a `0x` quantity such as `0x1b4`.
pub(crate) fn quantity(method: &str, value: &Value) -> Result<u64, RpcError> {
    let raw = as_str(method, value)?;
    parse_quantity(raw).ok_or_else(|| RpcError::malformed(method, format!("invalid quantity {raw:?}")))
}

pub(crate) fn parse_quantity(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix("0x")?;
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

fn bytes(method: &str, value: &Value) -> Result<Vec<u8>, RpcError> {
    let raw = as_str(method, value)?;
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| RpcError::malformed(method, format!("expected 0x data, got {raw:?}")))?;
    hex::decode(digits).map_err(|e| RpcError::malformed(method, e.to_string()))
}

pub(crate) fn bytes32(method: &str, value: &Value) -> Result<Bytes32, RpcError> {
    let raw = as_str(method, value)?;
    raw.parse::<Bytes32>()
        .map_err(|e| RpcError::malformed(method, e.to_string()))
}
