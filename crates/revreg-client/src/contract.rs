//! # Registry Contract Binding
//!
//! [`RegistryContract`] is the contract surface the controller drives. It is
//! implemented over JSON-RPC by [`JsonRpcRegistry`], by
//! [`MockRegistryContract`](crate::mock::MockRegistryContract) for tests, and
//! by any caller-supplied binding.
//!
//! Arguments arrive already validated as typed locations; implementations
//! forward them without further checks.

use alloy_primitives::{hex, U256};
use alloy_sol_types::{SolCall, SolEvent};
use revreg_core::{Address, BlockTag, Bytes32, KeyLocation, ListLocation};
use serde::{Deserialize, Serialize};

use crate::bindings::{self, RevocationListStatusChanged, RevocationStatusChanged};
use crate::error::RpcError;
use crate::rpc::{self, JsonRpcProvider, LogFilter, RawLog};

/// One status-change log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeEvent {
    pub revoked: bool,
    pub block_number: u64,
    pub block_hash: Bytes32,
    pub log_index: u64,
    pub transaction_hash: Bytes32,
}

/// Handle to a submitted, not yet mined, transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: Bytes32,
}

/// The deployed registry's callable surface.
#[allow(async_fn_in_trait)]
pub trait RegistryContract {
    /// Address of the deployed registry.
    fn address(&self) -> Address;

    /// `isRevoked` at `block_tag`. `None` when the contract returns no
    /// interpretable answer.
    async fn is_revoked(&self, key: &KeyLocation, block_tag: BlockTag) -> Result<Option<bool>, RpcError>;

    async fn change_status(&self, revoked: bool, key: &KeyLocation) -> Result<PendingTransaction, RpcError>;

    async fn change_status_delegated(
        &self,
        revoked: bool,
        key: &KeyLocation,
    ) -> Result<PendingTransaction, RpcError>;

    async fn change_status_signed(
        &self,
        revoked: bool,
        key: &KeyLocation,
        signer: &Address,
        signature: &[u8],
    ) -> Result<PendingTransaction, RpcError>;

    async fn change_status_delegated_signed(
        &self,
        revoked: bool,
        key: &KeyLocation,
        signer: &Address,
        signature: &[u8],
    ) -> Result<PendingTransaction, RpcError>;

    async fn change_statuses_in_list(
        &self,
        revoked: &[bool],
        list: &ListLocation,
        keys: &[Bytes32],
    ) -> Result<PendingTransaction, RpcError>;

    async fn change_statuses_in_list_delegated(
        &self,
        revoked: &[bool],
        list: &ListLocation,
        keys: &[Bytes32],
    ) -> Result<PendingTransaction, RpcError>;

    async fn change_list_owner(
        &self,
        list: &ListLocation,
        new_owner: &Address,
    ) -> Result<PendingTransaction, RpcError>;

    /// `expiry` is in seconds since the Unix epoch.
    async fn add_list_delegate(
        &self,
        list: &ListLocation,
        delegate: &Address,
        expiry: u64,
    ) -> Result<PendingTransaction, RpcError>;

    async fn remove_list_delegate(
        &self,
        list: &ListLocation,
        delegate: &Address,
    ) -> Result<PendingTransaction, RpcError>;

    /// Current replay-protection nonce of `address`.
    async fn nonces(&self, address: &Address) -> Result<u64, RpcError>;

    async fn version(&self) -> Result<String, RpcError>;

    async fn version_major(&self) -> Result<u64, RpcError>;

    /// Id of the chain the registry is deployed on.
    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// List-level status changes of `list`, in any order.
    async fn list_status_events(&self, list: &ListLocation) -> Result<Vec<StatusChangeEvent>, RpcError>;

    /// Key-level status changes of `key`, in any order.
    async fn revocation_status_events(&self, key: &KeyLocation) -> Result<Vec<StatusChangeEvent>, RpcError>;

    /// Timestamp, in seconds, of the block with `block_hash`.
    async fn block_timestamp(&self, block_hash: &Bytes32) -> Result<u64, RpcError>;
}

// ---------------------------------------------------------------------------
// JSON-RPC binding
// ---------------------------------------------------------------------------

/// [`RegistryContract`] over a JSON-RPC endpoint.
///
/// Views go through `eth_call`; writes go through `eth_sendTransaction`,
/// leaving signing to the node. Calldata and return data are handled by the
/// `sol!` declarations in [`crate::bindings`].
#[derive(Debug, Clone)]
pub struct JsonRpcRegistry {
    provider: JsonRpcProvider,
    address: Address,
    from: Option<Address>,
}

impl JsonRpcRegistry {
    pub fn new(provider: JsonRpcProvider, address: Address) -> Self {
        Self {
            provider,
            address,
            from: None,
        }
    }

    /// Sender of write transactions; the node's default account when unset.
    pub fn with_from(mut self, from: Option<Address>) -> Self {
        self.from = from;
        self
    }

    pub fn provider(&self) -> &JsonRpcProvider {
        &self.provider
    }

    async fn call<C: SolCall>(&self, call: &C, block: BlockTag) -> Result<Vec<u8>, RpcError> {
        self.provider
            .call(&self.address, &call.abi_encode(), block)
            .await
    }

    async fn view<C: SolCall>(&self, call: C) -> Result<C::Return, RpcError> {
        let data = self.call(&call, BlockTag::Latest).await?;
        decode_returns::<C>(&data)
    }

    async fn send<C: SolCall>(&self, call: C) -> Result<PendingTransaction, RpcError> {
        let hash = self
            .provider
            .send_transaction(self.from.as_ref(), &self.address, &call.abi_encode())
            .await?;
        tracing::info!(function = C::SIGNATURE, tx = %hash, "registry transaction submitted");
        Ok(PendingTransaction { hash })
    }

    async fn events<E: StatusEvent>(&self, topics: &[Bytes32]) -> Result<Vec<StatusChangeEvent>, RpcError> {
        let mut all = vec![Some(E::SIGNATURE_HASH)];
        all.extend(topics.iter().copied().map(Some));
        let filter = LogFilter {
            address: self.address,
            topics: all,
            from_block: BlockTag::Number(0),
            to_block: BlockTag::Latest,
        };
        let logs = self.provider.get_logs(&filter).await?;
        tracing::debug!(event = E::SIGNATURE, count = logs.len(), "fetched status change logs");
        logs.iter().map(decode_status_log::<E>).collect()
    }
}

/// The two registry events that carry a `revoked` flag.
trait StatusEvent: SolEvent {
    fn revoked(&self) -> bool;
}

impl StatusEvent for RevocationStatusChanged {
    fn revoked(&self) -> bool {
        self.revoked
    }
}

impl StatusEvent for RevocationListStatusChanged {
    fn revoked(&self) -> bool {
        self.revoked
    }
}

fn decode_returns<C: SolCall>(data: &[u8]) -> Result<C::Return, RpcError> {
    C::abi_decode_returns(data).map_err(|e| RpcError::malformed(C::SIGNATURE, e.to_string()))
}

fn decode_status_log<E: StatusEvent>(log: &RawLog) -> Result<StatusChangeEvent, RpcError> {
    let method = "eth_getLogs";
    let field = |name: &str, value: &Option<String>| {
        value
            .clone()
            .ok_or_else(|| RpcError::malformed(method, format!("log is missing {name}")))
    };
    let block_number = field("blockNumber", &log.block_number)?;
    let log_index = field("logIndex", &log.log_index)?;
    let block_hash = field("blockHash", &log.block_hash)?;
    let transaction_hash = field("transactionHash", &log.transaction_hash)?;
    let topics = log
        .topics
        .iter()
        .map(|t| parse_hash(t))
        .collect::<Result<Vec<_>, _>>()?;
    let data = hex::decode(&log.data)
        .map_err(|_| RpcError::malformed(method, format!("invalid log data {:?}", log.data)))?;
    let event = E::decode_raw_log(topics, &data)
        .map_err(|e| RpcError::malformed(method, format!("{}: {e}", E::SIGNATURE)))?;

    Ok(StatusChangeEvent {
        revoked: event.revoked(),
        block_number: rpc::parse_quantity(&block_number)
            .ok_or_else(|| RpcError::malformed(method, format!("invalid block number {block_number:?}")))?,
        block_hash: parse_hash(&block_hash)?,
        log_index: rpc::parse_quantity(&log_index)
            .ok_or_else(|| RpcError::malformed(method, format!("invalid log index {log_index:?}")))?,
        transaction_hash: parse_hash(&transaction_hash)?,
    })
}

fn parse_hash(raw: &str) -> Result<Bytes32, RpcError> {
    raw.parse::<Bytes32>()
        .map_err(|e| RpcError::malformed("eth_getLogs", format!("{raw:?}: {e}")))
}

impl RegistryContract for JsonRpcRegistry {
    fn address(&self) -> Address {
        self.address
    }

    async fn is_revoked(&self, key: &KeyLocation, block_tag: BlockTag) -> Result<Option<bool>, RpcError> {
        let call = bindings::isRevokedCall {
            namespace: key.namespace,
            revocationList: key.list,
            revocationKey: key.key,
        };
        let data = self.call(&call, block_tag).await?;
        Ok(bindings::isRevokedCall::abi_decode_returns(&data).ok())
    }

    async fn change_status(&self, revoked: bool, key: &KeyLocation) -> Result<PendingTransaction, RpcError> {
        self.send(bindings::changeStatusCall {
            revoked,
            namespace: key.namespace,
            revocationList: key.list,
            revocationKey: key.key,
        })
        .await
    }

    async fn change_status_delegated(
        &self,
        revoked: bool,
        key: &KeyLocation,
    ) -> Result<PendingTransaction, RpcError> {
        self.send(bindings::changeStatusDelegatedCall {
            revoked,
            namespace: key.namespace,
            revocationList: key.list,
            revocationKey: key.key,
        })
        .await
    }

    async fn change_status_signed(
        &self,
        revoked: bool,
        key: &KeyLocation,
        signer: &Address,
        signature: &[u8],
    ) -> Result<PendingTransaction, RpcError> {
        self.send(bindings::changeStatusSignedCall {
            revoked,
            namespace: key.namespace,
            revocationList: key.list,
            revocationKey: key.key,
            signer: *signer,
            signature: signature.to_vec().into(),
        })
        .await
    }

    async fn change_status_delegated_signed(
        &self,
        revoked: bool,
        key: &KeyLocation,
        signer: &Address,
        signature: &[u8],
    ) -> Result<PendingTransaction, RpcError> {
        self.send(bindings::changeStatusDelegatedSignedCall {
            revoked,
            namespace: key.namespace,
            revocationList: key.list,
            revocationKey: key.key,
            signer: *signer,
            signature: signature.to_vec().into(),
        })
        .await
    }

    async fn change_statuses_in_list(
        &self,
        revoked: &[bool],
        list: &ListLocation,
        keys: &[Bytes32],
    ) -> Result<PendingTransaction, RpcError> {
        self.send(bindings::changeStatusesInListCall {
            revoked: revoked.to_vec(),
            namespace: list.namespace,
            revocationList: list.list,
            revocationKeys: keys.to_vec(),
        })
        .await
    }

    async fn change_statuses_in_list_delegated(
        &self,
        revoked: &[bool],
        list: &ListLocation,
        keys: &[Bytes32],
    ) -> Result<PendingTransaction, RpcError> {
        self.send(bindings::changeStatusesInListDelegatedCall {
            revoked: revoked.to_vec(),
            namespace: list.namespace,
            revocationList: list.list,
            revocationKeys: keys.to_vec(),
        })
        .await
    }

    async fn change_list_owner(
        &self,
        list: &ListLocation,
        new_owner: &Address,
    ) -> Result<PendingTransaction, RpcError> {
        self.send(bindings::changeListOwnerCall {
            namespace: list.namespace,
            newOwner: *new_owner,
            revocationList: list.list,
        })
        .await
    }

    async fn add_list_delegate(
        &self,
        list: &ListLocation,
        delegate: &Address,
        expiry: u64,
    ) -> Result<PendingTransaction, RpcError> {
        self.send(bindings::addListDelegateCall {
            namespace: list.namespace,
            delegate: *delegate,
            revocationList: list.list,
            validity: U256::from(expiry),
        })
        .await
    }

    async fn remove_list_delegate(
        &self,
        list: &ListLocation,
        delegate: &Address,
    ) -> Result<PendingTransaction, RpcError> {
        self.send(bindings::removeListDelegateCall {
            namespace: list.namespace,
            delegate: *delegate,
            revocationList: list.list,
        })
        .await
    }

    async fn nonces(&self, address: &Address) -> Result<u64, RpcError> {
        let nonce = self.view(bindings::noncesCall { signer: *address }).await?;
        u64::try_from(nonce)
            .map_err(|_| RpcError::malformed(bindings::noncesCall::SIGNATURE, format!("nonce {nonce} exceeds 64 bits")))
    }

    async fn version(&self) -> Result<String, RpcError> {
        self.view(bindings::versionCall {}).await
    }

    async fn version_major(&self) -> Result<u64, RpcError> {
        let major = self.view(bindings::VERSION_MAJORCall {}).await?;
        Ok(u64::from(major))
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        self.provider.chain_id().await
    }

    async fn list_status_events(&self, list: &ListLocation) -> Result<Vec<StatusChangeEvent>, RpcError> {
        self.events::<RevocationListStatusChanged>(&[list.namespace.into_word(), list.list])
            .await
    }

    async fn revocation_status_events(&self, key: &KeyLocation) -> Result<Vec<StatusChangeEvent>, RpcError> {
        self.events::<RevocationStatusChanged>(&[key.namespace.into_word(), key.list, key.key])
            .await
    }

    async fn block_timestamp(&self, block_hash: &Bytes32) -> Result<u64, RpcError> {
        self.provider.block_timestamp(block_hash).await
    }
}

// ---------------------------------------------------------------------------
// Construction-time binding
// ---------------------------------------------------------------------------

/// The contract a controller resolved to at construction.
#[derive(Debug, Clone)]
pub enum ContractBinding<C> {
    /// Caller-supplied contract.
    Injected(C),
    /// Contract built from a JSON-RPC provider.
    JsonRpc(JsonRpcRegistry),
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $call:expr) => {
        match $self {
            ContractBinding::Injected($inner) => $call.await,
            ContractBinding::JsonRpc($inner) => $call.await,
        }
    };
}

impl<C: RegistryContract> RegistryContract for ContractBinding<C> {
    fn address(&self) -> Address {
        match self {
            Self::Injected(c) => c.address(),
            Self::JsonRpc(c) => c.address(),
        }
    }

    async fn is_revoked(&self, key: &KeyLocation, block_tag: BlockTag) -> Result<Option<bool>, RpcError> {
        dispatch!(self, c => c.is_revoked(key, block_tag))
    }

    async fn change_status(&self, revoked: bool, key: &KeyLocation) -> Result<PendingTransaction, RpcError> {
        dispatch!(self, c => c.change_status(revoked, key))
    }

    async fn change_status_delegated(
        &self,
        revoked: bool,
        key: &KeyLocation,
    ) -> Result<PendingTransaction, RpcError> {
        dispatch!(self, c => c.change_status_delegated(revoked, key))
    }

    async fn change_status_signed(
        &self,
        revoked: bool,
        key: &KeyLocation,
        signer: &Address,
        signature: &[u8],
    ) -> Result<PendingTransaction, RpcError> {
        dispatch!(self, c => c.change_status_signed(revoked, key, signer, signature))
    }

    async fn change_status_delegated_signed(
        &self,
        revoked: bool,
        key: &KeyLocation,
        signer: &Address,
        signature: &[u8],
    ) -> Result<PendingTransaction, RpcError> {
        dispatch!(self, c => c.change_status_delegated_signed(revoked, key, signer, signature))
    }

    async fn change_statuses_in_list(
        &self,
        revoked: &[bool],
        list: &ListLocation,
        keys: &[Bytes32],
    ) -> Result<PendingTransaction, RpcError> {
        dispatch!(self, c => c.change_statuses_in_list(revoked, list, keys))
    }

    async fn change_statuses_in_list_delegated(
        &self,
        revoked: &[bool],
        list: &ListLocation,
        keys: &[Bytes32],
    ) -> Result<PendingTransaction, RpcError> {
        dispatch!(self, c => c.change_statuses_in_list_delegated(revoked, list, keys))
    }

    async fn change_list_owner(
        &self,
        list: &ListLocation,
        new_owner: &Address,
    ) -> Result<PendingTransaction, RpcError> {
        dispatch!(self, c => c.change_list_owner(list, new_owner))
    }

    async fn add_list_delegate(
        &self,
        list: &ListLocation,
        delegate: &Address,
        expiry: u64,
    ) -> Result<PendingTransaction, RpcError> {
        dispatch!(self, c => c.add_list_delegate(list, delegate, expiry))
    }

    async fn remove_list_delegate(
        &self,
        list: &ListLocation,
        delegate: &Address,
    ) -> Result<PendingTransaction, RpcError> {
        dispatch!(self, c => c.remove_list_delegate(list, delegate))
    }

    async fn nonces(&self, address: &Address) -> Result<u64, RpcError> {
        dispatch!(self, c => c.nonces(address))
    }

    async fn version(&self) -> Result<String, RpcError> {
        dispatch!(self, c => c.version())
    }

    async fn version_major(&self) -> Result<u64, RpcError> {
        dispatch!(self, c => c.version_major())
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        dispatch!(self, c => c.chain_id())
    }

    async fn list_status_events(&self, list: &ListLocation) -> Result<Vec<StatusChangeEvent>, RpcError> {
        dispatch!(self, c => c.list_status_events(list))
    }

    async fn revocation_status_events(&self, key: &KeyLocation) -> Result<Vec<StatusChangeEvent>, RpcError> {
        dispatch!(self, c => c.revocation_status_events(key))
    }

    async fn block_timestamp(&self, block_hash: &Bytes32) -> Result<u64, RpcError> {
        dispatch!(self, c => c.block_timestamp(block_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> KeyLocation {
        KeyLocation {
            namespace: Address::repeat_byte(0xee),
            list: Bytes32::repeat_byte(0x01),
            key: Bytes32::repeat_byte(0x02),
        }
    }

    fn raw_log(data: &str) -> RawLog {
        let k = key();
        RawLog {
            topics: vec![
                RevocationStatusChanged::SIGNATURE_HASH.to_string(),
                k.namespace.into_word().to_string(),
                k.list.to_string(),
                k.key.to_string(),
            ],
            data: data.to_string(),
            block_number: Some("0x10".into()),
            block_hash: Some(format!("0x{}", "ab".repeat(32))),
            transaction_hash: Some(format!("0x{}", "cd".repeat(32))),
            log_index: Some("0x2".into()),
            removed: false,
        }
    }

    #[test]
    fn status_log_decodes_revoked_flag_and_position() {
        let data = format!("0x{}01", "00".repeat(31));
        let event = decode_status_log::<RevocationStatusChanged>(&raw_log(&data)).unwrap();
        assert!(event.revoked);
        assert_eq!(event.block_number, 16);
        assert_eq!(event.log_index, 2);
        assert_eq!(event.block_hash, Bytes32::repeat_byte(0xab));
    }

    #[test]
    fn status_log_without_block_is_rejected() {
        let mut log = raw_log(&format!("0x{}", "00".repeat(32)));
        log.block_hash = None;
        assert!(matches!(
            decode_status_log::<RevocationStatusChanged>(&log),
            Err(RpcError::Malformed { .. })
        ));
    }

    #[test]
    fn status_log_of_another_event_is_rejected() {
        let log = raw_log(&format!("0x{}", "00".repeat(32)));
        assert!(matches!(
            decode_status_log::<RevocationListStatusChanged>(&log),
            Err(RpcError::Malformed { .. })
        ));
    }

    #[test]
    fn namespace_topic_is_left_padded_address() {
        let topic = Address::repeat_byte(0xee).into_word();
        assert!(topic[..12].iter().all(|b| *b == 0));
        assert!(topic[12..].iter().all(|b| *b == 0xee));
    }

    #[test]
    fn is_revoked_calldata_is_selector_and_three_words() {
        let k = key();
        let data = bindings::isRevokedCall {
            namespace: k.namespace,
            revocationList: k.list,
            revocationKey: k.key,
        }
        .abi_encode();
        assert_eq!(data.len(), 4 + 3 * 32);
        assert_eq!(data[4 + 12..4 + 32], [0xee; 20]);
        assert_eq!(data[4 + 64..], [0x02; 32]);
    }

    #[test]
    fn version_with_offset_past_the_data_is_malformed() {
        // first word points ~2^64 bytes ahead
        let mut data = vec![0u8; 24];
        data.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xe0]);
        data.extend_from_slice(&[0u8; 32]);
        let result = decode_returns::<bindings::versionCall>(&data);
        assert!(matches!(result, Err(RpcError::Malformed { .. })), "{result:?}");
    }

    #[test]
    fn version_with_truncated_string_is_malformed() {
        let mut data = U256::from(32).to_be_bytes::<32>().to_vec();
        data.extend_from_slice(&U256::from(5).to_be_bytes::<32>());
        data.extend_from_slice(b"1.0");
        assert!(decode_returns::<bindings::versionCall>(&data).is_err());
    }

    #[test]
    fn oversized_nonce_is_not_a_u64() {
        let data = U256::MAX.to_be_bytes::<32>();
        let nonce = decode_returns::<bindings::noncesCall>(&data).unwrap();
        assert!(u64::try_from(nonce).is_err());
    }
}
