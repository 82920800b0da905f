//! # In-Memory Registry and Signer
//!
//! [`MockRegistryContract`] answers every [`RegistryContract`] call from
//! in-memory state and records each call it receives, so tests can assert
//! both on results and on what was (or was not) sent to the contract.
//! Signed submissions advance the signer's nonce the way the deployed
//! registry does.
//!
//! [`MockSigner`] signs deterministically: the signature is the EIP-712
//! signing hash followed by a recovery byte, which lets tests check exactly
//! which payload was signed.

use std::collections::HashMap;

use parking_lot::Mutex;
use revreg_core::{keccak256, Address, BlockTag, Bytes32, KeyLocation, ListLocation};
use revreg_crypto::{Signature, TypedData};

use crate::contract::{PendingTransaction, RegistryContract, StatusChangeEvent};
use crate::error::RpcError;
use crate::signer::{SigningError, TypedDataSigner};

/// One call received by [`MockRegistryContract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    IsRevoked {
        key: KeyLocation,
        block_tag: BlockTag,
    },
    ChangeStatus {
        revoked: bool,
        key: KeyLocation,
        delegated: bool,
    },
    ChangeStatusSigned {
        revoked: bool,
        key: KeyLocation,
        signer: Address,
        signature: Vec<u8>,
        delegated: bool,
    },
    ChangeStatusesInList {
        revoked: Vec<bool>,
        list: ListLocation,
        keys: Vec<Bytes32>,
        delegated: bool,
    },
    ChangeListOwner {
        list: ListLocation,
        new_owner: Address,
    },
    AddListDelegate {
        list: ListLocation,
        delegate: Address,
        expiry: u64,
    },
    RemoveListDelegate {
        list: ListLocation,
        delegate: Address,
    },
    Nonces(Address),
    Version,
    VersionMajor,
    ChainId,
    ListStatusEvents(ListLocation),
    RevocationStatusEvents(KeyLocation),
    BlockTimestamp(Bytes32),
}

impl RecordedCall {
    /// Whether the call would have sent a transaction.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::ChangeStatus { .. }
                | Self::ChangeStatusSigned { .. }
                | Self::ChangeStatusesInList { .. }
                | Self::ChangeListOwner { .. }
                | Self::AddListDelegate { .. }
                | Self::RemoveListDelegate { .. }
        )
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<RecordedCall>,
    is_revoked: HashMap<BlockTag, Option<bool>>,
    nonces: HashMap<Address, u64>,
    list_events: Vec<(ListLocation, StatusChangeEvent)>,
    key_events: Vec<(KeyLocation, StatusChangeEvent)>,
    block_timestamps: HashMap<Bytes32, u64>,
    fail_list_events: bool,
    fail_key_events: bool,
    fail_block_timestamps: bool,
    tx_counter: u64,
}

/// In-memory [`RegistryContract`].
#[derive(Debug)]
pub struct MockRegistryContract {
    address: Address,
    version: String,
    version_major: u64,
    chain_id: u64,
    state: Mutex<MockState>,
}

impl Default for MockRegistryContract {
    fn default() -> Self {
        Self::new(Address::repeat_byte(0x5e))
    }
}

impl MockRegistryContract {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            version: "1.0.0".to_string(),
            version_major: 1,
            chain_id: 1337,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>, major: u64) -> Self {
        self.version = version.into();
        self.version_major = major;
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Answer for `isRevoked` at `block_tag`; unset tags answer `false`.
    pub fn set_is_revoked(&self, block_tag: BlockTag, answer: Option<bool>) {
        self.state.lock().is_revoked.insert(block_tag, answer);
    }

    pub fn set_nonce(&self, address: Address, nonce: u64) {
        self.state.lock().nonces.insert(address, nonce);
    }

    pub fn nonce_of(&self, address: &Address) -> u64 {
        self.state.lock().nonces.get(address).copied().unwrap_or(0)
    }

    /// Record a list-level status change mined in `block_number` at
    /// `timestamp`.
    pub fn push_list_event(
        &self,
        list: ListLocation,
        revoked: bool,
        timestamp: u64,
        block_number: u64,
        log_index: u64,
    ) {
        let event = self.mined_event(revoked, timestamp, block_number, log_index);
        self.state.lock().list_events.push((list, event));
    }

    /// Record a key-level status change mined in `block_number` at
    /// `timestamp`.
    pub fn push_key_event(
        &self,
        key: KeyLocation,
        revoked: bool,
        timestamp: u64,
        block_number: u64,
        log_index: u64,
    ) {
        let event = self.mined_event(revoked, timestamp, block_number, log_index);
        self.state.lock().key_events.push((key, event));
    }

    fn mined_event(&self, revoked: bool, timestamp: u64, block_number: u64, log_index: u64) -> StatusChangeEvent {
        let block_hash = keccak256(block_number.to_be_bytes());
        let mut state = self.state.lock();
        state.block_timestamps.insert(block_hash, timestamp);
        StatusChangeEvent {
            revoked,
            block_number,
            block_hash,
            log_index,
            transaction_hash: keccak256([block_number.to_be_bytes(), log_index.to_be_bytes()].concat()),
        }
    }

    pub fn fail_list_events(&self) {
        self.state.lock().fail_list_events = true;
    }

    pub fn fail_key_events(&self) {
        self.state.lock().fail_key_events = true;
    }

    pub fn fail_block_timestamps(&self) {
        self.state.lock().fail_block_timestamps = true;
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Calls that would have sent a transaction.
    pub fn writes(&self) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(RecordedCall::is_write).collect()
    }

    pub fn count(&self, matches: impl Fn(&RecordedCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|&c| matches(c)).count()
    }

    fn record(&self, call: RecordedCall) {
        self.state.lock().calls.push(call);
    }

    fn record_write(&self, call: RecordedCall) -> PendingTransaction {
        let mut state = self.state.lock();
        state.calls.push(call);
        state.tx_counter += 1;
        PendingTransaction {
            hash: keccak256(state.tx_counter.to_be_bytes()),
        }
    }

    fn unavailable(method: &str) -> RpcError {
        RpcError::Node {
            method: method.to_string(),
            code: -32000,
            message: "mock failure".to_string(),
        }
    }

    fn signed(
        &self,
        revoked: bool,
        key: &KeyLocation,
        signer: &Address,
        signature: &[u8],
        delegated: bool,
    ) -> PendingTransaction {
        *self.state.lock().nonces.entry(*signer).or_insert(0) += 1;
        self.record_write(RecordedCall::ChangeStatusSigned {
            revoked,
            key: *key,
            signer: *signer,
            signature: signature.to_vec(),
            delegated,
        })
    }
}

impl RegistryContract for MockRegistryContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn is_revoked(&self, key: &KeyLocation, block_tag: BlockTag) -> Result<Option<bool>, RpcError> {
        self.record(RecordedCall::IsRevoked {
            key: *key,
            block_tag,
        });
        Ok(self
            .state
            .lock()
            .is_revoked
            .get(&block_tag)
            .copied()
            .unwrap_or(Some(false)))
    }

    async fn change_status(&self, revoked: bool, key: &KeyLocation) -> Result<PendingTransaction, RpcError> {
        Ok(self.record_write(RecordedCall::ChangeStatus {
            revoked,
            key: *key,
            delegated: false,
        }))
    }

    async fn change_status_delegated(
        &self,
        revoked: bool,
        key: &KeyLocation,
    ) -> Result<PendingTransaction, RpcError> {
        Ok(self.record_write(RecordedCall::ChangeStatus {
            revoked,
            key: *key,
            delegated: true,
        }))
    }

    async fn change_status_signed(
        &self,
        revoked: bool,
        key: &KeyLocation,
        signer: &Address,
        signature: &[u8],
    ) -> Result<PendingTransaction, RpcError> {
        Ok(self.signed(revoked, key, signer, signature, false))
    }

    async fn change_status_delegated_signed(
        &self,
        revoked: bool,
        key: &KeyLocation,
        signer: &Address,
        signature: &[u8],
    ) -> Result<PendingTransaction, RpcError> {
        Ok(self.signed(revoked, key, signer, signature, true))
    }

    async fn change_statuses_in_list(
        &self,
        revoked: &[bool],
        list: &ListLocation,
        keys: &[Bytes32],
    ) -> Result<PendingTransaction, RpcError> {
        Ok(self.record_write(RecordedCall::ChangeStatusesInList {
            revoked: revoked.to_vec(),
            list: *list,
            keys: keys.to_vec(),
            delegated: false,
        }))
    }

    async fn change_statuses_in_list_delegated(
        &self,
        revoked: &[bool],
        list: &ListLocation,
        keys: &[Bytes32],
    ) -> Result<PendingTransaction, RpcError> {
        Ok(self.record_write(RecordedCall::ChangeStatusesInList {
            revoked: revoked.to_vec(),
            list: *list,
            keys: keys.to_vec(),
            delegated: true,
        }))
    }

    async fn change_list_owner(
        &self,
        list: &ListLocation,
        new_owner: &Address,
    ) -> Result<PendingTransaction, RpcError> {
        Ok(self.record_write(RecordedCall::ChangeListOwner {
            list: *list,
            new_owner: *new_owner,
        }))
    }

    async fn add_list_delegate(
        &self,
        list: &ListLocation,
        delegate: &Address,
        expiry: u64,
    ) -> Result<PendingTransaction, RpcError> {
        Ok(self.record_write(RecordedCall::AddListDelegate {
            list: *list,
            delegate: *delegate,
            expiry,
        }))
    }

    async fn remove_list_delegate(
        &self,
        list: &ListLocation,
        delegate: &Address,
    ) -> Result<PendingTransaction, RpcError> {
        Ok(self.record_write(RecordedCall::RemoveListDelegate {
            list: *list,
            delegate: *delegate,
        }))
    }

    async fn nonces(&self, address: &Address) -> Result<u64, RpcError> {
        self.record(RecordedCall::Nonces(*address));
        Ok(self.nonce_of(address))
    }

    async fn version(&self) -> Result<String, RpcError> {
        self.record(RecordedCall::Version);
        Ok(self.version.clone())
    }

    async fn version_major(&self) -> Result<u64, RpcError> {
        self.record(RecordedCall::VersionMajor);
        Ok(self.version_major)
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        self.record(RecordedCall::ChainId);
        Ok(self.chain_id)
    }

    async fn list_status_events(&self, list: &ListLocation) -> Result<Vec<StatusChangeEvent>, RpcError> {
        self.record(RecordedCall::ListStatusEvents(*list));
        let state = self.state.lock();
        if state.fail_list_events {
            return Err(Self::unavailable("eth_getLogs"));
        }
        Ok(state
            .list_events
            .iter()
            .filter(|(l, _)| l == list)
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn revocation_status_events(&self, key: &KeyLocation) -> Result<Vec<StatusChangeEvent>, RpcError> {
        self.record(RecordedCall::RevocationStatusEvents(*key));
        let state = self.state.lock();
        if state.fail_key_events {
            return Err(Self::unavailable("eth_getLogs"));
        }
        Ok(state
            .key_events
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn block_timestamp(&self, block_hash: &Bytes32) -> Result<u64, RpcError> {
        self.record(RecordedCall::BlockTimestamp(*block_hash));
        let state = self.state.lock();
        if state.fail_block_timestamps {
            return Err(Self::unavailable("eth_getBlockByHash"));
        }
        state
            .block_timestamps
            .get(block_hash)
            .copied()
            .ok_or_else(|| RpcError::malformed("eth_getBlockByHash", format!("unknown block {block_hash}")))
    }
}

/// Deterministic [`TypedDataSigner`].
#[derive(Debug)]
pub struct MockSigner {
    address: Address,
    signed: Mutex<Vec<TypedData>>,
}

impl MockSigner {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            signed: Mutex::new(Vec::new()),
        }
    }

    /// The signature this signer produces for `typed_data`.
    pub fn expected_signature(typed_data: &TypedData) -> Signature {
        let mut bytes = typed_data.signing_hash().to_vec();
        bytes.push(0x1b);
        Signature::from_bytes(bytes)
    }

    /// Every payload signed so far, in order.
    pub fn signed(&self) -> Vec<TypedData> {
        self.signed.lock().clone()
    }
}

impl TypedDataSigner for MockSigner {
    async fn address(&self) -> Result<Address, SigningError> {
        Ok(self.address)
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Signature, SigningError> {
        self.signed.lock().push(typed_data.clone());
        Ok(Self::expected_signature(typed_data))
    }
}
