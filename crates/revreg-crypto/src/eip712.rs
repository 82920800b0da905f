//! # EIP-712 Typed Data for Status Changes
//!
//! A signed status change binds six values (`revoked`, `namespace`,
//! `revocationList`, `revocationKey`, `signer`, `nonce`) to one deployed
//! registry on one chain through the signing domain.
//!
//! Two schemas share the same fields and differ only in their type name:
//!
//! | Schema | Accepted by |
//! |--------|-------------|
//! | `ChangeStatus` | `changeStatusSigned` (list owner signs) |
//! | `ChangeStatusDelegated` | `changeStatusDelegatedSigned` (delegate signs) |
//!
//! The type name is part of the type hash, so a signature produced under
//! one schema never verifies on the other entry point.
//!
//! ## Signing Hash
//!
//! ```text
//! keccak256(0x19 0x01 ‖ domainSeparator ‖ hashStruct(message))
//! hashStruct(m) = keccak256(typeHash ‖ encodeData(m))
//! ```

use std::borrow::Cow;

use alloy_primitives::U256;
use alloy_sol_types::{sol, Eip712Domain, SolStruct};
use revreg_core::{keccak256, Address, Bytes32};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// Fixed `name` of the registry's signing domain.
pub const REGISTRY_DOMAIN_NAME: &str = "Revocation Registry";

const DOMAIN_FIELDS: [(&str, &str); 4] = [
    ("name", "string"),
    ("version", "string"),
    ("chainId", "uint256"),
    ("verifyingContract", "address"),
];

const CHANGE_STATUS_FIELDS: [(&str, &str); 6] = [
    ("revoked", "bool"),
    ("namespace", "address"),
    ("revocationList", "bytes32"),
    ("revocationKey", "bytes32"),
    ("signer", "address"),
    ("nonce", "uint256"),
];

sol! {
    /// Status change signed by the list owner.
    struct ChangeStatus {
        bool revoked;
        address namespace;
        bytes32 revocationList;
        bytes32 revocationKey;
        address signer;
        uint256 nonce;
    }

    /// Status change signed by a list delegate.
    struct ChangeStatusDelegated {
        bool revoked;
        address namespace;
        bytes32 revocationList;
        bytes32 revocationKey;
        address signer;
        uint256 nonce;
    }
}

/// Which contract entry point a signature authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningSchema {
    /// Signed by the list owner; relayed to `changeStatusSigned`.
    ChangeStatus,
    /// Signed by a list delegate; relayed to `changeStatusDelegatedSigned`.
    ChangeStatusDelegated,
}

impl SigningSchema {
    pub fn for_delegated(delegated: bool) -> Self {
        if delegated {
            Self::ChangeStatusDelegated
        } else {
            Self::ChangeStatus
        }
    }

    /// The EIP-712 primary type name.
    pub fn primary_type(&self) -> &'static str {
        match self {
            Self::ChangeStatus => ChangeStatus::NAME,
            Self::ChangeStatusDelegated => ChangeStatusDelegated::NAME,
        }
    }

    /// `encodeType` of the schema, e.g. `ChangeStatus(bool revoked,...)`.
    pub fn encode_type(&self) -> Cow<'static, str> {
        match self {
            Self::ChangeStatus => ChangeStatus::eip712_encode_type(),
            Self::ChangeStatusDelegated => ChangeStatusDelegated::eip712_encode_type(),
        }
    }

    pub fn type_hash(&self) -> Bytes32 {
        keccak256(self.encode_type().as_bytes())
    }
}

/// The domain a signature is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedDataDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl TypedDataDomain {
    /// Domain of a deployed revocation registry.
    pub fn revocation_registry(
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: REGISTRY_DOMAIN_NAME.to_string(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// The domain as alloy's [`Eip712Domain`]. No salt.
    pub fn eip712_domain(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(Cow::Owned(self.name.clone())),
            Some(Cow::Owned(self.version.clone())),
            Some(U256::from(self.chain_id)),
            Some(self.verifying_contract),
            None,
        )
    }

    /// `hashStruct(domain)`.
    pub fn separator(&self) -> Bytes32 {
        self.eip712_domain().separator()
    }

    fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "version": self.version,
            "chainId": self.chain_id,
            "verifyingContract": self.verifying_contract.to_checksum(None),
        })
    }
}

/// The value set every status-change signature covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeStatusMessage {
    pub revoked: bool,
    pub namespace: Address,
    pub revocation_list: Bytes32,
    pub revocation_key: Bytes32,
    pub signer: Address,
    pub nonce: u64,
}

impl ChangeStatusMessage {
    /// `encodeData`: the six fields as 32-byte words in schema order.
    ///
    /// Identical under both schemas; only the type hash differs.
    pub fn encode_data(&self) -> Vec<u8> {
        self.owner_signed().eip712_encode_data()
    }

    fn owner_signed(&self) -> ChangeStatus {
        ChangeStatus {
            revoked: self.revoked,
            namespace: self.namespace,
            revocationList: self.revocation_list,
            revocationKey: self.revocation_key,
            signer: self.signer,
            nonce: U256::from(self.nonce),
        }
    }

    fn delegate_signed(&self) -> ChangeStatusDelegated {
        ChangeStatusDelegated {
            revoked: self.revoked,
            namespace: self.namespace,
            revocationList: self.revocation_list,
            revocationKey: self.revocation_key,
            signer: self.signer,
            nonce: U256::from(self.nonce),
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "revoked": self.revoked,
            "namespace": self.namespace.to_checksum(None),
            "revocationList": self.revocation_list.to_string(),
            "revocationKey": self.revocation_key.to_string(),
            "signer": self.signer.to_checksum(None),
            "nonce": self.nonce,
        })
    }
}

/// A complete typed-data payload: domain, schema and message.
///
/// Serializes to the JSON object accepted by `eth_signTypedData_v4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedData {
    pub domain: TypedDataDomain,
    pub schema: SigningSchema,
    pub message: ChangeStatusMessage,
}

impl TypedData {
    pub fn new(domain: TypedDataDomain, schema: SigningSchema, message: ChangeStatusMessage) -> Self {
        Self {
            domain,
            schema,
            message,
        }
    }

    /// `hashStruct(message)` under the selected schema.
    pub fn struct_hash(&self) -> Bytes32 {
        match self.schema {
            SigningSchema::ChangeStatus => self.message.owner_signed().eip712_hash_struct(),
            SigningSchema::ChangeStatusDelegated => {
                self.message.delegate_signed().eip712_hash_struct()
            }
        }
    }

    /// The 32-byte digest a signer commits to.
    pub fn signing_hash(&self) -> Bytes32 {
        let domain = self.domain.eip712_domain();
        match self.schema {
            SigningSchema::ChangeStatus => self.message.owner_signed().eip712_signing_hash(&domain),
            SigningSchema::ChangeStatusDelegated => {
                self.message.delegate_signed().eip712_signing_hash(&domain)
            }
        }
    }

    /// The `eth_signTypedData_v4` JSON form.
    pub fn to_json(&self) -> Value {
        let mut types = serde_json::Map::new();
        types.insert("EIP712Domain".into(), type_fields(&DOMAIN_FIELDS));
        types.insert(
            self.schema.primary_type().into(),
            type_fields(&CHANGE_STATUS_FIELDS),
        );
        json!({
            "types": types,
            "primaryType": self.schema.primary_type(),
            "domain": self.domain.to_json(),
            "message": self.message.to_json(),
        })
    }
}

fn type_fields(fields: &[(&str, &str)]) -> Value {
    fields
        .iter()
        .map(|(name, ty)| json!({"name": name, "type": ty}))
        .collect()
}

impl Serialize for TypedData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
