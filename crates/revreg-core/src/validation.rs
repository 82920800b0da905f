//! # Input Validation
//!
//! Pure shape checks over caller input. Each check either succeeds, yielding
//! the typed value it proved well-formed, or fails with a [`ValidationError`]
//! naming the field. Broader checks compose the narrower ones and stop at
//! the first failure.
//!
//! Nothing here touches the network; the controller runs these before any
//! remote call so that a malformed request never costs a round trip.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::path::{
    KeyLocation, ListLocation, RevocationKeyInstruction, RevocationKeyPath, RevocationListPath,
};
use alloy_primitives::hex;

use crate::primitives::{Address, Bytes32, ADDRESS_STR_LEN, BYTES32_STR_LEN};

const NAMESPACE_FIELD: &str = "namespace in revocationListPath";
const LIST_FIELD: &str = "list in revocationListPath";
const KEY_FIELD: &str = "revocationKey in revocationKeyPath";
const INSTRUCTION_KEY_FIELD: &str = "revocationKey in RevocationKeyInstruction";
const INSTRUCTION_REVOKED_FIELD: &str = "revoked in RevocationKeyInstruction";

/// Signer, signature and nonce of a signed operation, shape-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signaturish {
    /// Account that produced the signature.
    pub signer: Address,
    /// Raw signature bytes, any length.
    pub signature: Vec<u8>,
    /// Signer nonce the signature commits to.
    pub nonce: u64,
}

/// Fail on an empty string.
pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// `0x` + 40 hex digits, EIP-55 checksummed when mixed case.
///
/// All-lowercase and all-uppercase digits carry no checksum and are accepted
/// as is.
pub fn address_shaped(field: &'static str, value: &str) -> Result<Address, ValidationError> {
    let invalid = || ValidationError::InvalidAddress {
        field,
        value: value.to_string(),
    };
    let digits = value.strip_prefix("0x").ok_or_else(invalid)?;
    if value.len() != ADDRESS_STR_LEN || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(value, None).map_err(|_| {
            ValidationError::BadChecksum {
                field,
                value: value.to_string(),
            }
        });
    }
    value.parse().map_err(|_| invalid())
}

/// `0x` + 64 hex digits.
///
/// Hex is checked before length, so `"0xzz"` reports bad hex rather than
/// bad length.
pub fn bytes32_shaped(field: &'static str, value: &str) -> Result<Bytes32, ValidationError> {
    let not_hex = || ValidationError::NotHex {
        field,
        value: value.to_string(),
    };
    value
        .strip_prefix("0x")
        .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(not_hex)?;
    if value.len() != BYTES32_STR_LEN {
        return Err(ValidationError::WrongLength {
            field,
            value: value.to_string(),
            actual: value.len(),
            expected: BYTES32_STR_LEN,
        });
    }
    value.parse().map_err(|_| not_hex())
}

/// `0x` + any even number of hex digits.
pub fn hex_shaped(field: &'static str, value: &str) -> Result<Vec<u8>, ValidationError> {
    let digits = value
        .strip_prefix("0x")
        .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| ValidationError::NotHex {
            field,
            value: value.to_string(),
        })?;
    if digits.len() % 2 != 0 {
        return Err(ValidationError::OddHexLength {
            field,
            value: value.to_string(),
        });
    }
    hex::decode(digits).map_err(|_| ValidationError::NotHex {
        field,
        value: value.to_string(),
    })
}

/// Non-empty namespace and list, namespace address-shaped, list bytes32-shaped.
pub fn validate_revocation_list_path(
    path: &RevocationListPath,
) -> Result<ListLocation, ValidationError> {
    list_location(&path.namespace, &path.list)
}

/// The list-path checks plus a non-empty, bytes32-shaped revocation key.
pub fn validate_revocation_key_path(
    path: &RevocationKeyPath,
) -> Result<KeyLocation, ValidationError> {
    non_empty(KEY_FIELD, &path.revocation_key)?;
    let list = list_location(&path.namespace, &path.list)?;
    let key = bytes32_shaped(KEY_FIELD, &path.revocation_key)?;
    Ok(KeyLocation {
        namespace: list.namespace,
        list: list.list,
        key,
    })
}

fn list_location(namespace: &str, list: &str) -> Result<ListLocation, ValidationError> {
    non_empty(NAMESPACE_FIELD, namespace)?;
    non_empty(LIST_FIELD, list)?;
    Ok(ListLocation {
        namespace: address_shaped(NAMESPACE_FIELD, namespace)?,
        list: bytes32_shaped(LIST_FIELD, list)?,
    })
}

/// Signer address-shaped, signature hex-shaped, nonce present.
///
/// Zero is a valid nonce: it is what every signer holds before its first
/// signed operation.
pub fn validate_signaturish(
    signer: &str,
    signature: &str,
    nonce: Option<u64>,
) -> Result<Signaturish, ValidationError> {
    let signer = address_shaped("signer", signer)?;
    let signature = hex_shaped("signature", signature)?;
    let nonce = nonce.ok_or(ValidationError::Missing { field: "nonce" })?;
    Ok(Signaturish {
        signer,
        signature,
        nonce,
    })
}

/// Key non-empty and bytes32-shaped; `revoked` explicitly set.
pub fn validate_instruction(
    instruction: &RevocationKeyInstruction,
) -> Result<(Bytes32, bool), ValidationError> {
    non_empty(INSTRUCTION_KEY_FIELD, &instruction.revocation_key)?;
    let revoked = instruction.revoked.ok_or(ValidationError::Missing {
        field: INSTRUCTION_REVOKED_FIELD,
    })?;
    let key = bytes32_shaped(INSTRUCTION_KEY_FIELD, &instruction.revocation_key)?;
    Ok((key, revoked))
}

/// Validate a batch of instructions into two parallel sequences in input
/// order. A single malformed instruction rejects the whole batch.
pub fn validate_instructions(
    instructions: &[RevocationKeyInstruction],
) -> Result<(Vec<bool>, Vec<Bytes32>), ValidationError> {
    let mut statuses = Vec::with_capacity(instructions.len());
    let mut keys = Vec::with_capacity(instructions.len());
    for instruction in instructions {
        let (key, revoked) = validate_instruction(instruction)?;
        statuses.push(revoked);
        keys.push(key);
    }
    Ok((statuses, keys))
}

/// Require `expiry` strictly after `now`, compared in whole seconds.
///
/// Both instants are truncated to the second first, so an expiry less than
/// one second ahead of `now` lands on the current second and is rejected.
///
/// Returns the expiry as seconds since the Unix epoch.
pub fn validate_future_expiry(
    expiry: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<u64, ValidationError> {
    let expiry_secs = expiry.timestamp();
    if expiry_secs <= now.timestamp() {
        return Err(ValidationError::ExpiryNotInFuture { expiry, now });
    }
    u64::try_from(expiry_secs).map_err(|_| ValidationError::ExpiryNotInFuture { expiry, now })
}
