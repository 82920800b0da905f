//! # Chain Primitives
//!
//! Addresses and 32-byte words are alloy's [`Address`] and [`B256`]. A list
//! identifier and an account are still distinct types, so one cannot be
//! passed where the other is expected. Parsing caller strings into them goes
//! through [`crate::validation`], which is stricter than their `FromStr`
//! impls (mandatory `0x`, EIP-55 on mixed case).
//!
//! ## Serde
//!
//! - `Address` serializes as its EIP-55 checksummed `0x` string.
//! - `Bytes32` serializes as a lowercase `0x` string.
//! - `BlockTag` serializes as its JSON-RPC parameter form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use alloy_primitives::{keccak256, Address, B256};

/// A 32-byte word: list identifiers, revocation keys, block hashes.
pub type Bytes32 = B256;

/// Length of an address string including the `0x` prefix.
pub const ADDRESS_STR_LEN: usize = 42;

/// Length of a bytes32 string including the `0x` prefix.
pub const BYTES32_STR_LEN: usize = 66;

/// Chain block selector for state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockTag {
    /// Most recent block.
    #[default]
    Latest,
    /// Genesis block.
    Earliest,
    /// Pending state.
    Pending,
    /// Most recent safe head.
    Safe,
    /// Most recent finalized block.
    Finalized,
    /// A specific block height.
    Number(u64),
}

impl BlockTag {
    /// JSON-RPC parameter form: a tag name, or a `0x` quantity.
    pub fn to_rpc_param(&self) -> String {
        match self {
            Self::Latest => "latest".to_string(),
            Self::Earliest => "earliest".to_string(),
            Self::Pending => "pending".to_string(),
            Self::Safe => "safe".to_string(),
            Self::Finalized => "finalized".to_string(),
            Self::Number(n) => format!("{n:#x}"),
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "block {n}"),
            other => f.write_str(&other.to_rpc_param()),
        }
    }
}

impl FromStr for BlockTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "earliest" => Ok(Self::Earliest),
            "pending" => Ok(Self::Pending),
            "safe" => Ok(Self::Safe),
            "finalized" => Ok(Self::Finalized),
            other => {
                let parsed = match other.strip_prefix("0x") {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => other.parse(),
                };
                parsed
                    .map(Self::Number)
                    .map_err(|_| format!("unknown block tag: {other:?}"))
            }
        }
    }
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rpc_param())
    }
}

impl<'de> Deserialize<'de> for BlockTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
