//! # Validation Errors
//!
//! Every malformed input is reported with the field it came from, the value
//! as supplied and the shape that was expected. Validation runs before any
//! remote call, so these errors are always the caller's to fix.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A caller-supplied value failed a shape check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required string was empty.
    #[error("{field} must not be empty")]
    Empty {
        /// The offending field.
        field: &'static str,
    },

    /// A required flag or counter was not set.
    #[error("{field} must be set")]
    Missing {
        /// The offending field.
        field: &'static str,
    },

    /// Not a `0x`-prefixed, 40-hex-digit address.
    #[error(
        "supplied {field} '{value}' is not a valid address \
         (notice: must start with 0x prefix; must contain only HEX character set; must have a length of 42)"
    )]
    InvalidAddress {
        /// The offending field.
        field: &'static str,
        /// The value as supplied.
        value: String,
    },

    /// Mixed-case address whose casing does not match its EIP-55 checksum.
    #[error("supplied {field} '{value}' has an invalid EIP-55 checksum")]
    BadChecksum {
        /// The offending field.
        field: &'static str,
        /// The value as supplied.
        value: String,
    },

    /// Not `0x`-prefixed strict hex.
    #[error(
        "supplied {field} '{value}' is not valid \
         (notice: must start with 0x prefix; must contain only HEX character set)"
    )]
    NotHex {
        /// The offending field.
        field: &'static str,
        /// The value as supplied.
        value: String,
    },

    /// Hex string with an odd number of digits cannot encode whole bytes.
    #[error("supplied {field} '{value}' has an odd number of hex digits")]
    OddHexLength {
        /// The offending field.
        field: &'static str,
        /// The value as supplied.
        value: String,
    },

    /// Hex string of the wrong total length.
    #[error("supplied {field} '{value}' has wrong length of '{actual}' instead of '{expected}'")]
    WrongLength {
        /// The offending field.
        field: &'static str,
        /// The value as supplied.
        value: String,
        /// Length as supplied, including the `0x` prefix.
        actual: usize,
        /// Required length, including the `0x` prefix.
        expected: usize,
    },

    /// A delegate expiry that does not lie strictly in the future.
    #[error("expiry {expiry} must lie in the future (now: {now})")]
    ExpiryNotInFuture {
        /// The requested expiry.
        expiry: DateTime<Utc>,
        /// Wall-clock time of the check.
        now: DateTime<Utc>,
    },
}

impl ValidationError {
    /// The field the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Empty { field }
            | Self::Missing { field }
            | Self::InvalidAddress { field, .. }
            | Self::BadChecksum { field, .. }
            | Self::NotHex { field, .. }
            | Self::OddHexLength { field, .. }
            | Self::WrongLength { field, .. } => Some(*field),
            Self::ExpiryNotInFuture { .. } => None,
        }
    }
}
