//! Fixed-width 32-byte identifiers used by the registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of raw bytes in a node or label hash.
pub const HASH_BYTES: usize = 32;

/// Errors raised when parsing a 32-byte hex identifier.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HashParseError {
    #[error("hash must start with '0x'")]
    MissingPrefix,
    #[error("hash must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("hash payload is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Decode a `0x`-prefixed, 64 hex digit string into raw bytes.
pub fn decode_hash_hex(value: &str) -> Result<[u8; HASH_BYTES], HashParseError> {
    let payload = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or(HashParseError::MissingPrefix)?;
    if payload.len() != HASH_BYTES * 2 {
        return Err(HashParseError::InvalidLength {
            expected: HASH_BYTES * 2,
            actual: payload.len(),
        });
    }
    let mut bytes = [0u8; HASH_BYTES];
    hex::decode_to_slice(payload, &mut bytes)?;
    Ok(bytes)
}

macro_rules! hash_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub [u8; HASH_BYTES]);

        impl $name {
            pub const ZERO: $name = $name([0u8; HASH_BYTES]);

            pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; HASH_BYTES]
            }

            /// Lowercase `0x`-prefixed hex encoding.
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }

            pub fn from_hex(value: &str) -> Result<Self, HashParseError> {
                decode_hash_hex(value).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = HashParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::from_hex(s)
            }
        }

        impl From<[u8; HASH_BYTES]> for $name {
            fn from(value: [u8; HASH_BYTES]) -> Self {
                $name(value)
            }
        }

        impl From<$name> for [u8; HASH_BYTES] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_hex()
            }
        }

        impl TryFrom<String> for $name {
            type Error = HashParseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $name::from_hex(&value)
            }
        }
    };
}

hash_newtype! {
    /// Canonical 32-byte identifier of a dotted name. The root (empty name)
    /// is all zeros.
    Node
}

hash_newtype! {
    /// 32-byte identifier of a single label.
    LabelHash
}

hash_newtype! {
    /// Transaction hash reported by a transport.
    TxHash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_requires_prefix_and_length() {
        let hex = format!("0x{}", "ab".repeat(HASH_BYTES));
        let node = Node::from_hex(&hex).unwrap();
        assert_eq!(node.0, [0xab; HASH_BYTES]);
        assert_eq!(node.to_string(), hex);

        assert_eq!(
            Node::from_hex(&"ab".repeat(HASH_BYTES)),
            Err(HashParseError::MissingPrefix)
        );
        assert!(matches!(
            LabelHash::from_hex("0xabcd"),
            Err(HashParseError::InvalidLength { actual: 4, .. })
        ));
        assert_eq!(
            TxHash::from_hex(&format!("0x{}", "g0".repeat(HASH_BYTES))),
            Err(HashParseError::InvalidHex(
                hex::FromHexError::InvalidHexCharacter { c: 'g', index: 0 }
            ))
        );
    }

    #[test]
    fn root_node_is_zero() {
        assert!(Node::ZERO.is_zero());
        assert_eq!(Node::default(), Node::ZERO);
    }
}
