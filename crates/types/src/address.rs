use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when normalizing a textual account address.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AddressError {
    #[error("address must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("address payload is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("address {0} has an invalid EIP-55 checksum")]
    InvalidChecksum(String),
}

/// Number of raw bytes contained in an address.
pub const ADDRESS_BYTES: usize = 20;
/// Expected length of the hex payload (without the `0x` prefix).
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_BYTES * 2;

/// A 20-byte ledger account or contract address.
///
/// Parsing accepts an optional `0x` prefix followed by exactly 40 hex
/// digits. All-lowercase and all-uppercase inputs are accepted as-is;
/// mixed-case input must carry a valid EIP-55 checksum. Display always
/// produces the checksummed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; ADDRESS_BYTES]);

impl Address {
    /// The all-zero address, used by the registry to mean "unset".
    pub const ZERO: Address = Address([0u8; ADDRESS_BYTES]);

    /// Validate and canonicalize a textual address.
    pub fn normalize(raw: &str) -> Result<Self, AddressError> {
        let payload = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);

        if payload.len() != ADDRESS_HEX_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_HEX_LENGTH,
                actual: payload.len(),
            });
        }

        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(payload, &mut bytes)?;
        let address = Address(bytes);

        let has_lower = payload.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = payload.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.checksum_hex()[2..] != *payload {
            return Err(AddressError::InvalidChecksum(raw.to_string()));
        }

        Ok(address)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_BYTES]
    }

    /// EIP-55 mixed-case checksum encoding, `0x`-prefixed.
    pub fn checksum_hex(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = Keccak256::digest(lower.as_bytes());

        let mut encoded = String::with_capacity(2 + ADDRESS_HEX_LENGTH);
        encoded.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let shift = if i % 2 == 0 { 4 } else { 0 };
            let nibble = (digest[i / 2] >> shift) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                encoded.push(c.to_ascii_uppercase());
            } else {
                encoded.push(c);
            }
        }
        encoded
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksum_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::normalize(s)
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(value: [u8; ADDRESS_BYTES]) -> Self {
        Address(value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.checksum_hex()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::normalize(&value)
    }
}

/// Anything that can be normalized into an [`Address`]: already-parsed
/// addresses pass through, text goes through [`Address::normalize`].
pub trait IntoAddress {
    fn into_address(self) -> Result<Address, AddressError>;
}

impl IntoAddress for Address {
    fn into_address(self) -> Result<Address, AddressError> {
        Ok(self)
    }
}

impl IntoAddress for &Address {
    fn into_address(self) -> Result<Address, AddressError> {
        Ok(*self)
    }
}

impl IntoAddress for &str {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::normalize(self)
    }
}

impl IntoAddress for String {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::normalize(&self)
    }
}

impl IntoAddress for &String {
    fn into_address(self) -> Result<Address, AddressError> {
        Address::normalize(self)
    }
}
