//! Contract-call transport boundary
//!
//! The registry client never talks to a ledger node itself. Every read goes
//! through [`ContractTransport::call`] and every write through
//! [`ContractTransport::send`]; encoding, signing, gas estimation and
//! submission belong to the transport.

use async_trait::async_trait;
use ens_crypto::keccak256;
use ens_types::{Address, LabelHash, Node, ReceiptInfo, TxConfig};
use thiserror::Error;

/// Failure reported by a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("unexpected output from {method}: {reason}")]
    Decode { method: String, reason: String },

    #[error("transport backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// A typed ABI value passed to or returned from a contract method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Bytes4([u8; 4]),
    Bytes32([u8; 32]),
    Uint(u64),
    Bool(bool),
}

impl Token {
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Bytes4(_) => "bytes4",
            Token::Bytes32(_) => "bytes32",
            Token::Uint(_) => "uint",
            Token::Bool(_) => "bool",
        }
    }

    pub fn into_address(self) -> Option<Address> {
        match self {
            Token::Address(address) => Some(address),
            _ => None,
        }
    }

    pub fn into_uint(self) -> Option<u64> {
        match self {
            Token::Uint(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_bytes32(self) -> Option<[u8; 32]> {
        match self {
            Token::Bytes32(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Address> for Token {
    fn from(value: Address) -> Self {
        Token::Address(value)
    }
}

impl From<Node> for Token {
    fn from(value: Node) -> Self {
        Token::Bytes32(value.0)
    }
}

impl From<LabelHash> for Token {
    fn from(value: LabelHash) -> Self {
        Token::Bytes32(value.0)
    }
}

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Token::Uint(value)
    }
}

impl From<bool> for Token {
    fn from(value: bool) -> Self {
        Token::Bool(value)
    }
}

/// One contract method invocation: target, canonical signature and
/// arguments in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    /// Canonical Solidity signature, e.g. `owner(bytes32)`.
    pub signature: String,
    pub args: Vec<Token>,
}

impl ContractCall {
    pub fn new(to: Address, signature: impl Into<String>, args: Vec<Token>) -> Self {
        Self {
            to,
            signature: signature.into(),
            args,
        }
    }

    /// Method name without the parameter list.
    pub fn method(&self) -> &str {
        self.signature
            .split_once('(')
            .map(|(name, _)| name)
            .unwrap_or(self.signature.as_str())
    }

    /// First four bytes of the Keccak-256 of the signature.
    pub fn selector(&self) -> [u8; 4] {
        let digest = keccak256(self.signature.as_bytes());
        [digest[0], digest[1], digest[2], digest[3]]
    }
}

/// Read/write access to deployed contracts.
///
/// Implementations must be safe to share across concurrent operations;
/// ordering of writes (nonces) is the transport's concern.
#[async_trait]
pub trait ContractTransport: Send + Sync {
    /// Execute a non-mutating call and return its single decoded output.
    async fn call(&self, call: &ContractCall) -> Result<Token, TransportError>;

    /// Submit a transaction and wait for its receipt.
    async fn send(&self, call: &ContractCall, tx: &TxConfig)
        -> Result<ReceiptInfo, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_match_registry_abi() {
        let owner = ContractCall::new(Address::ZERO, "owner(bytes32)", vec![]);
        assert_eq!(owner.selector(), [0x02, 0x57, 0x1b, 0xe3]);
        assert_eq!(owner.method(), "owner");

        let resolver = ContractCall::new(Address::ZERO, "resolver(bytes32)", vec![]);
        assert_eq!(resolver.selector(), [0x01, 0x78, 0xb8, 0xbf]);
    }

    #[test]
    fn token_accessors() {
        assert_eq!(Token::from(true).into_bool(), Some(true));
        assert_eq!(Token::from(7u64).into_uint(), Some(7));
        assert_eq!(Token::from(7u64).into_bool(), None);
        assert_eq!(Token::from(Node::ZERO).into_bytes32(), Some([0u8; 32]));
        assert_eq!(Token::Bool(false).kind(), "bool");
    }
}
