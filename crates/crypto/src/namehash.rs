//! Name to node hashing
//!
//! A node is derived by folding label hashes right to left, starting from
//! the all-zero root:
//!
//! ```text
//! node("")          = 0x00..00
//! node(label.rest)  = keccak256(node(rest) || keccak256(label))
//! ```
//!
//! Every suffix of a name therefore has its own independently computable
//! node, which is what lets the registry nest ownership.

use crate::hash_functions::{keccak256, Keccak256};
use ens_types::{LabelHash, Node, HASH_BYTES};
use thiserror::Error;

/// Label separator inside a dotted name.
pub const LABEL_SEPARATOR: char = '.';

/// Malformed name input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameHashError {
    #[error("name {name:?} contains an empty label at position {position}")]
    EmptyLabel { name: String, position: usize },

    #[error("name is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, NameHashError>;

/// Compute the node for a dotted name.
///
/// Labels are hashed byte-for-byte; no case folding or Unicode
/// normalization is applied. Empty labels (`"a..eth"`, `".eth"`, `"eth."`)
/// are rejected.
pub fn namehash(name: &str) -> Result<Node> {
    if name.is_empty() {
        return Ok(Node::ZERO);
    }

    let labels: Vec<&str> = name.split(LABEL_SEPARATOR).collect();
    if let Some(position) = labels.iter().position(|label| label.is_empty()) {
        return Err(NameHashError::EmptyLabel {
            name: name.to_string(),
            position,
        });
    }

    Ok(labels
        .iter()
        .rev()
        .fold(Node::ZERO, |node, label| subnode(&node, &labelhash(label))))
}

/// Compute the node for a name supplied as raw bytes.
pub fn namehash_bytes(name: &[u8]) -> Result<Node> {
    namehash(std::str::from_utf8(name)?)
}

/// Keccak-256 of a single label's raw bytes.
pub fn labelhash(label: &str) -> LabelHash {
    LabelHash(keccak256(label.as_bytes()))
}

/// Node of `label` directly beneath `parent`.
pub fn subnode(parent: &Node, label: &LabelHash) -> Node {
    let parts = [parent.as_bytes().as_slice(), label.as_bytes().as_slice()];
    Node(Keccak256::new().hash_parts(&parts))
}

/// True when `value` is exactly `0x` followed by 64 hex digits.
pub fn is_strict_hash_hex(value: &str) -> bool {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(payload) => {
            payload.len() == HASH_BYTES * 2 && payload.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Turn a caller-supplied label into the hash sent to the registry.
///
/// A label that is already a strict 32-byte hex value is taken verbatim;
/// anything else is hashed with [`labelhash`].
pub fn resolve_label(label: &str) -> LabelHash {
    if is_strict_hash_hex(label) {
        if let Ok(hash) = LabelHash::from_hex(label) {
            return hash;
        }
    }
    labelhash(label)
}
