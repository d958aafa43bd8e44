//! Hashing primitives for the ENS registry client
//!
//! Keccak-256 plus the namehash algorithm that turns dotted names into
//! registry nodes.

pub mod hash_functions;
pub mod namehash;

pub use hash_functions::{keccak256, Keccak256};
pub use namehash::{
    is_strict_hash_hex, labelhash, namehash, namehash_bytes, resolve_label, subnode,
    NameHashError, LABEL_SEPARATOR,
};
