//! Hash functions for the naming layer
//!
//! Keccak-256 is the only primitive the registry needs: it derives label
//! hashes, folds them into nodes and computes method selectors.

use sha3::Digest;

/// Keccak256 hash implementation (the pre-standard SHA-3 padding used by
/// the ledger, not FIPS-202 SHA3-256)
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256;

impl Keccak256 {
    /// Create a new Keccak256 instance
    pub fn new() -> Self {
        Self
    }

    /// Hash `data` into a fixed-size digest.
    pub fn hash_fixed(&self, data: &[u8]) -> [u8; 32] {
        sha3::Keccak256::digest(data).into()
    }

    /// Hash the concatenation of several byte slices without allocating.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> [u8; 32] {
        let mut hasher = sha3::Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}

/// Keccak-256 digest of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    Keccak256.hash_fixed(data.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn keccak256_is_not_sha3() {
        use sha3::Sha3_256;
        let sha3: [u8; 32] = Sha3_256::digest(b"eth").into();
        assert_ne!(keccak256(b"eth"), sha3);
    }

    #[test]
    fn hash_parts_matches_concatenation() {
        let hasher = Keccak256::new();
        let joined = hasher.hash_fixed(b"alice.eth");
        let parts = hasher.hash_parts(&[b"alice".as_slice(), b".".as_slice(), b"eth".as_slice()]);
        assert_eq!(joined, parts);
        assert_eq!(keccak256(b"alice.eth"), joined);
    }
}
