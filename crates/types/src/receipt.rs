use crate::TxHash;
use serde::{Deserialize, Serialize};

/// Receipt of a successful registry write.
///
/// Produced by the transport and forwarded to callers unchanged; the
/// registry client never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptInfo {
    /// Hash of the submitted transaction.
    pub transaction_hash: TxHash,
    /// Block that included the transaction, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Gas consumed by the transaction, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    /// Execution status reported by the ledger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

impl ReceiptInfo {
    pub fn new(transaction_hash: TxHash) -> Self {
        Self {
            transaction_hash,
            block_number: None,
            gas_used: None,
            status: None,
        }
    }
}
