use crate::Address;
use serde::{Deserialize, Serialize};

/// Caller-supplied options for a registry write.
///
/// Opaque to the registry client: it is handed to the transport as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxConfig {
    /// Sending account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Gas limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Legacy gas price in wei.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
    /// EIP-1559 fee cap in wei.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 priority fee in wei.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

impl TxConfig {
    pub fn from_sender(from: Address) -> Self {
        Self {
            from: Some(from),
            ..Default::default()
        }
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields_and_skips_unset_ones() {
        let sender = Address([0x11; 20]);
        let tx = TxConfig::from_sender(sender).with_gas(90_000).with_nonce(4);
        assert_eq!(tx.from, Some(sender));
        assert_eq!(tx.gas, Some(90_000));
        assert_eq!(tx.nonce, Some(4));
        assert_eq!(tx.gas_price, None);

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["from"], "0x1111111111111111111111111111111111111111");
        assert!(json.get("gas_price").is_none());
    }
}
