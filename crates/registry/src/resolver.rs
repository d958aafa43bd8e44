//! Generic resolver handle
//!
//! Returned by [`crate::RegistryClient::get_resolver`]. The handle knows
//! nothing about record formats; it only routes calls to whatever resolver
//! address the registry reported.

use crate::errors::*;
use crate::registry::{classify, unexpected_output};
use crate::transport::{ContractCall, ContractTransport, Token};
use ens_types::{Address, ReceiptInfo, TxConfig};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// EIP-165 interface probe.
pub const SUPPORTS_INTERFACE: &str = "supportsInterface(bytes4)";

/// Handle to a resolver contract, bound to an address or unbound when the
/// registry has no resolver for the node.
#[derive(Clone)]
pub struct ResolverHandle {
    address: Option<Address>,
    transport: Arc<dyn ContractTransport>,
}

impl fmt::Debug for ResolverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverHandle")
            .field("address", &self.address)
            .finish()
    }
}

impl ResolverHandle {
    pub fn bound(address: Address, transport: Arc<dyn ContractTransport>) -> Self {
        Self {
            address: Some(address),
            transport,
        }
    }

    pub fn unbound(transport: Arc<dyn ContractTransport>) -> Self {
        Self {
            address: None,
            transport,
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn is_bound(&self) -> bool {
        self.address.is_some()
    }

    fn target(&self) -> Result<Address> {
        self.address.ok_or(RegistryError::ResolverNotBound)
    }

    /// Read-only call against the resolver.
    pub async fn call(&self, signature: &str, args: Vec<Token>) -> Result<Token> {
        let call = ContractCall::new(self.target()?, signature, args);
        debug!(method = call.method(), resolver = %call.to, "resolver read");
        self.transport
            .call(&call)
            .await
            .map_err(|err| classify(call.method(), err))
    }

    /// Transaction against the resolver.
    pub async fn send(
        &self,
        signature: &str,
        args: Vec<Token>,
        tx: &TxConfig,
    ) -> Result<ReceiptInfo> {
        let call = ContractCall::new(self.target()?, signature, args);
        debug!(method = call.method(), resolver = %call.to, "resolver write");
        self.transport
            .send(&call, tx)
            .await
            .map_err(|err| classify(call.method(), err))
    }

    /// Whether the resolver implements the interface with the given
    /// EIP-165 identifier.
    pub async fn supports_interface(&self, interface_id: [u8; 4]) -> Result<bool> {
        match self
            .call(SUPPORTS_INTERFACE, vec![Token::Bytes4(interface_id)])
            .await?
        {
            Token::Bool(supported) => Ok(supported),
            other => Err(unexpected_output("supportsInterface", "bool", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::InMemoryRegistry;

    #[tokio::test]
    async fn unbound_handle_refuses_calls() {
        let transport = Arc::new(InMemoryRegistry::new(Address([0xee; 20]), Address::ZERO));
        let handle = ResolverHandle::unbound(transport.clone());
        assert!(!handle.is_bound());

        let err = handle.supports_interface([0x01, 0xff, 0xc9, 0xa7]).await.unwrap_err();
        assert!(matches!(err, RegistryError::ResolverNotBound));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn bound_handle_routes_to_resolver_address() {
        let resolver = Address([0x42; 20]);
        let transport = Arc::new(InMemoryRegistry::new(Address([0xee; 20]), Address::ZERO));
        transport.deploy_resolver(resolver, vec![[0x3b, 0x3b, 0x57, 0xde]]);

        let handle = ResolverHandle::bound(resolver, transport.clone());
        assert!(handle.supports_interface([0x3b, 0x3b, 0x57, 0xde]).await.unwrap());
        assert!(!handle.supports_interface([0xde, 0xad, 0xbe, 0xef]).await.unwrap());
        assert!(transport.calls().iter().all(|call| call.to == resolver));
    }
}
