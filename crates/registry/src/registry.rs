//! Registry client
//!
//! Name-based wrappers around the registry contract. Every operation hashes
//! its name into a node, normalizes its address arguments, issues exactly one
//! call or send, and classifies any transport failure as
//! [`RegistryError::RegistryCallReverted`].

use crate::config::RegistryConfig;
use crate::errors::*;
use crate::resolver::ResolverHandle;
use crate::transport::{ContractCall, ContractTransport, Token, TransportError};
use ens_crypto::{namehash, resolve_label};
use ens_types::{Address, IntoAddress, ReceiptInfo, Ttl, TxConfig};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Canonical method signatures of the registry contract.
pub mod signatures {
    pub const OWNER: &str = "owner(bytes32)";
    pub const SET_OWNER: &str = "setOwner(bytes32,address)";
    pub const TTL: &str = "ttl(bytes32)";
    pub const SET_TTL: &str = "setTTL(bytes32,uint64)";
    pub const SET_SUBNODE_OWNER: &str = "setSubnodeOwner(bytes32,bytes32,address)";
    pub const SET_SUBNODE_RECORD: &str =
        "setSubnodeRecord(bytes32,bytes32,address,address,uint64)";
    pub const SET_APPROVAL_FOR_ALL: &str = "setApprovalForAll(address,bool)";
    pub const IS_APPROVED_FOR_ALL: &str = "isApprovedForAll(address,address)";
    pub const RECORD_EXISTS: &str = "recordExists(bytes32)";
    pub const RESOLVER: &str = "resolver(bytes32)";
    pub const SET_RESOLVER: &str = "setResolver(bytes32,address)";
}

/// Handle to the deployed registry contract.
#[derive(Clone)]
struct RegistryContract {
    address: Address,
    transport: Arc<dyn ContractTransport>,
}

impl RegistryContract {
    async fn call(&self, signature: &str, args: Vec<Token>) -> Result<Token> {
        let call = ContractCall::new(self.address, signature, args);
        debug!(method = call.method(), registry = %self.address, "registry read");
        self.transport
            .call(&call)
            .await
            .map_err(|err| classify(call.method(), err))
    }

    async fn send(&self, signature: &str, args: Vec<Token>, tx: &TxConfig) -> Result<ReceiptInfo> {
        let call = ContractCall::new(self.address, signature, args);
        debug!(method = call.method(), registry = %self.address, "registry write");
        self.transport
            .send(&call, tx)
            .await
            .map_err(|err| classify(call.method(), err))
    }
}

pub(crate) fn classify(method: &str, err: TransportError) -> RegistryError {
    warn!(method, error = %err, "contract call failed");
    RegistryError::reverted(method, err)
}

pub(crate) fn unexpected_output(method: &str, expected: &str, token: &Token) -> RegistryError {
    classify(
        method,
        TransportError::Decode {
            method: method.to_string(),
            reason: format!("expected {expected}, got {}", token.kind()),
        },
    )
}

/// Client for the name registry contract.
///
/// Cheap to clone; holds no mutable state, so clones may issue operations
/// concurrently.
#[derive(Clone)]
pub struct RegistryClient {
    registry: RegistryContract,
}

impl fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryClient")
            .field("registry", &self.registry.address)
            .finish()
    }
}

impl RegistryClient {
    /// Bind a client to the registry deployed at `registry_address`.
    pub fn new(registry_address: Address, transport: Arc<dyn ContractTransport>) -> Self {
        Self {
            registry: RegistryContract {
                address: registry_address,
                transport,
            },
        }
    }

    /// Bind a client to the registry named by `config`.
    pub fn from_config(config: &RegistryConfig, transport: Arc<dyn ContractTransport>) -> Self {
        Self::new(config.registry_address, transport)
    }

    pub fn registry_address(&self) -> Address {
        self.registry.address
    }

    /// Owner of `name`, or the zero address if unowned.
    pub async fn get_owner(&self, name: &str) -> Result<Address> {
        let node = namehash(name)?;
        let token = self
            .registry
            .call(signatures::OWNER, vec![node.into()])
            .await?;
        match token {
            Token::Address(owner) => Ok(owner),
            other => Err(unexpected_output("owner", "address", &other)),
        }
    }

    /// Transfer ownership of `name`.
    pub async fn set_owner(
        &self,
        name: &str,
        address: impl IntoAddress,
        tx: &TxConfig,
    ) -> Result<ReceiptInfo> {
        let node = namehash(name)?;
        let owner = address.into_address()?;
        self.registry
            .send(signatures::SET_OWNER, vec![node.into(), owner.into()], tx)
            .await
    }

    /// Caching time-to-live of the records under `name`.
    pub async fn get_ttl(&self, name: &str) -> Result<Ttl> {
        let node = namehash(name)?;
        let token = self.registry.call(signatures::TTL, vec![node.into()]).await?;
        match token {
            Token::Uint(ttl) => Ok(ttl),
            other => Err(unexpected_output("ttl", "uint64", &other)),
        }
    }

    pub async fn set_ttl(&self, name: &str, ttl: Ttl, tx: &TxConfig) -> Result<ReceiptInfo> {
        let node = namehash(name)?;
        self.registry
            .send(signatures::SET_TTL, vec![node.into(), ttl.into()], tx)
            .await
    }

    /// Create or reassign the subnode `label.name`.
    ///
    /// `label` may be a plain label or an already-computed `0x`-prefixed
    /// 32-byte label hash.
    pub async fn set_subnode_owner(
        &self,
        name: &str,
        label: &str,
        address: impl IntoAddress,
        tx: &TxConfig,
    ) -> Result<ReceiptInfo> {
        let node = namehash(name)?;
        let label = resolve_label(label);
        let owner = address.into_address()?;
        self.registry
            .send(
                signatures::SET_SUBNODE_OWNER,
                vec![node.into(), label.into(), owner.into()],
                tx,
            )
            .await
    }

    /// Set owner, resolver and TTL of `label.name` in one transaction.
    pub async fn set_subnode_record(
        &self,
        name: &str,
        label: &str,
        owner: impl IntoAddress,
        resolver: impl IntoAddress,
        ttl: Ttl,
        tx: &TxConfig,
    ) -> Result<ReceiptInfo> {
        let node = namehash(name)?;
        let label = resolve_label(label);
        let owner = owner.into_address()?;
        let resolver = resolver.into_address()?;
        self.registry
            .send(
                signatures::SET_SUBNODE_RECORD,
                vec![
                    node.into(),
                    label.into(),
                    owner.into(),
                    resolver.into(),
                    ttl.into(),
                ],
                tx,
            )
            .await
    }

    /// Grant or revoke `operator` control over all of the sender's records.
    pub async fn set_approval_for_all(
        &self,
        operator: impl IntoAddress,
        approved: bool,
        tx: &TxConfig,
    ) -> Result<ReceiptInfo> {
        let operator = operator.into_address()?;
        self.registry
            .send(
                signatures::SET_APPROVAL_FOR_ALL,
                vec![operator.into(), approved.into()],
                tx,
            )
            .await
    }

    pub async fn is_approved_for_all(
        &self,
        owner: impl IntoAddress,
        operator: impl IntoAddress,
    ) -> Result<bool> {
        let owner = owner.into_address()?;
        let operator = operator.into_address()?;
        let token = self
            .registry
            .call(
                signatures::IS_APPROVED_FOR_ALL,
                vec![owner.into(), operator.into()],
            )
            .await?;
        match token {
            Token::Bool(approved) => Ok(approved),
            other => Err(unexpected_output("isApprovedForAll", "bool", &other)),
        }
    }

    pub async fn record_exists(&self, name: &str) -> Result<bool> {
        let node = namehash(name)?;
        let token = self
            .registry
            .call(signatures::RECORD_EXISTS, vec![node.into()])
            .await?;
        match token {
            Token::Bool(exists) => Ok(exists),
            other => Err(unexpected_output("recordExists", "bool", &other)),
        }
    }

    /// Resolver handle for `name`.
    ///
    /// A zero resolver address yields an unbound handle rather than an
    /// error.
    pub async fn get_resolver(&self, name: &str) -> Result<ResolverHandle> {
        let node = namehash(name)?;
        let token = self
            .registry
            .call(signatures::RESOLVER, vec![node.into()])
            .await?;
        let address = match token {
            Token::Address(address) => address,
            other => return Err(unexpected_output("resolver", "address", &other)),
        };

        let transport = self.registry.transport.clone();
        if address.is_zero() {
            debug!(node = %node, "no resolver set");
            Ok(ResolverHandle::unbound(transport))
        } else {
            Ok(ResolverHandle::bound(address, transport))
        }
    }

    pub async fn set_resolver(
        &self,
        name: &str,
        address: impl IntoAddress,
        tx: &TxConfig,
    ) -> Result<ReceiptInfo> {
        let node = namehash(name)?;
        let resolver = address.into_address()?;
        self.registry
            .send(signatures::SET_RESOLVER, vec![node.into(), resolver.into()], tx)
            .await
    }
}
