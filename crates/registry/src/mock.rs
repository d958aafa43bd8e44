//! In-process transports for tests and local tooling.

use crate::registry::signatures;
use crate::resolver::SUPPORTS_INTERFACE;
use crate::transport::{ContractCall, ContractTransport, Token, TransportError};
use async_trait::async_trait;
use ens_crypto::{keccak256, subnode};
use ens_types::{Address, LabelHash, Node, ReceiptInfo, TxConfig, TxHash};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Record {
    owner: Address,
    resolver: Address,
    ttl: u64,
}

/// Registry contract emulated in memory.
///
/// Follows the on-chain rules: only a node's owner, or an operator the
/// owner approved, may modify it; subnodes are keyed by
/// `keccak256(node || label)`; a record exists while its owner is non-zero.
/// Writes without a `from` are attributed to the root owner. Every call and
/// send is appended to a log before it is executed.
#[derive(Debug)]
pub struct InMemoryRegistry {
    address: Address,
    default_sender: Address,
    records: RwLock<HashMap<Node, Record>>,
    operators: RwLock<HashSet<(Address, Address)>>,
    resolvers: RwLock<HashMap<Address, HashSet<[u8; 4]>>>,
    overrides: RwLock<HashMap<String, Token>>,
    calls: RwLock<Vec<ContractCall>>,
    block_number: AtomicU64,
}

impl InMemoryRegistry {
    /// Registry deployed at `address` with the root node owned by
    /// `root_owner`.
    pub fn new(address: Address, root_owner: Address) -> Self {
        let mut records = HashMap::new();
        records.insert(
            Node::ZERO,
            Record {
                owner: root_owner,
                ..Default::default()
            },
        );
        Self {
            address,
            default_sender: root_owner,
            records: RwLock::new(records),
            operators: RwLock::new(HashSet::new()),
            resolvers: RwLock::new(HashMap::new()),
            overrides: RwLock::new(HashMap::new()),
            calls: RwLock::new(Vec::new()),
            block_number: AtomicU64::new(0),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Every call and send seen so far, in order.
    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls.read().clone()
    }

    /// Forget the recorded calls; registry state is kept.
    pub fn clear_calls(&self) {
        self.calls.write().clear();
    }

    /// Register a resolver contract answering `supportsInterface` for the
    /// given interface ids.
    pub fn deploy_resolver(&self, address: Address, interfaces: Vec<[u8; 4]>) {
        self.resolvers
            .write()
            .insert(address, interfaces.into_iter().collect());
    }

    /// Answer every registry read of `signature` with `output`.
    pub fn override_output(&self, signature: &str, output: Token) {
        self.overrides.write().insert(signature.to_string(), output);
    }

    /// Owner currently recorded for `node`.
    pub fn owner_of(&self, node: &Node) -> Address {
        self.record(node).owner
    }

    fn record(&self, node: &Node) -> Record {
        self.records.read().get(node).copied().unwrap_or_default()
    }

    fn authorise(&self, node: &Node, sender: Address) -> Result<(), TransportError> {
        let owner = self.record(node).owner;
        if owner == sender || self.operators.read().contains(&(owner, sender)) {
            Ok(())
        } else {
            Err(TransportError::Reverted(format!(
                "{sender} is not authorised for node {node}"
            )))
        }
    }

    fn read_registry(&self, call: &ContractCall) -> Result<Token, TransportError> {
        if let Some(output) = self.overrides.read().get(&call.signature) {
            return Ok(output.clone());
        }

        match call.signature.as_str() {
            signatures::OWNER => Ok(Token::Address(self.record(&node_arg(call, 0)?).owner)),
            signatures::RESOLVER => Ok(Token::Address(self.record(&node_arg(call, 0)?).resolver)),
            signatures::TTL => Ok(Token::Uint(self.record(&node_arg(call, 0)?).ttl)),
            signatures::RECORD_EXISTS => Ok(Token::Bool(
                !self.record(&node_arg(call, 0)?).owner.is_zero(),
            )),
            signatures::IS_APPROVED_FOR_ALL => {
                let owner = address_arg(call, 0)?;
                let operator = address_arg(call, 1)?;
                Ok(Token::Bool(self.operators.read().contains(&(owner, operator))))
            }
            other => Err(TransportError::Reverted(format!(
                "registry has no view method {other}"
            ))),
        }
    }

    fn write_registry(&self, call: &ContractCall, sender: Address) -> Result<(), TransportError> {
        match call.signature.as_str() {
            signatures::SET_OWNER => {
                let node = node_arg(call, 0)?;
                let owner = address_arg(call, 1)?;
                self.authorise(&node, sender)?;
                self.records.write().entry(node).or_default().owner = owner;
            }
            signatures::SET_RESOLVER => {
                let node = node_arg(call, 0)?;
                let resolver = address_arg(call, 1)?;
                self.authorise(&node, sender)?;
                self.records.write().entry(node).or_default().resolver = resolver;
            }
            signatures::SET_TTL => {
                let node = node_arg(call, 0)?;
                let ttl = uint_arg(call, 1)?;
                self.authorise(&node, sender)?;
                self.records.write().entry(node).or_default().ttl = ttl;
            }
            signatures::SET_SUBNODE_OWNER => {
                let node = node_arg(call, 0)?;
                let label = LabelHash(bytes32_arg(call, 1)?);
                let owner = address_arg(call, 2)?;
                self.authorise(&node, sender)?;
                self.records
                    .write()
                    .entry(subnode(&node, &label))
                    .or_default()
                    .owner = owner;
            }
            signatures::SET_SUBNODE_RECORD => {
                let node = node_arg(call, 0)?;
                let label = LabelHash(bytes32_arg(call, 1)?);
                let owner = address_arg(call, 2)?;
                let resolver = address_arg(call, 3)?;
                let ttl = uint_arg(call, 4)?;
                self.authorise(&node, sender)?;
                self.records.write().insert(
                    subnode(&node, &label),
                    Record {
                        owner,
                        resolver,
                        ttl,
                    },
                );
            }
            signatures::SET_APPROVAL_FOR_ALL => {
                let operator = address_arg(call, 0)?;
                let approved = bool_arg(call, 1)?;
                let mut operators = self.operators.write();
                if approved {
                    operators.insert((sender, operator));
                } else {
                    operators.remove(&(sender, operator));
                }
            }
            other => {
                return Err(TransportError::Reverted(format!(
                    "registry has no method {other}"
                )))
            }
        }
        Ok(())
    }

    fn receipt(&self, call: &ContractCall, sender: Address) -> ReceiptInfo {
        let block = self.block_number.fetch_add(1, Ordering::SeqCst) + 1;
        let mut preimage = Vec::with_capacity(32);
        preimage.extend_from_slice(&block.to_be_bytes());
        preimage.extend_from_slice(sender.as_bytes());
        preimage.extend_from_slice(&call.selector());

        ReceiptInfo {
            block_number: Some(block),
            status: Some(true),
            ..ReceiptInfo::new(TxHash(keccak256(&preimage)))
        }
    }
}

#[async_trait]
impl ContractTransport for InMemoryRegistry {
    async fn call(&self, call: &ContractCall) -> Result<Token, TransportError> {
        self.calls.write().push(call.clone());

        if call.to == self.address {
            return self.read_registry(call);
        }

        let resolvers = self.resolvers.read();
        let interfaces = resolvers.get(&call.to).ok_or_else(|| {
            TransportError::Unavailable(format!("no contract deployed at {}", call.to))
        })?;
        if call.signature != SUPPORTS_INTERFACE {
            return Err(TransportError::Reverted(format!(
                "resolver has no method {}",
                call.signature
            )));
        }
        match call.args.first() {
            Some(Token::Bytes4(id)) => Ok(Token::Bool(interfaces.contains(id))),
            _ => Err(invalid_argument(call, 0, "bytes4")),
        }
    }

    async fn send(
        &self,
        call: &ContractCall,
        tx: &TxConfig,
    ) -> Result<ReceiptInfo, TransportError> {
        self.calls.write().push(call.clone());

        if call.to != self.address {
            return Err(TransportError::Reverted(format!(
                "writes to {} are not supported",
                call.to
            )));
        }

        let sender = tx.from.unwrap_or(self.default_sender);
        self.write_registry(call, sender)?;
        Ok(self.receipt(call, sender))
    }
}

fn invalid_argument(call: &ContractCall, index: usize, expected: &str) -> TransportError {
    TransportError::Reverted(format!(
        "{}: argument {index} is not {expected}",
        call.signature
    ))
}

fn bytes32_arg(call: &ContractCall, index: usize) -> Result<[u8; 32], TransportError> {
    match call.args.get(index) {
        Some(Token::Bytes32(value)) => Ok(*value),
        _ => Err(invalid_argument(call, index, "bytes32")),
    }
}

fn node_arg(call: &ContractCall, index: usize) -> Result<Node, TransportError> {
    bytes32_arg(call, index).map(Node)
}

fn address_arg(call: &ContractCall, index: usize) -> Result<Address, TransportError> {
    match call.args.get(index) {
        Some(Token::Address(value)) => Ok(*value),
        _ => Err(invalid_argument(call, index, "address")),
    }
}

fn uint_arg(call: &ContractCall, index: usize) -> Result<u64, TransportError> {
    match call.args.get(index) {
        Some(Token::Uint(value)) => Ok(*value),
        _ => Err(invalid_argument(call, index, "uint")),
    }
}

fn bool_arg(call: &ContractCall, index: usize) -> Result<bool, TransportError> {
    match call.args.get(index) {
        Some(Token::Bool(value)) => Ok(*value),
        _ => Err(invalid_argument(call, index, "bool")),
    }
}

/// Transport whose every call and send fails.
#[derive(Debug)]
pub struct FailingTransport {
    reason: String,
    attempts: AtomicUsize,
}

impl FailingTransport {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of calls and sends attempted against this transport.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Default for FailingTransport {
    fn default() -> Self {
        Self::new("connection refused")
    }
}

#[async_trait]
impl ContractTransport for FailingTransport {
    async fn call(&self, _call: &ContractCall) -> Result<Token, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(TransportError::Unavailable(self.reason.clone()))
    }

    async fn send(
        &self,
        _call: &ContractCall,
        _tx: &TxConfig,
    ) -> Result<ReceiptInfo, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(TransportError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ens_crypto::{labelhash, namehash};

    const REGISTRY: Address = Address([0xee; 20]);
    const ROOT: Address = Address([0x01; 20]);
    const ALICE: Address = Address([0xa1; 20]);

    fn set_subnode_owner(parent: Node, label: &str, owner: Address) -> ContractCall {
        ContractCall::new(
            REGISTRY,
            signatures::SET_SUBNODE_OWNER,
            vec![parent.into(), labelhash(label).into(), owner.into()],
        )
    }

    #[tokio::test]
    async fn root_owner_creates_top_level_node() {
        let registry = InMemoryRegistry::new(REGISTRY, ROOT);
        registry
            .send(&set_subnode_owner(Node::ZERO, "eth", ALICE), &TxConfig::default())
            .await
            .unwrap();
        assert_eq!(registry.owner_of(&namehash("eth").unwrap()), ALICE);
    }

    #[tokio::test]
    async fn unauthorised_write_reverts() {
        let registry = InMemoryRegistry::new(REGISTRY, ROOT);
        let err = registry
            .send(
                &set_subnode_owner(Node::ZERO, "eth", ALICE),
                &TxConfig::from_sender(ALICE),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Reverted(_)));
        assert!(registry.owner_of(&namehash("eth").unwrap()).is_zero());
    }

    #[tokio::test]
    async fn receipts_advance_block_number() {
        let registry = InMemoryRegistry::new(REGISTRY, ROOT);
        let tx = TxConfig::default();
        let first = registry
            .send(&set_subnode_owner(Node::ZERO, "eth", ROOT), &tx)
            .await
            .unwrap();
        let second = registry
            .send(&set_subnode_owner(Node::ZERO, "xyz", ROOT), &tx)
            .await
            .unwrap();
        assert_eq!(first.block_number, Some(1));
        assert_eq!(second.block_number, Some(2));
        assert_ne!(first.transaction_hash, second.transaction_hash);
    }

    #[tokio::test]
    async fn unknown_contract_is_unavailable() {
        let registry = InMemoryRegistry::new(REGISTRY, ROOT);
        let call = ContractCall::new(ALICE, SUPPORTS_INTERFACE, vec![Token::Bytes4([0; 4])]);
        let err = registry.call(&call).await.unwrap_err();
        assert!(matches!(err, TransportError::Unavailable(_)));
        assert_eq!(registry.calls(), vec![call]);
    }

    #[tokio::test]
    async fn clearing_call_log_keeps_records() {
        let registry = InMemoryRegistry::new(REGISTRY, ROOT);
        registry
            .send(&set_subnode_owner(Node::ZERO, "eth", ALICE), &TxConfig::default())
            .await
            .unwrap();
        assert_eq!(registry.calls().len(), 1);

        registry.clear_calls();
        assert!(registry.calls().is_empty());
        assert_eq!(registry.owner_of(&namehash("eth").unwrap()), ALICE);
    }

    #[tokio::test]
    async fn failing_transport_counts_attempts() {
        let transport = FailingTransport::default();
        let call = ContractCall::new(REGISTRY, signatures::OWNER, vec![Node::ZERO.into()]);
        assert!(transport.call(&call).await.is_err());
        assert!(transport.send(&call, &TxConfig::default()).await.is_err());
        assert_eq!(transport.attempts(), 2);
    }
}
