//! ENS Registry Client
//!
//! Maps human-readable names such as `alice.eth` onto registry nodes and
//! exposes the registry's ownership, resolver and TTL operations over an
//! abstract contract-call transport. The transport (signing, encoding,
//! submission) is supplied by the caller through [`ContractTransport`].

pub mod config;
pub mod errors;
pub mod mock;
pub mod registry;
pub mod resolver;
pub mod transport;

pub use crate::config::RegistryConfig;
pub use errors::*;
pub use registry::{signatures, RegistryClient};
pub use resolver::ResolverHandle;
pub use transport::{ContractCall, ContractTransport, Token, TransportError};

pub use ens_crypto::{labelhash, namehash, resolve_label, NameHashError};
pub use ens_types::{
    Address, AddressError, IntoAddress, LabelHash, Node, ReceiptInfo, Ttl, TxConfig,
};
