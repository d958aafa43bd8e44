//! Error types for the registry client

use crate::transport::TransportError;
use ens_crypto::NameHashError;
use ens_types::AddressError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid name: {0}")]
    HashingInput(#[from] NameHashError),

    #[error("Invalid address: {0}")]
    AddressFormat(#[from] AddressError),

    #[error("Registry call reverted: {method}")]
    RegistryCallReverted {
        method: String,
        #[source]
        source: TransportError,
    },

    #[error("Resolver handle is not bound to an address")]
    ResolverNotBound,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl RegistryError {
    pub(crate) fn reverted(method: impl Into<String>, source: TransportError) -> Self {
        RegistryError::RegistryCallReverted {
            method: method.into(),
            source,
        }
    }

    /// True for the umbrella transport failure kind.
    pub fn is_call_reverted(&self) -> bool {
        matches!(self, RegistryError::RegistryCallReverted { .. })
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
