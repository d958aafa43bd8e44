//! Registry client configuration
//!
//! Values are layered: built-in defaults, then an optional file (format
//! picked by extension), then `ENS_*` environment variables.

use crate::errors::*;
use config::{Config, ConfigError, Environment, File};
use ens_types::{Address, TxConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable prefix, e.g. `ENS_REGISTRY_ADDRESS`.
pub const ENV_PREFIX: &str = "ENS";

/// Registry deployment on mainnet
/// (`0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e`).
pub const MAINNET_REGISTRY: Address = Address([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x2e, 0x07, 0x4e, 0xc6, 0x9a, 0x0d, 0xfb, 0x29, 0x97,
    0xba, 0x6c, 0x7d, 0x2e, 0x1e,
]);

fn default_registry_address() -> Address {
    MAINNET_REGISTRY
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Address of the registry contract.
    #[serde(default = "default_registry_address")]
    pub registry_address: Address,
    /// Sender used for writes when the caller does not pick one.
    #[serde(default)]
    pub default_sender: Option<Address>,
    /// Gas limit applied to writes when the caller does not pick one.
    #[serde(default)]
    pub gas_limit: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_address: MAINNET_REGISTRY,
            default_sender: None,
            gas_limit: None,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from `path` (if given) and the environment.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        let config: RegistryConfig = builder.build()?.try_deserialize()?;
        info!(
            registry = %config.registry_address,
            default_sender = ?config.default_sender,
            "loaded registry configuration"
        );
        Ok(config)
    }

    /// Transaction options derived from the configured defaults.
    pub fn tx_config(&self) -> TxConfig {
        TxConfig {
            from: self.default_sender,
            gas: self.gas_limit,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::Write;

    // `load` reads the process environment; tests that touch it run one at a time.
    static ENV_LOCK: Mutex<()> = parking_lot::const_mutex(());

    struct EnvVarGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl EnvVarGuard {
        fn new(key: &'static str, value: &str) -> Self {
            let previous = std::env::var(key).ok();
            std::env::set_var(key, value);
            Self { key, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            if let Some(prev) = &self.previous {
                std::env::set_var(self.key, prev);
            } else {
                std::env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn mainnet_registry_checksum() {
        assert_eq!(
            MAINNET_REGISTRY.to_string(),
            "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e"
        );
        assert_eq!(RegistryConfig::default().registry_address, MAINNET_REGISTRY);
    }

    #[test]
    fn loads_toml_file() {
        let _env = ENV_LOCK.lock();
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "registry_address = \"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed\"\ngas_limit = 250000"
        )
        .unwrap();

        let config = RegistryConfig::load(Some(file.path())).unwrap();
        assert_eq!(
            config.registry_address,
            Address::normalize("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap()
        );
        assert_eq!(config.gas_limit, Some(250_000));
        assert_eq!(config.tx_config().gas, Some(250_000));
    }

    #[test]
    fn bad_address_in_file_is_rejected() {
        let _env = ENV_LOCK.lock();
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "registry_address = \"0x1234\"").unwrap();

        let err = RegistryConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let _env = ENV_LOCK.lock();
        let err = RegistryConfig::load(Some(Path::new("/nonexistent/ens.toml"))).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Config(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn environment_overrides_file() {
        let _env = ENV_LOCK.lock();
        let sender = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
        let registry = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let _registry = EnvVarGuard::new("ENS_REGISTRY_ADDRESS", &registry.to_lowercase());
        let _sender = EnvVarGuard::new("ENS_DEFAULT_SENDER", sender);
        let _gas = EnvVarGuard::new("ENS_GAS_LIMIT", "77");

        let config = RegistryConfig::load(None).unwrap();
        assert_eq!(config.registry_address.to_string(), registry);
        assert_eq!(config.default_sender.map(|a| a.to_string()).as_deref(), Some(sender));
        assert_eq!(config.gas_limit, Some(77));

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "gas_limit = 250000").unwrap();
        let config = RegistryConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.gas_limit, Some(77));
        assert_eq!(config.tx_config().gas, Some(77));
    }
}
