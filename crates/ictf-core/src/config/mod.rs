//!
//! Provider configuration.
//!
//! Configuration is resolved once, explicitly, from the user-supplied
//! [`ProviderConfig`] and a captured [`ProviderEnv`]. The result is an
//! immutable [`ClientConfig`] that is handed to every resource; nothing is
//! read from process-global state after resolution.
//!

use crate::{
    Error, ThisError,
    infra::identity::{IdentityError, load_identity_file},
    log,
    log::Topic,
};
use candid::Principal;
use derive_more::Display;
use ic_agent::{Identity, identity::AnonymousIdentity};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, sync::Arc};

/// Public boundary node used when no endpoint is configured.
pub const MAINNET_ENDPOINT: &str = "https://icp-api.io/";

/// Environment variable naming the PEM identity file.
pub const IDENTITY_ENV: &str = "IC_PEM_IDENTITY_PATH";

/// Errors related to configuration parsing and validation.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    /// TOML could not be parsed into the expected structure.
    #[error("toml error: {0}")]
    CannotParseToml(String),

    #[error("could not read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("invalid effective canister id '{0}'")]
    InvalidEffectiveCanisterId(String),
}

///
/// Validate
///

pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

///
/// ProviderConfig
/// User-facing provider block.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Overrides `IC_PEM_IDENTITY_PATH` when set.
    #[serde(default)]
    pub identity_pem: Option<PathBuf>,

    /// Routing hint for provisional canister creation on local networks.
    #[serde(default)]
    pub effective_canister_id: Option<String>,
}

impl ProviderConfig {
    /// Parse and validate a TOML provider block.
    pub fn from_toml(config_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(config_str).map_err(|e| ConfigError::CannotParseToml(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&config_str)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(MAINNET_ENDPOINT)
    }

    fn effective_canister_id(&self) -> Result<Principal, ConfigError> {
        match &self.effective_canister_id {
            Some(text) => Principal::from_text(text)
                .map_err(|_| ConfigError::InvalidEffectiveCanisterId(text.clone())),
            None => Ok(Principal::management_canister()),
        }
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "expected an http or https URL".to_string(),
            });
        }

        self.effective_canister_id()?;

        Ok(())
    }
}

///
/// ProviderEnv
/// Snapshot of the environment variables the provider reads.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProviderEnv {
    pub identity_pem_path: Option<PathBuf>,
}

impl ProviderEnv {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            identity_pem_path: std::env::var_os(IDENTITY_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

///
/// Network
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Network {
    #[display("mainnet")]
    Mainnet,
    #[display("custom")]
    Custom,
}

impl Network {
    #[must_use]
    pub fn from_endpoint(endpoint: &str) -> Self {
        if endpoint.trim_end_matches('/') == MAINNET_ENDPOINT.trim_end_matches('/') {
            Self::Mainnet
        } else {
            Self::Custom
        }
    }
}

///
/// ClientConfig
/// Fully resolved connection settings shared read-only by every resource.
///

#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub network: Network,
    pub identity: Arc<dyn Identity>,
    pub fetch_root_key: bool,
    pub provisional_effective_canister_id: Principal,
}

impl ClientConfig {
    /// Principal the configured identity signs with.
    pub fn sender(&self) -> Result<Principal, IdentityError> {
        self.identity.sender().map_err(IdentityError::Sender)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("network", &self.network)
            .field("sender", &self.identity.sender().ok())
            .field("fetch_root_key", &self.fetch_root_key)
            .field(
                "provisional_effective_canister_id",
                &self.provisional_effective_canister_id,
            )
            .finish()
    }
}

///
/// resolve
/// Turn provider settings into a client configuration.
///
/// The root key is only fetched off mainnet. Without a PEM path the
/// anonymous identity is used and a warning is logged.
///

pub fn resolve(config: &ProviderConfig, env: &ProviderEnv) -> Result<ClientConfig, Error> {
    config.validate()?;

    let endpoint = config.endpoint().to_string();
    let network = Network::from_endpoint(&endpoint);

    let identity: Arc<dyn Identity> = match config
        .identity_pem
        .as_ref()
        .or(env.identity_pem_path.as_ref())
    {
        Some(path) => load_identity_file(path)?,
        None => {
            log!(
                Topic::Config,
                Warn,
                "{IDENTITY_ENV} is not set, using the anonymous identity"
            );
            Arc::new(AnonymousIdentity)
        }
    };

    let resolved = ClientConfig {
        endpoint,
        network,
        identity,
        fetch_root_key: network != Network::Mainnet,
        provisional_effective_canister_id: config.effective_canister_id()?,
    };

    log!(
        Topic::Config,
        Info,
        "resolved provider config: endpoint={} network={}",
        resolved.endpoint,
        resolved.network
    );

    Ok(resolved)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorClass;

    #[test]
    fn defaults_to_mainnet_without_root_key() {
        let cfg = resolve(&ProviderConfig::default(), &ProviderEnv::default()).unwrap();

        assert_eq!(cfg.endpoint, MAINNET_ENDPOINT);
        assert_eq!(cfg.network, Network::Mainnet);
        assert!(!cfg.fetch_root_key);
        assert_eq!(cfg.sender().unwrap(), Principal::anonymous());
    }

    #[test]
    fn custom_endpoint_fetches_root_key() {
        let config = ProviderConfig {
            endpoint: Some("http://127.0.0.1:4943".to_string()),
            ..Default::default()
        };

        let cfg = resolve(&config, &ProviderEnv::default()).unwrap();
        assert_eq!(cfg.network, Network::Custom);
        assert!(cfg.fetch_root_key);
    }

    #[test]
    fn mainnet_detection_ignores_trailing_slash() {
        assert_eq!(
            Network::from_endpoint("https://icp-api.io"),
            Network::Mainnet
        );
        assert_eq!(Network::from_endpoint("https://ic0.app"), Network::Custom);
    }

    #[test]
    fn env_identity_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity.pem");
        std::fs::write(&path, ictf_testkit::pem::ED25519).unwrap();

        let env = ProviderEnv {
            identity_pem_path: Some(path),
        };
        let cfg = resolve(&ProviderConfig::default(), &env).unwrap();

        assert_ne!(cfg.sender().unwrap(), Principal::anonymous());
    }

    #[test]
    fn missing_identity_file_is_an_identity_error() {
        let env = ProviderEnv {
            identity_pem_path: Some(PathBuf::from("/nonexistent/identity.pem")),
        };

        let err = resolve(&ProviderConfig::default(), &env).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Identity);
    }

    #[test]
    fn toml_is_parsed_and_validated() {
        let cfg = ProviderConfig::from_toml(
            r#"
            endpoint = "http://localhost:8080"
            identity_pem = "/tmp/id.pem"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.endpoint(), "http://localhost:8080");
        assert_eq!(cfg.identity_pem, Some(PathBuf::from("/tmp/id.pem")));

        assert!(matches!(
            ProviderConfig::from_toml("endpoint = \"ftp://x\""),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            ProviderConfig::from_toml("unknown = 1"),
            Err(ConfigError::CannotParseToml(_))
        ));
    }

    #[test]
    fn effective_canister_id_defaults_to_management() {
        let cfg = resolve(&ProviderConfig::default(), &ProviderEnv::default()).unwrap();
        assert_eq!(
            cfg.provisional_effective_canister_id,
            Principal::management_canister()
        );

        let bad = ProviderConfig {
            effective_canister_id: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
