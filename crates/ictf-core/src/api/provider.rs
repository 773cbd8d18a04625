use crate::{
    Error,
    api::{
        function::{FunctionDefinition, definitions},
        resource::CanisterResource,
    },
    config::{self, ProviderConfig, ProviderEnv},
    infra::{CanisterClient, agent::AgentClient},
    log,
    log::Topic,
};
use candid::Principal;
use std::sync::Arc;

/// Provider type name used by the host.
pub const PROVIDER_TYPE: &str = "ic";

///
/// ProviderMetadata
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProviderMetadata {
    pub type_name: &'static str,
    pub version: &'static str,
    pub resources: Vec<String>,
    pub functions: Vec<FunctionDefinition>,
}

///
/// Provider
/// A configured provider; owns the client every resource shares.
///

#[derive(Clone)]
pub struct Provider {
    client: Arc<dyn CanisterClient>,
}

impl Provider {
    #[must_use]
    pub fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE,
            version: crate::VERSION,
            resources: vec![CanisterResource::type_name(PROVIDER_TYPE)],
            functions: definitions().to_vec(),
        }
    }

    /// Resolve configuration and connect to the configured endpoint.
    pub async fn configure(config: &ProviderConfig, env: &ProviderEnv) -> Result<Self, Error> {
        let resolved = config::resolve(config, env)?;
        let client = AgentClient::connect(&resolved).await?;

        log!(
            Topic::Config,
            Ok,
            "provider configured for {} ({})",
            resolved.endpoint,
            resolved.network
        );

        Ok(Self::with_client(Arc::new(client)))
    }

    /// Build a provider around an existing client.
    #[must_use]
    pub fn with_client(client: Arc<dyn CanisterClient>) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn principal(&self) -> Principal {
        self.client.sender()
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn CanisterClient> {
        self.client.clone()
    }

    #[must_use]
    pub fn canister_resource(&self) -> CanisterResource {
        CanisterResource::new(self.client.clone())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_names_the_canister_resource() {
        let meta = Provider::metadata();

        assert_eq!(meta.type_name, "ic");
        assert_eq!(meta.resources, ["ic_canister"]);
        assert_eq!(meta.functions.len(), 3);
    }
}
