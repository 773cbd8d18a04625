use crate::{
    infra::ClientError,
    spec::mgmt::{CanisterInstallMode, UpgradeFlags},
};
use async_trait::async_trait;
use candid::Principal;

///
/// InstallMode
/// How a module is put on a canister.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InstallMode {
    Install,
    Upgrade { skip_pre_upgrade: bool },
}

impl From<InstallMode> for CanisterInstallMode {
    fn from(mode: InstallMode) -> Self {
        match mode {
            InstallMode::Install => Self::Install,
            InstallMode::Upgrade { skip_pre_upgrade } => Self::Upgrade(Some(UpgradeFlags {
                skip_pre_upgrade: Some(skip_pre_upgrade),
            })),
        }
    }
}

///
/// CanisterClient
///
/// Remote operations the reconciler needs from the IC. Every method is a
/// single remote round trip (metered creation excepted) and is retry-safe
/// where the platform makes it so: `uninstall_code` on an empty canister and
/// `update_controllers` with the current set are both no-ops.
///

#[async_trait]
pub trait CanisterClient: Send + Sync {
    /// Principal every call is signed with.
    fn sender(&self) -> Principal;

    async fn create_canister(&self) -> Result<Principal, ClientError>;

    async fn install_code(
        &self,
        canister_id: Principal,
        mode: InstallMode,
        wasm_module: &[u8],
        arg: &[u8],
    ) -> Result<(), ClientError>;

    async fn uninstall_code(&self, canister_id: Principal) -> Result<(), ClientError>;

    async fn update_controllers(
        &self,
        canister_id: Principal,
        controllers: &[Principal],
    ) -> Result<(), ClientError>;

    async fn stop_canister(&self, canister_id: Principal) -> Result<(), ClientError>;

    async fn delete_canister(&self, canister_id: Principal) -> Result<(), ClientError>;

    /// SHA-256 of the installed module; empty when no code is installed.
    async fn module_hash(&self, canister_id: Principal) -> Result<Vec<u8>, ClientError>;

    async fn controllers(&self, canister_id: Principal) -> Result<Vec<Principal>, ClientError>;

    /// Raw update call returning the reply bytes.
    async fn call(
        &self,
        canister_id: Principal,
        method: &str,
        arg: &[u8],
    ) -> Result<Vec<u8>, ClientError>;
}

///
/// TESTS
///
