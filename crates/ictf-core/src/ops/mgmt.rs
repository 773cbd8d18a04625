//! Management canister operations with context and logging.
//!
//! Every failure leaving this module is an [`Error::Remote`] naming the
//! operation and the canister it targeted.

use crate::{
    Error,
    infra::{CanisterClient, ClientError, InstallMode},
    log,
    log::Topic,
};
use candid::Principal;
use derive_more::Display;

///
/// RemoteOp
/// Remote operation names used in error context and logs.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum RemoteOp {
    #[display("create_canister")]
    CreateCanister,
    #[display("install_code")]
    InstallCode,
    #[display("uninstall_code")]
    UninstallCode,
    #[display("update_settings")]
    UpdateSettings,
    #[display("stop_canister")]
    StopCanister,
    #[display("delete_canister")]
    DeleteCanister,
    #[display("read_module_hash")]
    ModuleHash,
    #[display("read_controllers")]
    Controllers,
    #[display("call")]
    Call,
}

///
/// MgmtOps
///

#[derive(Clone, Copy)]
pub struct MgmtOps<'a> {
    client: &'a dyn CanisterClient,
}

impl<'a> MgmtOps<'a> {
    #[must_use]
    pub const fn new(client: &'a dyn CanisterClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn sender(&self) -> Principal {
        self.client.sender()
    }

    pub async fn create_canister(&self) -> Result<Principal, Error> {
        let pid = self
            .client
            .create_canister()
            .await
            .map_err(|err| Error::remote(RemoteOp::CreateCanister, "<unallocated>", err))?;

        log!(Topic::Lifecycle, Ok, "⚡ create_canister: {pid}");

        Ok(pid)
    }

    pub async fn install_code(
        &self,
        pid: Principal,
        mode: InstallMode,
        wasm_module: &[u8],
        arg: &[u8],
    ) -> Result<(), Error> {
        self.client
            .install_code(pid, mode, wasm_module, arg)
            .await
            .map_err(|err| ctx(RemoteOp::InstallCode, pid, err))?;

        log!(
            Topic::Lifecycle,
            Ok,
            "⚡ install_code: {pid} ({mode:?}, {} byte arg)",
            arg.len()
        );

        Ok(())
    }

    pub async fn uninstall_code(&self, pid: Principal) -> Result<(), Error> {
        self.client
            .uninstall_code(pid)
            .await
            .map_err(|err| ctx(RemoteOp::UninstallCode, pid, err))?;

        log!(Topic::Lifecycle, Ok, "🗑️ uninstall_code: {pid}");

        Ok(())
    }

    pub async fn update_controllers(
        &self,
        pid: Principal,
        controllers: &[Principal],
    ) -> Result<(), Error> {
        self.client
            .update_controllers(pid, controllers)
            .await
            .map_err(|err| ctx(RemoteOp::UpdateSettings, pid, err))?;

        log!(
            Topic::Lifecycle,
            Ok,
            "update_settings: {pid} controllers={controllers:?}"
        );

        Ok(())
    }

    pub async fn stop_canister(&self, pid: Principal) -> Result<(), Error> {
        self.client
            .stop_canister(pid)
            .await
            .map_err(|err| ctx(RemoteOp::StopCanister, pid, err))?;

        log!(Topic::Lifecycle, Ok, "stop_canister: {pid}");

        Ok(())
    }

    pub async fn delete_canister(&self, pid: Principal) -> Result<(), Error> {
        self.client
            .delete_canister(pid)
            .await
            .map_err(|err| ctx(RemoteOp::DeleteCanister, pid, err))?;

        log!(Topic::Lifecycle, Ok, "🗑️ delete_canister: {pid}");

        Ok(())
    }

    /// Raw module hash; empty when no code is installed.
    pub async fn module_hash(&self, pid: Principal) -> Result<Vec<u8>, Error> {
        let hash = self
            .client
            .module_hash(pid)
            .await
            .map_err(|err| ctx(RemoteOp::ModuleHash, pid, err))?;

        log!(
            Topic::Mgmt,
            Debug,
            "module_hash: {pid} -> {}",
            hex::encode(&hash)
        );

        Ok(hash)
    }

    pub async fn controllers(&self, pid: Principal) -> Result<Vec<Principal>, Error> {
        let controllers = self
            .client
            .controllers(pid)
            .await
            .map_err(|err| ctx(RemoteOp::Controllers, pid, err))?;

        log!(Topic::Mgmt, Debug, "controllers: {pid} -> {controllers:?}");

        Ok(controllers)
    }

    pub async fn call(&self, pid: Principal, method: &str, arg: &[u8]) -> Result<Vec<u8>, Error> {
        let reply = self
            .client
            .call(pid, method, arg)
            .await
            .map_err(|err| ctx(RemoteOp::Call, pid, err))?;

        log!(
            Topic::Mgmt,
            Debug,
            "call: {pid}.{method} -> {} bytes",
            reply.len()
        );

        Ok(reply)
    }
}

fn ctx(op: RemoteOp, pid: Principal, err: ClientError) -> Error {
    log!(Topic::Mgmt, Warn, "{op} failed for {pid}: {err}");

    Error::remote(op, pid, err)
}
