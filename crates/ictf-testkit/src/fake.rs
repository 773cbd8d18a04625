//! In-memory stand-in for the management canister.
//!
//! `FakeIc` enforces the rules the reconciler relies on (controller checks,
//! install vs. upgrade on empty or non-empty canisters, stop before delete)
//! and records every call so tests can assert on ordering. Installed modules
//! behave like the `hello_world` fixture: the install argument, decoded as
//! `opt text`, becomes the greeting returned by `hello`.

use crate::Fake;
use async_trait::async_trait;
use candid::{Principal, decode_args, decode_one, encode_one};
use ictf_core::{
    infra::{CanisterClient, ClientError, InstallMode},
    ops::RemoteOp,
};
use sha2::{Digest, Sha256};
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

const DEFAULT_GREETER: &str = "Hello";

///
/// FakeCanister
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FakeCanister {
    pub controllers: Vec<Principal>,
    pub module: Option<Vec<u8>>,
    pub arg: Vec<u8>,
    pub stopped: bool,
}

impl FakeCanister {
    /// Module hash as the IC reports it: empty without code.
    #[must_use]
    pub fn module_hash(&self) -> Vec<u8> {
        self.module
            .as_ref()
            .map(|m| Sha256::digest(m).to_vec())
            .unwrap_or_default()
    }
}

///
/// FakeCall
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FakeCall {
    pub op: RemoteOp,
    pub canister: Option<Principal>,
    pub mode: Option<InstallMode>,
}

#[derive(Default)]
struct FakeState {
    next_id: u32,
    canisters: BTreeMap<Principal, FakeCanister>,
    calls: Vec<FakeCall>,
    failures: Vec<RemoteOp>,
}

///
/// FakeIc
///

pub struct FakeIc {
    sender: Principal,
    state: Mutex<FakeState>,
}

impl Default for FakeIc {
    fn default() -> Self {
        Self::new(Fake::principal(1))
    }
}

impl FakeIc {
    #[must_use]
    pub fn new(sender: Principal) -> Self {
        Self {
            sender,
            state: Mutex::new(FakeState::default()),
        }
    }

    /// Make the next call of `op` fail with a rejection.
    pub fn fail_next(&self, op: RemoteOp) {
        self.lock().failures.push(op);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<FakeCall> {
        self.lock().calls.clone()
    }

    /// Operations called so far, in order.
    #[must_use]
    pub fn ops(&self) -> Vec<RemoteOp> {
        self.lock().calls.iter().map(|c| c.op).collect()
    }

    /// Modes of every `install_code` call, in order.
    #[must_use]
    pub fn install_modes(&self) -> Vec<InstallMode> {
        self.lock().calls.iter().filter_map(|c| c.mode).collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    #[must_use]
    pub fn canister(&self, id: Principal) -> Option<FakeCanister> {
        self.lock().canisters.get(&id).cloned()
    }

    #[must_use]
    pub fn canister_count(&self) -> usize {
        self.lock().canisters.len()
    }

    /// Call `hello` with candid `opt text` and decode the reply.
    pub async fn hello(&self, id: Principal, greeted: &str) -> Result<String, ClientError> {
        let arg = encode_one(Some(greeted.to_string()))?;
        let reply = self.call(id, "hello", &arg).await?;

        Ok(decode_one(&reply)?)
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log the call and apply any pending injected failure.
    fn enter(
        &self,
        op: RemoteOp,
        canister: Option<Principal>,
        mode: Option<InstallMode>,
    ) -> Result<MutexGuard<'_, FakeState>, ClientError> {
        let mut state = self.lock();
        state.calls.push(FakeCall { op, canister, mode });

        if let Some(pos) = state.failures.iter().position(|f| *f == op) {
            state.failures.remove(pos);
            return Err(ClientError::Rejected(format!("injected {op} failure")));
        }

        Ok(state)
    }

    /// Look up a canister the sender controls.
    fn controlled<'s>(
        &self,
        state: &'s mut FakeState,
        id: Principal,
    ) -> Result<&'s mut FakeCanister, ClientError> {
        let canister = state
            .canisters
            .get_mut(&id)
            .ok_or_else(|| ClientError::Rejected(format!("canister {id} not found")))?;

        if !canister.controllers.contains(&self.sender) {
            return Err(ClientError::Rejected(format!(
                "only the controllers of canister {id} can control it"
            )));
        }

        Ok(canister)
    }
}

#[async_trait]
impl CanisterClient for FakeIc {
    fn sender(&self) -> Principal {
        self.sender
    }

    async fn create_canister(&self) -> Result<Principal, ClientError> {
        let mut state = self.enter(RemoteOp::CreateCanister, None, None)?;
        state.next_id += 1;
        let id = Fake::canister_id(state.next_id);

        state.canisters.insert(
            id,
            FakeCanister {
                controllers: vec![self.sender],
                ..FakeCanister::default()
            },
        );

        Ok(id)
    }

    async fn install_code(
        &self,
        canister_id: Principal,
        mode: InstallMode,
        wasm_module: &[u8],
        arg: &[u8],
    ) -> Result<(), ClientError> {
        let mut state = self.enter(RemoteOp::InstallCode, Some(canister_id), Some(mode))?;
        let canister = self.controlled(&mut state, canister_id)?;

        match (mode, canister.module.is_some()) {
            (InstallMode::Install, true) => {
                return Err(ClientError::Rejected(format!(
                    "canister {canister_id} is not empty, install mode not allowed"
                )));
            }
            (InstallMode::Upgrade { .. }, false) => {
                return Err(ClientError::Rejected(format!(
                    "canister {canister_id} is empty, nothing to upgrade"
                )));
            }
            _ => {}
        }

        canister.module = Some(wasm_module.to_vec());
        canister.arg = arg.to_vec();

        Ok(())
    }

    async fn uninstall_code(&self, canister_id: Principal) -> Result<(), ClientError> {
        let mut state = self.enter(RemoteOp::UninstallCode, Some(canister_id), None)?;
        let canister = self.controlled(&mut state, canister_id)?;

        canister.module = None;
        canister.arg.clear();

        Ok(())
    }

    async fn update_controllers(
        &self,
        canister_id: Principal,
        controllers: &[Principal],
    ) -> Result<(), ClientError> {
        let mut state = self.enter(RemoteOp::UpdateSettings, Some(canister_id), None)?;
        let canister = self.controlled(&mut state, canister_id)?;

        canister.controllers = controllers.to_vec();

        Ok(())
    }

    async fn stop_canister(&self, canister_id: Principal) -> Result<(), ClientError> {
        let mut state = self.enter(RemoteOp::StopCanister, Some(canister_id), None)?;
        let canister = self.controlled(&mut state, canister_id)?;

        canister.stopped = true;

        Ok(())
    }

    async fn delete_canister(&self, canister_id: Principal) -> Result<(), ClientError> {
        let mut state = self.enter(RemoteOp::DeleteCanister, Some(canister_id), None)?;
        let canister = self.controlled(&mut state, canister_id)?;

        if !canister.stopped {
            return Err(ClientError::Rejected(format!(
                "canister {canister_id} must be stopped before it is deleted"
            )));
        }
        state.canisters.remove(&canister_id);

        Ok(())
    }

    async fn module_hash(&self, canister_id: Principal) -> Result<Vec<u8>, ClientError> {
        let state = self.enter(RemoteOp::ModuleHash, Some(canister_id), None)?;

        state
            .canisters
            .get(&canister_id)
            .map(FakeCanister::module_hash)
            .ok_or_else(|| ClientError::Rejected(format!("canister {canister_id} not found")))
    }

    async fn controllers(&self, canister_id: Principal) -> Result<Vec<Principal>, ClientError> {
        let state = self.enter(RemoteOp::Controllers, Some(canister_id), None)?;

        state
            .canisters
            .get(&canister_id)
            .map(|c| c.controllers.clone())
            .ok_or_else(|| ClientError::Rejected(format!("canister {canister_id} not found")))
    }

    async fn call(
        &self,
        canister_id: Principal,
        method: &str,
        arg: &[u8],
    ) -> Result<Vec<u8>, ClientError> {
        let state = self.enter(RemoteOp::Call, Some(canister_id), None)?;
        let canister = state
            .canisters
            .get(&canister_id)
            .ok_or_else(|| ClientError::Rejected(format!("canister {canister_id} not found")))?;

        if canister.module.is_none() {
            return Err(ClientError::Rejected(format!(
                "canister {canister_id} has no code"
            )));
        }
        if canister.stopped {
            return Err(ClientError::Rejected(format!(
                "canister {canister_id} is stopped"
            )));
        }
        if method != "hello" {
            return Err(ClientError::Rejected(format!(
                "canister {canister_id} has no method '{method}'"
            )));
        }

        let greeter = if canister.arg.is_empty() {
            DEFAULT_GREETER.to_string()
        } else {
            let (greeter,): (Option<String>,) = decode_args(&canister.arg)?;
            greeter.unwrap_or_else(|| DEFAULT_GREETER.to_string())
        };
        let (greeted,): (Option<String>,) = decode_args(arg)?;
        let greeted = greeted.unwrap_or_else(|| "World".to_string());

        Ok(encode_one(format!("{greeter}, {greeted}!"))?)
    }
}
