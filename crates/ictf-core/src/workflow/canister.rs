//! Canister resource reconciler.
//!
//! PHASES (create):
//! 0. Local validation (argument, module file and checksum, controllers)
//! 1. Allocate a canister id
//! 2. Install the module, if any, in `install` mode
//! 3. Read back the module hash
//! 4. Set the controllers last, so code can be installed before a
//!    controller set that excludes the provider takes effect
//!
//! Update is not atomic: controllers first, then code. Every sub-step is
//! idempotent so re-applying after a partial failure converges.

use crate::{
    Error,
    domain::{
        ValidationError,
        arg::resolve_arg,
        policy::{controllers, install::plan_install},
    },
    dto::{Attr, CanisterModel, CanisterState, Diagnostics},
    infra::{CanisterClient, InstallMode},
    log,
    log::Topic,
    ops::{MgmtOps, RemoteOp, WasmModule, WasmOps},
    workflow::steps::ApplyReport,
};
use candid::Principal;
use std::path::Path;

///
/// CodePlan
/// Module and argument bytes, loaded and checked before any remote call.
///

struct CodePlan {
    module: WasmModule,
    arg: Vec<u8>,
}

///
/// CanisterWorkflow
///

pub struct CanisterWorkflow<'a> {
    mgmt: MgmtOps<'a>,
}

impl<'a> CanisterWorkflow<'a> {
    #[must_use]
    pub const fn new(client: &'a dyn CanisterClient) -> Self {
        Self {
            mgmt: MgmtOps::new(client),
        }
    }

    /// Principal the provider manages canisters with.
    #[must_use]
    pub fn manager(&self) -> Principal {
        self.mgmt.sender()
    }

    // ───────────────────────────── PLAN ─────────────────────────────

    /// Warn when a planned controller set would lock the provider out.
    /// A `None` plan (resource deletion) is never judged.
    #[must_use]
    pub fn modify_plan(&self, plan: Option<&CanisterModel>) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let Some(plan) = plan else {
            return diagnostics;
        };

        if let Some(risk) = controllers::check_lockout(&plan.controllers, self.manager()) {
            log!(Topic::Lifecycle, Warn, "{}", risk.message());
            diagnostics.warning("Client Warning", risk.message());
        }

        diagnostics
    }

    // ──────────────────────────── CREATE ────────────────────────────

    pub async fn create(&self, plan: &CanisterModel) -> ApplyReport {
        let mut report = ApplyReport::default();
        let mut state = None;

        let result = self.create_steps(plan, &mut report, &mut state).await;

        report.settle(state, result)
    }

    async fn create_steps(
        &self,
        plan: &CanisterModel,
        report: &mut ApplyReport,
        state: &mut Option<CanisterState>,
    ) -> Result<(), Error> {
        // Phase 0: nothing remote happens until every local input checks out
        let code = load_code(plan)?;
        let manager = self.manager();
        let target = controllers::resolve_for_create(&plan.controllers, manager);
        let target_principals = controllers::parse(&target)?;

        // Phase 1: allocation
        let pid = report.track(RemoteOp::CreateCanister, self.mgmt.create_canister().await)?;
        let current = state.insert(CanisterState::allocated(
            pid.to_text(),
            vec![manager.to_text()],
        ));

        // Phase 2: installation
        if let Some(code) = &code {
            log!(
                Topic::Lifecycle,
                Info,
                "installing {} on {pid}",
                code.module.path.display()
            );
            report.track(
                RemoteOp::InstallCode,
                self.mgmt
                    .install_code(pid, InstallMode::Install, &code.module.bytes, &code.arg)
                    .await,
            )?;
        }
        current.apply_code_facets(plan);

        // Phase 3: read back what the canister now runs
        let hash = report.track(RemoteOp::ModuleHash, self.mgmt.module_hash(pid).await)?;
        let hash = hex::encode(hash);

        match plan.expected_sha256() {
            Some(expected) => {
                if code.is_some() && !expected.eq_ignore_ascii_case(&hash) {
                    report.diagnostics.warning(
                        "Client Warning",
                        format!(
                            "Expected Wasm module sha {expected} does not match canister info sha {hash}. Please inspect canister"
                        ),
                    );
                }
                current.wasm_sha256 = expected.to_string();
            }
            None => current.wasm_sha256 = hash,
        }

        // Phase 4: controllers
        report.track(
            RemoteOp::UpdateSettings,
            self.mgmt
                .update_controllers(pid, &target_principals)
                .await,
        )?;
        current.controllers = target;

        log!(Topic::Lifecycle, Ok, "created canister {pid}");

        Ok(())
    }

    // ───────────────────────────── READ ─────────────────────────────

    /// Persisted state is returned as is; remote drift is not detected.
    #[must_use]
    pub fn read(&self, prior: &CanisterState) -> ApplyReport {
        log!(Topic::Lifecycle, Debug, "read canister {}", prior.id);

        ApplyReport::default().settle(Some(prior.clone()), Ok(()))
    }

    // ──────────────────────────── UPDATE ────────────────────────────

    pub async fn update(&self, prior: &CanisterState, plan: &CanisterModel) -> ApplyReport {
        let mut report = ApplyReport::default();
        let mut state = prior.clone();

        let result = self.update_steps(plan, &mut report, &mut state).await;

        report.settle(Some(state), result)
    }

    async fn update_steps(
        &self,
        plan: &CanisterModel,
        report: &mut ApplyReport,
        state: &mut CanisterState,
    ) -> Result<(), Error> {
        let pid = canister_id(plan.id.as_known().unwrap_or(&state.id))?;
        let target = controllers::resolve_for_update(&plan.controllers)?;
        let target_principals = controllers::parse(&target)?;
        let code = load_code(plan)?;

        log!(Topic::Lifecycle, Info, "updating canister {pid}");

        report.track(
            RemoteOp::UpdateSettings,
            self.mgmt
                .update_controllers(pid, &target_principals)
                .await,
        )?;
        state.controllers = target;

        match code {
            None => {
                report.track(
                    RemoteOp::UninstallCode,
                    self.mgmt.uninstall_code(pid).await,
                )?;
                state.wasm_sha256 = String::new();
            }
            Some(code) => {
                let current =
                    report.track(RemoteOp::ModuleHash, self.mgmt.module_hash(pid).await)?;
                let mode = plan_install(&current);
                log!(
                    Topic::Lifecycle,
                    Info,
                    "installing {} on {pid} ({mode:?})",
                    code.module.path.display()
                );

                report.track(
                    RemoteOp::InstallCode,
                    self.mgmt
                        .install_code(pid, mode, &code.module.bytes, &code.arg)
                        .await,
                )?;
                state.wasm_sha256 = plan
                    .expected_sha256()
                    .map_or(code.module.sha256, str::to_string);
            }
        }
        state.apply_code_facets(plan);

        log!(Topic::Lifecycle, Ok, "updated canister {pid}");

        Ok(())
    }

    // ──────────────────────────── DELETE ────────────────────────────

    /// Stop then delete. A failed stop leaves the canister in place.
    pub async fn delete(&self, prior: &CanisterState) -> ApplyReport {
        let mut report = ApplyReport::default();

        let result = self.delete_steps(prior, &mut report).await;
        let state = result.is_err().then(|| prior.clone());

        report.settle(state, result)
    }

    async fn delete_steps(
        &self,
        prior: &CanisterState,
        report: &mut ApplyReport,
    ) -> Result<(), Error> {
        let pid = canister_id(&prior.id)?;

        report.track(RemoteOp::StopCanister, self.mgmt.stop_canister(pid).await)?;
        report.track(
            RemoteOp::DeleteCanister,
            self.mgmt.delete_canister(pid).await,
        )?;

        Ok(())
    }

    // ──────────────────────────── IMPORT ────────────────────────────

    /// Adopt an existing canister; remote truth becomes the state.
    pub async fn import(&self, id: &str) -> ApplyReport {
        let mut report = ApplyReport::default();
        let mut state = None;

        let result = self.import_steps(id, &mut report, &mut state).await;

        report.settle(state, result)
    }

    async fn import_steps(
        &self,
        id: &str,
        report: &mut ApplyReport,
        state: &mut Option<CanisterState>,
    ) -> Result<(), Error> {
        log!(Topic::Lifecycle, Info, "importing canister {id}");
        let pid = canister_id(id)?;

        let hash = report.track(RemoteOp::ModuleHash, self.mgmt.module_hash(pid).await)?;
        let controllers =
            report.track(RemoteOp::Controllers, self.mgmt.controllers(pid).await)?;

        *state = Some(CanisterState {
            id: id.to_string(),
            controllers: controllers.iter().map(Principal::to_text).collect(),
            wasm_sha256: hex::encode(hash),
            ..CanisterState::default()
        });

        Ok(())
    }
}

// ─────────────────────────── HELPERS ───────────────────────────

fn canister_id(text: &str) -> Result<Principal, ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::MissingId);
    }

    Principal::from_text(text).map_err(|err| ValidationError::InvalidPrincipal {
        attribute: "id",
        value: text.to_string(),
        reason: err.to_string(),
    })
}

/// Resolve the argument and load the module when one is configured.
fn load_code(plan: &CanisterModel) -> Result<Option<CodePlan>, Error> {
    let arg = resolve_arg(&plan.arg, &plan.arg_hex)?;

    let path = match &plan.wasm_file {
        Attr::Known(path) => path,
        Attr::Null => return Ok(None),
        Attr::Unknown => {
            return Err(ValidationError::UnknownValue {
                attribute: "wasm_file",
            }
            .into());
        }
    };
    let module = WasmOps::load(Path::new(path), plan.expected_sha256())?;

    Ok(Some(CodePlan { module, arg }))
}
