use crate::spec::prelude::*;

///
/// CanisterSettings
///

#[derive(CandidType, Clone, Debug, Default, Deserialize)]
pub struct CanisterSettings {
    pub controllers: Option<Vec<Principal>>,
}

///
/// ProvisionalCreateCanisterWithCyclesArgs
///

#[derive(CandidType, Clone, Debug, Default, Deserialize)]
pub struct ProvisionalCreateCanisterWithCyclesArgs {
    pub amount: Option<Nat>,
    pub settings: Option<CanisterSettings>,
}

///
/// CanisterIdRecord
/// Argument of stop/delete/uninstall and reply of canister creation.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub struct CanisterIdRecord {
    pub canister_id: Principal,
}

///
/// UpgradeFlags
///

#[derive(CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct UpgradeFlags {
    pub skip_pre_upgrade: Option<bool>,
}

///
/// CanisterInstallMode
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub enum CanisterInstallMode {
    #[serde(rename = "install")]
    Install,
    #[serde(rename = "upgrade")]
    Upgrade(Option<UpgradeFlags>),
}

///
/// InstallCodeArgs
///

#[derive(CandidType, Clone, Debug, Deserialize)]
pub struct InstallCodeArgs {
    pub mode: CanisterInstallMode,
    pub canister_id: Principal,
    pub wasm_module: ByteBuf,
    pub arg: ByteBuf,
}

///
/// UpdateSettingsArgs
///

#[derive(CandidType, Clone, Debug, Deserialize)]
pub struct UpdateSettingsArgs {
    pub canister_id: Principal,
    pub settings: CanisterSettings,
}

pub const PROVISIONAL_CREATE_CANISTER_WITH_CYCLES: &str =
    "provisional_create_canister_with_cycles";
pub const INSTALL_CODE: &str = "install_code";
pub const UNINSTALL_CODE: &str = "uninstall_code";
pub const UPDATE_SETTINGS: &str = "update_settings";
pub const STOP_CANISTER: &str = "stop_canister";
pub const DELETE_CANISTER: &str = "delete_canister";
