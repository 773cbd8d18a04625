use crate::dto::prelude::*;

///
/// CanisterModel
///
/// The `ic_canister` resource as it appears in a configuration or plan.
/// Any attribute may still be null or unknown.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct CanisterModel {
    pub id: Attr<String>,
    pub controllers: Attr<Vec<String>>,
    pub arg: Attr<DynamicValue>,
    pub arg_hex: Attr<String>,
    pub wasm_file: Attr<String>,
    pub wasm_sha256: Attr<String>,
}

impl CanisterModel {
    /// User-supplied checksum, treating an empty string as absent.
    #[must_use]
    pub fn expected_sha256(&self) -> Option<&str> {
        self.wasm_sha256
            .as_known()
            .map(String::as_str)
            .filter(|sha| !sha.is_empty())
    }
}

///
/// CanisterState
///
/// Persisted state of a managed canister. Everything here is known; the
/// layout is flat and matches the resource attributes one to one.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CanisterState {
    pub id: String,
    pub controllers: Vec<String>,
    #[serde(default)]
    pub arg: Option<DynamicValue>,
    #[serde(default)]
    pub arg_hex: Option<String>,
    #[serde(default)]
    pub wasm_file: Option<String>,
    #[serde(default)]
    pub wasm_sha256: String,
}

impl CanisterState {
    /// State of a freshly allocated canister before any facet is applied.
    #[must_use]
    pub fn allocated(id: impl Into<String>, controllers: Vec<String>) -> Self {
        Self {
            id: id.into(),
            controllers,
            ..Self::default()
        }
    }

    /// Copy the user-supplied argument and module facets from a plan.
    pub fn apply_code_facets(&mut self, plan: &CanisterModel) {
        self.arg = plan.arg.as_known().cloned();
        self.arg_hex = plan.arg_hex.as_known().cloned();
        self.wasm_file = plan.wasm_file.as_known().cloned();
    }

    /// View this state as a (fully known) model.
    #[must_use]
    pub fn to_model(&self) -> CanisterModel {
        CanisterModel {
            id: Attr::Known(self.id.clone()),
            controllers: Attr::Known(self.controllers.clone()),
            arg: self.arg.clone().into(),
            arg_hex: self.arg_hex.clone().into(),
            wasm_file: self.wasm_file.clone().into(),
            wasm_sha256: Attr::Known(self.wasm_sha256.clone()),
        }
    }
}

///
/// TESTS
///
