//! The `ic_canister` resource.

use crate::{
    Error,
    domain::ValidationError,
    dto::{CanisterModel, CanisterState, Diagnostics},
    infra::CanisterClient,
    workflow::{ApplyReport, CanisterWorkflow},
};
use std::sync::Arc;

/// Resource type suffix appended to the provider type name.
pub const TYPE_SUFFIX: &str = "_canister";

const ARG_DEFAULT_DESCRIPTION: &str = "If neither `arg` nor `arg_hex` is set, the argument defaults to the empty blob (and not for instance to a Candid `null`).";

///
/// AttributeKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttributeKind {
    String,
    StringList,
    Dynamic,
}

///
/// AttributeSchema
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub optional: bool,
    pub computed: bool,
    /// Keep the prior state value while the planned value is unknown.
    pub use_state_for_unknown: bool,
    pub description: String,
}

///
/// ResourceSchema
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceSchema {
    pub description: &'static str,
    pub attributes: Vec<AttributeSchema>,
}

impl ResourceSchema {
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

///
/// CanisterResource
///

#[derive(Clone)]
pub struct CanisterResource {
    client: Arc<dyn CanisterClient>,
}

impl CanisterResource {
    #[must_use]
    pub fn new(client: Arc<dyn CanisterClient>) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn type_name(provider_type: &str) -> String {
        format!("{provider_type}{TYPE_SUFFIX}")
    }

    #[must_use]
    pub fn schema() -> ResourceSchema {
        let attr = |name, kind, optional, computed, description: String| AttributeSchema {
            name,
            kind,
            optional,
            computed,
            use_state_for_unknown: false,
            description,
        };

        ResourceSchema {
            description: "Canister resource",
            attributes: vec![
                AttributeSchema {
                    use_state_for_unknown: true,
                    ..attr(
                        "id",
                        AttributeKind::String,
                        false,
                        true,
                        "Canister identifier".to_string(),
                    )
                },
                attr(
                    "controllers",
                    AttributeKind::StringList,
                    true,
                    true,
                    "Canister controllers. When creating a new canister, defaults to the principal used by the provider.".to_string(),
                ),
                attr(
                    "arg",
                    AttributeKind::Dynamic,
                    true,
                    false,
                    format!(
                        "Init & post_upgrade arguments for the canister, candid-encoded with the `did_encode` heuristics. Do not call `did_encode` yourself when using `arg`. {ARG_DEFAULT_DESCRIPTION}"
                    ),
                ),
                attr(
                    "arg_hex",
                    AttributeKind::String,
                    true,
                    false,
                    format!(
                        "Hex representation of candid-encoded arguments, e.g. from didc or `did_encode`. {ARG_DEFAULT_DESCRIPTION}"
                    ),
                ),
                attr(
                    "wasm_file",
                    AttributeKind::String,
                    true,
                    false,
                    "Path to Wasm module to install".to_string(),
                ),
                attr(
                    "wasm_sha256",
                    AttributeKind::String,
                    true,
                    true,
                    "Sha256 sum of Wasm module (hex encoded). Recommended if `wasm_file` is specified.".to_string(),
                ),
            ],
        }
    }

    /// Static configuration checks, run before any plan is made.
    #[must_use]
    pub fn validate_config(config: &CanisterModel) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        if !config.arg.is_null() && !config.arg_hex.is_null() {
            let detail = ValidationError::ArgConflict.to_string();
            diagnostics.attribute_error("arg", "Invalid Attribute Combination", detail.clone());
            diagnostics.attribute_error("arg_hex", "Invalid Attribute Combination", detail);
        }

        if !config.wasm_sha256.is_null() && config.wasm_file.is_null() {
            diagnostics.attribute_warning(
                "wasm_sha256",
                "Sha256 specified without module",
                "Expected wasm_sha256 to have a wasm_file specified. The resource may return unexpected results.",
            );
        }

        diagnostics
    }

    #[must_use]
    pub fn modify_plan(&self, plan: Option<&CanisterModel>) -> Diagnostics {
        self.workflow().modify_plan(plan)
    }

    pub async fn create(&self, plan: &CanisterModel) -> ApplyReport {
        respond(self.workflow().create(plan).await)
    }

    #[must_use]
    pub fn read(&self, prior: &CanisterState) -> ApplyReport {
        respond(self.workflow().read(prior))
    }

    pub async fn update(&self, prior: &CanisterState, plan: &CanisterModel) -> ApplyReport {
        respond(self.workflow().update(prior, plan).await)
    }

    pub async fn delete(&self, prior: &CanisterState) -> ApplyReport {
        respond(self.workflow().delete(prior).await)
    }

    pub async fn import_state(&self, id: &str) -> ApplyReport {
        respond(self.workflow().import(id).await)
    }

    fn workflow(&self) -> CanisterWorkflow<'_> {
        CanisterWorkflow::new(self.client.as_ref())
    }
}

/// Surface the report's error as a host diagnostic.
fn respond(mut report: ApplyReport) -> ApplyReport {
    if let Some(err) = &report.error {
        let summary = match err {
            Error::Remote { .. } | Error::Connect { .. } => "Client Error",
            _ => "Invalid Configuration",
        };
        report.diagnostics.error(summary, err.to_string());
    }

    report
}

///
/// TESTS
///
