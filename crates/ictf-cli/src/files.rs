use crate::error::{CliError, CliResult};
use ictf_core::{
    api::{Diagnostics, Severity},
    dto::{Attr, CanisterModel, CanisterState},
};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let mut text = serde_json::to_string_pretty(value).map_err(CliError::InvalidJson)?;
    text.push('\n');

    std::fs::write(path, text).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist the state a lifecycle operation reached, or drop the file when
/// the resource is gone.
pub fn persist_state(path: &Path, state: Option<&CanisterState>) -> CliResult<()> {
    match state {
        Some(state) => write_json(path, state),
        None => match std::fs::remove_file(path) {
            Err(source) if source.kind() != std::io::ErrorKind::NotFound => Err(CliError::Write {
                path: path.to_path_buf(),
                source,
            }),
            _ => Ok(()),
        },
    }
}

///
/// plan_for_update
/// Build the plan the host would send for an existing resource: the id is
/// carried over, and controllers the configuration leaves out keep their
/// current value.
///

#[must_use]
pub fn plan_for_update(prior: &CanisterState, config: &CanisterModel) -> CanisterModel {
    let mut plan = config.clone();

    if plan.id.is_unset() {
        plan.id = Attr::Known(prior.id.clone());
    }
    if plan.controllers.is_null() {
        plan.controllers = Attr::Known(prior.controllers.clone());
    }

    plan
}

pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for diag in diagnostics.iter() {
        let marker = match diag.severity {
            Severity::Warning => "⚠️",
            Severity::Error => "❌",
        };
        match &diag.attribute {
            Some(attribute) => {
                eprintln!("{marker} {} [{attribute}]: {}", diag.summary, diag.detail);
            }
            None => eprintln!("{marker} {}: {}", diag.summary, diag.detail),
        }
    }
}

///
/// TESTS
///
