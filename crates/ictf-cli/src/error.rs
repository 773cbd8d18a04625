use ictf_core::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error as ThisError;

pub type CliResult<T> = Result<T, CliError>;

///
/// CliError
///

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] ictf_core::Error),

    #[error("invalid JSON value: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("invalid principal '{value}': {reason}")]
    InvalidPrincipal { value: String, reason: String },

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Diagnostics were already printed; only the exit status is left.
    #[error("{0} failed")]
    Failed(&'static str),
}
