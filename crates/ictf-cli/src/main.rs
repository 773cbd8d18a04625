//! `ictf`: operator CLI for the Internet Computer canister provider core.
//!
//! Runs the provider functions (`did_encode`, `did_text`, `did_record`) and
//! drives the `ic_canister` lifecycle against JSON configuration and state
//! files, the same way the plugin host would:
//! - `validate` / `plan` check a configuration
//! - `create` / `read` / `update` / `delete` / `import` reconcile a canister
//! - `call` sends a single update call with a candid argument

use clap::{Parser, Subcommand};
use ictf_core::{
    api::{CanisterResource, Provider, function},
    config::{ProviderConfig, ProviderEnv},
    domain::arg::resolve_arg,
    dto::{Attr, CanisterModel, CanisterState, DynamicValue},
    ops::MgmtOps,
    workflow::ApplyReport,
};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

mod error;
mod files;

use error::{CliError, CliResult};
use files::{persist_state, plan_for_update, print_diagnostics, read_json};

/// Provider configuration picked up from the working directory.
const DEFAULT_CONFIG: &str = "ictf.toml";

#[derive(Parser)]
#[command(name = "ictf")]
#[command(about = "Manage Internet Computer canisters the way the ic Terraform provider does", long_about = None)]
#[command(version)]
struct Cli {
    /// Provider configuration file (TOML)
    #[arg(short, long, env = "ICTF_CONFIG")]
    config: Option<PathBuf>,

    /// Replica or boundary node URL, overriding the configuration file
    #[arg(short, long, env = "ICTF_ENDPOINT")]
    endpoint: Option<String>,

    /// PEM identity, overriding the configuration file
    #[arg(short, long)]
    identity: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Candid-encode a JSON value and print it as hex
    Encode { value: String },

    /// Wrap a string so `encode` treats it as candid text
    Text { value: String },

    /// Wrap a JSON value so `encode` treats it as a candid record
    Record { value: String },

    /// Check a canister configuration without contacting the network
    Validate { config: PathBuf },

    /// Check a canister configuration against the provider identity
    Plan { config: PathBuf },

    /// Create a canister and write its state
    Create { config: PathBuf, state: PathBuf },

    /// Print the persisted state of a canister
    Read { state: PathBuf },

    /// Reconcile an existing canister with its configuration
    Update { config: PathBuf, state: PathBuf },

    /// Stop and delete a canister, removing its state file
    Delete { state: PathBuf },

    /// Adopt an existing canister and write its state
    Import { id: String, state: PathBuf },

    /// Send an update call and print the raw reply as hex
    Call {
        id: String,
        method: String,

        /// Argument as a JSON value, encoded like `encode`
        #[arg(long, conflicts_with = "arg_hex")]
        arg: Option<String>,

        /// Argument as hex-encoded candid
        #[arg(long)]
        arg_hex: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    ictf_core::log::init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Encode { value } => {
            println!("{}", function::did_encode(&parse_value(value)?)?);
        }
        Commands::Text { value } => print_value(function::did_text(value))?,
        Commands::Record { value } => print_value(function::did_record(parse_value(value)?))?,
        Commands::Validate { config } => {
            let model: CanisterModel = read_json(config)?;
            validate(&model)?;
        }
        Commands::Plan { config } => {
            let model: CanisterModel = read_json(config)?;
            validate(&model)?;

            let provider = connect(&cli).await?;
            print_diagnostics(&provider.canister_resource().modify_plan(Some(&model)));
        }
        Commands::Create { config, state } => {
            let model: CanisterModel = read_json(config)?;
            validate(&model)?;

            let resource = connect(&cli).await?.canister_resource();
            print_diagnostics(&resource.modify_plan(Some(&model)));
            finish("create", state, resource.create(&model).await)?;
        }
        Commands::Read { state } => {
            let prior: CanisterState = read_json(state)?;
            let resource = connect(&cli).await?.canister_resource();

            let report = resource.read(&prior);
            if let Some(current) = &report.state {
                print_value(current)?;
            }
            finish("read", state, report)?;
        }
        Commands::Update { config, state } => {
            let prior: CanisterState = read_json(state)?;
            let model: CanisterModel = read_json(config)?;
            validate(&model)?;

            let plan = plan_for_update(&prior, &model);
            let resource = connect(&cli).await?.canister_resource();
            print_diagnostics(&resource.modify_plan(Some(&plan)));
            finish("update", state, resource.update(&prior, &plan).await)?;
        }
        Commands::Delete { state } => {
            let prior: CanisterState = read_json(state)?;
            let resource = connect(&cli).await?.canister_resource();

            finish("delete", state, resource.delete(&prior).await)?;
        }
        Commands::Import { id, state } => {
            let resource = connect(&cli).await?.canister_resource();

            finish("import", state, resource.import_state(id).await)?;
        }
        Commands::Call {
            id,
            method,
            arg,
            arg_hex,
        } => {
            let pid = candid::Principal::from_text(id).map_err(|err| CliError::InvalidPrincipal {
                value: id.clone(),
                reason: err.to_string(),
            })?;
            let arg = match arg {
                Some(json) => Attr::Known(parse_value(json)?),
                None => Attr::Null,
            };
            let bytes = resolve_arg(&arg, &arg_hex.clone().into())?;

            let provider = connect(&cli).await?;
            let client = provider.client();
            let reply = MgmtOps::new(client.as_ref()).call(pid, method, &bytes).await?;

            println!("{}", hex::encode(reply));
        }
    }

    Ok(())
}

// ─────────────────────────── HELPERS ───────────────────────────

/// Provider configuration: explicit file, else `ictf.toml` if present,
/// then command-line overrides.
fn provider_config(cli: &Cli) -> CliResult<ProviderConfig> {
    let mut config = match &cli.config {
        Some(path) => ProviderConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => {
            ProviderConfig::load(Path::new(DEFAULT_CONFIG))?
        }
        None => ProviderConfig::default(),
    };

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    if let Some(identity) = &cli.identity {
        config.identity_pem = Some(identity.clone());
    }

    Ok(config)
}

async fn connect(cli: &Cli) -> CliResult<Provider> {
    let config = provider_config(cli)?;

    Ok(Provider::configure(&config, &ProviderEnv::from_env()).await?)
}

fn parse_value(json: &str) -> CliResult<DynamicValue> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(CliError::InvalidJson)?;

    Ok(DynamicValue::from(value))
}

fn print_value<T: serde::Serialize>(value: T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(&value).map_err(CliError::InvalidJson)?;
    println!("{text}");

    Ok(())
}

/// Static configuration checks; errors stop the command.
fn validate(model: &CanisterModel) -> CliResult<()> {
    let diagnostics = CanisterResource::validate_config(model);
    print_diagnostics(&diagnostics);

    if diagnostics.has_error() {
        return Err(CliError::Failed("validate"));
    }

    Ok(())
}

/// Report diagnostics and persist whatever state the operation reached,
/// partial state included.
fn finish(op: &'static str, state: &Path, report: ApplyReport) -> CliResult<()> {
    print_diagnostics(&report.diagnostics);
    persist_state(state, report.state.as_ref())?;

    if !report.is_success() {
        return Err(CliError::Failed(op));
    }
    match &report.state {
        Some(current) => eprintln!("✅ {op} {}", current.id),
        None => eprintln!("🗑️ {op} done"),
    }

    Ok(())
}
