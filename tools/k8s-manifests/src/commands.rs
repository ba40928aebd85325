//! Subcommand implementations

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use k8s_manifest_provider::{Diagnostics, FileStateStore, Provider, StateStore};
use serde_json::Value;
use tracing::debug;

use crate::display::print_diagnostics;
use crate::{Cli, Commands};

/// Dispatch a parsed command line
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let provider = Provider::new(&cli.provider)?;
    let store = FileStateStore::new(&cli.state);
    debug!("Using state file {}", store.path().display());

    let mut out = std::io::stdout().lock();
    execute(&provider, &store, &cli.command, &mut out)
}

/// Run one command, writing results to `out`
fn execute(
    provider: &Provider,
    store: &dyn StateStore,
    command: &Commands,
    out: &mut impl std::io::Write,
) -> Result<ExitCode> {
    match command {
        Commands::Resources => {
            for resource in provider.resource_types() {
                writeln!(out, "{}\t{}/{}", resource.type_name(), resource.api_version(), resource.kind())?;
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Schema { type_name } => {
            let schema = provider.resource(type_name)?.schema();
            writeln!(out, "{}", serde_json::to_string_pretty(schema)?)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Render { type_name, file } => {
            let config = load_config(file)?;
            let response = provider.render(type_name, &config)?;
            if let Some(yaml) = &response.yaml {
                write!(out, "{}", yaml)?;
            }
            Ok(finish(&response.diagnostics))
        }

        Commands::Apply { type_name, name, file } => {
            let config = load_config(file)?;
            let response = provider.apply(store, type_name, name, &config)?;
            if let Some(state) = &response.state {
                writeln!(out, "{}.{}: id={}", type_name, name, state.id)?;
            }
            Ok(finish(&response.diagnostics))
        }

        Commands::Show { address } => {
            let Some(state) = store.get(address)? else {
                bail!("{} is not in state", address);
            };
            write!(out, "{}", state.yaml)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Refresh { address } => {
            let response = provider.refresh(store, address)?;
            if let Some(state) = &response.state {
                writeln!(out, "{}: id={}", address, state.id)?;
            }
            Ok(finish(&response.diagnostics))
        }

        Commands::Destroy { address } => {
            let diagnostics = provider.destroy(store, address)?;
            if !diagnostics.has_error() {
                writeln!(out, "{}: destroyed", address)?;
            }
            Ok(finish(&diagnostics))
        }

        Commands::List => {
            for (address, state) in store.list()? {
                writeln!(out, "{}\t{}", address, state.id)?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print diagnostics and map them to an exit code
fn finish(diagnostics: &Diagnostics) -> ExitCode {
    print_diagnostics(diagnostics);
    if diagnostics.has_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Read a YAML or JSON configuration file, `-` meaning stdin
fn load_config(path: &Path) -> Result<Value> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read configuration from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?
    };

    // YAML is a superset of JSON, one parser covers both
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))
}
