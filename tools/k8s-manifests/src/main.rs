//! k8s-manifests CLI
//!
//! Renders Kubernetes CRD manifests from declarative configuration and
//! tracks them in a local state file:
//! - `resources` / `schema`: inspect the available resource types
//! - `render`: validate and print a manifest without touching state
//! - `apply` / `refresh` / `destroy`: lifecycle against the state file
//! - `show` / `list`: inspect state

mod commands;
mod display;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use k8s_manifest_provider::DEFAULT_PROVIDER_TYPE_NAME;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "k8s-manifests")]
#[command(version)]
#[command(about = "Render Kubernetes CRD manifests and track them in local state", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// State file
    #[arg(long, global = true, env = "K8S_MANIFESTS_STATE", default_value = "manifests.state.json")]
    state: PathBuf,

    /// Provider type name, the prefix of every resource type
    #[arg(long, global = true, env = "K8S_MANIFESTS_PROVIDER", default_value = DEFAULT_PROVIDER_TYPE_NAME)]
    provider: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List available resource types
    Resources,

    /// Print the configuration schema of a resource type as JSON
    Schema {
        /// Resource type name
        type_name: String,
    },

    /// Validate configuration and print the rendered manifest
    Render {
        /// Resource type name
        type_name: String,

        /// Configuration file (YAML or JSON), "-" for stdin
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
    },

    /// Create or update a resource and record it in state
    Apply {
        /// Resource type name
        type_name: String,

        /// Resource name, unique per type
        name: String,

        /// Configuration file (YAML or JSON), "-" for stdin
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
    },

    /// Print the manifest stored for a resource
    Show {
        /// Resource address, `<type>.<name>`
        address: String,
    },

    /// Re-read a resource and store the result
    Refresh {
        /// Resource address, `<type>.<name>`
        address: String,
    },

    /// Remove a resource from state
    Destroy {
        /// Resource address, `<type>.<name>`
        address: String,
    },

    /// List resources in state
    List,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match commands::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
