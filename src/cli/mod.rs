//! # CRCCTL CLI
//!
//! Inspect PediaCluster resources the way the controller sees them.
//!
//! ```bash
//! # List clusters with their deletion state and synced resource count
//! crcctl list
//!
//! # Show the capability map extracted from a cluster's sync status
//! crcctl capabilities cluster-east
//! crcctl capabilities cluster-east --output yaml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kube::Client;

mod capabilities;
mod list;

/// Cluster Resource Controller CLI
#[derive(Parser)]
#[command(name = "crcctl")]
#[command(
    about = "Cluster Resource Controller CLI",
    long_about = None,
    after_help = "\
Examples:
  crcctl list
  crcctl capabilities cluster-east
  crcctl capabilities cluster-east --output yaml
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List PediaCluster resources
    List,
    /// Print the capabilities a cluster is currently synchronizing
    Capabilities {
        /// Name of the PediaCluster
        #[arg(value_name = "CLUSTER")]
        name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Required for rustls 0.23+; Err only means one is already installed
    let _ = rustls::crypto::ring::default_provider().install_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crcctl=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client. Ensure kubeconfig is configured.")?;

    match cli.command {
        Commands::List => list::list_command(client).await,
        Commands::Capabilities { name, output } => {
            capabilities::capabilities_command(client, name, output).await
        }
    }
}
