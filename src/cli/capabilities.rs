//! # Capabilities Command
//!
//! Prints the capability map extracted from one cluster's sync status, i.e.
//! what the controller would publish for it.

use super::OutputFormat;
use anyhow::{Context, Result};
use cluster_resource_controller::capability::extract_cluster_capabilities;
use cluster_resource_controller::crd::{is_terminating, PediaCluster};
use kube::{api::Api, Client};

pub async fn capabilities_command(client: Client, name: String, output: OutputFormat) -> Result<()> {
    let api: Api<PediaCluster> = Api::all(client);

    let cluster = api
        .get(&name)
        .await
        .with_context(|| format!("Failed to get PediaCluster '{name}'"))?;

    if is_terminating(&cluster) {
        eprintln!("PediaCluster '{name}' is terminating; its discovery is being removed.");
    }

    let capabilities = extract_cluster_capabilities(&cluster);
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string_pretty(&capabilities)
            .context("Failed to render capabilities as JSON")?,
        OutputFormat::Yaml => serde_yaml::to_string(&capabilities)
            .context("Failed to render capabilities as YAML")?,
    };
    println!("{rendered}");

    Ok(())
}
