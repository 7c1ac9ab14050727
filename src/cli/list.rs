//! # List Command

use anyhow::{Context, Result};
use cluster_resource_controller::crd::{is_terminating, PediaCluster};
use kube::{api::Api, Client};

/// List all PediaCluster resources
pub async fn list_command(client: Client) -> Result<()> {
    let api: Api<PediaCluster> = Api::all(client);

    let clusters = api
        .list(&kube::api::ListParams::default())
        .await
        .context("Failed to list PediaCluster resources")?;

    if clusters.items.is_empty() {
        println!("No PediaCluster resources found.");
        return Ok(());
    }

    println!(
        "\n{:<30} {:<14} {:<12} {:<15}",
        "NAME", "TERMINATING", "VERSION", "SYNCED"
    );
    println!("{}", "-".repeat(71));

    for cluster in clusters.items {
        let name = cluster.metadata.name.as_deref().unwrap_or("<unknown>");
        let terminating = if is_terminating(&cluster) { "Yes" } else { "No" };
        let version = cluster
            .status
            .as_ref()
            .and_then(|s| s.version.as_deref())
            .filter(|v| !v.is_empty())
            .unwrap_or("-");
        let synced = cluster
            .status
            .as_ref()
            .map(|s| s.sync_resources.iter().map(|g| g.resources.len()).sum::<usize>())
            .map_or_else(|| "-".to_string(), |n| n.to_string());

        println!("{name:<30} {terminating:<14} {version:<12} {synced:<15}");
    }

    Ok(())
}
