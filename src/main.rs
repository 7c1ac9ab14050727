//! # Cluster Resource Controller
//!
//! Keeps the aggregated resource discovery of a Clusterpedia deployment in
//! step with what each member cluster is actually synchronizing.
//!
//! ## Overview
//!
//! 1. **Watch PediaClusters** - cluster-scoped watch with relist pruning
//! 2. **Extract capabilities** - group/resource → kind, scope and synced versions
//! 3. **Detect changes** - skip publishing when nothing changed
//! 4. **Publish discovery** - build per-cluster discovery and hand it to the publisher
//! 5. **Remove clusters** - on deletion or when a cluster starts terminating
//!
//! Prometheus metrics, health probes and the published discovery documents
//! are served over HTTP (see `controller::server`).

use anyhow::Result;
use cluster_resource_controller::runtime::{initialize, run_watch_loop};

#[tokio::main]
async fn main() -> Result<()> {
    let init_result = initialize().await?;

    run_watch_loop(
        init_result.clusters,
        init_result.controller,
        init_result.server_state,
        init_result.controller_config,
    )
    .await
}
