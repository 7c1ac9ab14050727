//! # Initialization
//!
//! Controller startup: rustls provider, configuration, tracing, metrics,
//! HTTP server, Kubernetes client and the reconciler with its collaborators.

use crate::config::{create_shared_config, SharedControllerConfig, SharedServerConfig};
use crate::controller::reconciler::ClusterResourceController;
use crate::controller::server::{start_server, ServerState};
use crate::crd::PediaCluster;
use crate::discovery::{GroupVersionSchemaBuilder, InMemoryDiscoveryPublisher};
use crate::observability;
use anyhow::{Context, Result};
use kube::{api::Api, api::ListParams, Client};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Everything the watch loop needs
pub struct InitializationResult {
    /// Cluster-scoped API for PediaCluster
    pub clusters: Api<PediaCluster>,
    pub controller: Arc<ClusterResourceController>,
    /// Server state for probes and the discovery endpoints
    pub server_state: Arc<ServerState>,
    pub controller_config: SharedControllerConfig,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field(
                "server_listening",
                &self.server_state.is_listening.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}

/// Initialize the controller runtime
pub async fn initialize() -> Result<InitializationResult> {
    // Required for rustls 0.23+ before any TLS connection is made
    let provider_installed = rustls::crypto::ring::default_provider()
        .install_default()
        .is_ok();

    let (controller_config, server_config) = create_shared_config();

    {
        let config = controller_config.read().await;
        observability::logging::init_tracing(&config)
            .context("Failed to initialize tracing subscriber")?;
        if !provider_installed {
            debug!("rustls crypto provider already installed, keeping existing provider");
        }

        if config.enable_metrics {
            observability::metrics::register_metrics()
                .context("Failed to register Prometheus metrics")?;
        } else {
            info!("Metrics disabled (ENABLE_METRICS=false)");
        }
    }

    info!("Starting Cluster Resource Controller");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );

    let discovery = Arc::new(InMemoryDiscoveryPublisher::new());
    let server_state = Arc::new(ServerState::new(Arc::clone(&discovery)));

    let server_port = server_config.read().await.metrics_port;
    let server_state_clone = Arc::clone(&server_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });
    wait_for_server_listening(&server_state, &server_handle, &server_config).await?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    let clusters: Api<PediaCluster> = Api::all(client);

    check_crd_queryable(&clusters).await;

    let controller = Arc::new(ClusterResourceController::new(
        Arc::new(GroupVersionSchemaBuilder::new()),
        discovery,
    ));

    info!("Controller initialized, starting watch loop...");

    Ok(InitializationResult {
        clusters,
        controller,
        server_state,
        controller_config,
    })
}

async fn wait_for_server_listening(
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
    server_config: &SharedServerConfig,
) -> Result<()> {
    let config = server_config.read().await;
    let startup_timeout = config.startup_timeout();
    let poll_interval = config.poll_interval();
    drop(config);
    let start_time = std::time::Instant::now();

    loop {
        if server_handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        if server_state.is_listening.load(Ordering::Relaxed) {
            info!("HTTP server is accepting connections");
            return Ok(());
        }

        if start_time.elapsed() > startup_timeout {
            return Err(anyhow::anyhow!(
                "HTTP server failed to start listening within {} seconds",
                startup_timeout.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Log whether the CRD is installed and how many clusters exist.
/// The watch performs the actual initial list.
#[tracing::instrument(name = "controller.startup.check_crd", skip_all)]
async fn check_crd_queryable(clusters: &Api<PediaCluster>) {
    match clusters.list_metadata(&ListParams::default()).await {
        Ok(list) => {
            let mut names: Vec<&str> = list
                .items
                .iter()
                .filter_map(|item| item.metadata.name.as_deref())
                .collect();
            names.sort_unstable();
            info!(
                "CRD is queryable, found {} existing PediaCluster resources",
                names.len()
            );
            if !names.is_empty() {
                info!(
                    "  Clusters: {}",
                    if names.len() <= 3 {
                        names.join(", ")
                    } else {
                        format!("{}, ... ({} total)", names[..3].join(", "), names.len())
                    }
                );
            }
        }
        Err(e) => {
            warn!(
                error = %e,
                "Could not list PediaCluster resources; is the CRD installed? The watch will keep retrying"
            );
        }
    }
}
