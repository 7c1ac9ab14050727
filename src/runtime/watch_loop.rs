//! # Watch Loop
//!
//! Watches PediaCluster resources, turns watcher events into cluster
//! lifecycle events and dispatches them to the reconciler. Failed clusters
//! are retried with per-cluster Fibonacci backoff, since a plain watch never
//! redelivers an object that has not changed. Every watch error drops the
//! stream; the restart waits out a delay chosen by the error policy.

use crate::config::{ControllerConfig, SharedControllerConfig};
use crate::controller::reconciler::{ClusterEvent, ClusterResourceController};
use crate::controller::server::ServerState;
use crate::crd::PediaCluster;
use crate::observability::metrics;
use crate::runtime::error_policy::{
    handle_reconciliation_error, handle_watch_stream_error, reset_backoff, BackoffState,
};
use crate::runtime::events::ClusterEventTranslator;
use futures::StreamExt;
use kube::api::Api;
use kube_runtime::{watcher, WatchStreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, error, info, warn, Instrument};

/// Why the inner stream loop stopped
enum StreamEnd {
    Shutdown,
    Failed,
    Ended,
}

/// Run the PediaCluster watch until a shutdown signal arrives.
///
/// The watch is restarted on stream errors and when the stream ends. Readiness
/// is reported once the first full list of clusters has been reconciled.
pub async fn run_watch_loop(
    clusters: Api<PediaCluster>,
    controller: Arc<ClusterResourceController>,
    server_state: Arc<ServerState>,
    controller_config: SharedControllerConfig,
) -> Result<(), anyhow::Error> {
    info!("Starting PediaCluster watch loop...");

    let shutdown = Arc::new(Notify::new());
    spawn_shutdown_handler(Arc::clone(&server_state), Arc::clone(&shutdown));

    let backoff_start_ms = controller_config.read().await.backoff_start_ms;
    let backoff_ms = Arc::new(AtomicU64::new(backoff_start_ms));

    let (retry_tx, mut retry_rx) = mpsc::unbounded_channel();
    let mut dispatcher = EventDispatcher::new(controller, retry_tx);

    loop {
        if server_state.is_shutting_down.load(Ordering::Relaxed) {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        // Reload config in case it changed
        let selector = controller_config
            .read()
            .await
            .cluster_label_selector
            .clone();
        let mut watcher_config = watcher::Config::default();
        if let Some(selector) = selector.as_deref() {
            watcher_config = watcher_config.labels(selector);
        }
        let mut stream = watcher(clusters.clone(), watcher_config)
            .default_backoff()
            .boxed();
        info!(
            label_selector = selector.as_deref().unwrap_or(""),
            "watch.started"
        );

        let end = loop {
            tokio::select! {
                biased;

                () = shutdown.notified() => break StreamEnd::Shutdown,
                Some(cluster) = retry_rx.recv() => {
                    let config = controller_config.read().await.clone();
                    dispatcher.retry(&cluster, &config).await;
                }
                item = stream.next() => match item {
                    Some(Ok(event)) => {
                        let config = controller_config.read().await.clone();
                        backoff_ms.store(config.backoff_start_ms, Ordering::Relaxed);
                        dispatcher.handle(event, &config).await;

                        if dispatcher.has_synced() && !server_state.is_ready.swap(true, Ordering::Relaxed) {
                            info!(
                                clusters = dispatcher.controller.tracked_clusters().await.len(),
                                "Initial cluster list reconciled, controller is ready"
                            );
                        }
                    }
                    Some(Err(e)) => {
                        let config = controller_config.read().await.clone();
                        handle_watch_stream_error(
                            &e,
                            &backoff_ms,
                            config.backoff_max_ms,
                            config.watch_restart_delay(),
                        )
                        .await;
                        break StreamEnd::Failed;
                    }
                    None => break StreamEnd::Ended,
                },
            }
        };

        match end {
            StreamEnd::Shutdown => {
                info!("Shutdown requested, exiting watch loop");
                break;
            }
            StreamEnd::Failed => {
                metrics::increment_watch_restarts();
                warn!("watch.restarting");
            }
            StreamEnd::Ended => {
                let delay = controller_config
                    .read()
                    .await
                    .watch_restart_delay_after_end();
                warn!(
                    "PediaCluster watch stream ended, restarting in {} seconds...",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                metrics::increment_watch_restarts();
            }
        }
    }

    info!("Controller stopped gracefully");
    Ok(())
}

/// Mark the server as shutting down and wake the watch loop on SIGINT/SIGTERM
fn spawn_shutdown_handler(server_state: Arc<ServerState>, shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Received shutdown signal (SIGINT/SIGTERM), initiating graceful shutdown...");
        server_state.is_shutting_down.store(true, Ordering::Relaxed);
        // Stores a permit if the loop is busy dispatching
        shutdown.notify_one();
    });
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
                return;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler, listening for SIGINT only");
            }
        }
    }
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Translates watcher events, dispatches them and schedules retries
struct EventDispatcher {
    controller: Arc<ClusterResourceController>,
    translator: ClusterEventTranslator,
    retry_states: HashMap<String, BackoffState>,
    pending_retries: HashSet<String>,
    retry_tx: mpsc::UnboundedSender<String>,
}

impl EventDispatcher {
    fn new(
        controller: Arc<ClusterResourceController>,
        retry_tx: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self {
            controller,
            translator: ClusterEventTranslator::new(),
            retry_states: HashMap::new(),
            pending_retries: HashSet::new(),
            retry_tx,
        }
    }

    fn has_synced(&self) -> bool {
        self.translator.has_synced()
    }

    async fn handle(&mut self, event: watcher::Event<PediaCluster>, config: &ControllerConfig) {
        for cluster_event in self.translator.translate(event) {
            self.dispatch(cluster_event, config).await;
        }
    }

    /// Re-dispatch the latest known state of `cluster`
    async fn retry(&mut self, cluster: &str, config: &ControllerConfig) {
        self.pending_retries.remove(cluster);
        let event = match self.translator.latest(cluster) {
            Some(latest) => ClusterEvent::Updated {
                old: None,
                new: latest,
            },
            None => ClusterEvent::Deleted(cluster.to_string()),
        };
        debug!(cluster.name = cluster, event_type = event.as_str(), "cluster.reconcile.retrying");
        self.dispatch(event, config).await;
    }

    async fn dispatch(&mut self, event: ClusterEvent, config: &ControllerConfig) {
        let name = event.cluster_name();
        let span = tracing::info_span!(
            "controller.cluster_event",
            cluster.name = name.as_deref().unwrap_or("unknown"),
            event_type = event.as_str()
        );

        match self.controller.dispatch(event).instrument(span).await {
            Ok(outcome) => {
                debug!(
                    cluster.name = name.as_deref().unwrap_or("unknown"),
                    outcome = outcome.as_str(),
                    "cluster.event.reconciled"
                );
                if let Some(name) = name {
                    reset_backoff(&mut self.retry_states, &name);
                }
            }
            Err(err) => {
                let delay = handle_reconciliation_error(
                    &err,
                    &mut self.retry_states,
                    config.retry_backoff_min(),
                    config.retry_backoff_max(),
                );
                self.schedule_retry(err.cluster().to_string(), delay);
            }
        }
    }

    fn schedule_retry(&mut self, cluster: String, delay: Duration) {
        if !self.pending_retries.insert(cluster.clone()) {
            return;
        }
        let tx = self.retry_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(cluster).is_err() {
                debug!("Retry channel closed, watch loop has exited");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityMap;
    use crate::discovery::{DiscoveryApis, DiscoveryPublisher, GroupVersionSchemaBuilder};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;
    use std::sync::Mutex;

    /// Fails `set_cluster` while `failing` is set
    #[derive(Default)]
    struct FlakyPublisher {
        failing: AtomicBool,
        published: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DiscoveryPublisher for FlakyPublisher {
        async fn set_cluster(&self, cluster_name: &str, _apis: DiscoveryApis) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(anyhow!("discovery backend unavailable"));
            }
            self.published.lock().unwrap().push(cluster_name.to_string());
            Ok(())
        }

        async fn remove_cluster(&self, _cluster_name: &str) -> Result<()> {
            Ok(())
        }
    }

    fn cluster_with_pods(name: &str) -> PediaCluster {
        serde_json::from_value(serde_json::json!({
            "apiVersion": "cluster.clusterpedia.io/v1alpha2",
            "kind": "PediaCluster",
            "metadata": { "name": name },
            "spec": {},
            "status": {
                "syncResources": [{
                    "group": "",
                    "resources": [{
                        "name": "pods",
                        "kind": "Pod",
                        "namespaced": true,
                        "syncConditions": [{ "version": "v1", "status": "Syncing" }]
                    }]
                }]
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_failed_publish_is_retried_with_latest_state() {
        let publisher = Arc::new(FlakyPublisher::default());
        publisher.failing.store(true, Ordering::SeqCst);
        let controller = Arc::new(ClusterResourceController::new(
            Arc::new(GroupVersionSchemaBuilder::new()),
            Arc::clone(&publisher) as Arc<dyn DiscoveryPublisher>,
        ));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut dispatcher = EventDispatcher::new(Arc::clone(&controller), tx);
        let config = ControllerConfig::default();

        dispatcher
            .handle(watcher::Event::Apply(cluster_with_pods("c1")), &config)
            .await;

        assert!(dispatcher.pending_retries.contains("c1"));
        assert_eq!(dispatcher.retry_states["c1"].error_count, 1);
        assert!(controller.tracked_clusters().await.is_empty());

        publisher.failing.store(false, Ordering::SeqCst);
        dispatcher.retry("c1", &config).await;

        assert!(dispatcher.pending_retries.is_empty());
        assert!(dispatcher.retry_states.is_empty());
        assert_eq!(controller.tracked_clusters().await, vec!["c1".to_string()]);
        assert_eq!(*publisher.published.lock().unwrap(), vec!["c1".to_string()]);
        let published: Option<CapabilityMap> = controller.published_capabilities("c1").await;
        assert_eq!(published.map(|m| m.len()), Some(1));
    }

    #[tokio::test]
    async fn test_retry_of_vanished_cluster_dispatches_delete() {
        let publisher = Arc::new(FlakyPublisher::default());
        let controller = Arc::new(ClusterResourceController::new(
            Arc::new(GroupVersionSchemaBuilder::new()),
            Arc::clone(&publisher) as Arc<dyn DiscoveryPublisher>,
        ));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut dispatcher = EventDispatcher::new(Arc::clone(&controller), tx);

        dispatcher.retry("gone", &ControllerConfig::default()).await;

        assert!(dispatcher.retry_states.is_empty());
        assert!(controller.tracked_clusters().await.is_empty());
    }
}
