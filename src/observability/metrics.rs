//! # Metrics
//!
//! Prometheus metrics for monitoring the controller.
//!
//! ## Metrics Exposed
//!
//! - `cluster_resource_events_total{event}` - Lifecycle events received (added, updated, deleted)
//! - `cluster_resource_publishes_total` - Changed capability maps published to discovery
//! - `cluster_resource_unchanged_total` - Upserts skipped because capabilities were unchanged
//! - `cluster_resource_removals_total` - Clusters removed from discovery
//! - `cluster_resource_errors_total{operation}` - Collaborator failures (schema_build, publish, unpublish)
//! - `cluster_resource_tracked_clusters` - Clusters currently present in the capability store
//! - `cluster_resource_publish_duration_seconds` - Duration of schema build plus publish
//! - `cluster_resource_watch_restarts_total` - Watch stream restarts

use anyhow::Result;
use prometheus::{Histogram, IntCounter, IntCounterVec, IntGauge, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static CLUSTER_EVENTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "cluster_resource_events_total",
            "Total number of cluster lifecycle events by event type",
        ),
        &["event"],
    )
    .expect("Failed to create CLUSTER_EVENTS_TOTAL metric - this should never happen")
});

static PUBLISHES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "cluster_resource_publishes_total",
        "Total number of changed capability maps published to discovery",
    )
    .expect("Failed to create PUBLISHES_TOTAL metric - this should never happen")
});

static UNCHANGED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "cluster_resource_unchanged_total",
        "Total number of upserts skipped because capabilities were unchanged",
    )
    .expect("Failed to create UNCHANGED_TOTAL metric - this should never happen")
});

static REMOVALS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "cluster_resource_removals_total",
        "Total number of clusters removed from discovery",
    )
    .expect("Failed to create REMOVALS_TOTAL metric - this should never happen")
});

static ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "cluster_resource_errors_total",
            "Total number of collaborator failures by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create ERRORS_TOTAL metric - this should never happen")
});

static TRACKED_CLUSTERS: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "cluster_resource_tracked_clusters",
        "Current number of clusters with published capabilities",
    )
    .expect("Failed to create TRACKED_CLUSTERS metric - this should never happen")
});

static PUBLISH_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "cluster_resource_publish_duration_seconds",
            "Duration of discovery schema build and publish in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
    )
    .expect("Failed to create PUBLISH_DURATION metric - this should never happen")
});

static WATCH_RESTARTS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "cluster_resource_watch_restarts_total",
        "Total number of PediaCluster watch stream restarts",
    )
    .expect("Failed to create WATCH_RESTARTS_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Fails only when a metric is registered twice"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(CLUSTER_EVENTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(PUBLISHES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(UNCHANGED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(REMOVALS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(TRACKED_CLUSTERS.clone()))?;
    REGISTRY.register(Box::new(PUBLISH_DURATION.clone()))?;
    REGISTRY.register(Box::new(WATCH_RESTARTS_TOTAL.clone()))?;

    Ok(())
}

pub fn increment_cluster_events(event: &str) {
    CLUSTER_EVENTS_TOTAL.with_label_values(&[event]).inc();
}

pub fn increment_publishes() {
    PUBLISHES_TOTAL.inc();
}

pub fn increment_unchanged() {
    UNCHANGED_TOTAL.inc();
}

pub fn increment_removals() {
    REMOVALS_TOTAL.inc();
}

pub fn increment_errors(operation: &str) {
    ERRORS_TOTAL.with_label_values(&[operation]).inc();
}

pub fn set_tracked_clusters(count: usize) {
    TRACKED_CLUSTERS.set(i64::try_from(count).unwrap_or(i64::MAX));
}

pub fn observe_publish_duration(duration: f64) {
    PUBLISH_DURATION.observe(duration);
}

pub fn increment_watch_restarts() {
    WATCH_RESTARTS_TOTAL.inc();
}
