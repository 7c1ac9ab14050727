//! # Error Policy
//!
//! Backoff for failed cluster reconciliations and classification of watch
//! stream errors.

use crate::controller::backoff::FibonacciBackoff;
use crate::controller::reconciler::ReconcilerError;
use crate::observability::metrics;
use kube_runtime::watcher;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Per-cluster retry state
#[derive(Debug, Clone)]
pub struct BackoffState {
    pub backoff: FibonacciBackoff,
    pub error_count: u32,
}

impl BackoffState {
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            backoff: FibonacciBackoff::new(min, max),
            error_count: 0,
        }
    }

    pub fn increment_error(&mut self) {
        self.error_count = self.error_count.saturating_add(1);
    }
}

/// Record a failed reconciliation and return the delay before the cluster is
/// retried. State is keyed per cluster so one failing cluster never slows the
/// retries of another.
pub fn handle_reconciliation_error(
    error: &ReconcilerError,
    states: &mut HashMap<String, BackoffState>,
    min: Duration,
    max: Duration,
) -> Duration {
    let cluster = error.cluster();
    error!(
        cluster.name = cluster,
        operation = error.operation(),
        error = %error,
        "cluster.reconcile.failed"
    );
    metrics::increment_errors(error.operation());

    let state = states
        .entry(cluster.to_string())
        .or_insert_with(|| BackoffState::new(min, max));
    state.increment_error();
    let delay = state.backoff.next_backoff();

    let next_retry =
        chrono::Utc::now() + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());
    info!(
        cluster.name = cluster,
        retry_in_secs = delay.as_secs(),
        next_retry = next_retry.to_rfc3339(),
        error_count = state.error_count,
        "cluster.reconcile.retry_scheduled"
    );
    delay
}

/// Forget retry state after a successful reconciliation
pub fn reset_backoff(states: &mut HashMap<String, BackoffState>, cluster: &str) {
    states.remove(cluster);
}

/// Watch stream failure classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchErrorKind {
    /// 401/403; credentials or RBAC went away
    Unauthorized,
    /// 410; resource version too old
    Expired,
    /// 429 or storage reinitializing
    TooManyRequests,
    /// 404; usually the CRD is not installed
    NotFound,
    Other,
}

/// Map an API status code to its class
#[must_use]
pub fn classify_status_code(code: u16) -> WatchErrorKind {
    match code {
        401 | 403 => WatchErrorKind::Unauthorized,
        404 => WatchErrorKind::NotFound,
        410 => WatchErrorKind::Expired,
        429 => WatchErrorKind::TooManyRequests,
        _ => WatchErrorKind::Other,
    }
}

/// Status code carried by a watcher error, if the API server answered
#[must_use]
pub fn watch_error_status(error: &watcher::Error) -> Option<u16> {
    match error {
        watcher::Error::InitialListFailed(e)
        | watcher::Error::WatchStartFailed(e)
        | watcher::Error::WatchFailed(e) => match e {
            kube::Error::Api(response) => Some(response.code),
            _ => None,
        },
        watcher::Error::WatchError(response) => Some(response.code),
        _ => None,
    }
}

/// Classify a watcher error, by status code when the API server sent one
#[must_use]
pub fn classify_watcher_error(error: &watcher::Error) -> WatchErrorKind {
    match watch_error_status(error) {
        Some(code) => classify_status_code(code),
        None => classify_watch_error(&format!("{error:?}")),
    }
}

/// `code: NNN` as rendered by the Debug output of an API error response
fn status_code_in(message: &str) -> Option<u16> {
    let (_, rest) = message.split_once("code: ")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Classify a watch error from its rendered message.
///
/// An embedded `code: NNN` wins. Otherwise only API reason words are
/// matched, never bare digits, which also occur in resource versions.
#[must_use]
pub fn classify_watch_error(message: &str) -> WatchErrorKind {
    if let Some(code) = status_code_in(message) {
        return classify_status_code(code);
    }
    if message.contains("too old resource version")
        || message.contains("Expired")
        || message.contains("Gone")
    {
        return WatchErrorKind::Expired;
    }
    if message.contains("storage is (re)initializing") || message.contains("TooManyRequests") {
        return WatchErrorKind::TooManyRequests;
    }
    if message.contains("Unauthorized") || message.contains("Forbidden") {
        return WatchErrorKind::Unauthorized;
    }
    // A plain-text 404 body fails to decode as a status object
    if message.contains("ObjectNotFound")
        || message.contains("NotFound")
        || message.contains("invalid type: integer `404`")
    {
        return WatchErrorKind::NotFound;
    }
    WatchErrorKind::Other
}

/// Delay before the watch is restarted after an error of class `kind`.
///
/// `backoff_ms` holds the current 429 backoff; it doubles on each 429 up to
/// `max_backoff_ms` and is reset by the watch loop on the next good event.
pub fn watch_restart_delay(
    kind: WatchErrorKind,
    backoff_ms: &AtomicU64,
    max_backoff_ms: u64,
    restart_delay: Duration,
) -> Duration {
    match kind {
        WatchErrorKind::Expired => Duration::ZERO,
        WatchErrorKind::TooManyRequests => {
            let current = backoff_ms.load(Ordering::Relaxed);
            backoff_ms.store(
                current.saturating_mul(2).min(max_backoff_ms),
                Ordering::Relaxed,
            );
            Duration::from_millis(current)
        }
        WatchErrorKind::NotFound | WatchErrorKind::Unauthorized | WatchErrorKind::Other => {
            restart_delay
        }
    }
}

/// Log a watch stream error and wait out the delay before the watch loop
/// restarts the stream.
pub async fn handle_watch_stream_error(
    error: &watcher::Error,
    backoff_ms: &Arc<AtomicU64>,
    max_backoff_ms: u64,
    restart_delay: Duration,
) {
    let kind = classify_watcher_error(error);
    match kind {
        WatchErrorKind::Unauthorized => {
            error!(
                error = %error,
                "Watch authentication failed; check the controller's ClusterRole grants list/watch on pediaclusters"
            );
        }
        WatchErrorKind::Expired => {
            warn!(error_type = "410", "watch.error.resource_version_expired");
        }
        WatchErrorKind::TooManyRequests => {
            warn!(error_type = "429", error = %error, "watch.error.api_server_busy");
        }
        WatchErrorKind::NotFound => {
            warn!(
                error = %error,
                "PediaCluster watch returned 404; the CRD may not be installed"
            );
        }
        WatchErrorKind::Other => {
            error!(error = %error, "Watch stream error");
        }
    }

    let delay = watch_restart_delay(kind, backoff_ms, max_backoff_ms, restart_delay);
    if !delay.is_zero() {
        warn!(
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Waiting before restarting watch"
        );
        tokio::time::sleep(delay).await;
    }
}
