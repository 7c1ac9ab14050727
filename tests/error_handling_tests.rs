//! # Error Handling Tests
//!
//! Watch error classification, the restart decision for each class and the
//! Fibonacci retry backoff used for failed clusters.

use cluster_resource_controller::controller::backoff::FibonacciBackoff;
use anyhow::anyhow;
use cluster_resource_controller::controller::reconciler::ReconcilerError;
use cluster_resource_controller::runtime::error_policy::{
    classify_watch_error, handle_reconciliation_error, reset_backoff, watch_restart_delay,
    WatchErrorKind,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[test]
fn test_watch_error_classification() {
    let cases = vec![
        ("ApiError: Unauthorized: (ErrorResponse { code: 401 })", WatchErrorKind::Unauthorized),
        ("ApiError: too old resource version: 12345 (410)", WatchErrorKind::Expired),
        (
            "ApiError: too old resource version: 1234045 (1234567): Expired (ErrorResponse { code: 410 })",
            WatchErrorKind::Expired,
        ),
        ("ApiError: Gone", WatchErrorKind::Expired),
        ("ApiError: storage is (re)initializing", WatchErrorKind::TooManyRequests),
        ("ApiError: TooManyRequests (429)", WatchErrorKind::TooManyRequests),
        ("ObjectNotFound: pediaclusters.cluster.clusterpedia.io", WatchErrorKind::NotFound),
        ("WatchFailed(SerdeError(invalid type: integer `404`))", WatchErrorKind::NotFound),
        ("connection reset by peer", WatchErrorKind::Other),
        ("dns error: failed to lookup address: host not found", WatchErrorKind::Other),
    ];

    for (message, expected) in cases {
        assert_eq!(
            classify_watch_error(message),
            expected,
            "message {message:?} should classify as {expected:?}"
        );
    }
}

#[test]
fn test_not_found_restarts_after_delay() {
    let backoff = AtomicU64::new(1000);
    let delay = watch_restart_delay(
        WatchErrorKind::NotFound,
        &backoff,
        30_000,
        Duration::from_secs(5),
    );
    assert_eq!(delay, Duration::from_secs(5));
    assert_eq!(backoff.load(Ordering::Relaxed), 1000);
}

#[test]
fn test_restart_delays_per_error_class() {
    let backoff = AtomicU64::new(1000);
    let restart = Duration::from_secs(5);

    assert_eq!(
        watch_restart_delay(WatchErrorKind::Expired, &backoff, 30_000, restart),
        Duration::ZERO
    );
    assert_eq!(
        watch_restart_delay(WatchErrorKind::Unauthorized, &backoff, 30_000, restart),
        restart
    );
    assert_eq!(
        watch_restart_delay(WatchErrorKind::Other, &backoff, 30_000, restart),
        restart
    );
    // Only 429 touches the shared backoff
    assert_eq!(backoff.load(Ordering::Relaxed), 1000);
}

#[test]
fn test_retry_backoff_fibonacci_sequence() {
    let mut backoff = FibonacciBackoff::new(Duration::from_secs(1), Duration::from_secs(60));

    let seconds: Vec<u64> = (0..10).map(|_| backoff.next_backoff().as_secs()).collect();

    assert_eq!(seconds, vec![1, 1, 2, 3, 5, 8, 13, 21, 34, 55]);
    assert_eq!(backoff.next_backoff(), Duration::from_secs(60));
    assert_eq!(backoff.next_backoff(), Duration::from_secs(60));
}

#[test]
fn test_retry_backoff_restarts_after_success() {
    let mut states = HashMap::new();
    let min = Duration::from_secs(2);
    let max = Duration::from_secs(60);
    let failure = ReconcilerError::SchemaBuild {
        cluster: "c1".to_string(),
        source: anyhow!("schema build failed"),
    };
    for _ in 0..5 {
        handle_reconciliation_error(&failure, &mut states, min, max);
    }

    reset_backoff(&mut states, "c1");

    assert_eq!(
        handle_reconciliation_error(&failure, &mut states, min, max),
        Duration::from_secs(2)
    );
    assert_eq!(states["c1"].error_count, 1);
}
