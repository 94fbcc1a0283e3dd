//! End-to-end retry session scenarios

use super::*;
use crate::types::{Backoff, RetryPolicy};
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        backoff: Backoff::Fixed,
        delay_ms: 10,
        max_delay_ms: 100,
    }
}

#[tokio::test]
async fn fails_twice_then_succeeds() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();

    let result: Result<&str, RetryError<io::Error>> = retry(&fast_policy(3), || {
        let calls = calls_clone.clone();
        async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(io::Error::other("not yet"))
            } else {
                Ok("ok")
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), "ok");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhaustion_message_lists_each_attempt_with_distinct_timestamps() {
    let result: Result<&str, RetryError<io::Error>> =
        retry(&fast_policy(2), || async { Err(io::Error::other("boom")) }).await;

    let err = result.unwrap_err();
    let message = err.to_string();
    let attempt_lines: Vec<&str> = message
        .lines()
        .filter(|line| line.starts_with("attempt "))
        .collect();

    assert_eq!(attempt_lines.len(), 2);
    assert!(attempt_lines.iter().all(|line| line.contains("boom")));
    // The 10ms inter-attempt delay guarantees distinct millisecond stamps
    assert_ne!(attempt_lines[0], attempt_lines[1]);
    assert!(err.history()[0].at < err.history()[1].at);
}

#[tokio::test]
async fn always_failing_operation_is_attempted_exactly_max_times() {
    for max_attempts in [1u32, 2, 5] {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result: Result<&str, RetryError<io::Error>> = retry(&fast_policy(max_attempts), || {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(io::Error::other("persistent"))
            }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), max_attempts);
        assert_eq!(err.history().len(), max_attempts as usize);
    }
}

#[tokio::test]
async fn success_on_kth_attempt_runs_exactly_k_attempts() {
    let k = 4u32;
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();

    let result: Result<u32, RetryError<io::Error>> = retry(&fast_policy(10), || {
        let calls = calls_clone.clone();
        async move {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call < k {
                Err(io::Error::other("warming up"))
            } else {
                Ok(call)
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), k);
    assert_eq!(calls.load(Ordering::SeqCst), k);
}

#[tokio::test]
async fn aggregated_message_is_stable_across_renders() {
    let result: Result<&str, RetryError<io::Error>> =
        retry(&fast_policy(2), || async { Err(io::Error::other("boom")) }).await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), err.to_string());
    assert_eq!(format_attempts(err.history()), format_attempts(err.history()));
}
