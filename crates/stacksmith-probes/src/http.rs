//! HTTP readiness probes
//!
//! One attempt is one request. A non-2xx/3xx status is re-signaled as
//! `HttpStatus` so the retry engine treats it like any other transient
//! failure; transport errors pass through as-is. All retry and timing
//! behavior comes from the shared engine.

use crate::error::ProbeError;
use reqwest::{Client, Method};
use stacksmith_core::retry::{ClosurePredicate, RetryError, RetryExecutorBuilder, TracingObserver};
use stacksmith_core::types::RetryPolicy;

/// Probe a URL with GET until it answers with a success status
///
/// Uses the default retry budget. Returns the body of the first successful
/// response.
pub async fn probe_get(url: &str) -> Result<String, RetryError<ProbeError>> {
    probe_with_policy(Method::GET, url, None, &RetryPolicy::default()).await
}

/// Probe a URL with POST until it answers with a success status
pub async fn probe_post(url: &str, body: String) -> Result<String, RetryError<ProbeError>> {
    probe_with_policy(Method::POST, url, Some(body), &RetryPolicy::default()).await
}

/// Probe with an explicit retry policy
pub async fn probe_with_policy(
    method: Method,
    url: &str,
    body: Option<String>,
    policy: &RetryPolicy,
) -> Result<String, RetryError<ProbeError>> {
    let client = Client::new();

    RetryExecutorBuilder::new()
        .with_policy(policy.clone())
        .with_predicate(ClosurePredicate::new(|err: &ProbeError| err.is_retryable()))
        .with_observer(TracingObserver::new("http-probe"))
        .build()
        .execute(|| {
            let client = client.clone();
            let method = method.clone();
            let url = url.to_string();
            let body = body.clone();
            async move { attempt(&client, method, &url, body).await }
        })
        .await
}

async fn attempt(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<String>,
) -> Result<String, ProbeError> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.body(body);
    }

    let response = request.send().await?;
    let status = response.status();
    if !(status.is_success() || status.is_redirection()) {
        return Err(ProbeError::http_status(status.as_u16()));
    }

    Ok(response.text().await?)
}
