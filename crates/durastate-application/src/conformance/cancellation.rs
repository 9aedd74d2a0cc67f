use std::future::Future;
use std::sync::Arc;

use durastate_domain::error::{CancellationCause, Error};
use durastate_domain::ports::{DurableStateStore, StateStoreBackend};
use durastate_domain::value_objects::{CallContext, DurableState};
use tokio::time::Instant;

use super::fixtures::account;
use super::{TestResult, connected_store, unique_id};

pub(super) async fn run_cancellation_tests<F, Fut>(factory: &F) -> Vec<TestResult>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    vec![
        TestResult::from_result(
            "cancellation",
            "cancelled_write_is_not_applied",
            cancelled_write_is_not_applied(factory).await,
        ),
        TestResult::from_result(
            "cancellation",
            "cancelled_read_fails_with_cancelled",
            cancelled_read_fails_with_cancelled(factory).await,
        ),
        TestResult::from_result(
            "cancellation",
            "expired_deadline_fails_with_deadline_exceeded",
            expired_deadline_fails_with_deadline_exceeded(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

/// A write under a fired token fails and leaves nothing behind.
async fn cancelled_write_is_not_applied<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let pid = unique_id("cancelled");
    let cancelled = CallContext::background();
    cancelled.token().cancel();

    match store
        .write_state(&cancelled, &DurableState::new(pid.as_str(), 1, account("c", 1.0), 0, 0))
        .await
    {
        Err(Error::Cancelled {
            cause: CancellationCause::Cancelled,
            ..
        }) => {}
        other => return Err(format!("expected Cancelled, got {other:?}")),
    }

    let latest = store
        .get_latest_state(&CallContext::background(), &pid)
        .await
        .map_err(|e| e.to_string())?;
    if latest.is_some() {
        return Err("cancelled write was applied".to_string());
    }
    Ok(())
}

async fn cancelled_read_fails_with_cancelled<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let cancelled = CallContext::background();
    cancelled.token().cancel();

    match store.get_latest_state(&cancelled, &unique_id("read")).await {
        Err(e) if e.is_cancelled() => Ok(()),
        other => Err(format!("expected Cancelled, got {other:?}")),
    }
}

async fn expired_deadline_fails_with_deadline_exceeded<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let expired = CallContext::background().deadline_at(Instant::now());

    match store.get_latest_state(&expired, &unique_id("deadline")).await {
        Err(Error::Cancelled {
            cause: CancellationCause::DeadlineExceeded,
            ..
        }) => Ok(()),
        other => Err(format!("expected DeadlineExceeded, got {other:?}")),
    }
}
