use std::future::Future;
use std::sync::Arc;

use durastate_domain::ports::{DurableStateStore, StateStoreBackend};
use durastate_domain::value_objects::{CallContext, DurableState};

use super::fixtures::{Account, Ledger, account, ledger};
use super::{TestResult, connected_store, unique_id};

pub(super) async fn run_overwrite_tests<F, Fut>(factory: &F) -> Vec<TestResult>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    vec![
        TestResult::from_result(
            "overwrite",
            "second_write_replaces_first",
            second_write_replaces_first(factory).await,
        ),
        TestResult::from_result(
            "overwrite",
            "overwrite_with_different_type",
            overwrite_with_different_type(factory).await,
        ),
        TestResult::from_result(
            "overwrite",
            "lower_version_still_overwrites",
            lower_version_still_overwrites(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

/// After writes M1 then M2, only M2 is observable.
async fn second_write_replaces_first<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("overwrite");

    for (version, balance) in [(1, 100.0), (2, 250.0)] {
        let state = DurableState::new(pid.as_str(), version, account("acc", balance), 0, 1);
        store
            .write_state(&ctx, &state)
            .await
            .map_err(|e| e.to_string())?;
    }

    let latest = store
        .get_latest_state(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected state, got none")?;
    if latest.version_number != 2 || latest.state_as::<Account>() != Some(&account("acc", 250.0))
    {
        return Err(format!(
            "expected version 2 with balance 250, got version {} with {:?}",
            latest.version_number, latest.state
        ));
    }
    Ok(())
}

/// The record is replaced wholesale, including its manifest.
async fn overwrite_with_different_type<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("retype");

    store
        .write_state(&ctx, &DurableState::new(pid.as_str(), 1, account("a", 1.0), 0, 0))
        .await
        .map_err(|e| e.to_string())?;
    store
        .write_state(&ctx, &DurableState::new(pid.as_str(), 2, ledger("a", &[1]), 0, 0))
        .await
        .map_err(|e| e.to_string())?;

    let latest = store
        .get_latest_state(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected state, got none")?;
    if latest.state_as::<Ledger>() != Some(&ledger("a", &[1])) {
        return Err(format!("expected Ledger, got {:?}", latest.state));
    }
    Ok(())
}

/// Versions are not compared; the last write lands regardless.
async fn lower_version_still_overwrites<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("no-cas");

    store
        .write_state(&ctx, &DurableState::new(pid.as_str(), 5, account("a", 5.0), 0, 0))
        .await
        .map_err(|e| e.to_string())?;
    store
        .write_state(&ctx, &DurableState::new(pid.as_str(), 3, account("a", 3.0), 0, 0))
        .await
        .map_err(|e| e.to_string())?;

    let latest = store
        .get_latest_state(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected state, got none")?;
    if latest.version_number != 3 {
        return Err(format!(
            "expected version 3 after the second write, got {}",
            latest.version_number
        ));
    }
    Ok(())
}
