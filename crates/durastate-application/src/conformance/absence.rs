use std::future::Future;
use std::sync::Arc;

use durastate_domain::error::Error;
use durastate_domain::ports::{DurableStateStore, StateStoreBackend};
use durastate_domain::value_objects::{CallContext, DurableState};

use super::fixtures::{Account, account};
use super::{TestResult, connected_store, unique_id};

pub(super) async fn run_absence_tests<F, Fut>(factory: &F) -> Vec<TestResult>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    vec![
        TestResult::from_result(
            "absence",
            "never_written_is_absent",
            never_written_is_absent(factory).await,
        ),
        TestResult::from_result(
            "absence",
            "absent_beside_written_neighbour",
            absent_beside_written_neighbour(factory).await,
        ),
        TestResult::from_result(
            "absence",
            "empty_persistence_id_rejected",
            empty_persistence_id_rejected(factory).await,
        ),
        TestResult::from_result(
            "isolation",
            "distinct_ids_keep_own_state",
            distinct_ids_keep_own_state(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

async fn never_written_is_absent<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let pid = unique_id("account_2");

    match store.get_latest_state(&CallContext::background(), &pid).await {
        Ok(None) => Ok(()),
        Ok(Some(state)) => Err(format!("expected absent, got {:?}", state.state)),
        Err(e) => Err(format!("expected absent, got error: {e}")),
    }
}

/// Writing `account_1` must not make `account_2` visible.
async fn absent_beside_written_neighbour<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let written = unique_id("account_1");
    let missing = format!("{written}-other");

    store
        .write_state(&ctx, &DurableState::new(written.as_str(), 1, account("123", 123.0), 0, 1))
        .await
        .map_err(|e| e.to_string())?;

    match store.get_latest_state(&ctx, &missing).await {
        Ok(None) => Ok(()),
        Ok(Some(state)) => Err(format!("expected absent, got {:?}", state.state)),
        Err(e) => Err(format!("expected absent, got error: {e}")),
    }
}

async fn empty_persistence_id_rejected<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();

    match store
        .write_state(&ctx, &DurableState::new("", 1, account("x", 0.0), 0, 0))
        .await
    {
        Err(Error::InvalidArgument { .. }) => {}
        other => return Err(format!("expected InvalidArgument on write, got {other:?}")),
    }
    match store.get_latest_state(&ctx, "").await {
        Err(Error::InvalidArgument { .. }) => Ok(()),
        other => Err(format!("expected InvalidArgument on read, got {other:?}")),
    }
}

/// Two IDs written with distinct payloads each read back their own.
async fn distinct_ids_keep_own_state<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let first = unique_id("account_1");
    let second = unique_id("account_2");

    store
        .write_state(&ctx, &DurableState::new(first.as_str(), 1, account("1", 10.0), 0, 1))
        .await
        .map_err(|e| e.to_string())?;
    store
        .write_state(&ctx, &DurableState::new(second.as_str(), 7, account("2", 20.0), 0, 2))
        .await
        .map_err(|e| e.to_string())?;

    let expectations = [
        (&first, account("1", 10.0), 1),
        (&second, account("2", 20.0), 7),
    ];
    for (pid, expected, version) in expectations {
        let latest = store
            .get_latest_state(&ctx, pid)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("expected state for {pid}, got none"))?;
        if latest.state_as::<Account>() != Some(&expected) || latest.version_number != version {
            return Err(format!(
                "{pid}: expected {expected:?} at version {version}, got {:?} at version {}",
                latest.state, latest.version_number
            ));
        }
    }
    Ok(())
}
