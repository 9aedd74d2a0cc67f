use std::future::Future;
use std::sync::Arc;

use durastate_domain::ports::{DurableStateStore, StateStoreBackend};
use durastate_domain::value_objects::{CallContext, DurableState};

use super::fixtures::{Account, account};
use super::{TestResult, connected_store, unique_id};

/// Number of concurrent writers in each check.
const N: u32 = 10;

pub(super) async fn run_concurrent_tests<F, Fut>(factory: &F) -> Vec<TestResult>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    vec![
        TestResult::from_result(
            "concurrent",
            "parallel_writers_to_distinct_ids_all_land",
            parallel_writers_to_distinct_ids_all_land(factory).await,
        ),
        TestResult::from_result(
            "concurrent",
            "parallel_writers_to_one_id_leave_one_whole_record",
            parallel_writers_to_one_id_leave_one_whole_record(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

async fn parallel_writers_to_distinct_ids_all_land<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = Arc::new(connected_store(factory().await).await?);
    let prefix = unique_id("parallel");

    let mut handles = Vec::new();
    for i in 0..N {
        let store = Arc::clone(&store);
        let pid = format!("{prefix}-{i}");
        handles.push(tokio::spawn(async move {
            let state = DurableState::new(pid, u64::from(i), account("p", f64::from(i)), 0, 0);
            store.write_state(&CallContext::background(), &state).await
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| format!("writer task failed: {e}"))?
            .map_err(|e| e.to_string())?;
    }

    let ctx = CallContext::background();
    for i in 0..N {
        let pid = format!("{prefix}-{i}");
        let latest = store
            .get_latest_state(&ctx, &pid)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("expected state for {pid}, got none"))?;
        if latest.state_as::<Account>() != Some(&account("p", f64::from(i))) {
            return Err(format!("{pid}: wrong state {:?}", latest.state));
        }
    }
    Ok(())
}

/// The surviving record is one writer's record in full: its version and
/// payload always agree.
async fn parallel_writers_to_one_id_leave_one_whole_record<F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = Arc::new(connected_store(factory().await).await?);
    let pid = unique_id("contended");

    let mut handles = Vec::new();
    for i in 1..=N {
        let store = Arc::clone(&store);
        let pid = pid.clone();
        handles.push(tokio::spawn(async move {
            let state = DurableState::new(pid, u64::from(i), account("c", f64::from(i)), 0, 0);
            store.write_state(&CallContext::background(), &state).await
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| format!("writer task failed: {e}"))?
            .map_err(|e| e.to_string())?;
    }

    let latest = store
        .get_latest_state(&CallContext::background(), &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected state, got none")?;
    let version = latest.version_number;
    let balance = latest
        .state_as::<Account>()
        .map(|a| a.balance)
        .ok_or_else(|| format!("expected Account, got {:?}", latest.state))?;

    let Ok(writer) = u32::try_from(version) else {
        return Err(format!("version {version} was never written"));
    };
    if !(1..=N).contains(&writer) || (balance - f64::from(writer)).abs() > f64::EPSILON {
        return Err(format!(
            "record mixes writers: version {version} with balance {balance}"
        ));
    }
    Ok(())
}
