use std::future::Future;
use std::sync::Arc;

use durastate_domain::ports::{DurableStateStore, StateStoreBackend};
use durastate_domain::value_objects::{CallContext, DurableState};

use super::fixtures::{Account, Ledger, account, ledger};
use super::{TestResult, connected_store, unique_id};

pub(super) async fn run_roundtrip_tests<F, Fut>(factory: &F) -> Vec<TestResult>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    vec![
        TestResult::from_result(
            "roundtrip",
            "written_message_reads_back_equal",
            written_message_reads_back_equal(factory).await,
        ),
        TestResult::from_result(
            "roundtrip",
            "metadata_returned_verbatim",
            metadata_returned_verbatim(factory).await,
        ),
        TestResult::from_result(
            "roundtrip",
            "extreme_metadata_values_preserved",
            extreme_metadata_values_preserved(factory).await,
        ),
        TestResult::from_result(
            "roundtrip",
            "default_message_roundtrips",
            default_message_roundtrips(factory).await,
        ),
        TestResult::from_result(
            "roundtrip",
            "repeated_fields_roundtrip",
            repeated_fields_roundtrip(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

/// Write `{account_id: "123", balance: 123}` and read it back unchanged.
async fn written_message_reads_back_equal<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("account_1");

    let state = DurableState::new(pid.as_str(), 1, account("123", 123.0), 1_700_000_000, 1);
    store
        .write_state(&ctx, &state)
        .await
        .map_err(|e| e.to_string())?;

    let latest = store
        .get_latest_state(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("expected state for {pid}, got none"))?;
    match latest.state_as::<Account>() {
        Some(read) if *read == account("123", 123.0) => Ok(()),
        Some(read) => Err(format!("expected account 123/123, got {read:?}")),
        None => Err(format!("expected Account, got {}", latest.manifest())),
    }
}

/// Version, timestamp and shard come back exactly as written.
async fn metadata_returned_verbatim<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("metadata");

    let state = DurableState::new(pid.as_str(), 42, account("m", 1.5), -17, 9);
    store
        .write_state(&ctx, &state)
        .await
        .map_err(|e| e.to_string())?;

    let latest = store
        .get_latest_state(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected state, got none")?;
    if latest.persistence_id != pid
        || latest.version_number != 42
        || latest.timestamp != -17
        || latest.shard != 9
    {
        return Err(format!(
            "expected ({pid}, 42, -17, 9), got ({}, {}, {}, {})",
            latest.persistence_id, latest.version_number, latest.timestamp, latest.shard
        ));
    }
    Ok(())
}

/// The largest values every backend can store without truncation.
async fn extreme_metadata_values_preserved<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("extreme");
    let max = i64::MAX.unsigned_abs();

    let state = DurableState::new(pid.as_str(), max, account("x", 0.0), i64::MIN, max);
    store
        .write_state(&ctx, &state)
        .await
        .map_err(|e| e.to_string())?;

    let latest = store
        .get_latest_state(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected state, got none")?;
    if latest.version_number != max || latest.shard != max || latest.timestamp != i64::MIN {
        return Err(format!(
            "extreme values changed: version={}, shard={}, timestamp={}",
            latest.version_number, latest.shard, latest.timestamp
        ));
    }
    Ok(())
}

/// A message with every field at its default encodes to an empty body.
async fn default_message_roundtrips<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("default");

    let state = DurableState::new(pid.as_str(), 1, Ledger::default(), 0, 0);
    store
        .write_state(&ctx, &state)
        .await
        .map_err(|e| e.to_string())?;

    let latest = store
        .get_latest_state(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected state, got none")?;
    if latest.state_as::<Ledger>() != Some(&Ledger::default()) {
        return Err(format!("expected default Ledger, got {:?}", latest.state));
    }
    Ok(())
}

async fn repeated_fields_roundtrip<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("ledger");
    let mut expected = ledger("alice", &[10, -20, 30, i64::MAX]);
    expected.frozen = true;

    let state = DurableState::new(pid.as_str(), 3, expected.clone(), 5, 2);
    store
        .write_state(&ctx, &state)
        .await
        .map_err(|e| e.to_string())?;

    let latest = store
        .get_latest_state(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected state, got none")?;
    if latest.state_as::<Ledger>() != Some(&expected) {
        return Err(format!("expected {expected:?}, got {:?}", latest.state));
    }
    Ok(())
}
