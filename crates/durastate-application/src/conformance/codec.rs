use std::future::Future;
use std::sync::Arc;

use durastate_domain::codec::TypeRegistry;
use durastate_domain::error::Error;
use durastate_domain::ports::{DurableStateStore, StateStoreBackend};
use durastate_domain::value_objects::{CallContext, DurableState, DurableStateRecord};
use prost::Name;

use super::fixtures::{Account, Ledger, account};
use super::{TestResult, connected_store, connected_store_with, unique_id};

pub(super) async fn run_codec_tests<F, Fut>(factory: &F) -> Vec<TestResult>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    vec![
        TestResult::from_result(
            "codec",
            "unregistered_type_fails_with_unknown_type",
            unregistered_type_fails_with_unknown_type(factory).await,
        ),
        TestResult::from_result(
            "codec",
            "foreign_manifest_fails_with_unknown_type",
            foreign_manifest_fails_with_unknown_type(factory).await,
        ),
        TestResult::from_result(
            "codec",
            "corrupt_payload_fails_with_decoding",
            corrupt_payload_fails_with_decoding(factory).await,
        ),
        TestResult::from_result(
            "codec",
            "stored_record_matches_codec_output",
            stored_record_matches_codec_output(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

/// A reader that never registered the written type cannot decode it.
async fn unregistered_type_fails_with_unknown_type<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let backend = factory().await;
    let writer = connected_store(Arc::clone(&backend)).await?;
    let reader =
        connected_store_with(backend, TypeRegistry::new().with::<Ledger>().into_shared()).await?;
    let ctx = CallContext::background();
    let pid = unique_id("unknown");

    writer
        .write_state(&ctx, &DurableState::new(pid.as_str(), 1, account("a", 1.0), 0, 0))
        .await
        .map_err(|e| e.to_string())?;

    match reader.get_latest_state(&ctx, &pid).await {
        Err(Error::UnknownType { manifest }) if manifest == Account::full_name() => Ok(()),
        other => Err(format!("expected UnknownType, got {other:?}")),
    }
}

/// A record written by another process under a type nobody registered.
async fn foreign_manifest_fails_with_unknown_type<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let backend = factory().await;
    let store = connected_store(Arc::clone(&backend)).await?;
    let ctx = CallContext::background();
    let pid = unique_id("foreign");

    let record = DurableStateRecord {
        persistence_id: pid.clone(),
        version_number: 1,
        state_payload: vec![1, 2, 3],
        state_manifest: "elsewhere.Unregistered".to_string(),
        timestamp: 0,
        shard_number: 0,
    };
    backend.upsert(&record).await.map_err(|e| e.to_string())?;

    match store.get_latest_state(&ctx, &pid).await {
        Err(Error::UnknownType { .. }) => {}
        other => return Err(format!("expected UnknownType, got {other:?}")),
    }

    let raw = store
        .get_latest_record(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?;
    if raw.as_ref() != Some(&record) {
        return Err(format!("expected raw record {record:?}, got {raw:?}"));
    }
    Ok(())
}

async fn corrupt_payload_fails_with_decoding<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let backend = factory().await;
    let store = connected_store(Arc::clone(&backend)).await?;
    let pid = unique_id("corrupt");

    let record = DurableStateRecord {
        persistence_id: pid.clone(),
        version_number: 1,
        state_payload: vec![0xff, 0xff, 0xff],
        state_manifest: Account::full_name(),
        timestamp: 0,
        shard_number: 0,
    };
    backend.upsert(&record).await.map_err(|e| e.to_string())?;

    match store.get_latest_state(&CallContext::background(), &pid).await {
        Err(Error::Decoding { .. }) => Ok(()),
        other => Err(format!("expected Decoding error, got {other:?}")),
    }
}

/// The backend stores exactly the bytes and manifest the codec produced.
async fn stored_record_matches_codec_output<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("bytes");
    let state = DurableState::new(pid.as_str(), 4, account("b", 4.0), 44, 4);

    store
        .write_state(&ctx, &state)
        .await
        .map_err(|e| e.to_string())?;
    let expected =
        DurableStateRecord::from_state(store.codec(), &state).map_err(|e| e.to_string())?;

    let stored = store
        .get_latest_record(&ctx, &pid)
        .await
        .map_err(|e| e.to_string())?
        .ok_or("expected record, got none")?;
    if stored != expected {
        return Err(format!("expected {expected:?}, got {stored:?}"));
    }
    Ok(())
}
