use std::future::Future;
use std::sync::Arc;

use durastate_domain::ports::{DurableStateStore, Lifecycle, StateStoreBackend};
use durastate_domain::value_objects::{CallContext, DurableState};

use super::fixtures::account;
use super::{TestResult, connected_store, unique_id};
use crate::store::{DurableStore, LifecycleState};

pub(super) async fn run_lifecycle_tests<F, Fut>(factory: &F) -> Vec<TestResult>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    vec![
        TestResult::from_result(
            "lifecycle",
            "connect_twice_succeeds",
            connect_twice_succeeds(factory).await,
        ),
        TestResult::from_result(
            "lifecycle",
            "disconnect_twice_succeeds",
            disconnect_twice_succeeds(factory).await,
        ),
        TestResult::from_result(
            "lifecycle",
            "ping_reconnects_after_disconnect",
            ping_reconnects_after_disconnect(factory).await,
        ),
        TestResult::from_result(
            "lifecycle",
            "no_implicit_connect_on_write",
            no_implicit_connect_on_write(factory).await,
        ),
    ]
}

// ── Test implementations ──────────────────────────────────────────────────────

async fn connect_twice_succeeds<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();

    store
        .connect(&ctx)
        .await
        .map_err(|e| format!("second connect failed: {e}"))?;
    if store.lifecycle_state().await != LifecycleState::Connected {
        return Err("expected Connected after two connects".to_string());
    }
    Ok(())
}

async fn disconnect_twice_succeeds<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();

    store
        .disconnect(&ctx)
        .await
        .map_err(|e| format!("first disconnect failed: {e}"))?;
    store
        .disconnect(&ctx)
        .await
        .map_err(|e| format!("second disconnect failed: {e}"))?;
    Ok(())
}

/// Ping on a disconnected store reopens it and the store is usable again.
async fn ping_reconnects_after_disconnect<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let store = connected_store(factory().await).await?;
    let ctx = CallContext::background();
    let pid = unique_id("ping");

    store.disconnect(&ctx).await.map_err(|e| e.to_string())?;
    store
        .ping(&ctx)
        .await
        .map_err(|e| format!("ping failed: {e}"))?;
    if store.lifecycle_state().await != LifecycleState::Connected {
        return Err("expected Connected after ping".to_string());
    }

    store
        .write_state(&ctx, &DurableState::new(pid.as_str(), 1, account("p", 1.0), 0, 0))
        .await
        .map_err(|e| format!("write after ping failed: {e}"))?;
    store
        .get_latest_state(&ctx, &pid)
        .await
        .map_err(|e| format!("read after ping failed: {e}"))?
        .ok_or("expected state after ping, got none")?;
    Ok(())
}

/// Session backends reject writes until connected; stateless ones accept them.
async fn no_implicit_connect_on_write<F, Fut>(factory: &F) -> Result<(), String>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let backend = factory().await;
    let lifecycle = backend.lifecycle();
    let store = DurableStore::new(backend, super::fixtures::registry());
    let ctx = CallContext::background();
    let pid = unique_id("unconnected");

    let result = store
        .write_state(&ctx, &DurableState::new(pid.as_str(), 1, account("u", 1.0), 0, 0))
        .await;

    match (lifecycle, result) {
        (Lifecycle::Session, Err(e)) if e.is_connection_error() => {}
        (Lifecycle::Session, other) => {
            return Err(format!(
                "expected Connection error before connect, got {other:?}"
            ));
        }
        (Lifecycle::Stateless, Ok(())) => {}
        (Lifecycle::Stateless, Err(e)) => {
            return Err(format!("stateless backend rejected write: {e}"));
        }
    }

    if lifecycle == Lifecycle::Session
        && store.lifecycle_state().await != LifecycleState::Disconnected
    {
        return Err("write must not connect the store".to_string());
    }
    Ok(())
}
