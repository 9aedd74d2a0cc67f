//! Unit tests for the DurableStore facade

use std::sync::Arc;
use std::time::Duration;

use durastate_application::conformance::fixtures::{self, Account, account};
use durastate_application::{DurableStore, LifecycleState};
use durastate_domain::error::{CancellationCause, Error};
use durastate_domain::ports::DurableStateStore;
use durastate_domain::value_objects::{CallContext, DurableState};

use crate::support::ScriptedBackend;

fn store_over(backend: &Arc<ScriptedBackend>) -> DurableStore {
    DurableStore::new(backend.clone(), fixtures::registry())
}

#[tokio::test]
async fn test_session_store_starts_disconnected() {
    let backend = Arc::new(ScriptedBackend::session());
    let store = store_over(&backend);

    assert_eq!(store.lifecycle_state().await, LifecycleState::Disconnected);
    assert_eq!(store.backend_name(), "scripted");
}

#[tokio::test]
async fn test_connect_is_idempotent() {
    let backend = Arc::new(ScriptedBackend::session());
    let store = store_over(&backend);
    let ctx = CallContext::background();

    store.connect(&ctx).await.expect("first connect");
    store.connect(&ctx).await.expect("second connect");

    assert_eq!(backend.connects(), 1);
    assert_eq!(store.lifecycle_state().await, LifecycleState::Connected);
}

#[tokio::test]
async fn test_disconnect_is_idempotent() {
    let backend = Arc::new(ScriptedBackend::session());
    let store = store_over(&backend);
    let ctx = CallContext::background();

    store.connect(&ctx).await.expect("connect");
    store.disconnect(&ctx).await.expect("first disconnect");
    store.disconnect(&ctx).await.expect("second disconnect");

    assert_eq!(backend.disconnects(), 1);
    assert_eq!(store.lifecycle_state().await, LifecycleState::Disconnected);
}

#[tokio::test]
async fn test_disconnect_before_connect_is_noop() {
    let backend = Arc::new(ScriptedBackend::session());
    let store = store_over(&backend);

    store
        .disconnect(&CallContext::background())
        .await
        .expect("disconnect");

    assert_eq!(backend.disconnects(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_connects_open_one_session() {
    let backend = Arc::new(ScriptedBackend::session());
    let store = Arc::new(store_over(&backend));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.connect(&CallContext::background()).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("join").expect("connect");
    }

    assert_eq!(backend.connects(), 1);
}

#[tokio::test]
async fn test_failed_connect_stays_disconnected() {
    let backend = Arc::new(ScriptedBackend::session().failing_connects(1));
    let store = store_over(&backend);
    let ctx = CallContext::background();

    let err = store.connect(&ctx).await.unwrap_err();
    assert!(err.is_connection_error());
    assert_eq!(store.lifecycle_state().await, LifecycleState::Disconnected);

    store.connect(&ctx).await.expect("retry by caller");
    assert_eq!(store.lifecycle_state().await, LifecycleState::Connected);
    assert_eq!(backend.connects(), 2);
}

#[tokio::test]
async fn test_ping_connects_lazily() {
    let backend = Arc::new(ScriptedBackend::session());
    let store = store_over(&backend);
    let ctx = CallContext::background();

    store.ping(&ctx).await.expect("ping");
    store.ping(&ctx).await.expect("ping again");

    assert_eq!(backend.connects(), 1);
    assert_eq!(store.lifecycle_state().await, LifecycleState::Connected);
}

#[tokio::test]
async fn test_stateless_lifecycle_is_noop() {
    let backend = Arc::new(ScriptedBackend::stateless());
    let store = store_over(&backend);
    let ctx = CallContext::background();

    assert_eq!(store.lifecycle_state().await, LifecycleState::Connected);
    store.connect(&ctx).await.expect("connect");
    store.disconnect(&ctx).await.expect("disconnect");
    store.ping(&ctx).await.expect("ping");

    assert_eq!(backend.connects(), 0);
    assert_eq!(backend.disconnects(), 0);
    assert_eq!(store.lifecycle_state().await, LifecycleState::Connected);
}

#[tokio::test]
async fn test_write_without_connect_fails() {
    let backend = Arc::new(ScriptedBackend::session());
    let store = store_over(&backend);

    let err = store
        .write_state(
            &CallContext::background(),
            &DurableState::new("account_1", 1, account("123", 123.0), 0, 1),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Connection { .. }));
    assert_eq!(backend.connects(), 0);
}

#[tokio::test]
async fn test_account_scenario() {
    let backend = Arc::new(ScriptedBackend::stateless());
    let store = store_over(&backend);
    let ctx = CallContext::background();

    store
        .write_state(
            &ctx,
            &DurableState::new("account_1", 1, account("123", 123.0), 1_700_000_000, 1),
        )
        .await
        .expect("write");

    let latest = store
        .get_latest_state(&ctx, "account_1")
        .await
        .expect("read")
        .expect("present");
    assert_eq!(latest.state_as::<Account>(), Some(&account("123", 123.0)));
    assert_eq!(latest.timestamp, 1_700_000_000);

    let missing = store.get_latest_state(&ctx, "account_2").await.expect("read");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_cancelled_context_skips_backend() {
    let backend = Arc::new(ScriptedBackend::session());
    let store = store_over(&backend);
    let ctx = CallContext::background();
    ctx.token().cancel();

    let err = store.connect(&ctx).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(backend.connects(), 0);
    assert_eq!(store.lifecycle_state().await, LifecycleState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_abandons_slow_write() {
    let backend = Arc::new(ScriptedBackend::stateless().slow_upserts(Duration::from_secs(30)));
    let store = store_over(&backend);
    let ctx = CallContext::background().timeout(Duration::from_millis(100));

    let err = store
        .write_state(&ctx, &DurableState::new("slow", 1, account("s", 1.0), 0, 0))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Cancelled {
            cause: CancellationCause::DeadlineExceeded,
            ..
        }
    ));
    assert_eq!(backend.stored(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_token_cancels_in_flight_write() {
    let backend = Arc::new(ScriptedBackend::stateless().slow_upserts(Duration::from_secs(30)));
    let store = store_over(&backend);
    let ctx = CallContext::background();

    let token = ctx.token().clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
    });

    let err = store
        .write_state(&ctx, &DurableState::new("slow", 1, account("s", 1.0), 0, 0))
        .await
        .unwrap_err();

    match err {
        Error::Cancelled { operation, cause } => {
            assert_eq!(operation, "write_state");
            assert_eq!(cause, CancellationCause::Cancelled);
        }
        other => panic!("Expected Cancelled error, got {other:?}"),
    }
    assert_eq!(backend.stored(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_disconnect_allows_reconnect() {
    let backend = Arc::new(ScriptedBackend::session().slow_disconnects(Duration::from_secs(5)));
    let store = store_over(&backend);
    store.connect(&CallContext::background()).await.unwrap();

    let ctx = CallContext::background().timeout(Duration::from_millis(10));
    let err = store.disconnect(&ctx).await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(store.lifecycle_state().await, LifecycleState::Disconnected);

    let ctx = CallContext::background();
    store.ping(&ctx).await.unwrap();
    assert_eq!(backend.connects(), 2);
    store
        .write_state(&ctx, &DurableState::new("account_1", 2, account("1", 5.0), 0, 0))
        .await
        .unwrap();
    assert!(store.get_latest_state(&ctx, "account_1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_debug_names_backend() {
    let backend = Arc::new(ScriptedBackend::stateless());
    let store = store_over(&backend);

    let debug = format!("{store:?}");
    assert!(debug.contains("scripted"));
    assert!(debug.contains("durastate.conformance.Account"));
}
