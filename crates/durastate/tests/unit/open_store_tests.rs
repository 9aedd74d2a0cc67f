//! Bootstrap tests

use std::io::Write;

use durastate::application::conformance::fixtures::{self, Account};
use durastate::application::LifecycleState;
use durastate::infrastructure::config::{BackendConfig, PostgresConfig};
use durastate::infrastructure::{ConfigBuilder, ConfigLoader};
use durastate::{CallContext, DurableState, DurableStateStore, Error, open_store};

#[tokio::test]
async fn test_memory_store_from_default_config() {
    let config = ConfigBuilder::new().build();
    let store = open_store(&config, fixtures::registry()).await.unwrap();
    let ctx = CallContext::background();

    store.connect(&ctx).await.unwrap();
    store
        .write_state(
            &ctx,
            &DurableState::new("account_1", 1, fixtures::account("account_1", 100.0), 1_000, 0),
        )
        .await
        .unwrap();

    let latest = store.get_latest_state(&ctx, "account_1").await.unwrap().unwrap();
    assert_eq!(latest.version_number, 1);
    let account = latest.state_as::<Account>().unwrap();
    assert_eq!(account.account_id, "account_1");
    assert!((account.balance - 100.0).abs() < f64::EPSILON);

    assert!(store.get_latest_state(&ctx, "account_2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_store_starts_disconnected() {
    let config = ConfigBuilder::new()
        .with_backend(BackendConfig::Postgres(PostgresConfig::default()))
        .build();
    let store = open_store(&config, fixtures::registry()).await.unwrap();

    assert_eq!(store.backend_name(), "postgres");
    assert_eq!(store.lifecycle_state().await, LifecycleState::Disconnected);

    let err = store
        .get_latest_state(&CallContext::background(), "account_1")
        .await
        .unwrap_err();
    assert!(err.is_connection_error());
}

#[tokio::test]
async fn test_store_from_config_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[backend]\nprovider = \"memory\"").unwrap();

    let config = ConfigLoader::new()
        .with_env_prefix("DURASTATE_OPEN_STORE")
        .with_config_path(file.path())
        .load()
        .unwrap();
    let store = open_store(&config, fixtures::registry()).await.unwrap();

    assert_eq!(store.backend_name(), "memory");
}

#[tokio::test]
async fn test_rejected_backend_settings() {
    let config = ConfigBuilder::new()
        .with_backend(BackendConfig::Postgres(PostgresConfig {
            table: "1states".to_string(),
            ..PostgresConfig::default()
        }))
        .build();
    let err = open_store(&config, fixtures::registry()).await.unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
