//! Backend factory tests

use durastate_domain::error::Error;
use durastate_domain::ports::Lifecycle;
use durastate_infrastructure::BackendFactory;
use durastate_infrastructure::config::{
    BackendConfig, CassandraConfig, DynamoDbConfig, DynamoDbCredentialsConfig, PostgresConfig,
};

#[tokio::test]
async fn test_memory_backend() {
    let backend = BackendFactory::create(&BackendConfig::Memory).await.unwrap();
    assert_eq!(backend.backend_name(), "memory");
    assert_eq!(backend.lifecycle(), Lifecycle::Stateless);
}

#[tokio::test]
async fn test_postgres_backend_starts_disconnected() {
    let backend = BackendFactory::create(&BackendConfig::Postgres(PostgresConfig::default()))
        .await
        .unwrap();
    assert_eq!(backend.backend_name(), "postgres");
    assert_eq!(backend.lifecycle(), Lifecycle::Session);

    let err = backend.get_by_key("account_1").await.unwrap_err();
    assert!(err.is_connection_error());
}

#[tokio::test]
async fn test_cassandra_backend_is_session() {
    let backend = BackendFactory::create(&BackendConfig::Cassandra(CassandraConfig::default()))
        .await
        .unwrap();
    assert_eq!(backend.backend_name(), "cassandra");
    assert_eq!(backend.lifecycle(), Lifecycle::Session);
}

#[tokio::test]
async fn test_dynamodb_backend_is_stateless() {
    let config = BackendConfig::DynamoDb(DynamoDbConfig {
        endpoint_url: Some("http://localhost:8000".to_string()),
        credentials: Some(DynamoDbCredentialsConfig {
            access_key_id: "local".to_string(),
            secret_access_key: "local".to_string(),
            session_token: None,
        }),
        ..DynamoDbConfig::default()
    });
    let backend = BackendFactory::create(&config).await.unwrap();
    assert_eq!(backend.backend_name(), "dynamodb");
    assert_eq!(backend.lifecycle(), Lifecycle::Stateless);
}

#[tokio::test]
async fn test_driver_rejection_is_configuration_error() {
    let config = BackendConfig::Cassandra(CassandraConfig {
        keyspace: "bad-keyspace".to_string(),
        ..CassandraConfig::default()
    });
    let err = BackendFactory::create(&config).await.unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
