//! Configuration type tests

use std::time::Duration;

use durastate_infrastructure::config::{
    AppConfig, BackendConfig, CassandraConfig, DynamoDbConfig, DynamoDbCredentialsConfig,
    PostgresConfig,
};
use durastate_providers::ConsistencyLevel;

#[test]
fn test_default_backend_is_memory() {
    let config = AppConfig::default();
    assert_eq!(config.backend, BackendConfig::Memory);
    assert_eq!(config.backend.provider(), "memory");
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json_format);
}

#[test]
fn test_provider_tag_selects_variant() {
    let config: AppConfig = toml::from_str(
        r#"
        [backend]
        provider = "dynamodb"
        table = "actor_states"
        consistent_read = true
        "#,
    )
    .unwrap();

    let BackendConfig::DynamoDb(dynamodb) = &config.backend else {
        panic!("expected dynamodb, got {:?}", config.backend);
    };
    assert_eq!(dynamodb.table, "actor_states");
    assert!(dynamodb.consistent_read);
    assert_eq!(dynamodb.region, "us-east-1");
}

#[test]
fn test_unknown_provider_rejected() {
    let parsed = toml::from_str::<AppConfig>(
        r#"
        [backend]
        provider = "mongodb"
        "#,
    );
    assert!(parsed.is_err());
}

#[test]
fn test_postgres_schema_qualifies_table() {
    let config = PostgresConfig {
        schema: Some("actors".to_string()),
        max_lifetime_secs: Some(1800),
        ..PostgresConfig::default()
    };
    let options = config.to_options();
    assert_eq!(options.table, "actors.states_store");
    assert_eq!(options.max_lifetime, Some(Duration::from_secs(1800)));
    assert_eq!(options.idle_timeout, None);
    assert_eq!(options.port, 5432);
}

#[test]
fn test_cassandra_consistency_defaults_to_quorum() {
    let config: CassandraConfig = toml::from_str(r#"keyspace = "actors""#).unwrap();
    assert_eq!(config.consistency, ConsistencyLevel::Quorum);

    let config: CassandraConfig = toml::from_str(r#"consistency = "local_one""#).unwrap();
    assert_eq!(config.to_options().consistency, ConsistencyLevel::LocalOne);
}

#[test]
fn test_dynamodb_credentials_carried_and_redacted() {
    let config = DynamoDbConfig {
        endpoint_url: Some("http://localhost:8000".to_string()),
        credentials: Some(DynamoDbCredentialsConfig {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI".to_string(),
            session_token: None,
        }),
        ..DynamoDbConfig::default()
    };

    let options = config.to_options();
    let credentials = options.credentials.expect("credentials");
    assert_eq!(credentials.access_key_id, "AKIDEXAMPLE");
    assert_eq!(credentials.secret_access_key, "wJalrXUtnFEMI");

    let debug = format!("{config:?}");
    assert!(debug.contains("AKIDEXAMPLE"));
    assert!(!debug.contains("wJalrXUtnFEMI"));
}
