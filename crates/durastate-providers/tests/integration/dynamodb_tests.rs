use std::sync::Arc;

use durastate_application::conformance::run_conformance_suite;
use durastate_providers::{
    DynamoDbOptions, DynamoDbStateBackend, StateStoreBackend, StaticCredentials,
};

use crate::env_or;

fn options() -> DynamoDbOptions {
    DynamoDbOptions {
        endpoint_url: Some(env_or(
            "DURASTATE_TEST_DYNAMODB_ENDPOINT",
            "http://localhost:8000",
        )),
        credentials: Some(StaticCredentials {
            access_key_id: "local".to_string(),
            secret_access_key: "local".to_string(),
            session_token: None,
        }),
        consistent_read: true,
        ..DynamoDbOptions::default()
    }
}

#[tokio::test]
#[ignore = "requires DynamoDB Local with the states_store table"]
async fn test_dynamodb_conformance() {
    let report = run_conformance_suite(|| async {
        Arc::new(
            DynamoDbStateBackend::from_options(options())
                .await
                .expect("backend"),
        ) as Arc<dyn StateStoreBackend>
    })
    .await;

    assert_eq!(report.failed, 0, "{report}");
}
