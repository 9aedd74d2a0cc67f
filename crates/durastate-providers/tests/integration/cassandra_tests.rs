use std::sync::Arc;

use durastate_application::conformance::run_conformance_suite;
use durastate_providers::{
    CassandraOptions, CassandraStateBackend, ConsistencyLevel, StateStoreBackend,
};

use crate::env_or;

fn options() -> CassandraOptions {
    CassandraOptions {
        contact_points: vec![env_or("DURASTATE_TEST_CASSANDRA_NODE", "127.0.0.1:9042")],
        keyspace: env_or("DURASTATE_TEST_CASSANDRA_KEYSPACE", "durastate"),
        consistency: ConsistencyLevel::One,
        ..CassandraOptions::default()
    }
}

#[tokio::test]
#[ignore = "requires a running Cassandra or ScyllaDB with the states_store table"]
async fn test_cassandra_conformance() {
    let report = run_conformance_suite(|| async {
        Arc::new(CassandraStateBackend::new(options()).expect("backend"))
            as Arc<dyn StateStoreBackend>
    })
    .await;

    assert_eq!(report.failed, 0, "{report}");
}
