//! Conformance suite run against the scripted backend in both lifecycles

use std::sync::Arc;

use durastate_application::conformance::run_conformance_suite;
use durastate_domain::ports::StateStoreBackend;

use crate::support::ScriptedBackend;

#[tokio::test]
async fn test_session_backend_conformance() {
    let report = run_conformance_suite(|| async {
        Arc::new(ScriptedBackend::session()) as Arc<dyn StateStoreBackend>
    })
    .await;

    assert_eq!(report.failed, 0, "{report}");
    assert!(report.total > 20);
}

#[tokio::test]
async fn test_stateless_backend_conformance() {
    let report = run_conformance_suite(|| async {
        Arc::new(ScriptedBackend::stateless()) as Arc<dyn StateStoreBackend>
    })
    .await;

    assert_eq!(report.failed, 0, "{report}");
}

#[tokio::test]
async fn test_report_lists_failures() {
    // A session backend that never connects fails every check that writes
    let report = run_conformance_suite(|| async {
        Arc::new(ScriptedBackend::session().failing_connects(usize::MAX))
            as Arc<dyn StateStoreBackend>
    })
    .await;

    assert!(report.failed > 0);
    assert!(
        report
            .failures()
            .contains(&"roundtrip/written_message_reads_back_equal".to_string())
    );
    assert!(report.to_string().contains("FAIL [roundtrip/"));
}
