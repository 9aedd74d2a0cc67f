//! Conformance test suite for backend drivers.
//!
//! Backend-agnostic checks that any [`StateStoreBackend`] must pass when
//! driven through the [`DurableStore`] facade:
//!
//! - **Round-trip**: a written message reads back field-for-field equal
//! - **Overwrite**: a second write fully replaces the first
//! - **Absence**: never-written IDs read as `None`, not an error
//! - **Isolation**: distinct persistence IDs never see each other's state
//! - **Lifecycle**: idempotent connect/disconnect, lazy reconnect on ping
//! - **Codec**: unknown manifests and corrupt payloads fail with codec errors
//! - **Cancellation**: fired contexts fail with `Cancelled` and write nothing
//! - **Concurrency**: parallel writers, last writer wins per ID
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory that returns
//! a backend over an existing table. Every check writes under fresh
//! persistence IDs, so the table does not need to be empty:
//!
//! ```ignore
//! use durastate_application::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn memory_conformance() {
//!     let report = run_conformance_suite(|| async {
//!         Arc::new(MemoryStateBackend::new()) as Arc<dyn StateStoreBackend>
//!     })
//!     .await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod absence;
mod cancellation;
mod codec;
mod concurrent;
pub mod fixtures;
mod lifecycle;
mod overwrite;
mod roundtrip;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use durastate_domain::codec::TypeRegistry;
use durastate_domain::ports::{DurableStateStore, StateStoreBackend};
use durastate_domain::value_objects::CallContext;
use uuid::Uuid;

use crate::store::DurableStore;

/// Result of a single conformance check.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Check category (e.g. "roundtrip", "lifecycle").
    pub category: String,
    /// Check name.
    pub name: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Failure description.
    pub message: Option<String>,
}

impl TestResult {
    fn pass(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(category: &str, name: &str, msg: String) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: false,
            message: Some(msg),
        }
    }

    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::pass(category, name),
            Err(msg) => Self::fail(category, name, msg),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl ConformanceReport {
    /// Names of failed checks as `category/name`
    pub fn failures(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| format!("{}/{}", r.category, r.name))
            .collect()
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a backend driver.
///
/// `factory` is called once per check to create a fresh driver instance.
pub async fn run_conformance_suite<F, Fut>(factory: F) -> ConformanceReport
where
    F: Fn() -> Fut,
    Fut: Future<Output = Arc<dyn StateStoreBackend>>,
{
    let mut results = Vec::new();

    results.extend(roundtrip::run_roundtrip_tests(&factory).await);
    results.extend(overwrite::run_overwrite_tests(&factory).await);
    results.extend(absence::run_absence_tests(&factory).await);
    results.extend(lifecycle::run_lifecycle_tests(&factory).await);
    results.extend(codec::run_codec_tests(&factory).await);
    results.extend(cancellation::run_cancellation_tests(&factory).await);
    results.extend(concurrent::run_concurrent_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Wrap `backend` in a connected facade decoding the fixture types.
async fn connected_store(backend: Arc<dyn StateStoreBackend>) -> Result<DurableStore, String> {
    connected_store_with(backend, fixtures::registry()).await
}

async fn connected_store_with(
    backend: Arc<dyn StateStoreBackend>,
    registry: Arc<TypeRegistry>,
) -> Result<DurableStore, String> {
    let store = DurableStore::new(backend, registry);
    store
        .connect(&CallContext::background())
        .await
        .map_err(|e| format!("connect failed: {e}"))?;
    Ok(store)
}

/// A persistence ID no other check or run has used.
fn unique_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}
