//! Operator command tests

use std::time::Duration;

use clap::Parser;
use durastate::application::conformance::fixtures;
use durastate::cli::{Cli, Command, RecordSummary, execute};
use durastate::infrastructure::ConfigBuilder;
use durastate::{CallContext, DurableState, DurableStateStore, DurableStore, open_store};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn memory_store() -> DurableStore {
    open_store(&ConfigBuilder::new().build(), fixtures::registry())
        .await
        .unwrap()
}

fn output_json(out: &[u8]) -> serde_json::Value {
    serde_json::from_slice(out).unwrap()
}

#[test]
fn test_parse_inspect_with_global_config() {
    let cli = Cli::try_parse_from([
        "durastate",
        "inspect",
        "account_1",
        "--config",
        "/etc/durastate.toml",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Command::Inspect {
            persistence_id: "account_1".to_string()
        }
    );
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/etc/durastate.toml")));
    assert_eq!(cli.timeout_secs, 10);
}

#[test]
fn test_parse_requires_subcommand() {
    assert!(Cli::try_parse_from(["durastate"]).is_err());
    assert!(Cli::try_parse_from(["durastate", "inspect"]).is_err());
}

#[tokio::test]
async fn test_ping_reports_up() {
    let store = memory_store().await;
    let mut out = Vec::new();

    let healthy = execute(&Command::Ping, &store, TIMEOUT, &mut out).await.unwrap();

    assert!(healthy);
    let json = output_json(&out);
    assert_eq!(json["name"], "memory");
    assert_eq!(json["status"], "up");
}

#[tokio::test]
async fn test_inspect_prints_metadata_without_decoding() {
    let writer = memory_store().await;
    let ctx = CallContext::background();
    writer
        .write_state(
            &ctx,
            &DurableState::new("ledger_7", 3, fixtures::ledger("ledger_7", &[5, -2]), 0, 12),
        )
        .await
        .unwrap();
    let record = writer
        .get_latest_record(&ctx, "ledger_7")
        .await
        .unwrap()
        .unwrap();

    let mut out = Vec::new();
    let ok = execute(
        &Command::Inspect {
            persistence_id: "ledger_7".to_string(),
        },
        &writer,
        TIMEOUT,
        &mut out,
    )
    .await
    .unwrap();

    assert!(ok);
    let json = output_json(&out);
    assert_eq!(json["persistence_id"], "ledger_7");
    assert_eq!(json["found"], true);
    assert_eq!(json["manifest"], "durastate.conformance.Ledger");
    assert_eq!(json["version_number"], 3);
    assert_eq!(json["shard_number"], 12);
    assert_eq!(json["timestamp_utc"], "1970-01-01T00:00:00+00:00");
    assert_eq!(json["payload_bytes"], record.state_payload.len());
}

#[tokio::test]
async fn test_inspect_reports_absence() {
    let store = memory_store().await;
    let mut out = Vec::new();

    let ok = execute(
        &Command::Inspect {
            persistence_id: "nobody".to_string(),
        },
        &store,
        TIMEOUT,
        &mut out,
    )
    .await
    .unwrap();

    assert!(ok);
    let json = output_json(&out);
    assert_eq!(json["found"], false);
    assert!(json.get("manifest").is_none());
}

#[tokio::test]
async fn test_inspect_rejects_empty_id() {
    let store = memory_store().await;
    let mut out = Vec::new();
    let result = execute(
        &Command::Inspect {
            persistence_id: String::new(),
        },
        &store,
        TIMEOUT,
        &mut out,
    )
    .await;

    assert!(result.is_err());
    assert!(out.is_empty());
}

#[test]
fn test_summary_of_absent_record() {
    let summary = RecordSummary::new("account_1", None);
    assert!(!summary.found);
    assert!(summary.record.is_none());
}
