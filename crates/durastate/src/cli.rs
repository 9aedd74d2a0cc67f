//! Operator commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `durastate ping` | Connect to the configured backend and report its health |
//! | `durastate inspect <id>` | Print the stored record's metadata without decoding it |
//!
//! Both commands print JSON on stdout. Logs go to stderr.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::application::DurableStore;
use crate::domain::{CallContext, DurableStateRecord, DurableStateStore, TypeRegistry};
use crate::infrastructure::ConfigLoader;
use crate::infrastructure::constants::HEALTH_CHECK_TIMEOUT_SECS;
use crate::infrastructure::health::check_store;
use crate::infrastructure::logging::init_logging;

/// Command line interface for the durastate operator tool
#[derive(Parser, Debug)]
#[command(name = "durastate")]
#[command(about = "Durable state store - operator tool")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Per-command timeout in seconds
    #[arg(long, global = true, default_value_t = HEALTH_CHECK_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Operator subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect to the configured backend and ping it
    Ping,
    /// Show the metadata of the latest record stored for a persistence ID
    Inspect {
        /// Persistence ID to look up
        persistence_id: String,
    },
}

/// Metadata of one stored record, or its absence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub persistence_id: String,
    pub found: bool,
    #[serde(flatten)]
    pub record: Option<RecordMetadata>,
}

/// Stored record fields, payload reduced to its size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMetadata {
    pub manifest: String,
    pub version_number: u64,
    pub timestamp: i64,
    /// `timestamp` rendered as RFC 3339
    pub timestamp_utc: String,
    pub shard_number: u64,
    pub payload_bytes: usize,
}

impl RecordSummary {
    /// Summarise the lookup result for `persistence_id`
    pub fn new(persistence_id: &str, record: Option<&DurableStateRecord>) -> Self {
        Self {
            persistence_id: persistence_id.to_string(),
            found: record.is_some(),
            record: record.map(|r| RecordMetadata {
                manifest: r.state_manifest.clone(),
                version_number: r.version_number,
                timestamp: r.timestamp,
                timestamp_utc: chrono::DateTime::from_timestamp_nanos(r.timestamp).to_rfc3339(),
                shard_number: r.shard_number,
                payload_bytes: r.state_payload.len(),
            }),
        }
    }
}

/// Load configuration, install logging and run the selected command
pub async fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(&config.logging)?;

    // inspect never decodes, so no state types are registered
    let store = crate::open_store(&config, Arc::new(TypeRegistry::new())).await?;
    let timeout = Duration::from_secs(cli.timeout_secs);
    let mut stdout = std::io::stdout();
    let ok = execute(&cli.command, &store, timeout, &mut stdout).await?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Run `command` against `store`, writing JSON to `out`
///
/// Returns `false` when the command ran but reported an unhealthy store.
pub async fn execute<W: Write>(
    command: &Command,
    store: &DurableStore,
    timeout: Duration,
    out: &mut W,
) -> anyhow::Result<bool> {
    match command {
        Command::Ping => {
            let check = check_store(store.backend_name(), store, timeout).await;
            serde_json::to_writer_pretty(&mut *out, &check)?;
            writeln!(out)?;
            if check.status.is_healthy() {
                store
                    .disconnect(&CallContext::background().timeout(timeout))
                    .await?;
            }
            Ok(check.status.is_healthy())
        }
        Command::Inspect { persistence_id } => {
            let ctx = CallContext::background().timeout(timeout);
            store.connect(&ctx).await?;
            let lookup = store.get_latest_record(&ctx, persistence_id).await;
            store.disconnect(&CallContext::background().timeout(timeout)).await?;

            let summary = RecordSummary::new(persistence_id, lookup?.as_ref());
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
            Ok(true)
        }
    }
}
