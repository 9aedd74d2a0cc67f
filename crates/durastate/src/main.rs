//! durastate - Entry Point
//!
//! Operator binary for the durable state store. See [`durastate::cli`].

use std::process::ExitCode;

use clap::Parser;
use durastate::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    run(&cli).await
}
