// src/lib.rs

pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod raster;

use std::path::PathBuf;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::exec::OsProcessRunner;
use crate::fs::RealFileSystem;
use crate::pipeline::Orchestrator;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (TOML file + CLI skip flags)
/// - the real process runner and filesystem
/// - the pipeline orchestrator
pub async fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;
    let config_path = PathBuf::from(&args.config);
    let config = load_and_validate(&fs, &config_path)?
        .with_cli_overrides(args.skip_model, args.skip_database);

    debug!(?config_path, skip_model = config.skip_model, skip_database = config.skip_database,
        "configuration resolved");

    let runner = OsProcessRunner;
    let orchestrator = Orchestrator::new(&config, &runner, &fs);
    orchestrator.run().await?;
    Ok(())
}
