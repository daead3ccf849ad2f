// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `mintpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mintpipe",
    version,
    about = "Run the EMS model, load its concentration rasters into PostGIS, and compute pollution indices.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Mintpipe.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Mintpipe.toml")]
    pub config: String,

    /// Skip running the simulation model and only process rasters already
    /// present in the output directory.
    #[arg(long)]
    pub skip_model: bool,

    /// Skip all database work (connect, import, compute).
    ///
    /// The run still executes the model (unless --skip-model) and the raster
    /// scan, and logs which rasters would have been imported.
    #[arg(long)]
    pub skip_database: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MINTPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
