// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [model]
/// path = "/opt/ems/run-model.sh"
/// args = ["--scenario", "nantes-centre"]
///
/// [database]
/// url = "host=localhost port=5433 dbname=ems_pollution"
/// user = "postgres"
/// password = "..."
///
/// [raster]
/// directory = "output/rasters"
/// table = "conc_raster"
///
/// [pipeline]
/// skip_model = false
/// skip_database = false
/// ```
///
/// The `[pipeline]` section is optional; its flags can also be set (and are
/// overridden) by the `--skip-model` / `--skip-database` CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub model: RawModelSection,
    pub database: RawDatabaseSection,
    pub raster: RawRasterSection,
    #[serde(default)]
    pub pipeline: RawPipelineSection,
}

/// `[model]` section: the external simulation executable.
#[derive(Debug, Clone, Deserialize)]
pub struct RawModelSection {
    /// Path to the model executable or wrapper script.
    pub path: String,

    /// Arguments passed to the model, one argv entry per element.
    ///
    /// Kept as a list rather than a single shell string so the process is
    /// spawned with exact argv control (no shell splitting, no injection).
    #[serde(default)]
    pub args: Vec<String>,
}

/// `[database]` section: connection settings for the PostGIS database.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDatabaseSection {
    /// tokio-postgres connection string (host/port/dbname key-value form).
    pub url: String,
    pub user: String,
    pub password: String,
}

/// `[raster]` section: where the model writes its rasters and where they go.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRasterSection {
    /// Directory the model writes `Conc_<SPECIES>_<timestamp>.nc` files into.
    pub directory: String,

    /// Raster table name. The pollution script is written against
    /// `conc_raster`; anything else is rejected before computing.
    #[serde(default = "default_raster_table")]
    pub table: String,
}

fn default_raster_table() -> String {
    "conc_raster".to_string()
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPipelineSection {
    #[serde(default)]
    pub skip_model: bool,

    /// Skipping the database disables import and compute as well; the run
    /// stops after the raster scan.
    #[serde(default)]
    pub skip_database: bool,
}

/// Validated, resolved pipeline configuration.
///
/// Built once at startup from [`RawConfigFile`] plus CLI flags, then passed
/// by reference through the orchestrator. Read-only thereafter.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub model_path: PathBuf,
    pub model_args: Vec<String>,
    pub db_url: String,
    pub db_user: String,
    pub db_password: String,
    pub raster_dir: PathBuf,
    pub raster_table: String,
    pub skip_model: bool,
    pub skip_database: bool,
}

impl PipelineConfig {
    /// Apply CLI skip flags on top of the file values (CLI wins when set).
    pub fn with_cli_overrides(mut self, skip_model: bool, skip_database: bool) -> Self {
        self.skip_model |= skip_model;
        self.skip_database |= skip_database;
        self
    }

    /// Full connection string handed to tokio-postgres.
    pub fn connection_string(&self) -> String {
        format!(
            "{} user={} password={}",
            self.db_url, self.db_user, self.db_password
        )
    }

    /// Model argv: executable first, then its arguments.
    pub fn model_command(&self) -> Vec<String> {
        let mut argv = vec![self.model_path.display().to_string()];
        argv.extend(self.model_args.iter().cloned());
        argv
    }
}
