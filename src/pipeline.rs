// src/pipeline.rs

//! Top-level pipeline orchestrator.
//!
//! Drives the stages strictly in sequence on one control flow:
//!
//! `Idle → ModelRunning → Connecting → Scanning → Importing(i/4) →
//! Computing → Done`
//!
//! Any stage failing moves the run to `Failed`: the first error aborts every
//! remaining stage and propagates to the binary, which exits non-zero. There
//! is no retry and no skip-and-continue. Imports are fully serialized in
//! fixed species order, which also rules out staging-name races.
//!
//! Rasters imported before a mid-run failure stay in the database; nothing is
//! rolled back. Re-running the pipeline re-imports them.

use std::fmt;

use tracing::info;

use crate::config::PipelineConfig;
use crate::db::{self, Database};
use crate::errors::Result;
use crate::exec::{CommandSpec, ProcessRunner};
use crate::fs::FileSystem;
use crate::raster::compute::compute_pollution;
use crate::raster::import::import_raster;
use crate::raster::scan::scan;
use crate::raster::RasterSet;

/// Pipeline stages, used for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ModelRunning,
    Connecting,
    Scanning,
    /// 1-based raster index out of four.
    Importing(usize),
    Computing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ModelRunning => write!(f, "running model"),
            Stage::Connecting => write!(f, "connecting to database"),
            Stage::Scanning => write!(f, "scanning rasters"),
            Stage::Importing(i) => write!(f, "importing raster {i}/4"),
            Stage::Computing => write!(f, "computing pollution"),
        }
    }
}

/// The top-level sequencer.
///
/// Owns nothing but borrows: the configuration and the process/filesystem
/// collaborators are injected so tests can substitute fakes. The database
/// connection is opened inside [`run`](Orchestrator::run) (it is skipped
/// entirely in skip-database mode) and shared by all import and compute
/// steps.
pub struct Orchestrator<'a> {
    config: &'a PipelineConfig,
    runner: &'a dyn ProcessRunner,
    fs: &'a dyn FileSystem,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        runner: &'a dyn ProcessRunner,
        fs: &'a dyn FileSystem,
    ) -> Self {
        Self { config, runner, fs }
    }

    /// Run the whole pipeline.
    ///
    /// Skip-database mode stops after the scan: it runs the model (unless
    /// that is skipped too), resolves the raster set, logs what would have
    /// been imported, and reports success without touching the database.
    pub async fn run(&self) -> Result<()> {
        self.model_stage().await?;

        if self.config.skip_database {
            let set = self.scan_stage()?;
            for raster in set.iter() {
                info!(raster = %raster.file_name(), "skip-database: raster not imported");
            }
            info!("pipeline finished (database skipped)");
            return Ok(());
        }

        info!(stage = %Stage::Connecting, "stage");
        let client = db::connect(self.config).await?;
        let result = self.run_database_stages(&client).await;

        // Dropping the client closes the connection best-effort; the spawned
        // connection task logs any shutdown error.
        drop(client);
        result
    }

    /// Scan, import and compute against an already-open connection.
    ///
    /// Split out from [`run`](Orchestrator::run) so tests can drive the
    /// database stages against a fake without opening a real connection.
    pub async fn run_database_stages(&self, db: &dyn Database) -> Result<()> {
        let set = self.scan_stage()?;
        self.import_stage(db, &set).await?;

        info!(stage = %Stage::Computing, "stage");
        compute_pollution(db, &self.config.raster_table, &set).await?;

        info!("pipeline finished");
        Ok(())
    }

    async fn model_stage(&self) -> Result<()> {
        if self.config.skip_model {
            info!("skip-model set; using rasters already on disk");
            return Ok(());
        }

        info!(stage = %Stage::ModelRunning, model = %self.config.model_path.display(), "stage");
        let spec = CommandSpec::forwarding(self.config.model_command(), "model: ", "model! ");
        self.runner.run(&spec).await
    }

    fn scan_stage(&self) -> Result<RasterSet> {
        info!(stage = %Stage::Scanning, dir = %self.config.raster_dir.display(), "stage");
        scan(self.fs, &self.config.raster_dir)
    }

    async fn import_stage(&self, db: &dyn Database, set: &RasterSet) -> Result<()> {
        for (i, raster) in set.iter().enumerate() {
            info!(stage = %Stage::Importing(i + 1), species = %raster.species, "stage");
            import_raster(db, self.runner, self.fs, &self.config.raster_table, raster).await?;
        }
        Ok(())
    }
}
