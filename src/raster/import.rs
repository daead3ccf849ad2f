// src/raster/import.rs

//! Loading one raster into the database via `raster2pgsql`.
//!
//! The tool's SQL output is staged in a file rather than kept in memory,
//! which makes a broken import easier to debug. The staging file never
//! outlives its import: it is deleted on every exit path, success or not.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::db::Database;
use crate::errors::{PipelineError, Result};
use crate::exec::{CommandSpec, ProcessRunner};
use crate::fs::FileSystem;
use crate::raster::RasterFile;

/// Extension of the staging file holding raster2pgsql's SQL output.
pub const STAGING_EXT: &str = "psql";

/// Stderr prefix for relayed raster2pgsql diagnostics.
const TOOL_STDERR_PREFIX: &str = "raster2pgsql! ";

/// Derive the staging filename for a raster filename.
///
/// Lower-cases the name, maps every character outside `[a-z0-9_]` to `_`,
/// collapses runs of `_`, and appends the staging extension. Deterministic
/// and idempotent, so one import always stages to the same place.
pub fn staging_name(raster_file_name: &str) -> String {
    let mut out = String::with_capacity(raster_file_name.len() + STAGING_EXT.len() + 1);
    let mut prev_underscore = false;
    for c in raster_file_name.chars().flat_map(char::to_lowercase) {
        let keep = c.is_ascii_lowercase() || c.is_ascii_digit();
        let mapped = if keep { c } else { '_' };
        if mapped == '_' && prev_underscore {
            continue;
        }
        prev_underscore = mapped == '_';
        out.push(mapped);
    }
    out.push('.');
    out.push_str(STAGING_EXT);
    out
}

/// Argv for the conversion tool.
///
/// `-s 2154` is SRID 2154 (Lambert-93, the model's projection), `-C` applies
/// raster constraints so the raster is registered, `-I` builds a GiST index,
/// `-F` adds a `filename` column the pollution script later matches on.
fn raster2pgsql_command(raster: &RasterFile, table: &str) -> Vec<String> {
    vec![
        "raster2pgsql".to_string(),
        "-I".to_string(),
        "-C".to_string(),
        "-F".to_string(),
        "-s".to_string(),
        "2154".to_string(),
        format!("NETCDF:{}", raster.path.display()),
        table.to_string(),
    ]
}

/// Import one raster into `table`.
///
/// Runs raster2pgsql with its stdout captured to the staging file and its
/// stderr relayed, then executes the staged SQL as one batch on `db`. The
/// staging file is deleted on every exit path: tool failure, SQL failure, or
/// success. Deletion failures are logged, never raised.
pub async fn import_raster(
    db: &dyn Database,
    runner: &dyn ProcessRunner,
    fs: &dyn FileSystem,
    table: &str,
    raster: &RasterFile,
) -> Result<()> {
    let staging = PathBuf::from(staging_name(&raster.file_name()));
    let spec = CommandSpec::capturing(
        raster2pgsql_command(raster, table),
        staging.clone(),
        TOOL_STDERR_PREFIX,
    );

    if let Err(err) = runner.run(&spec).await {
        // The staging file is created even when the tool fails (possibly
        // empty), so deletion is attempted unconditionally.
        cleanup_staging(fs, &staging);
        return Err(err);
    }

    info!(
        raster = %raster.file_name(),
        staging = %staging.display(),
        "importing raster"
    );

    let result = execute_staged_sql(db, fs, &staging, raster).await;
    cleanup_staging(fs, &staging);
    result
}

async fn execute_staged_sql(
    db: &dyn Database,
    fs: &dyn FileSystem,
    staging: &Path,
    raster: &RasterFile,
) -> Result<()> {
    let sql = fs
        .read_to_string(staging)
        .map_err(|e| import_error(raster, e))?;
    db.batch_execute(&sql)
        .await
        .map_err(|e| import_error(raster, anyhow::Error::from(e)))?;
    Ok(())
}

fn import_error(raster: &RasterFile, source: anyhow::Error) -> PipelineError {
    PipelineError::Import {
        species: raster.species,
        path: raster.path.clone(),
        source,
    }
}

/// Best-effort staging deletion; never fails the import itself.
fn cleanup_staging(fs: &dyn FileSystem, staging: &Path) {
    if let Err(e) = fs.remove_file(staging) {
        warn!(staging = %staging.display(), error = %e, "failed to delete staging file");
    }
}
