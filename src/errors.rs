// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Every failure in the pipeline is fatal to the run: there is no retry and
//! no skip-and-continue. The variants below are the closed set of ways a run
//! can die; each stage maps its collaborators' errors into one of them so the
//! orchestrator only ever deals with `PipelineError`.

use std::path::PathBuf;

use thiserror::Error;

use crate::raster::Species;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// An external process (model or raster2pgsql) exited non-zero.
    ///
    /// Output content is never parsed for success/failure; the exit code is
    /// the sole failure signal.
    #[error("command `{command}` exited with code {code}")]
    ProcessExit { command: String, code: i32 },

    /// The configured raster output directory does not exist at scan time.
    #[error("raster directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Fewer rasters than expected for the chosen timestep.
    #[error("incomplete raster set: {0}")]
    IncompleteRasterSet(String),

    /// Reading the staging artifact or executing its SQL failed for one raster.
    #[error("import of {species} raster {path:?} failed: {source}")]
    Import {
        species: Species,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The raster table name does not match the value the pollution script is
    /// written against.
    #[error("raster table is `{got}` but the pollution script is hardcoded against `{expected}`")]
    ConfigMismatch { expected: &'static str, got: String },

    /// Establishing the database connection failed.
    #[error("database connection failed: {0}")]
    Connection(#[source] tokio_postgres::Error),

    #[error("database error: {0}")]
    Sql(#[from] tokio_postgres::Error),

    /// Configuration file unreadable or malformed.
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PipelineError>;
