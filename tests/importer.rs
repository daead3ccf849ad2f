// tests/importer.rs

//! Raster importer behaviour: staging lifecycle and failure propagation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use mintpipe::errors::{PipelineError, Result};
use mintpipe::exec::{CommandSpec, ProcessRunner};
use mintpipe::fs::FileSystem;
use mintpipe::fs::mock::MockFileSystem;
use mintpipe::raster::import::{import_raster, staging_name};
use mintpipe::raster::{RasterFile, Species};

use mintpipe_test_utils::fakes::{FakeDatabase, FakeRunner};
use mintpipe_test_utils::init_tracing;

fn raster() -> RasterFile {
    RasterFile::resolve(Path::new("output"), Species::No2, "2021021612")
}

fn staging_path() -> PathBuf {
    PathBuf::from(staging_name("Conc_NO2_2021021612.nc"))
}

#[tokio::test]
async fn successful_import_executes_staged_sql_and_cleans_up() {
    init_tracing();
    let fs = MockFileSystem::new();
    let runner = FakeRunner::new(fs.clone()).with_staged_sql("INSERT INTO conc_raster ...;");
    let db = FakeDatabase::new();

    import_raster(&db, &runner, &fs, "conc_raster", &raster())
        .await
        .unwrap();

    let batches = db.batches();
    assert_eq!(batches.len(), 1);
    assert!(batches[0].contains("INSERT INTO conc_raster"));

    // Cleanup ran and the staging file is gone.
    assert_eq!(fs.removal_attempts(), vec![staging_path()]);
    assert!(!fs.exists(&staging_path()));
}

#[tokio::test]
async fn tool_invocation_uses_fixed_flags_and_captures_stdout() {
    init_tracing();
    let fs = MockFileSystem::new();
    let runner = FakeRunner::new(fs.clone());
    let db = FakeDatabase::new();

    import_raster(&db, &runner, &fs, "conc_raster", &raster())
        .await
        .unwrap();

    let lines = runner.command_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0],
        "raster2pgsql -I -C -F -s 2154 NETCDF:output/Conc_NO2_2021021612.nc conc_raster"
    );
}

#[tokio::test]
async fn tool_failure_surfaces_exit_code_and_still_cleans_up() {
    init_tracing();
    let fs = MockFileSystem::new();
    let runner = FakeRunner::new(fs.clone()).failing_on("raster2pgsql", 3);
    let db = FakeDatabase::new();

    let err = import_raster(&db, &runner, &fs, "conc_raster", &raster())
        .await
        .unwrap_err();
    match err {
        PipelineError::ProcessExit { code, .. } => assert_eq!(code, 3),
        other => panic!("expected ProcessExit, got {other:?}"),
    }

    // No SQL ran, but the (possibly empty) staging file was deleted.
    assert!(db.batches().is_empty());
    assert_eq!(fs.removal_attempts(), vec![staging_path()]);
    assert!(!fs.exists(&staging_path()));
}

#[tokio::test]
async fn sql_failure_propagates_after_cleanup() {
    init_tracing();
    let fs = MockFileSystem::new();
    let runner = FakeRunner::new(fs.clone());
    let db = FakeDatabase::new().failing_batches_on("conc_no2");

    let err = import_raster(&db, &runner, &fs, "conc_raster", &raster())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Import {
            species: Species::No2,
            ..
        }
    ));

    // Finally-style guarantee: cleanup ran even though the SQL threw.
    assert_eq!(fs.removal_attempts(), vec![staging_path()]);
    assert!(!fs.exists(&staging_path()));
}

/// A runner that succeeds without producing a staging file, like a tool whose
/// output went missing between invocation and read-back.
struct NoOutputRunner;

#[async_trait]
impl ProcessRunner for NoOutputRunner {
    async fn run(&self, _spec: &CommandSpec) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn unreadable_staging_file_is_an_import_error_and_cleanup_is_attempted() {
    init_tracing();
    let fs = MockFileSystem::new();
    let db = FakeDatabase::new();

    let err = import_raster(&db, &NoOutputRunner, &fs, "conc_raster", &raster())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Import { .. }));

    // Deletion was attempted even though the file never existed; its failure
    // is logged, not raised.
    assert_eq!(fs.removal_attempts(), vec![staging_path()]);
}
