// tests/orchestrator.rs

//! End-to-end orchestrator behaviour against fake collaborators.

use std::path::{Path, PathBuf};

use mintpipe::errors::PipelineError;
use mintpipe::fs::mock::MockFileSystem;
use mintpipe::pipeline::Orchestrator;

use mintpipe_test_utils::builders::{add_raster_set, PipelineConfigBuilder};
use mintpipe_test_utils::fakes::{FakeDatabase, FakeRunner};
use mintpipe_test_utils::init_tracing;

fn raster_dir() -> PathBuf {
    PathBuf::from("output")
}

fn three_timestep_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    add_raster_set(
        &fs,
        &raster_dir(),
        &["2021021600", "2021021612", "2021021700"],
    );
    fs
}

#[tokio::test]
async fn full_run_imports_in_species_order_then_computes_once() {
    init_tracing();
    let fs = three_timestep_fs();
    let runner = FakeRunner::new(fs.clone());
    let db = FakeDatabase::new();
    let config = PipelineConfigBuilder::new(raster_dir()).build();

    let orchestrator = Orchestrator::new(&config, &runner, &fs);
    orchestrator.run_database_stages(&db).await.unwrap();

    // Four raster2pgsql invocations, NO2, O3, PM10, PM25 in order, all at
    // the second timestep.
    let lines = runner.command_lines();
    assert_eq!(lines.len(), 4);
    for (line, species) in lines.iter().zip(["NO2", "O3", "PM10", "PM25"]) {
        assert!(
            line.contains(&format!("NETCDF:output/Conc_{species}_2021021612.nc")),
            "unexpected command: {line}"
        );
    }

    // Four staged batches executed, one per import.
    assert_eq!(db.batches().len(), 4);

    // Exactly one computation, bound to the chosen filenames in species order.
    let scripts = db.scripts();
    assert_eq!(scripts.len(), 1);
    assert_eq!(
        scripts[0].1,
        vec![
            "Conc_NO2_2021021612.nc",
            "Conc_O3_2021021612.nc",
            "Conc_PM10_2021021612.nc",
            "Conc_PM25_2021021612.nc",
        ]
    );

    // Every staging artifact was cleaned up.
    assert_eq!(fs.removal_attempts().len(), 4);
}

#[tokio::test]
async fn second_import_failure_aborts_remaining_imports_and_compute() {
    init_tracing();
    let fs = three_timestep_fs();
    // O3 is the second import in the fixed order.
    let runner = FakeRunner::new(fs.clone()).failing_on("Conc_O3_", 2);
    let db = FakeDatabase::new();
    let config = PipelineConfigBuilder::new(raster_dir()).build();

    let orchestrator = Orchestrator::new(&config, &runner, &fs);
    let err = orchestrator.run_database_stages(&db).await.unwrap_err();
    assert!(matches!(err, PipelineError::ProcessExit { code: 2, .. }));

    // PM10 and PM25 were never attempted, nor was the computation.
    assert_eq!(runner.command_lines().len(), 2);
    assert_eq!(db.batches().len(), 1);
    assert!(db.scripts().is_empty());

    // Both staging files (including the failed import's) were cleaned up.
    assert_eq!(fs.removal_attempts().len(), 2);
}

#[tokio::test]
async fn sql_failure_mid_import_leaves_earlier_rasters_and_stops() {
    init_tracing();
    let fs = three_timestep_fs();
    let runner = FakeRunner::new(fs.clone());
    // Batches are tagged with their staging filename; fail the third import.
    let db = FakeDatabase::new().failing_batches_on("conc_pm10");
    let config = PipelineConfigBuilder::new(raster_dir()).build();

    let orchestrator = Orchestrator::new(&config, &runner, &fs);
    let err = orchestrator.run_database_stages(&db).await.unwrap_err();
    assert!(matches!(err, PipelineError::Import { .. }));

    // NO2 and O3 stay imported (no rollback); PM25 and compute never ran.
    assert_eq!(db.batches().len(), 3);
    assert!(db.scripts().is_empty());
    assert_eq!(fs.removal_attempts().len(), 3);
}

#[tokio::test]
async fn missing_raster_directory_is_fatal_before_any_import() {
    init_tracing();
    let fs = MockFileSystem::new();
    let runner = FakeRunner::new(fs.clone());
    let db = FakeDatabase::new();
    let config = PipelineConfigBuilder::new(raster_dir()).build();

    let orchestrator = Orchestrator::new(&config, &runner, &fs);
    let err = orchestrator.run_database_stages(&db).await.unwrap_err();
    assert!(matches!(err, PipelineError::DirectoryNotFound(_)));
    assert!(runner.command_lines().is_empty());
    assert!(db.batches().is_empty());
}

#[tokio::test]
async fn model_failure_aborts_before_scanning() {
    init_tracing();
    // No raster directory exists; if the model error is surfaced the scan
    // never got a chance to notice.
    let fs = MockFileSystem::new();
    let runner = FakeRunner::new(fs.clone()).failing_on("run-model", 1);
    let config = PipelineConfigBuilder::new(raster_dir())
        .model("run-model.sh", &["--scenario", "nantes"])
        .skip_database(true)
        .build();

    let orchestrator = Orchestrator::new(&config, &runner, &fs);
    let err = orchestrator.run().await.unwrap_err();
    assert!(matches!(err, PipelineError::ProcessExit { code: 1, .. }));
    assert_eq!(
        runner.command_lines(),
        vec!["run-model.sh --scenario nantes"]
    );
}

#[tokio::test]
async fn model_runs_before_rasters_are_scanned() {
    init_tracing();
    let fs = three_timestep_fs();
    let runner = FakeRunner::new(fs.clone());
    let config = PipelineConfigBuilder::new(raster_dir())
        .model("run-model.sh", &[])
        .skip_database(true)
        .build();

    let orchestrator = Orchestrator::new(&config, &runner, &fs);
    orchestrator.run().await.unwrap();
    assert_eq!(runner.command_lines(), vec!["run-model.sh"]);
}

#[tokio::test]
async fn skip_database_runs_scan_but_no_imports() {
    init_tracing();
    let fs = three_timestep_fs();
    let runner = FakeRunner::new(fs.clone());
    let config = PipelineConfigBuilder::new(raster_dir())
        .skip_database(true)
        .build();

    let orchestrator = Orchestrator::new(&config, &runner, &fs);
    orchestrator.run().await.unwrap();

    // Model skipped, database skipped: nothing was executed at all.
    assert!(runner.command_lines().is_empty());
    assert!(fs.removal_attempts().is_empty());
}

#[tokio::test]
async fn skip_database_still_fails_on_incomplete_raster_set() {
    init_tracing();
    let fs = MockFileSystem::new();
    add_raster_set(&fs, Path::new("output"), &["2021021600"]);
    let runner = FakeRunner::new(fs.clone());
    let config = PipelineConfigBuilder::new(raster_dir())
        .skip_database(true)
        .build();

    let orchestrator = Orchestrator::new(&config, &runner, &fs);
    let err = orchestrator.run().await.unwrap_err();
    assert!(matches!(err, PipelineError::IncompleteRasterSet(_)));
}
