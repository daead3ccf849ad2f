// tests/config_loading.rs

//! Config file loading against the real filesystem.

use mintpipe::config::load_and_validate;
use mintpipe::errors::PipelineError;
use mintpipe::fs::RealFileSystem;

use mintpipe_test_utils::init_tracing;

const VALID: &str = r#"
[model]
path = "/opt/ems/run-model.sh"
args = ["--scenario", "nantes-centre"]

[database]
url = "host=localhost port=5433 dbname=ems_pollution"
user = "postgres"
password = "secret"

[raster]
directory = "output/rasters"
table = "conc_raster"

[pipeline]
skip_model = true
"#;

#[test]
fn valid_file_loads_and_resolves() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Mintpipe.toml");
    std::fs::write(&path, VALID).unwrap();

    let config = load_and_validate(&RealFileSystem, &path).unwrap();
    assert!(config.skip_model);
    assert!(!config.skip_database);
    assert_eq!(config.raster_table, "conc_raster");
    assert_eq!(
        config.model_command(),
        vec!["/opt/ems/run-model.sh", "--scenario", "nantes-centre"]
    );
}

#[test]
fn missing_file_is_a_config_error() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");

    let err = load_and_validate(&RealFileSystem, &path).unwrap_err();
    assert!(matches!(err, PipelineError::ConfigError(_)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Mintpipe.toml");
    std::fs::write(&path, "[model\npath = ").unwrap();

    let err = load_and_validate(&RealFileSystem, &path).unwrap_err();
    assert!(matches!(err, PipelineError::TomlError(_)));
}

#[test]
fn missing_required_section_is_a_parse_error() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Mintpipe.toml");
    std::fs::write(&path, "[model]\npath = \"/opt/ems/run-model.sh\"\n").unwrap();

    let err = load_and_validate(&RealFileSystem, &path).unwrap_err();
    assert!(matches!(err, PipelineError::TomlError(_)));
}
