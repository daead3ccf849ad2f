//! Builders for pipeline configs and raster directory layouts used in tests.

use std::path::{Path, PathBuf};

use mintpipe::config::PipelineConfig;
use mintpipe::fs::mock::MockFileSystem;
use mintpipe::raster::Species;

/// Builder for a [`PipelineConfig`] with test-friendly defaults:
/// model skipped, database enabled, table `conc_raster`.
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new(raster_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: PipelineConfig {
                model_path: PathBuf::from("/bin/true"),
                model_args: Vec::new(),
                db_url: "host=localhost dbname=ems_pollution".to_string(),
                db_user: "postgres".to_string(),
                db_password: "postgres".to_string(),
                raster_dir: raster_dir.into(),
                raster_table: "conc_raster".to_string(),
                skip_model: true,
                skip_database: false,
            },
        }
    }

    pub fn model(mut self, path: &str, args: &[&str]) -> Self {
        self.config.model_path = PathBuf::from(path);
        self.config.model_args = args.iter().map(|s| s.to_string()).collect();
        self.config.skip_model = false;
        self
    }

    pub fn table(mut self, table: &str) -> Self {
        self.config.raster_table = table.to_string();
        self
    }

    pub fn skip_model(mut self, skip: bool) -> Self {
        self.config.skip_model = skip;
        self
    }

    pub fn skip_database(mut self, skip: bool) -> Self {
        self.config.skip_database = skip;
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

/// Populate `fs` with a complete four-species raster set for each timestamp.
pub fn add_raster_set(fs: &MockFileSystem, dir: &Path, timestamps: &[&str]) {
    fs.add_dir(dir);
    for ts in timestamps {
        for species in Species::ALL {
            let name = format!("Conc_{}_{ts}.nc", species.code());
            fs.add_file(dir.join(name), b"netcdf".to_vec());
        }
    }
}
