// src/config/validate.rs

use std::path::PathBuf;

use crate::config::model::{PipelineConfig, RawConfigFile};
use crate::errors::{PipelineError, Result};

impl TryFrom<RawConfigFile> for PipelineConfig {
    type Error = PipelineError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(PipelineConfig {
            model_path: PathBuf::from(raw.model.path),
            model_args: raw.model.args,
            db_url: raw.database.url,
            db_user: raw.database.user,
            db_password: raw.database.password,
            raster_dir: PathBuf::from(raw.raster.directory),
            raster_table: raw.raster.table,
            skip_model: raw.pipeline.skip_model,
            skip_database: raw.pipeline.skip_database,
        })
    }
}

fn validate_raw_config(raw: &RawConfigFile) -> Result<()> {
    if raw.model.path.trim().is_empty() && !raw.pipeline.skip_model {
        return Err(PipelineError::ConfigError(
            "[model].path must not be empty unless the model stage is skipped".to_string(),
        ));
    }
    if raw.raster.directory.trim().is_empty() {
        return Err(PipelineError::ConfigError(
            "[raster].directory must not be empty".to_string(),
        ));
    }
    if raw.raster.table.trim().is_empty() {
        return Err(PipelineError::ConfigError(
            "[raster].table must not be empty".to_string(),
        ));
    }
    if raw.database.url.trim().is_empty() && !raw.pipeline.skip_database {
        return Err(PipelineError::ConfigError(
            "[database].url must not be empty unless the database stage is skipped".to_string(),
        ));
    }
    Ok(())
}
