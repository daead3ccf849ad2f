// src/raster/compute.rs

//! Trigger for the in-database pollution-index computation.

use tracing::info;

use crate::db::Database;
use crate::errors::{PipelineError, Result};
use crate::raster::RasterSet;

/// The table the pollution script is written against. The configured table
/// name must match exactly; this guards against silently computing indices
/// over a table the script never touches.
pub const EXPECTED_TABLE: &str = "conc_raster";

/// Versioned SQL artifact computing the indices from the imported rasters.
const COMPUTE_POLLUTION_SQL: &str = include_str!("compute_pollution.sql");

/// Run the pollution computation over the four imported rasters.
///
/// Binds the raster filenames positionally (NO2, O3, PM10, PM2.5) and
/// executes the script as a single statement. No result set is inspected:
/// success is the absence of a database error.
pub async fn compute_pollution(db: &dyn Database, table: &str, set: &RasterSet) -> Result<()> {
    if table != EXPECTED_TABLE {
        return Err(PipelineError::ConfigMismatch {
            expected: EXPECTED_TABLE,
            got: table.to_string(),
        });
    }

    info!(timestamp = %set.timestamp(), "computing pollution indices");

    let no2 = set.no2.file_name();
    let o3 = set.o3.file_name();
    let pm10 = set.pm10.file_name();
    let pm25 = set.pm25.file_name();
    db.execute_with_params(
        COMPUTE_POLLUTION_SQL,
        &[no2.as_str(), o3.as_str(), pm10.as_str(), pm25.as_str()],
    )
    .await
}
