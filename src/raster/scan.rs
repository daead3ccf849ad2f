// src/raster/scan.rs

//! Discovery of the raster set to import from the model's output directory.

use std::path::Path;

use tracing::{debug, info};

use crate::errors::{PipelineError, Result};
use crate::fs::FileSystem;
use crate::raster::{RasterFile, RasterSet, Species};

/// Scan `dir` and resolve the four-species raster set to import.
///
/// The model's first output is the boundary/initialisation step, so when
/// several timesteps are present the *second* NO2 raster in lexicographic
/// (= chronological) order is chosen, and the other three species are
/// resolved as siblings sharing its timestamp token. Sibling existence is not
/// re-checked here; a missing sibling surfaces as an explicit open failure
/// during its import.
pub fn scan(fs: &dyn FileSystem, dir: &Path) -> Result<RasterSet> {
    if !fs.is_dir(dir) {
        return Err(PipelineError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut no2_names: Vec<String> = fs
        .read_dir(dir)?
        .into_iter()
        .filter(|p| fs.is_file(p))
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .filter(|name| {
            matches!(
                RasterFile::parse(dir, name),
                Some(RasterFile { species: Species::No2, .. })
            )
        })
        .collect();
    no2_names.sort();

    debug!(count = no2_names.len(), ?no2_names, "NO2 rasters found");

    // Index 1: skip the boundary step, take the first computed step.
    let Some(chosen) = no2_names.get(1) else {
        return Err(PipelineError::IncompleteRasterSet(format!(
            "need at least two NO2 rasters in {} to skip the boundary timestep, found {}",
            dir.display(),
            no2_names.len()
        )));
    };

    let raster = RasterFile::parse(dir, chosen).ok_or_else(|| {
        PipelineError::IncompleteRasterSet(format!("unparsable NO2 raster name {chosen}"))
    })?;

    info!(timestamp = %raster.timestamp, "selected raster timestep");
    Ok(RasterSet::resolve(dir, &raster.timestamp))
}
