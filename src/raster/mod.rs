// src/raster/mod.rs

//! Raster discovery, import and in-database computation.
//!
//! The model writes one NetCDF raster per pollutant species per timestep,
//! named `Conc_<SPECIES>_<timestamp>.nc`. The timestamp token is fixed-width
//! numeric, so lexicographic filename order is chronological order.

use std::fmt;
use std::path::{Path, PathBuf};

pub mod compute;
pub mod import;
pub mod scan;

/// Filename prefix common to all model rasters.
pub const RASTER_PREFIX: &str = "Conc";

/// Extension of the model's raster outputs.
pub const RASTER_EXT: &str = "nc";

/// The four tracked pollutants.
///
/// Declaration order is the fixed import order (NO2, O3, PM10, PM2.5) and the
/// positional parameter order of the pollution script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    No2,
    O3,
    Pm10,
    Pm25,
}

impl Species {
    pub const ALL: [Species; 4] = [Species::No2, Species::O3, Species::Pm10, Species::Pm25];

    /// The species token as it appears in raster filenames.
    pub fn code(self) -> &'static str {
        match self {
            Species::No2 => "NO2",
            Species::O3 => "O3",
            Species::Pm10 => "PM10",
            Species::Pm25 => "PM25",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One discovered (or resolved) raster artifact.
///
/// Created during scanning, consumed during import, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterFile {
    pub path: PathBuf,
    pub species: Species,
    pub timestamp: String,
}

impl RasterFile {
    /// Build the raster for `species` at `timestamp` inside `dir`.
    pub fn resolve(dir: &Path, species: Species, timestamp: &str) -> Self {
        let name = format!("{RASTER_PREFIX}_{}_{timestamp}.{RASTER_EXT}", species.code());
        Self {
            path: dir.join(name),
            species,
            timestamp: timestamp.to_string(),
        }
    }

    /// Parse a raster filename of the form `Conc_<SPECIES>_<timestamp>.nc`.
    ///
    /// Returns `None` for anything that does not match the convention.
    pub fn parse(dir: &Path, file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(&format!(".{RASTER_EXT}"))?;
        let rest = stem.strip_prefix(&format!("{RASTER_PREFIX}_"))?;
        for species in Species::ALL {
            if let Some(timestamp) = rest.strip_prefix(&format!("{}_", species.code())) {
                if timestamp.is_empty() {
                    return None;
                }
                return Some(Self {
                    path: dir.join(file_name),
                    species,
                    timestamp: timestamp.to_string(),
                });
            }
        }
        None
    }

    /// The filename (without directory), as stored by raster2pgsql in the
    /// table's `filename` column and as bound into the pollution script.
    pub fn file_name(&self) -> String {
        format!(
            "{RASTER_PREFIX}_{}_{}.{RASTER_EXT}",
            self.species.code(),
            self.timestamp
        )
    }
}

/// The complete four-species raster set for one chosen timestep.
///
/// Only constructed whole; all members share one timestamp token.
#[derive(Debug, Clone)]
pub struct RasterSet {
    pub no2: RasterFile,
    pub o3: RasterFile,
    pub pm10: RasterFile,
    pub pm25: RasterFile,
}

impl RasterSet {
    /// Resolve all four sibling rasters for `timestamp` inside `dir`.
    pub fn resolve(dir: &Path, timestamp: &str) -> Self {
        Self {
            no2: RasterFile::resolve(dir, Species::No2, timestamp),
            o3: RasterFile::resolve(dir, Species::O3, timestamp),
            pm10: RasterFile::resolve(dir, Species::Pm10, timestamp),
            pm25: RasterFile::resolve(dir, Species::Pm25, timestamp),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.no2.timestamp
    }

    /// Members in fixed import order.
    pub fn iter(&self) -> impl Iterator<Item = &RasterFile> {
        [&self.no2, &self.o3, &self.pm10, &self.pm25].into_iter()
    }
}
