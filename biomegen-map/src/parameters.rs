//! Map generation parameters and their allowed ranges.

use std::ops::RangeInclusive;

use crate::errors::MapError;

pub const WIDTH_RANGE: RangeInclusive<usize> = 500..=10000;
pub const HEIGHT_RANGE: RangeInclusive<usize> = 500..=10000;
pub const MAP_RESOLUTION_RANGE: RangeInclusive<usize> = 50..=500;
pub const ISLAND_ABUNDANCE_RANGE: RangeInclusive<usize> = 10..=1000;
pub const ISLAND_SIZE_RANGE: RangeInclusive<usize> = 10..=100;
pub const COASTLINE_SMOOTHING_RANGE: RangeInclusive<usize> = 0..=100;
pub const PROCESSES_RANGE: RangeInclusive<usize> = 1..=64;

pub const DEFAULT_MAP_RESOLUTION: usize = 100;
pub const DEFAULT_ISLAND_ABUNDANCE: usize = 120;
pub const DEFAULT_ISLAND_SIZE: usize = 50;
pub const DEFAULT_COASTLINE_SMOOTHING: usize = 5;

/// All the numbers that shape a generated map.
///
/// Use [`MapParameters::validated()`](MapParameters::validated()) to construct a checked instance;
/// the derived quantities ([`n_seeds()`](MapParameters::n_seeds()), [`n_special()`](MapParameters::n_special())) are computed
/// from the validated fields.
#[derive(Clone, Debug)]
pub struct MapParameters {
    /// output image width, in pixels
    pub width: usize,
    /// output image height, in pixels
    pub height: usize,
    /// pixels per seed; the map gets width × height / map_resolution seeds
    pub map_resolution: usize,
    /// inverse fraction of special seeds; S = N / island_abundance of each special type
    pub island_abundance: usize,
    /// island size scale, times ten
    pub island_size_x10: usize,
    /// neighborhood size k for the coastline smoothing stage; 0 disables the stage
    pub coastline_smoothing: usize,
    /// number of parallel workers
    pub workers: usize,
    /// master seed for deterministic runs; None draws worker seeds from OS entropy
    pub master_seed: Option<u64>,
}

impl MapParameters {

    /// Builds a parameter set, checking every value against its allowed range
    pub fn validated(width: usize, height: usize, map_resolution: usize, island_abundance: usize,
                     island_size_x10: usize, coastline_smoothing: usize, workers: usize)
                     -> Result<MapParameters, MapError> {

        check_range("width", width, WIDTH_RANGE)?;
        check_range("height", height, HEIGHT_RANGE)?;
        check_range("map_resolution", map_resolution, MAP_RESOLUTION_RANGE)?;
        check_range("island_abundance", island_abundance, ISLAND_ABUNDANCE_RANGE)?;
        check_range("island_size", island_size_x10, ISLAND_SIZE_RANGE)?;
        check_range("coastline_smoothing", coastline_smoothing, COASTLINE_SMOOTHING_RANGE)?;
        check_range("processes", workers, PROCESSES_RANGE)?;

        Ok(MapParameters {
            width, height, map_resolution, island_abundance, island_size_x10,
            coastline_smoothing, workers, master_seed: None,
        })
    }

    /// Total number of seeds: N = width × height / map_resolution
    pub fn n_seeds(&self) -> usize { self.width * self.height / self.map_resolution }

    /// Number of seeds of each special type: S = N / island_abundance
    pub fn n_special(&self) -> usize { self.n_seeds() / self.island_abundance }

    /// The island size scale as a float (the CLI passes it times ten)
    pub fn island_size(&self) -> f64 { self.island_size_x10 as f64 / 10.0 }

    /// Number of pixels of the output image
    pub fn n_pixels(&self) -> usize { self.width * self.height }
}

fn check_range(name: &'static str, value: usize, range: RangeInclusive<usize>) -> Result<(), MapError> {

    if !range.contains(&value) {
        return Err(MapError::InvalidParameter {
            name, value, min: *range.start(), max: *range.end(),
        });
    }
    Ok(())
}
