mod parsing;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    grid::{Axis, Grid},
    mapf::MappingFunction,
    version::Version,
};

use hifitime::prelude::{Duration, Epoch, TimeSeries};

/// IONEX comments are readable descriptions.
pub type Comments = Vec<String>;

/// IONEX file [Header]: everything that precedes `END OF HEADER`, plus the
/// byte offset of that marker (captured by [crate::header::parsing] so the
/// map stream can rewind to it on every query).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// File [Version]. Only 1.x is supported.
    pub version: Version,

    /// Name of production software.
    pub program: Option<String>,

    /// Name of operator (usually name of agency) running this software.
    pub run_by: Option<String>,

    /// Product date and time as a readable string.
    pub date: Option<String>,

    /// Total number of maps described.
    pub number_of_maps: u32,

    /// [Epoch] of first map.
    pub epoch_of_first_map: Epoch,

    /// [Epoch] of last map.
    pub epoch_of_last_map: Epoch,

    /// Mapping function adopted for TEC determination.
    pub mapf: MappingFunction,

    /// Maps dimension. Only 2D (fixed altitude) is supported.
    pub map_dimension: u8,

    /// Mean earth radius or bottom of height grid, in kilometers.
    pub base_radius_km: f32,

    /// Sampling period: nominal gap between two consecutive maps.
    pub sampling_period: Duration,

    /// Longitude/latitude map [Grid] definition.
    pub grid: Grid,

    /// Height axis (`HGT1/HGT2/DHGT`). A single point for 2D maps.
    pub height: Axis,

    /// Minimum elevation angle filter used, in degrees.
    pub elevation_cutoff: f32,

    /// Decimal exponent applied to quantized TEC map values
    /// (`value_tecu = raw · 10^exponent`).
    pub exponent: i8,

    /// Comments found in the header section.
    pub comments: Comments,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            // Default exponent: important for files that omit it entirely.
            exponent: -1,
            number_of_maps: 0,
            map_dimension: 2,
            mapf: MappingFunction::CosZ,
            comments: Default::default(),
            elevation_cutoff: 0.0,
            base_radius_km: 6371.0,
            grid: Grid::default(),
            height: Axis::default(),
            epoch_of_last_map: Epoch::default(),
            epoch_of_first_map: Epoch::default(),
            sampling_period: Duration::from_hours(1.0),
            version: Default::default(),
            program: Default::default(),
            run_by: Default::default(),
            date: Default::default(),
        }
    }
}

impl Header {
    /// Creates a [TimeSeries] from [Self::epoch_of_first_map] to
    /// [Self::epoch_of_last_map] (both included) spaced by the sampling period.
    pub fn timeseries(&self) -> TimeSeries {
        TimeSeries::inclusive(
            self.epoch_of_first_map,
            self.epoch_of_last_map,
            self.sampling_period,
        )
    }

    /// Copies [Self], returning with an updated number of maps (total).
    pub fn with_number_of_maps(&self, number: u32) -> Self {
        let mut s = self.clone();
        s.number_of_maps = number;
        s
    }

    /// Copies [Self], returning with an updated [Epoch] of first map.
    pub fn with_epoch_of_first_map(&self, epoch: Epoch) -> Self {
        let mut s = self.clone();
        s.epoch_of_first_map = epoch;
        s
    }

    /// Copies [Self], returning with an updated [Epoch] of last map.
    pub fn with_epoch_of_last_map(&self, epoch: Epoch) -> Self {
        let mut s = self.clone();
        s.epoch_of_last_map = epoch;
        s
    }

    /// Copies and sets the exponent / scaling currently in use.
    pub fn with_exponent(&self, e: i8) -> Self {
        let mut s = self.clone();
        s.exponent = e;
        s
    }

    /// Copies and returns a new [Header] with updated [MappingFunction].
    pub fn with_mapping_function(&self, mapf: MappingFunction) -> Self {
        let mut s = self.clone();
        s.mapf = mapf;
        s
    }

    /// Copies and sets the minimum elevation angle used.
    pub fn with_elevation_cutoff(&self, e: f32) -> Self {
        let mut s = self.clone();
        s.elevation_cutoff = e;
        s
    }

    /// Copies and sets the base radius, in km.
    pub fn with_base_radius_km(&self, base_radius_km: f32) -> Self {
        let mut s = self.clone();
        s.base_radius_km = base_radius_km;
        s
    }

    /// Copies and sets the map dimension.
    pub fn with_map_dimension(&self, dim: u8) -> Self {
        let mut s = self.clone();
        s.map_dimension = dim;
        s
    }

    /// Copies and sets the longitude axis (grid `x`).
    pub fn with_longitude_axis(&self, axis: Axis) -> Self {
        let mut s = self.clone();
        s.grid.x = axis;
        s
    }

    /// Copies and sets the latitude axis (grid `y`).
    pub fn with_latitude_axis(&self, axis: Axis) -> Self {
        let mut s = self.clone();
        s.grid.y = axis;
        s
    }

    /// Copies and sets the height axis.
    pub fn with_height_axis(&self, axis: Axis) -> Self {
        let mut s = self.clone();
        s.height = axis;
        s
    }
}
