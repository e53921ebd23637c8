//! Antenna phase-center variation (PCV) pattern. Referenced only for its
//! shared use of the [Grid]/[Axis] abstraction; reading or writing ANTEX
//! files is out of scope here.
use crate::grid::{Axis, Grid};

/// One frequency's phase-center variation pattern: a zenith-only table,
/// and, when the antenna's calibration is azimuth-dependent, a second
/// (zenith, azimuth) table sharing the owning [AntennaPcv]'s grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyPcv {
    /// Phase center offset (north, east, up), in millimeters.
    pub eccentricity: [f64; 3],

    /// Zenith-only ("NOAZI") values, one per node of the owning
    /// [AntennaPcv]'s zenith axis.
    pub no_azi_values: Vec<f64>,

    /// Azimuth-dependent values, one per node of the owning [AntennaPcv]'s
    /// azimuth grid. Empty when the calibration has no azimuth dependency.
    pub azi_values: Vec<f64>,
}

impl FrequencyPcv {
    fn new(zenith_nodes: usize, azimuth_nodes: usize) -> Self {
        Self {
            eccentricity: [0.0; 3],
            no_azi_values: vec![0.0; zenith_nodes],
            azi_values: vec![0.0; azimuth_nodes],
        }
    }
}

/// Antenna PCV record for one ANTEX block. Every [FrequencyPcv] it holds
/// shares the same zenith axis and, when azimuth-dependent, the same
/// azimuth grid. The grid is held once here, not once per frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct AntennaPcv {
    /// Zenith axis (`ZEN1/ZEN2/DZEN`), shared by every frequency.
    pub zenith: Axis,

    /// Present only when the calibration is azimuth-dependent (`DAZI != 0`).
    /// A null grid pointer in the original model, made an explicit `Option`
    /// here instead of reached through an implicit dereference.
    pub azimuth_grid: Option<Grid>,

    pub frequencies: Vec<FrequencyPcv>,
}

impl AntennaPcv {
    pub fn new(zenith: Axis, azimuth_grid: Option<Grid>, frequency_count: usize) -> Self {
        let zenith_nodes = zenith.size();
        let azimuth_nodes = azimuth_grid.as_ref().map(Grid::size).unwrap_or(0);

        Self {
            zenith,
            azimuth_grid,
            frequencies: (0..frequency_count)
                .map(|_| FrequencyPcv::new(zenith_nodes, azimuth_nodes))
                .collect(),
        }
    }

    /// True when this antenna's calibration is azimuth-dependent.
    pub fn has_azimuth_pcv(&self) -> bool {
        self.azimuth_grid.is_some()
    }
}
