#![doc(
    html_logo_url = "https://raw.githubusercontent.com/nav-solutions/.github/master/logos/logo2.jpg"
)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * IONEX is part of the nav-solutions framework.
 *
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al.
 * (cf. https://github.com/nav-solutions/ionex/graphs/contributors),
 * licensed under Mozilla Public license V2.
 *
 * Documentation: https://github.com/nav-solutions/ionex
 */

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

pub mod antex;
pub mod error;
pub mod grid;
pub mod header;
pub mod map_stream;
pub mod mapf;
pub mod sampler;
pub mod tec;
pub mod version;

mod epoch;

#[cfg(test)]
mod tests;

use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

#[cfg(feature = "flate2")]
use std::io::Cursor;

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

#[cfg(feature = "log")]
use log::warn;

use hifitime::prelude::{Duration, Epoch};

use crate::{error::Error, grid::Cell, header::Header};

pub mod prelude {
    pub use crate::{
        antex::{AntennaPcv, FrequencyPcv},
        error::Error,
        grid::{Axis, Cell, Grid},
        header::{Comments, Header},
        mapf::MappingFunction,
        tec::to_physical,
        version::Version,
        Ionex,
    };

    pub use hifitime::{Duration, Epoch, TimeScale, TimeSeries, Unit};
}

/// Finds the bracketing pair of indices `(i, j)` in a sorted, non-empty
/// epoch slice such that `file_epochs[i] <= t`, `j = i + 1` clamped at the
/// last index. Mirrors the moving-pair walk of the temporal interpolator:
/// `i` only ever advances, it is never recomputed from scratch.
fn locate_bracket(file_epochs: &[Epoch], t: Epoch) -> (usize, usize) {
    let last = file_epochs.len() - 1;
    let mut i = 0;

    while i < last && file_epochs[i + 1] <= t {
        i += 1;
    }

    (i, (i + 1).min(last))
}

/// Streaming reader over one IONEX resource, generic over the underlying
/// byte stream. Parses the header once at construction, capturing the
/// end-of-header byte offset as a durable seek anchor; every subsequent
/// [Self::get_tec_at] or [Self::interpolate] call rewinds to that anchor
/// and streams the maps forward again rather than holding them in memory.
///
/// ```
/// use std::io::Cursor;
/// use ionex::prelude::*;
///
/// let text = concat!(
///     "1.0                 I                                       IONEX VERSION / TYPE\n",
///     "  2022     1     2     0     0     0                        EPOCH OF FIRST MAP\n",
///     "  2022     1     2     1     0     0                        EPOCH OF LAST MAP\n",
///     "3600                                                        INTERVAL\n",
///     "2                                                           # OF MAPS IN FILE\n",
///     "2                                                           MAP DIMENSION\n",
///     "-1                                                          EXPONENT\n",
///     "    10.0   0.0 -10.0                                        LAT1 / LAT2 / DLAT\n",
///     "  -180.0 180.0 180.0                                        LON1 / LON2 / DLON\n",
///     "   350.0 350.0   0.0                                        HGT1 / HGT2 / DHGT\n",
///     "                                                            END OF HEADER\n",
///     "1                                                           START OF TEC MAP\n",
///     "  2022     1     2     0     0     0                        EPOCH OF CURRENT MAP\n",
///     "    10.0-180.0 180.0 180.0 350.0                            LAT/LON1/LON2/DLON/H\n",
///     "  120  120  120\n",
///     "     0.0-180.0 180.0 180.0 350.0                            LAT/LON1/LON2/DLON/H\n",
///     "  120  120  120\n",
///     "1                                                           END OF TEC MAP\n",
///     "2                                                           START OF TEC MAP\n",
///     "  2022     1     2     1     0     0                        EPOCH OF CURRENT MAP\n",
///     "    10.0-180.0 180.0 180.0 350.0                            LAT/LON1/LON2/DLON/H\n",
///     "  160  160  160\n",
///     "     0.0-180.0 180.0 180.0 350.0                            LAT/LON1/LON2/DLON/H\n",
///     "  160  160  160\n",
///     "2                                                           END OF TEC MAP\n",
/// );
///
/// let mut ionex = Ionex::new(Cursor::new(text.as_bytes().to_vec())).unwrap();
/// assert_eq!(ionex.map_count(), 2);
///
/// let (epochs, values) = ionex.get_tec_at(&[(0.0, 5.0)]).unwrap();
/// assert_eq!(epochs.len(), 2);
/// assert_eq!(values[0], vec![120, 160]);
/// ```
#[derive(Debug)]
pub struct Ionex<R> {
    header: Header,
    reader: BufReader<R>,
    end_of_header: u64,
}

impl Ionex<File> {
    /// Opens and parses an IONEX file from `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::new(File::open(path)?)
    }
}

#[cfg(feature = "flate2")]
impl Ionex<Cursor<Vec<u8>>> {
    /// Opens and parses a gzip-compressed IONEX file from `path`.
    ///
    /// The file is fully inflated into memory first: [GzDecoder] is not
    /// [Seek], and the map stream must be able to rewind to the
    /// end-of-header anchor on every query.
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    pub fn from_gzip_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut decoder = GzDecoder::new(File::open(path)?);
        let mut inflated = Vec::new();
        decoder.read_to_end(&mut inflated)?;
        Self::new(Cursor::new(inflated))
    }
}

impl<R: Read + Seek> Ionex<R> {
    /// Builds a new [Ionex] reader from any seekable byte stream, parsing
    /// its header immediately.
    pub fn new(reader: R) -> Result<Self, Error> {
        let mut reader = BufReader::new(reader);
        let (header, end_of_header) = Header::parse(&mut reader)?;

        Ok(Self {
            header,
            reader,
            end_of_header,
        })
    }

    /// Read-only access to the parsed [Header].
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// [Epoch] of the first map in the file.
    pub fn first_epoch(&self) -> Epoch {
        self.header.epoch_of_first_map
    }

    /// [Epoch] of the last map in the file.
    pub fn last_epoch(&self) -> Epoch {
        self.header.epoch_of_last_map
    }

    /// Nominal gap between two consecutive maps.
    pub fn interval(&self) -> Duration {
        self.header.sampling_period
    }

    /// Total number of maps described by the header.
    pub fn map_count(&self) -> u32 {
        self.header.number_of_maps
    }

    /// Decimal exponent applied to quantized TEC values
    /// (`value_tecu = raw · 10^exponent`).
    pub fn exponent(&self) -> i8 {
        self.header.exponent
    }

    /// Resolves the enclosing [Cell] of each query point, once: the grid
    /// is time-invariant, so this is computed a single time per call.
    fn cells_for(&self, points: &[(f64, f64)]) -> Result<Vec<Cell>, Error> {
        points
            .iter()
            .map(|(lon, lat)| self.header.grid.neighbor_nodes(*lon, *lat))
            .collect()
    }

    /// Streams every map at native file cadence, bilinearly sampling each
    /// at `points`. Returns `(epochs, values)` where `epochs` has one entry
    /// per map and `values[p][m]` is the sample at `points[p]` for the
    /// `m`-th map.
    pub fn get_tec_at(&mut self, points: &[(f64, f64)]) -> Result<(Vec<Epoch>, Vec<Vec<i64>>), Error> {
        let cells = self.cells_for(points)?;

        self.reader.seek(SeekFrom::Start(self.end_of_header))?;

        let xsize = self.header.grid.xsize();
        let map_size = self.header.grid.size();
        let map_count = self.header.number_of_maps as usize;

        let mut epochs = Vec::with_capacity(map_count);
        let mut values: Vec<Vec<i64>> = (0..points.len())
            .map(|_| Vec::with_capacity(map_count))
            .collect();

        let mut buf = vec![0i64; map_size];
        let mut line = String::new();

        for m in 0..self.header.number_of_maps {
            let epoch =
                map_stream::read_tec_map(&mut self.reader, &self.header, m + 1, &mut line, &mut buf)?;

            for (p, cell) in cells.iter().enumerate() {
                let (lon, lat) = points[p];
                values[p].push(sampler::bilinear_interpolate(&buf, xsize, cell, lon, lat));
            }

            epochs.push(epoch);
        }

        Ok((epochs, values))
    }

    /// Resamples `points` onto a regular output epoch schedule.
    ///
    /// `from`/`to` default to the file's first/last epoch and are clamped
    /// into that range (a warning is logged, with the `log` feature, when
    /// clamping occurs). `interval` defaults to the header's native
    /// sampling period; negative durations are clamped to zero, meaning
    /// "use the file's own epochs" rather than a regular step.
    pub fn interpolate(
        &mut self,
        points: &[(f64, f64)],
        from: Option<Epoch>,
        to: Option<Epoch>,
        interval: Option<Duration>,
    ) -> Result<(Vec<Epoch>, Vec<Vec<i64>>), Error> {
        let first = self.first_epoch();
        let last = self.last_epoch();

        let mut from = from.unwrap_or(first);
        let mut to = to.unwrap_or(last);

        if from < first {
            #[cfg(feature = "log")]
            warn!("`from` {from} predates first epoch {first}, clamping");
            from = first;
        }

        if to > last {
            #[cfg(feature = "log")]
            warn!("`to` {to} is past last epoch {last}, clamping");
            to = last;
        }

        if from > to {
            return Err(Error::InvalidRange);
        }

        if from == to {
            return Ok((Vec::new(), vec![Vec::new(); points.len()]));
        }

        let interval = match interval {
            Some(dt) if dt < Duration::ZERO => {
                #[cfg(feature = "log")]
                warn!("negative interval clamped to native file cadence");
                Duration::ZERO
            },
            Some(dt) => dt,
            None => self.interval(),
        };

        let (file_epochs, file_values) = self.get_tec_at(points)?;

        if file_epochs.is_empty() {
            return Ok((Vec::new(), vec![Vec::new(); points.len()]));
        }

        let output_epochs: Vec<Epoch> = if interval > Duration::ZERO {
            let mut epochs = Vec::new();
            let mut t = from;

            while t <= to {
                epochs.push(t);
                t += interval;
            }

            epochs
        } else {
            file_epochs
                .iter()
                .copied()
                .filter(|e| *e >= from && *e <= to)
                .collect()
        };

        let mut out_values: Vec<Vec<i64>> = (0..points.len())
            .map(|_| Vec::with_capacity(output_epochs.len()))
            .collect();

        for &t in &output_epochs {
            let (i, j) = locate_bracket(&file_epochs, t);

            for (p, column) in out_values.iter_mut().enumerate() {
                let value = if t == file_epochs[i] || i == j {
                    file_values[p][i]
                } else {
                    let ti = file_epochs[i];
                    let tj = file_epochs[j];
                    let beta = (t - ti).to_seconds() / (tj - ti).to_seconds();

                    sampler::temporal_blend(file_values[p][i], file_values[p][j], beta)
                };

                column.push(value);
            }
        }

        Ok((output_epochs, out_values))
    }
}
