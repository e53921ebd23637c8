//! Fixed-precision regular axis and the 2D (longitude, latitude) grid it forms.
use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scales a decimal-degree coordinate to an integer fixed-point representation.
/// Grid lookups are performed on these scaled integers so equality of grid
/// coordinates is exact, removing floating-point drift near node boundaries.
pub(crate) fn scaled(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Floor division that behaves correctly for negative divisors (descending axes).
fn floor_div(numerator: i64, denominator: i64) -> i64 {
    if denominator < 0 {
        (-numerator).div_euclid(-denominator)
    } else {
        numerator.div_euclid(denominator)
    }
}

/// A regular 1D [Axis]: `from`, `to`, `step`, with `size = ⌊(to − from)/step⌋ + 1`.
/// Supports descending axes (`step` negative, as IONEX latitude axes commonly are).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Axis {
    pub from: f64,
    pub to: f64,
    pub step: f64,
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            step: 1.0,
        }
    }
}

impl Axis {
    /// Builds a new [Axis]. A single-point axis (`from == to`) is always
    /// accepted, including with `step == 0.0` (the usual case for a 2D map's
    /// height axis). Otherwise fails if `step` is zero or its sign disagrees
    /// with the direction of `to − from`.
    pub fn new(from: f64, to: f64, step: f64) -> Result<Self, Error> {
        if from != to {
            if step == 0.0 {
                return Err(Error::BadGridDefinition(format!(
                    "zero step in axis [{from}, {to}]"
                )));
            }

            if (to - from).signum() != step.signum() {
                return Err(Error::BadGridDefinition(format!(
                    "step {step} sign does not match axis direction [{from}, {to}]"
                )));
            }
        }

        Ok(Self { from, to, step })
    }

    /// True when this axis is a single point (no width).
    pub fn is_single_point(&self) -> bool {
        self.from == self.to
    }

    /// Number of nodes along this axis.
    pub fn size(&self) -> usize {
        if self.is_single_point() {
            return 1;
        }

        let span = scaled(self.to) - scaled(self.from);
        let step = scaled(self.step);
        (floor_div(span, step) + 1) as usize
    }

    /// Coordinate of node `i`, in decimal degrees.
    pub fn node_at(&self, i: usize) -> f64 {
        self.from + i as f64 * self.step
    }

    /// Locates the enclosing cell's lower index for `x`. Fails with
    /// [Error::OutOfRange] if `x` lies strictly outside the closed interval
    /// defined by this axis. A point exactly on an interior node binds to
    /// the cell above; the upper endpoint pins to `size() - 2`.
    pub fn lower_index(&self, x: f64) -> Result<usize, Error> {
        let (min, max) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };

        if x < min || x > max {
            return Err(Error::OutOfRange);
        }

        let size = self.size();

        if size < 2 {
            return Ok(0);
        }

        let raw = floor_div(scaled(x) - scaled(self.from), scaled(self.step));
        let max_i0 = (size - 2) as i64;

        Ok(raw.clamp(0, max_i0) as usize)
    }
}

/// The tuple `(i0, x0, i1, x1, j0, y0, j1, y1)` identifying the four nodes
/// enclosing a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub i0: usize,
    pub x0: f64,
    pub i1: usize,
    pub x1: f64,
    pub j0: usize,
    pub y0: f64,
    pub j1: usize,
    pub y1: f64,
}

/// Two independent [Axis] forming a regular 2D grid. `x` is longitude, `y`
/// is latitude. Node index of `(i, j)` is `j · xsize + i`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grid {
    pub x: Axis,
    pub y: Axis,
}

impl Grid {
    pub fn new(x: Axis, y: Axis) -> Self {
        Self { x, y }
    }

    pub fn xsize(&self) -> usize {
        self.x.size()
    }

    pub fn ysize(&self) -> usize {
        self.y.size()
    }

    /// Total node count, `xsize · ysize`.
    pub fn size(&self) -> usize {
        self.xsize() * self.ysize()
    }

    /// Flat node index of `(i, j)`.
    pub fn node_index(&self, i: usize, j: usize) -> usize {
        j * self.xsize() + i
    }

    /// Returns the enclosing [Cell] of query point `(x, y)`.
    pub fn neighbor_nodes(&self, x: f64, y: f64) -> Result<Cell, Error> {
        let i0 = self.x.lower_index(x)?;
        let j0 = self.y.lower_index(y)?;

        Ok(Cell {
            i0,
            x0: self.x.node_at(i0),
            i1: i0 + 1,
            x1: self.x.node_at(i0 + 1),
            j0,
            y0: self.y.node_at(j0),
            j1: j0 + 1,
            y1: self.y.node_at(j0 + 1),
        })
    }
}
