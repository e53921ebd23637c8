//! Bilinear spatial interpolation over one TEC map buffer.
use crate::{grid::Cell, map_stream::MISSING};

fn corner(buf: &[i64], xsize: usize, i: usize, j: usize) -> i64 {
    buf[j * xsize + i]
}

/// Bilinearly interpolates the TEC value at `(x, y)` from the four grid
/// nodes enclosing it. `buf` is one epoch's flat row-major map
/// (`buf[j·xsize + i]`). Returns [MISSING] if any of the four corners is
/// itself missing; otherwise truncates the blended value to an integer.
pub fn bilinear_interpolate(buf: &[i64], xsize: usize, cell: &Cell, x: f64, y: f64) -> i64 {
    let v00 = corner(buf, xsize, cell.i0, cell.j0);
    let v10 = corner(buf, xsize, cell.i1, cell.j0);
    let v01 = corner(buf, xsize, cell.i0, cell.j1);
    let v11 = corner(buf, xsize, cell.i1, cell.j1);

    if v00 == MISSING || v10 == MISSING || v01 == MISSING || v11 == MISSING {
        return MISSING;
    }

    let tx = if cell.x1 != cell.x0 {
        (x - cell.x0) / (cell.x1 - cell.x0)
    } else {
        0.0
    };

    let ty = if cell.y1 != cell.y0 {
        (y - cell.y0) / (cell.y1 - cell.y0)
    } else {
        0.0
    };

    let value = (1.0 - tx) * (1.0 - ty) * v00 as f64
        + tx * (1.0 - ty) * v10 as f64
        + (1.0 - tx) * ty * v01 as f64
        + tx * ty * v11 as f64;

    value as i64
}

/// Linearly blends two already-spatially-sampled values `a` (at `alpha`)
/// epoch and `b` (at `1 - alpha` epoch), weighting by `alpha ∈ [0, 1]`
/// (`alpha = 0` returns `a`, `alpha = 1` returns `b`). Propagates [MISSING].
pub fn temporal_blend(a: i64, b: i64, alpha: f64) -> i64 {
    if a == MISSING || b == MISSING {
        return MISSING;
    }

    ((1.0 - alpha) * a as f64 + alpha * b as f64) as i64
}
