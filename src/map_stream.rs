//! Reads or skips one IONEX TEC map, validating structural markers and
//! latitude/longitude coherence against the header grid definition.
use crate::error::Error;
use crate::grid::scaled;
use crate::header::Header;
use crate::prelude::Epoch;

use std::io::BufRead;

#[cfg(feature = "log")]
use log::{error, trace};

/// Sentinel meaning "no data"; not the number 9999.
pub const MISSING: i64 = 9999;

const VALUES_PER_LINE: usize = 16;
const VALUE_WIDTH: usize = 5;

fn div_ceil(value: usize, divider: usize) -> usize {
    let q = value / divider;
    let r = value % divider;
    if r == 0 {
        q
    } else {
        q + 1
    }
}

fn split_marker(line: &str) -> (&str, &str) {
    if line.len() >= 60 {
        line.split_at(60)
    } else {
        (line, "")
    }
}

fn trimmed_line(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

fn read_nonblank_line<R: BufRead>(reader: &mut R, line: &mut String) -> Result<(), Error> {
    loop {
        line.clear();
        let n = reader.read_line(line)?;

        if n == 0 {
            return Err(Error::MissingMapMarker("END OF TEC MAP"));
        }

        if !trimmed_line(line).trim().is_empty() {
            return Ok(());
        }
    }
}

fn expect_start_of_tec_map<R: BufRead>(
    reader: &mut R,
    line: &mut String,
    expected_index: u32,
) -> Result<(), Error> {
    line.clear();
    reader.read_line(line)?;

    let trimmed = trimmed_line(line);
    let (content, marker) = split_marker(trimmed);

    if !marker.contains("START OF TEC MAP") {
        return Err(Error::MissingMapMarker("START OF TEC MAP"));
    }

    let index = content
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::MapIndexParsing(content.trim().to_string()))?;

    if index != expected_index {
        #[cfg(feature = "log")]
        error!("map index mismatch: expected {expected_index}, got {index}");

        return Err(Error::MapIndexMismatch {
            expected: expected_index,
            got: index,
        });
    }

    Ok(())
}

fn read_epoch_of_current_map<R: BufRead>(reader: &mut R, line: &mut String) -> Result<Epoch, Error> {
    line.clear();
    reader.read_line(line)?;

    let trimmed = trimmed_line(line);
    let (content, marker) = split_marker(trimmed);

    if !marker.contains("EPOCH OF CURRENT MAP") {
        return Err(Error::MissingMapMarker("EPOCH OF CURRENT MAP"));
    }

    crate::epoch::parse_utc(content)
}

struct SliceSpec {
    lat: f64,
    lon1: f64,
    lon2: f64,
    dlon: f64,
    h: f64,
}

fn parse_slice_header<R: BufRead>(reader: &mut R, line: &mut String) -> Result<SliceSpec, Error> {
    read_nonblank_line(reader, line)?;

    let trimmed = trimmed_line(line);
    let (content, marker) = split_marker(trimmed);

    if !marker.contains("LAT/LON1/LON2/DLON/H") {
        return Err(Error::MissingMapMarker("LAT/LON1/LON2/DLON/H"));
    }

    if content.len() < 32 {
        return Err(Error::HeaderLineTooShort);
    }

    let field = |slice: &str| -> Result<f64, Error> {
        slice
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::NumberParsing(slice.trim().to_string()))
    };

    Ok(SliceSpec {
        lat: field(&content[0..8])?,
        lon1: field(&content[8..14])?,
        lon2: field(&content[14..20])?,
        dlon: field(&content[20..26])?,
        h: field(&content[26..32])?,
    })
}

fn expect_end_of_tec_map<R: BufRead>(reader: &mut R, line: &mut String) -> Result<(), Error> {
    read_nonblank_line(reader, line)?;

    let trimmed = trimmed_line(line);
    let (_, marker) = split_marker(trimmed);

    if marker.contains("END OF TEC MAP") {
        Ok(())
    } else {
        Err(Error::MissingMapMarker("END OF TEC MAP"))
    }
}

/// Traverses one epoch's TEC map: validates every structural marker and
/// latitude slice, and, when `out` is `Some`, appends the parsed integer
/// values in row-major order (`buf[j·xsize + i]`). When `out` is `None` the
/// values are discarded ([skip_tec_map]).
fn traverse_map<R: BufRead>(
    reader: &mut R,
    header: &Header,
    expected_index: u32,
    line: &mut String,
    mut out: Option<&mut [i64]>,
) -> Result<Epoch, Error> {
    expect_start_of_tec_map(reader, line, expected_index)?;
    let epoch = read_epoch_of_current_map(reader, line)?;

    let xsize = header.grid.xsize();
    let ysize = header.grid.ysize();
    let lines_per_slice = div_ceil(xsize, VALUES_PER_LINE);

    #[cfg(feature = "log")]
    trace!("map #{expected_index} @ {epoch}: {xsize}x{ysize}, {lines_per_slice} lines/slice");

    let mut write_offset = 0usize;

    for k in 0..ysize {
        let spec = parse_slice_header(reader, line)?;

        let expected_lat = header.grid.y.node_at(k);

        if scaled(spec.lat) != scaled(expected_lat) {
            return Err(Error::LatitudeMismatch {
                expected: expected_lat,
                got: spec.lat,
            });
        }

        if scaled(spec.lon1) != scaled(header.grid.x.from)
            || scaled(spec.lon2) != scaled(header.grid.x.to)
            || scaled(spec.dlon) != scaled(header.grid.x.step)
        {
            return Err(Error::BadGridDefinition(format!(
                "longitude slice spec mismatch at latitude {}",
                spec.lat
            )));
        }

        if scaled(spec.h) != scaled(header.height.from) {
            return Err(Error::BadGridDefinition(format!(
                "height slice mismatch at latitude {}",
                spec.lat
            )));
        }

        let mut values_read = 0usize;

        for _ in 0..lines_per_slice {
            line.clear();
            reader.read_line(line)?;
            let trimmed = trimmed_line(line);

            let mut pos = 0;
            while pos + VALUE_WIDTH <= trimmed.len() && values_read < xsize {
                let chunk = &trimmed[pos..pos + VALUE_WIDTH];
                pos += VALUE_WIDTH;

                let value = chunk
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| Error::NumberParsing(chunk.trim().to_string()))?;

                if let Some(ref mut buf) = out {
                    buf[write_offset] = value;
                }

                write_offset += 1;
                values_read += 1;
            }
        }

        if values_read != xsize {
            return Err(Error::ShortMapRead {
                expected: xsize,
                got: values_read,
            });
        }
    }

    if out.is_some() && write_offset != xsize * ysize {
        return Err(Error::ShortMapRead {
            expected: xsize * ysize,
            got: write_offset,
        });
    }

    expect_end_of_tec_map(reader, line)?;

    Ok(epoch)
}

/// Consumes one epoch's TEC map (all latitude slices and the trailing
/// `END OF TEC MAP` marker) without retaining its values.
pub fn skip_tec_map<R: BufRead>(
    reader: &mut R,
    header: &Header,
    expected_index: u32,
    line: &mut String,
) -> Result<Epoch, Error> {
    traverse_map(reader, header, expected_index, line, None)
}

/// Reads one epoch's TEC map into `buf`, in row-major order
/// (`buf[j·xsize + i]` holds the value at `(lon1 + i·dlon, lat1 + j·dlat)`).
/// `buf` must have room for `xsize · ysize` values.
pub fn read_tec_map<R: BufRead>(
    reader: &mut R,
    header: &Header,
    expected_index: u32,
    line: &mut String,
    buf: &mut [i64],
) -> Result<Epoch, Error> {
    traverse_map(reader, header, expected_index, line, Some(buf))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::{Axis, Grid};
    use std::io::Cursor;

    fn tiny_header() -> Header {
        let mut header = Header::default();
        header.grid = Grid::new(
            Axis::new(-180.0, 180.0, 180.0).unwrap(), // xsize = 3
            Axis::new(10.0, 0.0, -10.0).unwrap(),      // ysize = 2
        );
        header.height = Axis::new(350.0, 350.0, 0.0).unwrap();
        header
    }

    #[test]
    fn reads_a_tiny_map() {
        let header = tiny_header();

        let text = concat!(
            "1                                                           START OF TEC MAP\n",
            "  2022     1     2     0     0     0                        EPOCH OF CURRENT MAP\n",
            "    10.0-180.0 180.0 180.0 350.0                            LAT/LON1/LON2/DLON/H\n",
            "   10   20   30\n",
            "     0.0-180.0 180.0 180.0 350.0                            LAT/LON1/LON2/DLON/H\n",
            "   40 9999   60\n",
            "1                                                           END OF TEC MAP\n",
        );

        let mut reader = Cursor::new(text.as_bytes());
        let mut line = String::new();
        let mut buf = vec![0i64; header.grid.size()];

        let epoch = read_tec_map(&mut reader, &header, 1, &mut line, &mut buf).unwrap();
        assert_eq!(buf, vec![10, 20, 30, 40, MISSING, 60]);
        assert!(epoch.to_gregorian_utc().0 == 2022);
    }

    #[test]
    fn rejects_latitude_mismatch() {
        let header = tiny_header();

        let text = concat!(
            "1                                                           START OF TEC MAP\n",
            "  2022     1     2     0     0     0                        EPOCH OF CURRENT MAP\n",
            "     5.0-180.0 180.0 180.0 350.0                            LAT/LON1/LON2/DLON/H\n",
            "   10   20   30\n",
        );

        let mut reader = Cursor::new(text.as_bytes());
        let mut line = String::new();
        let mut buf = vec![0i64; header.grid.size()];

        let result = read_tec_map(&mut reader, &header, 1, &mut line, &mut buf);
        assert!(matches!(result, Err(Error::LatitudeMismatch { .. })));
    }

    #[test]
    fn rejects_blank_value_field() {
        let header = tiny_header();

        let text = concat!(
            "1                                                           START OF TEC MAP\n",
            "  2022     1     2     0     0     0                        EPOCH OF CURRENT MAP\n",
            "    10.0-180.0 180.0 180.0 350.0                            LAT/LON1/LON2/DLON/H\n",
            "   10   20     \n",
            "     0.0-180.0 180.0 180.0 350.0                            LAT/LON1/LON2/DLON/H\n",
            "   40   50   60\n",
            "1                                                           END OF TEC MAP\n",
        );

        let mut reader = Cursor::new(text.as_bytes());
        let mut line = String::new();
        let mut buf = vec![0i64; header.grid.size()];

        let result = read_tec_map(&mut reader, &header, 1, &mut line, &mut buf);
        assert!(matches!(result, Err(Error::NumberParsing(_))));
    }
}
