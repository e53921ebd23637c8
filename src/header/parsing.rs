use crate::{
    epoch::parse_utc,
    error::Error,
    grid::Axis,
    header::Header,
    mapf::MappingFunction,
};

use std::{
    io::{BufRead, BufReader, Read, Seek, SeekFrom},
    str::FromStr,
};

#[cfg(feature = "log")]
use log::trace;

/// Headers longer than this without an `END OF HEADER` marker are rejected;
/// guards against trying to stream-parse a non-IONEX file forever.
const MAX_HEADER_LINES: usize = 1000;

fn field(content: &str, start: usize, len: usize) -> &str {
    let end = (start + len).min(content.len());
    if start >= content.len() {
        ""
    } else {
        content[start..end].trim()
    }
}

fn parse_f64(content: &str) -> Result<f64, Error> {
    content
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::NumberParsing(content.trim().to_string()))
}

impl Header {
    /// Parses the IONEX header, consuming `reader` up to and including the
    /// `END OF HEADER` marker line, and returns it together with the byte
    /// offset immediately following that marker. The caller keeps that
    /// offset as the durable seek anchor every map query rewinds to.
    pub fn parse<R: Read + Seek>(reader: &mut BufReader<R>) -> Result<(Self, u64), Error> {
        let mut header = Self::default();
        let mut line = String::new();
        let mut line_count = 0usize;
        let mut in_aux_block = false;

        loop {
            if line_count >= MAX_HEADER_LINES {
                return Err(Error::HeaderTooLong);
            }

            line.clear();
            let n = reader.read_line(&mut line)?;

            if n == 0 {
                return Err(Error::HeaderTooLong);
            }

            line_count += 1;

            let trimmed = line.trim_end_matches(['\r', '\n']);

            if trimmed.len() < 60 {
                continue;
            }

            let (content, marker) = trimmed.split_at(60);

            if marker.contains("START OF AUX DATA") {
                in_aux_block = true;
                continue;
            }

            if marker.contains("END OF AUX DATA") {
                in_aux_block = false;
                continue;
            }

            if in_aux_block {
                continue;
            }

            if marker.contains("END OF HEADER") {
                break;
            } else if marker.contains("COMMENT") {
                header.comments.push(content.trim().to_string());
            } else if marker.contains("IONEX VERSION / TYPE") {
                let file_type = content.chars().nth(20).unwrap_or(' ');

                if file_type != 'I' {
                    return Err(Error::NotAnIonexFile);
                }

                let version_str = field(content, 0, 20);
                header.version = crate::version::Version::from_str(version_str)?;

                if header.version.major != 1 {
                    return Err(Error::UnsupportedVersion(version_str.to_string()));
                }
            } else if marker.contains("# OF MAPS IN FILE") {
                let number = field(content, 0, 20);

                header.number_of_maps = number
                    .parse::<u32>()
                    .map_err(|_| Error::NumberParsing(number.to_string()))?;
            } else if marker.contains("EPOCH OF FIRST MAP") {
                header.epoch_of_first_map = parse_utc(content)?;
            } else if marker.contains("EPOCH OF LAST MAP") {
                header.epoch_of_last_map = parse_utc(content)?;
            } else if marker.contains("PGM / RUN BY / DATE") {
                let pgm = field(content, 0, 20);

                if !pgm.is_empty() {
                    header.program = Some(pgm.to_string());
                }

                let run_by = field(content, 20, 20);

                if !run_by.is_empty() {
                    header.run_by = Some(run_by.to_string());
                }

                let date = field(content, 40, 20);

                if !date.is_empty() {
                    header.date = Some(date.to_string());
                }
            } else if marker.contains("INTERVAL") {
                let interval = parse_f64(field(content, 0, 20))?;
                header.sampling_period = hifitime::Duration::from_seconds(interval);
            } else if marker.contains("ELEVATION CUTOFF") {
                header.elevation_cutoff = parse_f64(field(content, 0, 20))? as f32;
            } else if marker.contains("BASE RADIUS") {
                header.base_radius_km = parse_f64(field(content, 0, 20))? as f32;
            } else if marker.contains("MAP DIMENSION") {
                let dim = field(content, 0, 20);

                header.map_dimension = dim
                    .parse::<u8>()
                    .map_err(|_| Error::NumberParsing(dim.to_string()))?;

                if header.map_dimension != 2 {
                    return Err(Error::UnsupportedMapDimension(header.map_dimension));
                }
            } else if marker.contains("EXPONENT") {
                let exponent = field(content, 0, 20);

                header.exponent = exponent
                    .parse::<i8>()
                    .map_err(|_| Error::NumberParsing(exponent.to_string()))?;
            } else if marker.contains("MAPPING FUNCTION") {
                let mapf = field(content, 0, 20);

                if !mapf.is_empty() {
                    header.mapf = MappingFunction::from_str(mapf)?;
                }
            } else if marker.contains("LAT1 / LAT2 / DLAT") {
                let from = parse_f64(field(content, 0, 8))?;
                let to = parse_f64(field(content, 8, 6))?;
                let step = parse_f64(field(content, 14, 6))?;
                header.grid.y = Axis::new(from, to, step)?;
            } else if marker.contains("LON1 / LON2 / DLON") {
                let from = parse_f64(field(content, 0, 8))?;
                let to = parse_f64(field(content, 8, 6))?;
                let step = parse_f64(field(content, 14, 6))?;
                header.grid.x = Axis::new(from, to, step)?;
            } else if marker.contains("HGT1 / HGT2 / DHGT") {
                let from = parse_f64(field(content, 0, 8))?;
                let to = parse_f64(field(content, 8, 6))?;
                let step = parse_f64(field(content, 14, 6))?;
                header.height = Axis::new(from, to, step)?;
            }
        }

        let end_of_header = reader.stream_position()?;

        if header.number_of_maps == 0 {
            return Err(Error::MissingHeaderField("# OF MAPS IN FILE"));
        }

        if header.grid.x.is_single_point() && header.grid.y.is_single_point() {
            return Err(Error::MissingHeaderField("LAT1 / LAT2 / DLAT or LON1 / LON2 / DLON"));
        }

        #[cfg(feature = "log")]
        trace!(
            "header parsed: {}x{} grid, {} maps, exponent {}",
            header.grid.xsize(),
            header.grid.ysize(),
            header.number_of_maps,
            header.exponent
        );

        Ok((header, end_of_header))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = concat!(
        "1.0                 I                                       IONEX VERSION / TYPE\n",
        "BIMINEX V1.0        AIUB                20220103 00:07:03   PGM / RUN BY / DATE\n",
        "  2022     1     2     0     0     0                        EPOCH OF FIRST MAP\n",
        "  2022     1     3     0     0     0                        EPOCH OF LAST MAP\n",
        "3600                                                        INTERVAL\n",
        "2                                                           # OF MAPS IN FILE\n",
        "COS                                                         MAPPING FUNCTION\n",
        "0                                                           ELEVATION CUTOFF\n",
        "2                                                           MAP DIMENSION\n",
        "6371.0                                                      BASE RADIUS\n",
        "-1                                                          EXPONENT\n",
        "    87.5 -87.5  -2.5                                        LAT1 / LAT2 / DLAT\n",
        "  -180.0 180.0   5.0                                        LON1 / LON2 / DLON\n",
        "   350.0 350.0   0.0                                        HGT1 / HGT2 / DHGT\n",
        "this is a comment                                           COMMENT\n",
        "                                                            END OF HEADER\n",
    );

    #[test]
    fn parses_a_typical_header() {
        let mut reader = BufReader::new(Cursor::new(SAMPLE.as_bytes()));
        let (header, end_of_header) = Header::parse(&mut reader).unwrap();

        assert_eq!(header.version.major, 1);
        assert_eq!(header.number_of_maps, 2);
        assert_eq!(header.grid.xsize(), 73);
        assert_eq!(header.grid.ysize(), 71);
        assert_eq!(header.exponent, -1);
        assert_eq!(header.comments, vec!["this is a comment".to_string()]);
        assert_eq!(end_of_header as usize, SAMPLE.len());
    }

    #[test]
    fn rejects_non_ionex_file_type() {
        let bad = SAMPLE.replacen(
            "1.0                 I                                       IONEX VERSION / TYPE\n",
            "1.0                 X                                       IONEX VERSION / TYPE\n",
            1,
        );

        let mut reader = BufReader::new(Cursor::new(bad.as_bytes()));
        assert!(matches!(Header::parse(&mut reader), Err(Error::NotAnIonexFile)));
    }

    #[test]
    fn skips_aux_data_block() {
        let with_aux = SAMPLE.replacen(
            "this is a comment                                           COMMENT\n",
            concat!(
                "this is a comment                                           COMMENT\n",
                "                                                            START OF AUX DATA\n",
                "garbage that should never be interpreted                   BOGUS MARKER\n",
                "                                                            END OF AUX DATA\n",
            ),
            1,
        );

        let mut reader = BufReader::new(Cursor::new(with_aux.as_bytes()));
        let (header, _) = Header::parse(&mut reader).unwrap();
        assert_eq!(header.number_of_maps, 2);
    }
}
