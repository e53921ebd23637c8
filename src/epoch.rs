//! Parses the six-integer `YYYY MM DD hh mm ss` datetime fields used
//! throughout IONEX (`EPOCH OF FIRST MAP`, `EPOCH OF CURRENT MAP`, ...).
use crate::error::Error;
use crate::prelude::Epoch;

pub(crate) fn parse_utc(s: &str) -> Result<Epoch, Error> {
    let (mut y, mut m, mut d, mut hh, mut mm, mut ss) = (0_i32, 0_u8, 0_u8, 0_u8, 0_u8, 0_u8);

    let mut fields = 0;

    for (index, field) in s.split_ascii_whitespace().enumerate() {
        fields += 1;

        match index {
            0 => y = field.parse::<i32>().map_err(|_| Error::EpochParsing(s.to_string()))?,
            1 => m = field.parse::<u8>().map_err(|_| Error::EpochParsing(s.to_string()))?,
            2 => d = field.parse::<u8>().map_err(|_| Error::EpochParsing(s.to_string()))?,
            3 => hh = field.parse::<u8>().map_err(|_| Error::EpochParsing(s.to_string()))?,
            4 => mm = field.parse::<u8>().map_err(|_| Error::EpochParsing(s.to_string()))?,
            5 => ss = field.parse::<u8>().map_err(|_| Error::EpochParsing(s.to_string()))?,
            _ => {},
        }
    }

    if fields < 6 {
        return Err(Error::EpochParsing(s.to_string()));
    }

    Ok(Epoch::from_gregorian_utc(y, m, d, hh, mm, ss, 0))
}
