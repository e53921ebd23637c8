use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [MappingFunction] used in the determination of the TEC map.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MappingFunction {
    /// cos-1(z)
    CosZ,

    /// Qfactor
    QFactor,
}

impl std::str::FromStr for MappingFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "q" => Ok(Self::QFactor),
            "cos" | "cosine" => Ok(Self::CosZ),
            _ => Err(Error::MappingFunctionParsing(s.trim().to_string())),
        }
    }
}

impl std::fmt::Display for MappingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::CosZ => write!(f, "Cos-1(z)"),
            Self::QFactor => write!(f, "Q-factor"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::MappingFunction;
    use std::str::FromStr;

    #[test]
    fn parses_known_mapping_functions() {
        assert_eq!(MappingFunction::from_str("COS").unwrap(), MappingFunction::CosZ);
        assert_eq!(MappingFunction::from_str("Q").unwrap(), MappingFunction::QFactor);
    }

    #[test]
    fn rejects_unknown_mapping_function() {
        assert!(MappingFunction::from_str("NONE").is_err());
    }
}
