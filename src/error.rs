use thiserror::Error;

use std::io::Error as IoError;

/// Errors that may arise while reading an IONEX resource or querying it.
///
/// Parsing errors abort the current call and leave the reader in a
/// defined but unspecified stream position; a fresh [Error]-returning
/// constructor call is required to recover.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] IoError),

    #[error("header line too short (invalid)")]
    HeaderLineTooShort,

    #[error("header exceeds maximum line count without a terminator")]
    HeaderTooLong,

    #[error("unsupported ionex version \"{0}\"")]
    UnsupportedVersion(String),

    #[error("failed to parse version from \"{0}\"")]
    VersionParsing(String),

    #[error("file-type marker is not \"I\"")]
    NotAnIonexFile,

    #[error("unsupported map dimension \"{0}\" (only 2D is supported)")]
    UnsupportedMapDimension(u8),

    #[error("unknown mapping function \"{0}\"")]
    MappingFunctionParsing(String),

    #[error("missing required header field: {0}")]
    MissingHeaderField(&'static str),

    #[error("malformed numeric field in \"{0}\"")]
    NumberParsing(String),

    #[error("malformed datetime field in \"{0}\"")]
    EpochParsing(String),

    #[error("bad grid definition: {0}")]
    BadGridDefinition(String),

    #[error("failed to parse map index from \"{0}\"")]
    MapIndexParsing(String),

    #[error("map index mismatch: expected {expected}, got {got}")]
    MapIndexMismatch { expected: u32, got: u32 },

    #[error("expected map marker \"{0}\"")]
    MissingMapMarker(&'static str),

    #[error("latitude slice mismatch: expected {expected}, got {got}")]
    LatitudeMismatch { expected: f64, got: f64 },

    #[error("short read: expected {expected} TEC values, got {got}")]
    ShortMapRead { expected: usize, got: usize },

    #[error("query point lies outside the grid")]
    OutOfRange,

    #[error("invalid range: `from` is later than `to`")]
    InvalidRange,
}
