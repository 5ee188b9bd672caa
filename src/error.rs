use serde_json::Error as SerdeError;
use std::{error, fmt, io};

/// Fatal load errors. Anything else that goes wrong while reading a map is a
/// [`ValidationWarning`] and the load continues best-effort.
#[derive(Debug)]
pub enum MapError {
    /// File or network read failed.
    SourceUnavailable { source: String, cause: io::Error },
    /// The bytes were not decodable as a map document.
    MalformedDocument { source: String, cause: SerdeError },
    /// Non-JSON path handed to the loader.
    UnsupportedFormat(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::SourceUnavailable { source, cause } => {
                write!(f, "Map source unavailable: {}: {}", source, cause)
            }
            MapError::MalformedDocument { source, cause } => {
                write!(f, "Malformed map document {}: {}", source, cause)
            }
            MapError::UnsupportedFormat(path) => {
                write!(f, "Unsupported map file format: {}", path)
            }
        }
    }
}

impl error::Error for MapError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MapError::SourceUnavailable { cause, .. } => Some(cause),
            MapError::MalformedDocument { cause, .. } => Some(cause),
            MapError::UnsupportedFormat(_) => None,
        }
    }
}

/// Non-fatal problems found while validating a document. The offending record
/// is dropped (or a default applied) and the load keeps going.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// A sparse tile entry outside the world bounds was dropped.
    TileOutOfRange { x: i32, y: i32 },
    /// A tile entry carried a code outside the enumeration and was dropped.
    UnknownTileType { x: i32, y: i32, code: u8 },
    /// An enemy placed outside the world bounds was dropped.
    EnemyOutOfRange { id: String },
    /// Unrecognized or missing schema version; defaults were applied.
    UnknownVersion { version: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::TileOutOfRange { x, y } => {
                write!(f, "tile at ({}, {}) outside the world, dropped", x, y)
            }
            ValidationWarning::UnknownTileType { x, y, code } => {
                write!(f, "tile at ({}, {}) has unknown type code {}, dropped", x, y, code)
            }
            ValidationWarning::EnemyOutOfRange { id } => {
                write!(f, "enemy '{}' outside the world, dropped", id)
            }
            ValidationWarning::UnknownVersion { version } => {
                write!(f, "unknown schema version '{}', defaults applied", version)
            }
        }
    }
}
