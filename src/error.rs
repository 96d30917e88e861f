//! Typed failures raised by the preparation and query core.
//!
//! Plumbing (file access, CSV framing, YAML parsing) is reported through
//! `anyhow` at the edges; everything the core itself can reject lands here so
//! callers can tell a bad request from missing data from a broken snapshot.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Year {year} is outside the supported range {min}-{max}")]
    OutOfRange { year: i32, min: i32, max: i32 },
    #[error("No records found for year {year}")]
    NotFound { year: i32 },
    #[error("Column '{column}' row {row}: failed to parse '{value}' as a date")]
    UnparseableDate {
        column: String,
        row: usize,
        value: String,
    },
    #[error("Column '{column}' not found in table")]
    MissingColumn { column: String },
    #[error("Mapping '{mapping}' is invalid: {reason}")]
    InvalidMapping { mapping: String, reason: String },
}

/// Coarse bucket a failure belongs to, used to pick exit status (or an HTTP
/// status in a service adapter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Client,
    NotFound,
    Server,
}

impl ErrorClass {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorClass::Server => 1,
            ErrorClass::Client => 2,
            ErrorClass::NotFound => 3,
        }
    }
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::OutOfRange { .. } | Error::MissingColumn { .. } => ErrorClass::Client,
            Error::NotFound { .. } => ErrorClass::NotFound,
            Error::UnparseableDate { .. } | Error::InvalidMapping { .. } => ErrorClass::Server,
        }
    }

    pub(crate) fn missing_column(column: &str) -> Self {
        Error::MissingColumn {
            column: column.to_string(),
        }
    }
}

/// Classifies an arbitrary error chain; anything that is not one of ours is a
/// server-side failure.
pub fn classify(err: &anyhow::Error) -> ErrorClass {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map(Error::class)
        .unwrap_or(ErrorClass::Server)
}
