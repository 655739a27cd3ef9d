//! Reference table ingestion: the drug dictionary and the labelled
//! interaction dataset.

pub mod dictionary;
pub mod interactions;

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading reference tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("reading {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} row {row}: identifier list {raw:?} is malformed")]
    MalformedIdentifierList { path: PathBuf, row: usize, raw: String },

    #[error("{path} row {row}: unsupported interaction label {label}")]
    UnexpectedLabel { path: PathBuf, row: usize, label: i64 },

    #[error("drug name {name:?} maps to both {first} and {second}")]
    AmbiguousName {
        name: String,
        first: String,
        second: String,
    },

    #[error("identifier {identifier} maps to both {first:?} and {second:?}")]
    AmbiguousIdentifier {
        identifier: String,
        first: String,
        second: String,
    },
}

pub type DataResult<T> = Result<T, DataError>;
