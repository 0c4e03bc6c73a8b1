//! # pawian-core
//!
//! This is an internal crate used by `pawian`.
#![warn(clippy::perf, clippy::style)]

use thiserror::Error;

/// Boost `program_options`-style configuration files as written by Pawian.
pub mod config;
/// Methods for loading, inspecting and writing momentum-tuple data.
pub mod data;
/// Utility functions, enums, and four-vector expressions.
pub mod utils;

pub use crate::config::ConfigFile;
pub use crate::data::io::{read_ascii, read_ascii_from, write_ascii, write_ascii_to};
pub use crate::data::root::read_pawian_hists;
pub use crate::data::{skeleton_frame, AsciiReadOptions, AsciiWriteOptions, PwaAccessor};
pub use crate::utils::enums::{Component, ComponentOrder, FloatPrecision, HistType};
pub use crate::utils::variables::{energy, mass, mass2, rho, rho2};
pub use crate::utils::vectors::{Vec3, Vec4};

pub type PawianResult<T> = Result<T, PawianError>;

/// The error type used by all `pawian` internal methods
#[derive(Error, Debug)]
pub enum PawianError {
    /// An alias for [`std::io::Error`].
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    /// An alias for [`polars::error::PolarsError`].
    #[error("Polars error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),
    /// An alias for [`shellexpand::LookupError`].
    #[error("Failed to expand path: {0}")]
    LookupError(#[from] shellexpand::LookupError<std::env::VarError>),
    /// The number of particle records in an event disagrees with the number of particles the
    /// caller asked for.
    #[error("Line {line}: expected {expected} particle records per event, but this event has {found}")]
    SchemaMismatch {
        /// Line (1-based) at which the mismatch was noticed
        line: usize,
        /// Number of particles requested
        expected: usize,
        /// Number of particle records actually present
        found: usize,
    },
    /// A line does not have the number of tokens required at its position in an event.
    #[error("Line {line}: expected {expected} whitespace-separated values, found {found}")]
    MalformedRecord {
        /// Line (1-based) of the offending record
        line: usize,
        /// Number of tokens expected (1 for a weight, 4 for a particle record)
        expected: usize,
        /// Number of tokens found
        found: usize,
    },
    /// A token could not be parsed as a floating-point number.
    #[error("Line {line}: \"{token}\" is not a valid number")]
    MalformedNumber {
        /// Line (1-based) containing the token
        line: usize,
        /// The token which failed to parse
        token: String,
    },
    /// The input ended in the middle of an event.
    #[error("Unexpected end of input after line {line}: expected {expected} lines for the last event, found {found}")]
    TruncatedFile {
        /// Last line (1-based) that was read
        line: usize,
        /// Number of lines an event occupies
        expected: usize,
        /// Number of lines available for the last event
        found: usize,
    },
    /// A query referenced a particle that is not part of the table.
    #[error("No particle with name \"{name}\"!")]
    UnknownParticle {
        /// Name of particle which failed lookup
        name: String,
    },
    /// Two particles share the same name.
    #[error("Particle \"{name}\" was given more than once!")]
    DuplicateName {
        /// The repeated name
        name: String,
    },
    /// An empty particle list was supplied.
    #[error("At least one particle is required")]
    NoParticles,
    /// The particle count was not given and cannot be inferred from an unweighted file.
    #[error("Cannot determine the number of particles in an unweighted file, please provide the particle names or count")]
    UnknownParticleCount,
    /// Weights were requested from a table without a weight column.
    #[error("Table does not contain a weight column")]
    MissingWeights,
    /// A [`DataFrame`](polars::prelude::DataFrame) does not follow the particle column layout.
    #[error("Not a Pawian table: {reason}")]
    InvalidSchema {
        /// Why validation failed
        reason: String,
    },
    /// A null value was found where a number is required.
    #[error("Column \"{column}\" has no value in row {row}")]
    MissingValue {
        /// Name of the column
        column: String,
        /// Row index (0-based)
        row: usize,
    },
    /// A ROOT tree has no branch holding a required value.
    #[error("ROOT tree \"{tree}\" has no branch for \"{name}\"")]
    MissingBranch {
        /// Name of the tree
        tree: String,
        /// The value that was looked up, e.g. `pi+_px`
        name: String,
    },
    /// A configuration line could not be interpreted.
    #[error("Config line {line}: cannot interpret \"{content}\"")]
    ConfigSyntax {
        /// Line (1-based) in the configuration file
        line: usize,
        /// The offending line
        content: String,
    },
    /// An error which occurs when the user tries to parse an invalid string of text, typically
    /// into an enum variant.
    #[error("Failed to parse string: \"{name}\" does not correspond to a valid \"{object}\"!")]
    ParseError {
        /// The string which was parsed
        name: String,
        /// The name of the object it failed to parse into
        object: String,
    },
    /// A custom fallback error for errors too complex or too infrequent to warrant their own error
    /// category.
    #[error("{0}")]
    Custom(String),
}

#[cfg(test)]
pub mod tests {
    use polars::prelude::*;

    /// Get the value of a float column at `row`, panicking on error.
    pub fn val(df: &DataFrame, col: &str, row: usize) -> f64 {
        let s = df.column(col).unwrap();
        match s.dtype() {
            DataType::Float64 => s.f64().unwrap().get(row).unwrap(),
            DataType::Float32 => s.f32().unwrap().get(row).unwrap() as f64,
            dt => panic!("column {col} must be f32/f64, got {dt:?}"),
        }
    }

    /// Get the first value of a 1-row float column, panicking on error.
    pub fn val1(df: &DataFrame, col: &str) -> f64 {
        val(df, col, 0)
    }

    pub fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }
}
