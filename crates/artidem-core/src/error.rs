//! Error types shared by the generator and the dataset writer.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for artidem operations.
pub type DemResult<T> = Result<T, DemError>;

#[derive(Error, Debug)]
pub enum DemError {
    /// Grid or array dimensions are zero or inconsistent with the data.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A cell coordinate lies outside the grid.
    #[error("cell ({x}, {y}) is outside the {nx}x{ny} grid")]
    OutOfBounds { x: usize, y: usize, nx: usize, ny: usize },

    /// An array handed to the writer does not match the declared dimensions.
    #[error("variable `{variable}` has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        variable: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The dataset file could not be created, written, or read.
    #[error("I/O failure on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: netcdf::Error,
    },

    #[error("dataset is missing variable `{0}`")]
    MissingVariable(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
