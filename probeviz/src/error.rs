use std::io;
use std::path::PathBuf;

use probemodel::ModelError;
use thiserror::Error;

/// Errors that can occur while loading benchmark data or producing a chart
#[derive(Error, Debug)]
pub enum VizError {
    /// Required dataset file is absent
    #[error("input file {} not found", path.display())]
    MissingInputFile { path: PathBuf },

    /// Dataset lacks a column a chart depends on
    #[error("{} has no {field} column (available: {})", path.display(), available.join(", "))]
    MissingColumn {
        path: PathBuf,
        field: String,
        available: Vec<String>,
    },

    /// A cell could not be parsed as a number
    #[error("{}:{line}: column {column} has non numeric value {value:?}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO errors when reading inputs or writing images
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Drawing backend failures
    #[error("Render error: {0}")]
    Render(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VizError>;

impl From<toml::de::Error> for VizError {
    fn from(err: toml::de::Error) -> Self {
        VizError::Config(err.to_string())
    }
}
