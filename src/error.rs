//! Error type of the pipelines

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Loading, schema or table failures
    #[error(transparent)]
    Frame(#[from] plr_polars::Error),

    /// Statistics, configuration or rendering failures
    #[error(transparent)]
    Core(#[from] plr_core::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Columns named by a schema failure, if that is what this is
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            Self::Frame(plr_polars::Error::MissingColumns(columns)) => Some(columns),
            _ => None,
        }
    }
}
