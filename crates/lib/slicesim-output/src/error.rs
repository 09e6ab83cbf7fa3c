use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported output file {0}, expected a .parquet or .csv extension")]
    UnsupportedExtension(PathBuf),
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("logger configuration failed: {0}")]
    Logger(String),
    #[error("terminal failure: {0}")]
    Terminal(#[from] io::Error),
    #[error("terminal UI stopped unexpectedly: {0}")]
    Ui(String),
}

impl OutputError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        OutputError::Io {
            path: path.into(),
            source,
        }
    }
}
