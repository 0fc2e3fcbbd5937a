//! Error types for frame writers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WriterError>;
