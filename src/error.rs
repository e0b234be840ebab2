//! Error taxonomy for the reporting service

use thiserror::Error;

/// Error type for report computation and its data boundaries.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Caller bug: an unknown season label, group field, or metric name
    /// reached the typed API from a string boundary. Fatal to the single
    /// computation, never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The data snapshot could not be loaded or is structurally unusable.
    #[error("data source error: {0}")]
    DataSource(String),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    /// The narrative insight provider failed or returned an unusable
    /// response.
    #[error("insight provider error: {0}")]
    Insight(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
