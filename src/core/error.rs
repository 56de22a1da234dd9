use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CsvqlError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Arrow error: {0}")]
    ArrowError(String),
    #[error("Cannot parse CSV: {0}")]
    ParseError(String),
    #[error("Invalid input: {0}")]
    ValidationError(String),
    #[error("Query failed: {0}")]
    QueryError(String),
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    #[error("No table loaded in session '{0}'")]
    NoTableLoaded(String),
}

impl From<std::io::Error> for CsvqlError {
    fn from(err: std::io::Error) -> Self {
        CsvqlError::IoError(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for CsvqlError {
    fn from(err: arrow::error::ArrowError) -> Self {
        CsvqlError::ArrowError(err.to_string())
    }
}

impl From<datafusion::error::DataFusionError> for CsvqlError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        CsvqlError::QueryError(err.to_string())
    }
}
