use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Expected {expected} columns (date, max temp, min temp, humidity, precipitation), found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("Input table has no data rows")]
    EmptyInput,

    #[error("No observations survived cleaning ({input_rows} input rows)")]
    EmptyResult { input_rows: usize },

    #[error("Unsupported input file: {0}")]
    UnsupportedInput(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<calamine::Error> for ProcessingError {
    fn from(err: calamine::Error) -> Self {
        ProcessingError::Workbook(err.to_string())
    }
}

impl From<config::ConfigError> for ProcessingError {
    fn from(err: config::ConfigError) -> Self {
        ProcessingError::Config(err.to_string())
    }
}

impl ProcessingError {
    /// Failures that mean the input could not be treated as a table at all
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ProcessingError::Io(_)
                | ProcessingError::Csv(_)
                | ProcessingError::Workbook(_)
                | ProcessingError::ColumnCount { .. }
                | ProcessingError::EmptyInput
                | ProcessingError::UnsupportedInput(_)
        )
    }
}
