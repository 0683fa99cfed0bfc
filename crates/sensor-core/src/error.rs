use std::path::PathBuf;
use thiserror::Error;

/// Reasons an uploaded CSV could not be turned into a dataset.
///
/// Every variant is reported to the user as the same "processing error";
/// the variant only shapes the cause message.
#[derive(Error, Debug)]
pub enum IngestionError {
    /// The CSV file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not well-formed CSV.
    #[error("Malformed CSV: {0}")]
    Csv(String),

    /// A required column is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A `Time` cell did not match any recognised timestamp format.
    #[error("Invalid timestamp on line {line}: {value:?}")]
    TimestampParse { line: u64, value: String },

    /// A measurement cell is neither empty nor a number.
    #[error("Invalid value for {column} on line {line}: {value:?}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
}

/// All errors produced by the sensor dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The uploaded CSV could not be ingested. The cause is part of the
    /// message rather than a source so it is printed once.
    #[error("Error processing file: {0}")]
    Ingestion(IngestionError),

    /// A filtered view could not be serialized to CSV.
    #[error("Failed to export CSV: {0}")]
    Export(String),

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<IngestionError> for DashboardError {
    fn from(e: IngestionError) -> Self {
        DashboardError::Ingestion(e)
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
