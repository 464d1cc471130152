use polars::error::PolarsError;
use polars::prelude::DataType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Data download failed")]
    DownloadIo(#[from] std::io::Error), // stream errors, read_to_end

    #[error("Failed to read dataset file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    // Errors during CSV reading (inside blocking task)
    #[error("I/O error processing CSV data from '{origin}'")]
    CsvReadIo {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing error processing CSV data from '{origin}'")]
    CsvReadPolars {
        origin: String,
        #[source]
        source: PolarsError,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Required column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("Column '{column}' cannot be read as {expected}")]
    ColumnType {
        column: String,
        expected: DataType,
        #[source]
        source: PolarsError,
    },

    #[error("Column '{column}' holds code {value}, expected {min}..={max}")]
    CodeOutOfRange {
        column: String,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("Column '{column}' holds negative rental count {value}")]
    NegativeCount { column: String, value: i64 },

    #[error("Missing value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },

    #[error("Failed to parse dates in column '{column}'")]
    DateParse {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Date in column '{column}' at row {row} is out of range ({days} days since 1970-01-01)")]
    DateOutOfRange { column: String, row: usize, days: i32 },
}
