use thiserror::Error;

/// Errors raised while loading, analysing or exporting flight data
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV reader/writer errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Malformed `DDD:HH:MM:SS.mmm` timestamp; aborts the run
    #[error("Invalid timestamp '{value}' in data row {row}: {reason}")]
    Timestamp {
        /// 1-based data row (header rows excluded)
        row: usize,
        value: String,
        reason: String,
    },
    /// Missing or malformed name/unit header rows
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// File parsed but contained no data rows
    #[error("No data: {0}")]
    NoData(String),
    /// Chart rendering failure
    #[error("Plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
