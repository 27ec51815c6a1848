use thiserror::Error;

/// Errors that abort a single report run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("API credentials not set: {0}")]
    MissingCredentials(String),

    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {endpoint} returned {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid JSON from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
