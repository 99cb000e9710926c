//! Error types for the statementkit library.
//!
//! All fallible operations return `Result<T, StatementError>`. The variants map
//! onto the failure modes of the pipeline: transport problems, missing
//! resources, oversized responses, parse failures, path-escape refusals, and
//! configuration mistakes.
//!
//! Errors inside a single filing are accumulated as strings in that filing's
//! manifest entry rather than aborting the run; see [`crate::pipeline`].

use thiserror::Error;

/// Error type covering every statementkit operation.
///
/// `NotFound` deserves a note: a 404 from EDGAR is frequently a *signal* rather
/// than a failure. The filing-summary loader catches it to try fallback paths,
/// and the pipeline records it as a per-statement error string and moves on.
#[derive(Error, Debug)]
pub enum StatementError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Response too large ({size} bytes): {url}")]
    ResponseTooLarge { url: String, size: usize },

    #[error("Unexpected status code {status} for {url}")]
    InvalidResponse { status: u16, url: String },

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("XML deserialization error: {0}")]
    XmlDe(#[from] quick_xml::DeError),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Refusing to write outside the output root: {0}")]
    PathEscape(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, StatementError>;
