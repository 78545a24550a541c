//! Error types for go-wordcloud.
//!
//! Only load, schema and configuration failures abort a run. Render and write
//! failures are scoped to a single category and reported by the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for go-wordcloud operations.
#[derive(Error, Debug)]
pub enum WordCloudError {
    /// The input table could not be parsed as comma- or tab-delimited text
    #[error("Failed to load {}: {}", .path.display(), .message)]
    Load { path: PathBuf, message: String },

    /// Required columns are missing from the header row
    #[error("Input file is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A data row could not be converted into a record
    #[error("Invalid row at line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    /// No term in the table carries a positive occurrence count
    #[error("No occurrences found: the global maximum occurrence count is 0")]
    NoOccurrences,

    /// The renderer could not produce an image for a category
    #[error("Render error for {category}: {message}")]
    Render { category: String, message: String },

    /// The rendered image could not be saved
    #[error("Failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Font resolution or parsing errors
    #[error("Font error: {message}")]
    Font { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl WordCloudError {
    /// Create a new Config error
    pub fn config(message: impl Into<String>) -> Self {
        WordCloudError::Config {
            message: message.into(),
        }
    }

    /// Create a new InvalidParameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        WordCloudError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether this error ends the whole run rather than a single category
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            WordCloudError::Render { .. } | WordCloudError::Write { .. }
        )
    }
}

/// Convenience type alias for Results with WordCloudError
pub type Result<T> = std::result::Result<T, WordCloudError>;
