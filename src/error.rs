// src/error.rs

//! Error types for distro registration
//!
//! Every failure a run can end in is a variant here. Operator-facing text is
//! carried in the variant so the command layer can print it verbatim.

use crate::validate::ValidationErrors;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Exit status for a successful run
pub const EXIT_OK: i32 = 0;

/// Exit status for invalid input, operator decline, or acquisition failure
pub const EXIT_FAILURE: i32 = 1;

/// Exit status when the catalog could not be written
pub const EXIT_WRITE_FAILURE: i32 = 2;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing, malformed, or conflicting operator input
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The operator answered "no" to a confirmation
    #[error("Cancelled by user: {0}")]
    UserDeclined(String),

    /// One or more artifacts could not be fetched
    #[error("{}", .0.join("\n"))]
    Acquisition(Vec<String>),

    /// The existing catalog is not valid JSON
    #[error("The {path} is not a valid json file: {message}")]
    CatalogParse { path: String, message: String },

    /// The final catalog write failed
    #[error("Failed to write {path}: {message}")]
    CatalogWrite { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Download error: {0}")]
    DownloadError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

impl Error {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CatalogWrite { .. } => EXIT_WRITE_FAILURE,
            _ => EXIT_FAILURE,
        }
    }

    /// Operator-facing messages, one per line of the error listing
    pub fn messages(&self) -> Vec<String> {
        match self {
            Error::Validation(errors) => errors.iter().map(str::to_string).collect(),
            Error::Acquisition(messages) => messages.clone(),
            Error::CatalogParse { path, message } => vec![
                format!("The {path} is not a valid json file."),
                message.clone(),
            ],
            other => vec![other.to_string()],
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}
