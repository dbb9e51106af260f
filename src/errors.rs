/*!
 * Error types for the postcue application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to the text-correction service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while building or reading subtitle cues
#[derive(Error, Debug, PartialEq)]
pub enum SubtitleError {
    /// Chunking produced zero cue lines
    #[error("No subtitle cues could be generated from the text")]
    NoContent,

    /// A timestamp did not match HH:MM:SS,mmm
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Cue timing does not fit in milliseconds
    #[error("Cue {seq_num} ends past the representable time range")]
    TimingOverflow {
        /// 1-based cue number
        seq_num: usize,
    },
}

/// Errors that stop a batch before any document is processed
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The configured input directory is absent
    #[error("Input folder {} does not exist", .0.display())]
    InputDirMissing(PathBuf),

    /// The input directory holds nothing to process
    #[error("No {pattern} files found in {}", .dir.display())]
    NoInputFiles {
        /// Directory that was searched
        dir: PathBuf,
        /// Human readable file pattern
        pattern: String,
    },

    /// No API key in the key file nor the environment
    #[error("Could not find an API key. Searched in: {}. Set it there or via the {env_var} environment variable", .searched.display())]
    CredentialMissing {
        /// Key file that was checked
        searched: PathBuf,
        /// Environment variable that was checked
        env_var: String,
    },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the correction provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from batch setup
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
