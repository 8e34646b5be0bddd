//! Error handling for ci-build.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while preparing build artifacts.
///
/// Nothing is retried: every variant aborts the run and is reported by
/// [`default_error_handler`].
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// The template document is not shaped like a deployment template
    #[error("Invalid template: {0}.")]
    InvalidTemplate(String),

    /// A packaged artifact referenced by the service is not on disk
    #[error("Missing artifact: {0}.")]
    MissingArtifact(String),

    /// The parameterized template could not be serialized
    #[error("Serialization error: {0}.")]
    SerializationError(String),

    /// The service descriptor could not be read or is missing required fields
    #[error("Invalid service descriptor: {0}.")]
    InvalidDescriptor(String),

    /// Represents errors that occur during configuration parsing or resolution
    #[error("Configuration error: {0}.")]
    ConfigError(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
