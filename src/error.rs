//! Error types and handling for lapd
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for lapd operations
#[derive(Error, Diagnostic, Debug)]
pub enum LapdError {
    // Configuration errors
    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(lapd::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(
        code(lapd::config::parse_failed),
        help("Check the YAML syntax, or delete the file to regenerate the default")
    )]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to write default configuration file: {path}: {reason}")]
    #[diagnostic(code(lapd::config::write_failed))]
    ConfigWriteFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(lapd::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Function '{name}' is not defined in the configuration")]
    #[diagnostic(
        code(lapd::config::function_not_found),
        help("Add an entry with this name under 'functions' in lapd.yml")
    )]
    FunctionNotFound { name: String },

    // File system errors
    #[error("Failed to create directory: {path}: {reason}")]
    #[diagnostic(code(lapd::fs::mkdir_failed))]
    DirCreateFailed { path: String, reason: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(lapd::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(lapd::fs::io_error))]
    IoError { message: String },

    // Archive errors
    #[error("Failed to write archive {path}: {reason}")]
    #[diagnostic(code(lapd::archive::write_failed))]
    ArchiveFailed { path: String, reason: String },

    #[error("Archive entry '{entry}' is produced by more than one file (second source: {source_path})")]
    #[diagnostic(
        code(lapd::archive::collision),
        help("Adjust the filters so that no two files map to the same archive path")
    )]
    ArchiveEntryCollision { entry: String, source_path: String },

    #[error("File too large to package: {path} exceeds {limit} bytes")]
    #[diagnostic(code(lapd::archive::too_large))]
    FileTooLarge { path: String, limit: u64 },

    // Cloud errors
    #[error("Failed to initialize AWS clients: {reason}")]
    #[diagnostic(code(lapd::cloud::setup_failed))]
    CloudSetupFailed { reason: String },

    #[error("Failed to upload to s3://{bucket}/{key}: {reason}")]
    #[diagnostic(
        code(lapd::cloud::upload_failed),
        help("Check that the bucket exists and your credentials allow s3:PutObject")
    )]
    UploadFailed {
        bucket: String,
        key: String,
        reason: String,
    },

    #[error("Failed to update code of function '{function}': {reason}")]
    #[diagnostic(code(lapd::cloud::deploy_failed))]
    DeployFailed { function: String, reason: String },

    #[error("Failed to list log streams of {group}: {reason}")]
    #[diagnostic(code(lapd::cloud::log_list_failed))]
    LogListFailed { group: String, reason: String },

    #[error("Failed to delete log stream {stream} in {group}: {reason}")]
    #[diagnostic(code(lapd::cloud::log_delete_failed))]
    LogDeleteFailed {
        group: String,
        stream: String,
        reason: String,
    },
}

impl From<std::io::Error> for LapdError {
    fn from(err: std::io::Error) -> Self {
        LapdError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for LapdError {
    fn from(err: serde_yaml::Error) -> Self {
        LapdError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, LapdError>;
