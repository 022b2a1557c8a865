//! Error types and handling for agentkit
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Sub-modules:
//! - [`fs`]: classification of `std::io::Error` into path, permission and disk-space errors
//! - [`messages`]: user-facing messages shown by install/uninstall results

pub mod fs;
pub mod messages;


pub use fs::FsOp;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for agentkit operations
#[derive(Error, Diagnostic, Debug)]
pub enum KitError {
    // File system errors
    #[error("Path not found: {path}")]
    #[diagnostic(
        code(agentkit::fs::invalid_path),
        help("Check that the directory exists or pass a different --primary-dir/--secondary-dir")
    )]
    InvalidPath { path: String },

    #[error("Permission denied: {path}")]
    #[diagnostic(
        code(agentkit::fs::permission_denied),
        help("Check directory permissions (e.g. chmod)")
    )]
    PermissionDenied { path: String },

    #[error("No space left on device while writing {path}")]
    #[diagnostic(code(agentkit::fs::disk_full), help("Free some disk space and retry"))]
    DiskFull { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(agentkit::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(agentkit::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Not a regular file: {path}")]
    #[diagnostic(
        code(agentkit::fs::not_a_file),
        help("Only files are removed; delete the directory by hand if it is no longer needed")
    )]
    NotAFile { path: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(agentkit::fs::io_error))]
    IoError { message: String },

    // Lock file errors
    #[error("Failed to parse lock file: {path}: {reason}")]
    #[diagnostic(
        code(agentkit::lockfile::parse_failed),
        help("Delete the lock file to force a fresh install")
    )]
    ManifestParseFailed { path: String, reason: String },

    #[error("Failed to write lock file: {path}")]
    #[diagnostic(code(agentkit::lockfile::write_failed))]
    ManifestWriteFailed {
        path: String,
        #[source]
        source: Box<KitError>,
    },

    // Settings errors
    #[error("Failed to parse settings file: {path}: {reason}")]
    #[diagnostic(
        code(agentkit::settings::parse_failed),
        help("Fix the JSON syntax in the settings file; it was left untouched")
    )]
    SettingsParseFailed { path: String, reason: String },

    #[error("Settings merge failed for {path}; original file restored")]
    #[diagnostic(code(agentkit::settings::merge_failed))]
    MergeTransactionFailed {
        path: String,
        #[source]
        source: Box<KitError>,
    },

    // Asset errors
    #[error("Failed to install asset: {path}")]
    #[diagnostic(code(agentkit::asset::copy_failed))]
    AssetCopyFailed {
        path: String,
        #[source]
        source: Box<KitError>,
    },

    #[error("Failed to parse kit descriptor: {path}: {reason}")]
    #[diagnostic(
        code(agentkit::asset::kit_parse_failed),
        help("kit.yaml must contain `name` and `version` keys")
    )]
    KitConfigParseFailed { path: String, reason: String },

    // Command errors
    #[error("{command} failed with {count} error(s)")]
    #[diagnostic(code(agentkit::command::failed))]
    CommandFailed { command: String, count: usize },
}

impl KitError {
    /// Wrap an error raised while installing a single asset
    pub fn asset_copy(path: impl Into<String>, source: KitError) -> Self {
        KitError::AssetCopyFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Wrap an error raised while writing the lock file
    pub fn manifest_write(path: impl Into<String>, source: KitError) -> Self {
        KitError::ManifestWriteFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Wrap an error raised inside a settings merge transaction
    pub fn merge_transaction(path: impl Into<String>, source: KitError) -> Self {
        KitError::MergeTransactionFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error is the file system's "not found" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, KitError::InvalidPath { .. })
    }

    /// The innermost error of a wrapper chain
    pub fn root_cause(&self) -> &KitError {
        match self {
            KitError::ManifestWriteFailed { source, .. }
            | KitError::MergeTransactionFailed { source, .. }
            | KitError::AssetCopyFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<std::io::Error> for KitError {
    fn from(err: std::io::Error) -> Self {
        KitError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for KitError {
    fn from(err: serde_json::Error) -> Self {
        KitError::SettingsParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for KitError {
    fn from(err: serde_yaml::Error) -> Self {
        KitError::KitConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, KitError>;
