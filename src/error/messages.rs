//! User-facing error messages
//!
//! Install and uninstall never surface typed errors to their callers; they
//! return a result with a list of these strings instead.

use super::KitError;

pub const INVALID_PATH: &str = "invalid path, re-enter a valid path";
pub const PERMISSION_DENIED: &str = "permission denied; check directory permissions (e.g. chmod)";
pub const DISK_FULL: &str = "disk full; free space and retry";

impl KitError {
    /// Map an error to the message shown to the user
    ///
    /// Path, permission and disk-space failures get a fixed hint naming the
    /// offending path; everything else is reported verbatim.
    pub fn user_message(&self) -> String {
        match self.root_cause() {
            KitError::InvalidPath { path } => format!("{INVALID_PATH} ({path})"),
            KitError::PermissionDenied { path } => format!("{PERMISSION_DENIED} ({path})"),
            KitError::DiskFull { path } => format!("{DISK_FULL} ({path})"),
            other => other.to_string(),
        }
    }
}
