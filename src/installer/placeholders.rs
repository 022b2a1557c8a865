//! Placeholder substitution
//!
//! Asset text may contain `{{PRIMARY_PATH}}`, `{{SECONDARY_PATH}}` and
//! `{{SCRIPT_EXTENSION}}`. They are resolved once per run from the normalized
//! target roots and the host platform.

use std::path::Path;

use crate::path_utils::to_forward_slashes;

pub const PRIMARY_PATH_TOKEN: &str = "{{PRIMARY_PATH}}";
pub const SECONDARY_PATH_TOKEN: &str = "{{SECONDARY_PATH}}";
pub const SCRIPT_EXTENSION_TOKEN: &str = "{{SCRIPT_EXTENSION}}";

/// Extension of hook scripts on this platform
#[cfg(windows)]
pub const SCRIPT_EXTENSION: &str = ".ps1";
#[cfg(not(windows))]
pub const SCRIPT_EXTENSION: &str = ".sh";

/// Resolved placeholder values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMap {
    pub primary_path: String,
    pub secondary_path: String,
    pub script_extension: String,
}

impl PlaceholderMap {
    pub fn new(primary_root: &Path, secondary_root: &Path) -> Self {
        Self {
            primary_path: to_forward_slashes(primary_root),
            secondary_path: to_forward_slashes(secondary_root),
            script_extension: SCRIPT_EXTENSION.to_string(),
        }
    }

    fn tokens(&self) -> [(&'static str, &str); 3] {
        [
            (PRIMARY_PATH_TOKEN, &self.primary_path),
            (SECONDARY_PATH_TOKEN, &self.secondary_path),
            (SCRIPT_EXTENSION_TOKEN, &self.script_extension),
        ]
    }

    /// Replace every known token in `text`
    pub fn substitute(&self, text: &str) -> String {
        self.tokens()
            .iter()
            .fold(text.to_string(), |acc, (token, value)| acc.replace(token, value))
    }

    /// Substitute tokens in file content
    ///
    /// Content that is not UTF-8 is returned unchanged.
    pub fn substitute_bytes(&self, bytes: Vec<u8>) -> Vec<u8> {
        match String::from_utf8(bytes) {
            Ok(text) => self.substitute(&text).into_bytes(),
            Err(e) => e.into_bytes(),
        }
    }
}
