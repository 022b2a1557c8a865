//! SHA-256 checksums for installed files

use std::fmt::Write as _;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::common::FileSystem;
use crate::error::Result;

/// Length of a hex encoded SHA-256 digest
pub const CHECKSUM_LEN: usize = 64;

/// Lowercase hex SHA-256 digest of `bytes`
pub fn checksum_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest
        .iter()
        .fold(String::with_capacity(CHECKSUM_LEN), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}

/// Calculate the SHA-256 checksum of a file
///
/// Fails with the file system's read error if the file cannot be read.
pub fn generate_checksum(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let bytes = fs.read(path)?;
    Ok(checksum_bytes(&bytes))
}

/// Whether `value` looks like a checksum produced by [`checksum_bytes`]
pub fn is_valid_checksum(value: &str) -> bool {
    value.len() == CHECKSUM_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
