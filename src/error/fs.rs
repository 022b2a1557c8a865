//! File system errors

use std::io::ErrorKind;
use std::path::Path;

use super::KitError;

/// `ENOSPC` on Unix-likes, `ERROR_DISK_FULL` on Windows
#[cfg(not(windows))]
const RAW_DISK_FULL: i32 = 28;
#[cfg(windows)]
const RAW_DISK_FULL: i32 = 112;

/// Which kind of file system access failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Read,
    Write,
}

impl KitError {
    /// Classify an I/O error for `path` into the error taxonomy
    pub fn from_io(op: FsOp, path: &Path, err: &std::io::Error) -> Self {
        let path = path.display().to_string();

        match err.kind() {
            ErrorKind::NotFound => KitError::InvalidPath { path },
            ErrorKind::PermissionDenied => KitError::PermissionDenied { path },
            ErrorKind::StorageFull => KitError::DiskFull { path },
            _ if err.raw_os_error() == Some(RAW_DISK_FULL) => KitError::DiskFull { path },
            _ => match op {
                FsOp::Read => KitError::FileReadFailed {
                    path,
                    reason: err.to_string(),
                },
                FsOp::Write => KitError::FileWriteFailed {
                    path,
                    reason: err.to_string(),
                },
            },
        }
    }
}

/// Closure adapter for `map_err` on reads
pub fn read_error(path: &Path) -> impl FnOnce(std::io::Error) -> KitError + '_ {
    move |e| KitError::from_io(FsOp::Read, path, &e)
}

/// Closure adapter for `map_err` on writes
pub fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> KitError + '_ {
    move |e| KitError::from_io(FsOp::Write, path, &e)
}
