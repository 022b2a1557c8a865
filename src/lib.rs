//! agentkit - asset kit installer
//!
//! Installs the files of an asset kit into a primary and a secondary target
//! directory, merges hooks into the user's `settings.json` without touching
//! existing entries, and keeps a checksum lock file so reinstalls rewrite only
//! what changed. Every install either completes or is rolled back.

pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod error;
pub mod hash;
pub mod installer;
pub mod merge;
pub mod path_utils;
pub mod progress;
pub mod transaction;

#[cfg(test)]
mod test_fixtures;

pub use error::{KitError, Result};
pub use installer::{InstallResult, InstallSelection, Installer, UninstallResult};
