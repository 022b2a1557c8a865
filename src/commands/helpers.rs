//! Command helper utilities

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{DEFAULT_ASSETS_DIR, DEFAULT_PRIMARY_DIR, DEFAULT_SECONDARY_DIR, InstallConfig};
use crate::error::{KitError, Result};
use crate::path_utils::normalize_root;

/// Resolved locations shared by install, uninstall and status
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: InstallConfig,
    pub assets_dir: PathBuf,
}

impl CommandContext {
    /// Resolve global options against the current directory
    ///
    /// Options not given on the command line or in the environment fall back
    /// to `~/.claude`, `~/.agentkit` and `./kit`.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| KitError::IoError {
            message: format!("Failed to get current directory: {e}"),
        })?;
        Ok(Self::resolve(cli, &cwd))
    }

    fn resolve(cli: &Cli, cwd: &Path) -> Self {
        let primary = cli
            .primary_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PRIMARY_DIR));
        let secondary = cli
            .secondary_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SECONDARY_DIR));
        let assets = cli
            .assets_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR));

        Self {
            config: InstallConfig::resolve(&primary, &secondary, cli.lockfile.as_deref(), cwd),
            assets_dir: normalize_root(&assets, cwd),
        }
    }
}
