//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments and the shared target selection flags
//! - uninstall: Uninstall command arguments
//! - status: Status command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod install;
pub mod status;
pub mod uninstall;

pub use completions::CompletionsArgs;
pub use install::{InstallArgs, TargetArgs};
pub use status::StatusArgs;
pub use uninstall::UninstallArgs;

/// agentkit - asset kit installer
///
/// Install agent, command and template files into a tool's configuration
/// directories and keep them in sync.
#[derive(Parser, Debug)]
#[command(
    name = "agentkit",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install, update and remove asset kits in your tool configuration directories",
    long_about = "agentkit copies the files of an asset kit into a primary and a secondary \
                  configuration directory, merges hooks into settings.json without touching \
                  your own entries, and records checksums in a lock file so reinstalls only \
                  rewrite what changed.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  agentkit install                        \x1b[90m# Install ./kit into ~/.claude and ~/.agentkit\x1b[0m\n   \
                  agentkit install --primary-only         \x1b[90m# Only the primary directory\x1b[0m\n   \
                  agentkit status                         \x1b[90m# Files a reinstall would rewrite\x1b[0m\n   \
                  agentkit uninstall                      \x1b[90m# Remove installed files and hooks\x1b[0m\n   \
                  agentkit --assets-dir ./my-kit install  \x1b[90m# Install another kit\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Primary configuration directory
    #[arg(
        long,
        global = true,
        env = "AGENTKIT_PRIMARY_DIR",
        value_name = "DIR"
    )]
    pub primary_dir: Option<PathBuf>,

    /// Secondary configuration directory
    #[arg(
        long,
        global = true,
        env = "AGENTKIT_SECONDARY_DIR",
        value_name = "DIR"
    )]
    pub secondary_dir: Option<PathBuf>,

    /// Asset kit directory (defaults to ./kit)
    #[arg(
        long,
        short = 'a',
        global = true,
        env = "AGENTKIT_ASSETS_DIR",
        value_name = "DIR"
    )]
    pub assets_dir: Option<PathBuf>,

    /// Lock file path (defaults to <primary-dir>/.lock)
    #[arg(long, global = true, env = "AGENTKIT_LOCKFILE", value_name = "FILE")]
    pub lockfile: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the asset kit
    Install(InstallArgs),

    /// Remove installed files and hooks
    Uninstall(UninstallArgs),

    /// List installed files that a reinstall would rewrite
    Status(StatusArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
