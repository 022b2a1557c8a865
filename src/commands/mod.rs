//! Command implementations for agentkit CLI

pub mod completions;
pub mod helpers;
pub mod install;
pub mod status;
pub mod uninstall;
pub mod version;

pub use helpers::CommandContext;
