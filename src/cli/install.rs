use clap::{Args, Parser};

use crate::installer::InstallSelection;

/// Which target directories a command acts on
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct TargetArgs {
    /// Only the primary directory
    #[arg(long, conflicts_with = "secondary_only")]
    pub primary_only: bool,

    /// Only the secondary directory
    #[arg(long)]
    pub secondary_only: bool,
}

impl TargetArgs {
    pub fn selection(self) -> InstallSelection {
        InstallSelection {
            primary: !self.secondary_only,
            secondary: !self.primary_only,
        }
    }
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install the kit in ./kit:\n    agentkit install\n\n\
                  Install only into the primary directory:\n    agentkit install --primary-only\n\n\
                  Install a kit from another directory:\n    agentkit install --assets-dir ~/kits/review\n\n\
                  Install into custom directories:\n    agentkit install --primary-dir ./.claude --secondary-dir ./.agentkit")]
pub struct InstallArgs {
    #[command(flatten)]
    pub targets: TargetArgs,
}
