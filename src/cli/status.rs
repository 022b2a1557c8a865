use clap::Parser;

use super::TargetArgs;

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show files that differ from the lock file:\n    agentkit status\n\n\
                  Check only the primary directory:\n    agentkit status --primary-only")]
pub struct StatusArgs {
    #[command(flatten)]
    pub targets: TargetArgs,
}
