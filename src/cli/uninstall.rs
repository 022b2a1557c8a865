use clap::Parser;

use super::TargetArgs;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove everything the kit installed:\n    agentkit uninstall\n\n\
                  Remove only files in the secondary directory:\n    agentkit uninstall --secondary-only\n\n\
                  Files you added yourself and settings other than hooks are kept.")]
pub struct UninstallArgs {
    #[command(flatten)]
    pub targets: TargetArgs,
}
