//! agentkit - asset kit installer
//!
//! Command line entry point; see the library crate for the install engine.

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use agentkit::cli::{Cli, Commands};
use agentkit::commands::{self, CommandContext};
use agentkit::error::Result;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
        Commands::Install(args) => commands::install::run(&CommandContext::from_cli(cli)?, args),
        Commands::Uninstall(args) => {
            commands::uninstall::run(&CommandContext::from_cli(cli)?, args)
        }
        Commands::Status(args) => commands::status::run(&CommandContext::from_cli(cli)?, args),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}
