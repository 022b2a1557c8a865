//! Uninstall command implementation

use console::Style;

use super::CommandContext;
use crate::cli::UninstallArgs;
use crate::common::OsFileSystem;
use crate::error::{KitError, Result};
use crate::installer::{DirectoryAssetProvider, Installer};

pub fn run(ctx: &CommandContext, args: &UninstallArgs) -> Result<()> {
    let fs = OsFileSystem;
    let provider = DirectoryAssetProvider::open(&fs, &ctx.assets_dir)?;
    let installer = Installer::new(&fs, &provider, ctx.config.clone());

    let result = installer.uninstall(args.targets.selection());

    for path in &result.removed_paths {
        println!("  {}", Style::new().dim().apply_to(path.display()));
    }
    for error in &result.errors {
        eprintln!("{} {}", Style::new().red().bold().apply_to("✗"), error);
    }

    if !result.success {
        return Err(KitError::CommandFailed {
            command: "uninstall".to_string(),
            count: result.errors.len(),
        });
    }

    if result.removed_paths.is_empty() {
        println!("Nothing to uninstall.");
    } else {
        println!(
            "{} Removed {} file(s)",
            Style::new().green().bold().apply_to("✓"),
            result.removed_paths.len()
        );
    }
    Ok(())
}
