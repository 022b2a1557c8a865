//! Install command implementation

use console::Style;

use super::CommandContext;
use crate::cli::InstallArgs;
use crate::common::OsFileSystem;
use crate::error::{KitError, Result};
use crate::installer::{DirectoryAssetProvider, Installer};
use crate::progress::ProgressDisplay;

pub fn run(ctx: &CommandContext, args: &InstallArgs) -> Result<()> {
    let fs = OsFileSystem;
    let provider = DirectoryAssetProvider::open(&fs, &ctx.assets_dir)?;
    let installer = Installer::new(&fs, &provider, ctx.config.clone());

    let progress = ProgressDisplay::new();
    let mut report = |label: &str, current: usize, total: usize| {
        progress.update(label, current, total);
    };
    let result = installer.install(args.targets.selection(), Some(&mut report));

    if !result.success {
        progress.abandon();
        for error in &result.errors {
            eprintln!("{} {}", Style::new().red().bold().apply_to("✗"), error);
        }
        eprintln!("No changes were kept.");
        return Err(KitError::CommandFailed {
            command: "install".to_string(),
            count: result.errors.len(),
        });
    }
    progress.finish();

    let written = result.installed_paths.len() - result.unchanged_paths.len();
    println!(
        "{} Installed {} {} ({} updated, {} unchanged)",
        Style::new().green().bold().apply_to("✓"),
        Style::new().bold().apply_to(&provider.descriptor().name),
        provider.descriptor().version,
        written,
        result.unchanged_paths.len()
    );
    for path in result
        .installed_paths
        .iter()
        .filter(|path| !result.unchanged_paths.contains(path))
    {
        println!("  {}", path.display());
    }
    Ok(())
}
