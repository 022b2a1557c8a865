//! Status command implementation

use console::Style;

use super::CommandContext;
use crate::cli::StatusArgs;
use crate::common::OsFileSystem;
use crate::error::Result;
use crate::installer::{DirectoryAssetProvider, Installer};

pub fn run(ctx: &CommandContext, args: &StatusArgs) -> Result<()> {
    let fs = OsFileSystem;
    let provider = DirectoryAssetProvider::open(&fs, &ctx.assets_dir)?;
    let installer = Installer::new(&fs, &provider, ctx.config.clone());

    let stale = installer.status(args.targets.selection())?;
    if stale.is_empty() {
        println!(
            "{} All installed files are up to date",
            Style::new().green().bold().apply_to("✓")
        );
        return Ok(());
    }

    println!(
        "{}",
        Style::new()
            .bold()
            .apply_to(format!("{} file(s) would be rewritten:", stale.len()))
    );
    for record in &stale {
        let state = if record.checksum.is_some() {
            Style::new().yellow().apply_to("changed")
        } else {
            Style::new().red().apply_to("missing")
        };
        println!("  {state}  {}", record.path);
    }
    Ok(())
}
