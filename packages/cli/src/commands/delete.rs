use super::workbench::{PageArgs, Workbench};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub page: PageArgs,
}

pub fn delete(args: DeleteArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut bench = Workbench::open(&args.page, &config)?;

    eprintln!("{} {}", "🗑  Deleting".bright_blue().bold(), args.page.select);

    match bench.orchestrator.delete_focused_element(&mut bench.doc)? {
        Some(_) => bench.print_status(),
        None => bench.print_rejection("element kept"),
    }

    bench.replay_history(args.page.undo, args.page.redo)?;
    bench.finish(args.page.output.as_deref())
}
