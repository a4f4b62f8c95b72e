use super::workbench::{PageArgs, Workbench};
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use remix_editor::{RemixRequest, ScriptedHost, SessionPhase, SessionStart};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct RemixArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Editor messages to replay, one JSON object per line
    #[arg(short, long)]
    pub messages: PathBuf,

    /// Send the whole page to the editor (overrides config)
    #[arg(long)]
    pub full_document: bool,

    /// Editor URL (overrides config)
    #[arg(long)]
    pub dialog_url: Option<String>,
}

pub fn remix(args: RemixArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let mut bench = Workbench::open(&args.page, &config)?;
    let script = read_messages(&args.messages)?;

    eprintln!(
        "{} {} with {} editor messages",
        "🎛  Remixing".bright_blue().bold(),
        args.page.select,
        script.len()
    );

    let request = RemixRequest {
        dialog_url: args.dialog_url.unwrap_or_else(|| config.dialog_url.clone()),
        send_full_document: args.full_document || config.send_full_document,
        ..RemixRequest::default()
    };
    let mut host = ScriptedHost::new(script);

    match bench
        .orchestrator
        .remix_focused_element(&mut bench.doc, &mut host, &request)?
    {
        SessionStart::Opened(session, events) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start runtime")?;
            let outcome = runtime.block_on(session.run(&mut bench.orchestrator, &mut bench.doc, events))?;

            match outcome.phase {
                SessionPhase::Committed => bench.print_status(),
                _ => eprintln!(
                    "  {} remix canceled after {} previews",
                    "✗".red(),
                    outcome.previews
                ),
            }
        }
        SessionStart::Rejected(rejection) => bench.print_rejection(&format!("{:?}", rejection)),
    }

    bench.replay_history(args.page.undo, args.page.redo)?;
    bench.finish(args.page.output.as_deref())
}

/// Read a JSON-lines script, one editor message per non-blank line
fn read_messages(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read messages from {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
