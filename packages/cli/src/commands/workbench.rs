//! Page loading, orchestrator wiring and history replay shared by commands

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use remix_editor::{
    BundledStrings, Collaborators, CommandManager, CommandOrchestrator, Document, FocusTracker,
    NodeId, StatusBar, StatusLine, StatusOutcome, TracingOverlayRenderer,
};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Args)]
pub struct PageArgs {
    /// HTML page to load
    pub page: PathBuf,

    /// Selector of the element to focus
    #[arg(short, long)]
    pub select: String,

    /// Undo this many times afterwards
    #[arg(long, default_value_t = 0)]
    pub undo: usize,

    /// Redo this many times after undoing
    #[arg(long, default_value_t = 0)]
    pub redo: usize,

    /// Run without transition effects (overrides config)
    #[arg(long)]
    pub no_effects: bool,

    /// Write the resulting page here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub struct Workbench {
    pub doc: Document,
    pub hud: Rc<RefCell<StatusBar>>,
    pub orchestrator: CommandOrchestrator,
    pub focused: NodeId,
}

impl Workbench {
    pub fn open(args: &PageArgs, config: &Config) -> Result<Self> {
        let source = fs::read_to_string(&args.page)
            .with_context(|| format!("Failed to read {}", args.page.display()))?;
        let base_uri = match &config.base_uri {
            Some(base_uri) => base_uri.clone(),
            None => file_url(&args.page),
        };
        let doc = Document::parse(&source).with_base_uri(base_uri);

        let focused = doc
            .select_first(&args.select)?
            .ok_or_else(|| anyhow!("No element matches `{}`", args.select))?;
        let mut focus = FocusTracker::new();
        focus.focus(focused);

        let mut options = config.mix_master_options();
        options.disable_transition_effects |= args.no_effects;

        let hud = Rc::new(RefCell::new(StatusBar::new()));
        let orchestrator = CommandOrchestrator::new(
            Collaborators {
                history: Box::new(CommandManager::with_max_levels(config.max_undo_levels)),
                focus: Box::new(focus),
                hud: Box::new(Rc::clone(&hud)),
                l10n: Box::new(BundledStrings::english().with_overrides(config.strings.clone())),
                overlay: Rc::new(TracingOverlayRenderer),
            },
            &options,
        );

        tracing::debug!(page = %args.page.display(), selector = %args.select, %focused, "page loaded");
        Ok(Self {
            doc,
            hud,
            orchestrator,
            focused,
        })
    }

    /// Apply `--undo` then `--redo`, reporting each step
    pub fn replay_history(&mut self, undo: usize, redo: usize) -> Result<()> {
        for _ in 0..undo {
            let outcome = self.orchestrator.undo(&mut self.doc)?;
            self.report(&outcome);
        }
        for _ in 0..redo {
            let outcome = self.orchestrator.redo(&mut self.doc)?;
            self.report(&outcome);
        }
        Ok(())
    }

    pub fn status(&self) -> Option<StatusLine> {
        self.hud.borrow().status.clone()
    }

    pub fn last_message(&self) -> Option<StatusLine> {
        self.hud.borrow().last_message.clone()
    }

    pub fn print_status(&self) {
        if let Some(status) = self.status() {
            eprintln!("  {} {}", "✓".green(), status);
        }
    }

    pub fn print_rejection(&self, reason: &str) {
        match self.last_message() {
            Some(message) => eprintln!("  {} {} ({})", "⚠".yellow(), message, reason),
            None => eprintln!("  {} {}", "⚠".yellow(), reason),
        }
    }

    /// Write the resulting page
    pub fn finish(&self, output: Option<&Path>) -> Result<()> {
        let html = self.doc.to_html();
        match output {
            Some(path) => {
                fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("  {} {}", "→".bright_blue(), path.display());
            }
            None => println!("{}", html),
        }
        Ok(())
    }

    fn report(&self, outcome: &StatusOutcome) {
        match outcome {
            StatusOutcome::Applied(_) => self.print_status(),
            StatusOutcome::Unavailable => {
                if let Some(status) = self.status() {
                    eprintln!("  {} {}", "·".dimmed(), status);
                }
            }
        }
    }
}

fn file_url(path: &Path) -> String {
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}
