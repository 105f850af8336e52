//! Plume Application
//!
//! Headless front end: builds an editing session from the command line,
//! imports files, replays shortcut scripts and writes exports.

mod prompt;
mod runner;
mod shortcuts;

use clap::Parser;
use std::path::PathBuf;

pub use prompt::TerminalPrompt;
pub use runner::{AppError, AppResult, RunSummary, run};
pub use shortcuts::{Shortcut, ShortcutRegistry};

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "plume")]
#[command(about = "Import, edit and export a Plume canvas")]
#[command(version)]
pub struct CliArgs {
    /// JSON editor configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SVG or PNG file to import. May be repeated.
    #[arg(long = "import", value_name = "FILE")]
    pub imports: Vec<PathBuf>,

    /// Show the grid overlay.
    #[arg(long)]
    pub grid: bool,

    /// Comma-separated shortcuts to replay, e.g. "ctrl+c,ctrl+v".
    #[arg(long, value_name = "SCRIPT")]
    pub keys: Option<String>,

    /// Write the canvas as SVG.
    #[arg(long, value_name = "OUT")]
    pub svg: Option<PathBuf>,

    /// Write the canvas as PNG.
    #[arg(long, value_name = "OUT")]
    pub png: Option<PathBuf>,

    /// Write the canvas as a one-page PDF.
    #[arg(long, value_name = "OUT")]
    pub pdf: Option<PathBuf>,

    /// Paint raster exports on white instead of asking.
    #[arg(long)]
    pub white_background: bool,

    /// Answer yes to every question.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print the keyboard shortcuts and exit.
    #[arg(long)]
    pub shortcuts: bool,
}
