//! Plume - headless vector canvas editor

use clap::Parser;
use plume_app::{CliArgs, ShortcutRegistry, TerminalPrompt, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();

    if args.shortcuts {
        ShortcutRegistry::print_all();
        return ExitCode::SUCCESS;
    }

    let prompt = TerminalPrompt::new(args.yes);
    match run(&args, &prompt) {
        Ok(summary) => {
            log::info!(
                "{} shapes, {} undo entries, {} files written",
                summary.shapes,
                summary.undo_len,
                summary.written.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("plume: {e}");
            ExitCode::FAILURE
        }
    }
}
