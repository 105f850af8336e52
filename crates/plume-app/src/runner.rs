//! Drives one editing session from parsed arguments.

use crate::CliArgs;
use plume_core::input::parse_chords;
use plume_core::{ConfigError, EditorConfig, EditorSession, HistoryError, InputError, UserPrompt};
use plume_io::{ExportError, ExportFormat, ExportOptions, Exporter, FileStore, ImportError, Importer, StoreError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("History error: {0}")]
    History(#[from] HistoryError),
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Bad key script: {0}")]
    Keys(#[from] InputError),
    #[error("Not a file name: {0}")]
    BadPath(PathBuf),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;

/// What a run left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Top-level shapes on the canvas.
    pub shapes: usize,
    /// Entries on the undo stack, the initial state included.
    pub undo_len: usize,
    /// Export files written, in svg, png, pdf order.
    pub written: Vec<PathBuf>,
}

pub fn run(args: &CliArgs, prompt: &dyn UserPrompt) -> AppResult<RunSummary> {
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let exporter_options = ExportOptions::from_config(&config);
    let mut session = EditorSession::new(config)?;

    for path in &args.imports {
        import_file(&mut session, path, prompt)?;
    }

    if args.grid && !session.scene().is_grid_visible() {
        session.toggle_grid();
    }

    if let Some(script) = &args.keys {
        for chord in parse_chords(script)? {
            match session.handle_key(chord.key, chord.modifiers)? {
                Some(command) => log::debug!("{chord:?} ran {command:?}"),
                None => log::warn!("{chord:?} is not bound to anything"),
            }
        }
    }

    let written = export_all(&mut session, args, exporter_options, prompt)?;

    Ok(RunSummary {
        shapes: session.scene().len(),
        undo_len: session.history().undo_len(),
        written,
    })
}

fn import_file(session: &mut EditorSession, path: &Path, prompt: &dyn UserPrompt) -> AppResult<()> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::BadPath(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let store = FileStore::new(dir)?;

    match pollster::block_on(Importer::new(&store).import_into(session, name, prompt))? {
        Some(id) => log::info!("Imported {} as {:?}", path.display(), id),
        None => log::info!("Skipped {}", path.display()),
    }
    Ok(())
}

fn export_all(
    session: &mut EditorSession,
    args: &CliArgs,
    options: ExportOptions,
    prompt: &dyn UserPrompt,
) -> AppResult<Vec<PathBuf>> {
    let targets: Vec<(ExportFormat, &PathBuf)> = [
        (ExportFormat::Svg, args.svg.as_ref()),
        (ExportFormat::Png, args.png.as_ref()),
        (ExportFormat::Pdf, args.pdf.as_ref()),
    ]
    .into_iter()
    .filter_map(|(format, path)| path.map(|path| (format, path)))
    .collect();

    let needs_raster = targets
        .iter()
        .any(|(format, _)| *format != ExportFormat::Svg);
    let options = if args.white_background {
        options.with_white_background(true)
    } else if needs_raster {
        options.ask_background(prompt)
    } else {
        options
    };
    let exporter = Exporter::new(options);

    let mut written = Vec::new();
    for (format, path) in targets {
        let bytes = exporter.render(session, format)?;
        std::fs::write(path, bytes).map_err(|source| AppError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("Wrote {}", path.display());
        written.push(path.clone());
    }
    Ok(written)
}
