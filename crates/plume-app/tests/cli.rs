//! End-to-end runs of the command-line front end.

use clap::Parser;
use plume_app::{AppError, CliArgs, run};
use plume_core::RecordingPrompt;
use plume_io::export::WHITE_BACKGROUND_QUESTION;

const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="50" height="50">
    <rect x="5" y="5" width="20" height="20" fill="#ff8800"/>
</svg>"##;

fn args(extra: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("plume").chain(extra.iter().copied())).unwrap()
}

#[test]
fn import_copy_paste_and_export_svg() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("square.svg");
    let output = dir.path().join("out.svg");
    std::fs::write(&input, SQUARE).unwrap();

    let args = args(&[
        "--import",
        input.to_str().unwrap(),
        "--keys",
        "ctrl+c,ctrl+v",
        "--svg",
        output.to_str().unwrap(),
    ]);
    let prompt = RecordingPrompt::default();
    let summary = run(&args, &prompt).unwrap();

    assert_eq!(summary.shapes, 2);
    // initial, import, paste
    assert_eq!(summary.undo_len, 3);
    assert_eq!(summary.written, vec![output.clone()]);
    let markup = std::fs::read_to_string(&output).unwrap();
    assert_eq!(markup.matches("<path").count(), 2);
    assert!(prompt.confirmations().is_empty());
}

#[test]
fn raster_export_asks_about_background_once() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("out.png");
    let pdf = dir.path().join("out.pdf");

    let args = args(&[
        "--png",
        png.to_str().unwrap(),
        "--pdf",
        pdf.to_str().unwrap(),
    ]);
    let prompt = RecordingPrompt::answering(true);
    let summary = run(&args, &prompt).unwrap();

    assert_eq!(prompt.confirmations(), vec![WHITE_BACKGROUND_QUESTION.to_string()]);
    assert_eq!(summary.written.len(), 2);
    assert!(std::fs::read(&png).unwrap().starts_with(b"\x89PNG"));
    assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}

#[test]
fn white_background_flag_skips_the_question() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("out.png");

    let args = args(&["--png", png.to_str().unwrap(), "--white-background"]);
    let prompt = RecordingPrompt::default();
    run(&args, &prompt).unwrap();

    assert!(prompt.confirmations().is_empty());
}

#[test]
fn unsupported_import_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "hello").unwrap();

    let args = args(&["--import", input.to_str().unwrap()]);
    let prompt = RecordingPrompt::default();
    let summary = run(&args, &prompt).unwrap();

    assert_eq!(summary.shapes, 0);
    assert_eq!(prompt.notices(), vec!["Unsupported file type.".to_string()]);
}

#[test]
fn bad_key_script_fails() {
    let args = args(&["--keys", "ctrl+nonsense"]);
    let result = run(&args, &RecordingPrompt::default());
    assert!(matches!(result, Err(AppError::Keys(_))));
}

#[test]
fn grid_flag_leaves_history_alone() {
    let args = args(&["--grid"]);
    let summary = run(&args, &RecordingPrompt::default()).unwrap();
    assert_eq!(summary.undo_len, 1);
    assert!(summary.written.is_empty());
}
