//! Import and export through a live editing session.

use kurbo::Point;
use plume_core::shapes::Shape;
use plume_core::{EditorConfig, EditorSession, RecordingPrompt};
use plume_io::export::{RasterImage, encode_png};
use plume_io::{
    AssetStore, ExportFormat, ExportOptions, Exporter, FileStore, ImportError, Importer,
    MemoryStore, StoreError, UNSUPPORTED_NOTICE,
};

const TWO_SHAPES: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
    <rect x="10" y="10" width="20" height="20" fill="#3366cc"/>
    <circle cx="70" cy="70" r="10" stroke="#000000" stroke-width="2" fill="none"/>
</svg>"##;

const ONE_SHAPE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
    <rect x="10" y="10" width="20" height="20" fill="#3366cc"/>
</svg>"##;

fn session() -> EditorSession {
    EditorSession::new(EditorConfig::default()).unwrap()
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_png(&RasterImage {
        width,
        height,
        pixels: vec![200; (width * height * 4) as usize],
    })
    .unwrap()
}

#[test]
fn unsupported_file_notifies_without_mutation() {
    let store = MemoryStore::new().with_asset("notes.txt", b"hello".to_vec());
    let prompt = RecordingPrompt::default();
    let mut session = session();

    let result = pollster::block_on(Importer::new(&store).import_into(
        &mut session,
        "notes.txt",
        &prompt,
    ));

    assert!(matches!(result, Ok(None)));
    assert_eq!(prompt.notices(), vec![UNSUPPORTED_NOTICE.to_string()]);
    assert!(session.scene().is_empty());
    assert_eq!(session.history().undo_len(), 1);
}

#[test]
fn read_does_not_touch_the_scene() {
    let store = MemoryStore::new().with_asset("shot.png", png_bytes(4, 2));
    let session = session();

    let content = pollster::block_on(Importer::new(&store).read("shot.png")).unwrap();

    assert!(matches!(
        content,
        plume_core::ImportedContent::Image { width: 4, height: 2, .. }
    ));
    assert!(session.scene().is_empty());
}

#[test]
fn raster_import_centered_and_selected() {
    let store = MemoryStore::new().with_asset("photo.png", png_bytes(100, 50));
    let prompt = RecordingPrompt::default();
    let mut session = session();

    let id = pollster::block_on(Importer::new(&store).import_into(
        &mut session,
        "photo.png",
        &prompt,
    ))
    .unwrap()
    .unwrap();

    assert_eq!(session.scene().len(), 1);
    assert_eq!(session.selection().single(), Some(id));
    let bounds = session.scene().get_shape(id).unwrap().bounds();
    assert_eq!(bounds.center(), Point::new(400.0, 300.0));
    assert_eq!(bounds.width(), 100.0);
    assert!(prompt.notices().is_empty());
}

#[test]
fn svg_with_several_primitives_is_grouped() {
    let store = MemoryStore::new().with_asset("icons.svg", TWO_SHAPES);
    let prompt = RecordingPrompt::default();
    let mut session = session();

    let id = pollster::block_on(Importer::new(&store).import_into(
        &mut session,
        "icons.svg",
        &prompt,
    ))
    .unwrap()
    .unwrap();

    let group = session.scene().get_shape(id).and_then(Shape::as_group).unwrap();
    assert_eq!(group.len(), 2);
    assert_eq!(session.selection().single(), Some(id));
}

#[test]
fn svg_with_one_primitive_is_added_as_is() {
    let store = MemoryStore::new().with_asset("square.svg", ONE_SHAPE);
    let mut session = session();

    let id = pollster::block_on(Importer::new(&store).import_into(
        &mut session,
        "square.svg",
        &RecordingPrompt::default(),
    ))
    .unwrap()
    .unwrap();

    assert!(matches!(session.scene().get_shape(id), Some(Shape::Path(_))));
}

#[test]
fn missing_file_is_an_error() {
    let store = MemoryStore::new();
    let mut session = session();

    let result = pollster::block_on(Importer::new(&store).import_into(
        &mut session,
        "gone.svg",
        &RecordingPrompt::default(),
    ));

    assert!(matches!(
        result,
        Err(ImportError::Store(StoreError::NotFound(_)))
    ));
    assert!(session.scene().is_empty());
}

#[test]
fn grid_lines_absent_from_svg_export() {
    let mut session = session();
    session.add_text().unwrap();
    session.toggle_grid();

    let bytes = Exporter::default()
        .render(&mut session, ExportFormat::Svg)
        .unwrap();
    let markup = String::from_utf8(bytes).unwrap();

    assert!(!markup.contains("<line"));
    assert!(markup.contains("New Text"));
    assert!(session.scene().is_grid_visible());
}

#[test]
fn export_ignores_and_keeps_the_viewport() {
    let mut session = session();
    session.add_text().unwrap();
    session.zoom_at(Point::new(100.0, 100.0), 2.0);

    let bytes = Exporter::default()
        .render(&mut session, ExportFormat::Svg)
        .unwrap();

    assert!(!String::from_utf8(bytes).unwrap().contains("matrix("));
    assert!((session.camera().zoom - 2.0).abs() < f64::EPSILON);
}

#[test]
fn png_export_is_oversampled() {
    let mut session = session();
    session.add_text().unwrap();

    let bytes = Exporter::new(ExportOptions::default().with_white_background(true))
        .render(&mut session, ExportFormat::Png)
        .unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2400, 1800));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn pdf_page_matches_canvas() {
    let config = EditorConfig {
        canvas_width: 200.0,
        canvas_height: 120.0,
        ..EditorConfig::default()
    };
    let mut session = EditorSession::new(config).unwrap();

    let bytes = Exporter::default()
        .render(&mut session, ExportFormat::Pdf)
        .unwrap();

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    let page = doc.get_dictionary(*pages.values().next().unwrap()).unwrap();
    let media_box = page.get(b"MediaBox").and_then(lopdf::Object::as_array).unwrap();
    let size: Vec<f32> = media_box
        .iter()
        .map(|n| match n {
            lopdf::Object::Real(f) => *f,
            lopdf::Object::Integer(i) => *i as f32,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(size, vec![0.0, 0.0, 200.0, 120.0]);
}

#[test]
fn export_to_writes_named_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let mut session = session();

    let name = pollster::block_on(Exporter::default().export_to(
        &mut session,
        ExportFormat::Svg,
        &store,
    ))
    .unwrap();

    assert_eq!(name, "canvas_export.svg");
    assert!(dir.path().join("canvas_export.svg").is_file());
    assert!(pollster::block_on(store.exists("canvas_export.svg")).unwrap());
}

#[test]
fn exported_text_imports_back() {
    let mut session = session();
    let id = session.add_text().unwrap();
    let original = session.scene().get_shape(id).and_then(Shape::as_text).cloned().unwrap();

    let markup = Exporter::default()
        .render(&mut session, ExportFormat::Svg)
        .unwrap();
    let shapes = plume_io::import::parse_svg(std::str::from_utf8(&markup).unwrap()).unwrap();

    let texts: Vec<_> = shapes.iter().filter_map(Shape::as_text).collect();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].content, original.content);
    assert_eq!(texts[0].font_size, original.font_size);
    assert_eq!(texts[0].font_family, original.font_family);
    assert!((texts[0].position - original.position).hypot() < 1e-6);
}
