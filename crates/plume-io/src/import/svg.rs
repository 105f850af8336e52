//! SVG import.
//!
//! Geometry goes through usvg, which resolves `<use>`, CSS and nested
//! transforms and hands back plain paths. Text is read straight from the
//! markup so it survives even when no fonts are installed.

use super::{ImportError, ImportResult};
use kurbo::{Affine, BezPath, Point, Vec2};
use plume_core::shapes::{
    FontFamily, FontStyle, FontWeight, Path, SerializableColor, Shape, ShapeStyle, Text,
};
use resvg::usvg::{self, Node, Paint, tiny_skia_path::PathSegment};
use simplecss::DeclarationTokenizer;
use svgtypes::{Length, LengthListParser, LengthUnit};

/// Font size for `<text>` elements that do not set one.
const DEFAULT_IMPORT_FONT_SIZE: f64 = 20.0;

/// Parse SVG markup into primitives, back to front. Text comes after all
/// geometry.
pub fn parse_svg(markup: &str) -> ImportResult<Vec<Shape>> {
    let tree = usvg::Tree::from_str(markup, &usvg::Options::default())
        .map_err(|e| ImportError::Svg(e.to_string()))?;

    let mut shapes = Vec::new();
    collect_paths(tree.root(), &mut shapes);
    shapes.extend(parse_text_elements(markup)?);

    log::info!("Parsed {} primitives from SVG", shapes.len());
    Ok(shapes)
}

fn collect_paths(group: &usvg::Group, out: &mut Vec<Shape>) {
    for node in group.children() {
        match node {
            Node::Group(group) => collect_paths(group, out),
            Node::Path(path) => {
                if let Some(shape) = convert_path(path) {
                    out.push(shape);
                }
            }
            // Handled from the markup.
            Node::Text(_) => {}
            Node::Image(_) => log::debug!("Skipping embedded image in SVG"),
        }
    }
}

fn convert_path(path: &usvg::Path) -> Option<Shape> {
    if !path.is_visible() {
        return None;
    }

    let ts = path.abs_transform();
    let affine = Affine::new([
        ts.sx as f64,
        ts.ky as f64,
        ts.kx as f64,
        ts.sy as f64,
        ts.tx as f64,
        ts.ty as f64,
    ]);

    let fill_color = path
        .fill()
        .and_then(|fill| paint_color(fill.paint(), fill.opacity().get()));
    let (stroke_color, stroke_width) = match path.stroke() {
        Some(stroke) => (
            paint_color(stroke.paint(), stroke.opacity().get()),
            stroke.width().get() as f64 * affine.determinant().abs().sqrt(),
        ),
        None => (None, 0.0),
    };
    if fill_color.is_none() && stroke_color.is_none() {
        return None;
    }

    let mut bez = BezPath::new();
    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => bez.move_to(point(p)),
            PathSegment::LineTo(p) => bez.line_to(point(p)),
            PathSegment::QuadTo(p1, p) => bez.quad_to(point(p1), point(p)),
            PathSegment::CubicTo(p1, p2, p) => bez.curve_to(point(p1), point(p2), point(p)),
            PathSegment::Close => bez.close_path(),
        }
    }
    bez.apply_affine(affine);

    let style = ShapeStyle {
        stroke_color,
        stroke_width,
        fill_color,
        opacity: 1.0,
    };
    Some(Shape::Path(Path::new(bez, style)))
}

fn point(p: usvg::tiny_skia_path::Point) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

/// Solid paints only; gradients and patterns have no flat equivalent.
fn paint_color(paint: &Paint, opacity: f32) -> Option<SerializableColor> {
    match paint {
        Paint::Color(c) => Some(SerializableColor::new(
            c.red,
            c.green,
            c.blue,
            (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
        )),
        _ => {
            log::debug!("Non-solid paint dropped on import");
            None
        }
    }
}

fn parse_text_elements(markup: &str) -> ImportResult<Vec<Shape>> {
    let doc = roxmltree::Document::parse(markup).map_err(|e| ImportError::Svg(e.to_string()))?;
    Ok(doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "text")
        .filter_map(text_shape)
        .collect())
}

fn text_shape(node: roxmltree::Node<'_, '_>) -> Option<Shape> {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let content = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if content.is_empty() {
        return None;
    }

    let font_size = inherited(node, "font-size")
        .and_then(|value| value.parse::<Length>().ok())
        .map(to_pixels)
        .filter(|size| *size > 0.0)
        .unwrap_or(DEFAULT_IMPORT_FONT_SIZE);
    let x = coordinate(node, "x").unwrap_or(0.0);
    let baseline = coordinate(node, "y").unwrap_or(0.0);

    // The anchor follows the full transform; glyphs only pick up its scale.
    let affine = accumulated_transform(node);
    let scale = affine.determinant().abs().sqrt();
    let font_size = if scale > 0.0 { font_size * scale } else { font_size };
    let top = affine * Point::new(x, baseline) - Vec2::new(0.0, font_size);

    let mut text = Text::new(top, content)
        .with_font_size(font_size)
        .with_color(fill_color(node));
    if let Some(family) = inherited(node, "font-family").and_then(font_family) {
        text.font_family = family;
    }
    if inherited(node, "font-weight").is_some_and(is_bold) {
        text.font_weight = FontWeight::Bold;
    }
    if inherited(node, "font-style").is_some_and(|s| matches!(s.trim(), "italic" | "oblique")) {
        text.font_style = FontStyle::Italic;
    }
    Some(Shape::Text(text))
}

/// Presentation value from the nearest element that sets it, with inline
/// `style` taking precedence over attributes.
fn inherited<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.ancestors()
        .filter(|n| n.is_element())
        .find_map(|n| style_value(n, name).or_else(|| n.attribute(name)))
}

fn style_value<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    DeclarationTokenizer::from(node.attribute("style")?)
        .find(|declaration| declaration.name == name)
        .map(|declaration| declaration.value)
}

/// Product of every `transform` from the root down to `node`.
fn accumulated_transform(node: roxmltree::Node<'_, '_>) -> Affine {
    let mut chain: Vec<_> = node
        .ancestors()
        .filter(|n| n.is_element())
        .filter_map(|n| n.attribute("transform"))
        .collect();
    chain.reverse();
    chain.into_iter().fold(Affine::IDENTITY, |acc, value| {
        match value.parse::<svgtypes::Transform>() {
            Ok(ts) => acc * Affine::new([ts.a, ts.b, ts.c, ts.d, ts.e, ts.f]),
            Err(e) => {
                log::debug!("Ignoring transform {value:?}: {e}");
                acc
            }
        }
    })
}

/// Solid fill, scaled by `fill-opacity`. Anything but a plain colour falls
/// back to black.
fn fill_color(node: roxmltree::Node<'_, '_>) -> SerializableColor {
    let color = match inherited(node, "fill").map(svgtypes::Paint::from_str) {
        Some(Ok(svgtypes::Paint::Color(c))) => c,
        _ => svgtypes::Color::black(),
    };
    let opacity = inherited(node, "fill-opacity")
        .and_then(|value| value.parse::<svgtypes::Number>().ok())
        .map_or(1.0, |n| n.0.clamp(0.0, 1.0));
    SerializableColor::new(
        color.red,
        color.green,
        color.blue,
        (color.alpha as f64 * opacity).round() as u8,
    )
}

/// Position attribute of the element, or of its first `<tspan>` that sets it.
fn coordinate(node: roxmltree::Node<'_, '_>, name: &str) -> Option<f64> {
    let list = node
        .descendants()
        .filter(|n| n.is_element())
        .find_map(|n| n.attribute(name))?;
    LengthListParser::from(list)
        .next()
        .and_then(Result::ok)
        .map(to_pixels)
}

/// User units for a length. Relative units resolve against the default
/// font size.
fn to_pixels(length: Length) -> f64 {
    let n = length.number;
    match length.unit {
        LengthUnit::None | LengthUnit::Px => n,
        LengthUnit::Pt => n * 4.0 / 3.0,
        LengthUnit::Pc => n * 16.0,
        LengthUnit::In => n * 96.0,
        LengthUnit::Cm => n * 96.0 / 2.54,
        LengthUnit::Mm => n * 96.0 / 25.4,
        LengthUnit::Em => n * DEFAULT_IMPORT_FONT_SIZE,
        LengthUnit::Ex => n * DEFAULT_IMPORT_FONT_SIZE / 2.0,
        LengthUnit::Percent => n / 100.0 * DEFAULT_IMPORT_FONT_SIZE,
    }
}

/// First family in the list that maps onto a supported face.
fn font_family(list: &str) -> Option<FontFamily> {
    svgtypes::parse_font_families(list)
        .ok()?
        .into_iter()
        .find_map(|family| match family {
            svgtypes::FontFamily::Named(name) => FontFamily::from_name(&name),
            svgtypes::FontFamily::Serif => Some(FontFamily::TimesNewRoman),
            svgtypes::FontFamily::SansSerif => Some(FontFamily::Arial),
            svgtypes::FontFamily::Monospace => Some(FontFamily::CourierNew),
            svgtypes::FontFamily::Cursive | svgtypes::FontFamily::Fantasy => None,
        })
}

fn is_bold(weight: &str) -> bool {
    match weight.trim() {
        "bold" | "bolder" => true,
        numeric => numeric
            .parse::<svgtypes::Number>()
            .is_ok_and(|w| w.0 >= 600.0),
    }
}
