//! SVG markup writer.

use kurbo::Rect;
use plume_core::shapes::{Group, Image, Path, Rectangle, Shape, ShapeStyle, ShapeTrait, Text};
use plume_core::{Camera, Scene};
use std::fmt::Write;

/// Render a scene to standalone SVG markup sized to the canvas.
///
/// Visible overlays are drawn above the content, so a caller that wants
/// them left out hides them first.
pub fn render_svg(scene: &Scene, camera: &Camera) -> String {
    let size = scene.size();
    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = size.width,
        h = size.height,
    );

    if let Some(background) = scene.background() {
        let _ = write!(
            svg,
            r#"<rect width="100%" height="100%" fill="{}"{}/>"#,
            background.to_hex(),
            opacity_attr("fill-opacity", background.alpha()),
        );
    }

    let view_transformed = !camera.is_identity();
    if view_transformed {
        let [a, b, c, d, e, f] = camera.transform().as_coeffs();
        let _ = write!(svg, r#"<g transform="matrix({a} {b} {c} {d} {e} {f})">"#);
    }

    for shape in scene.shapes_ordered() {
        write_shape(&mut svg, shape);
    }

    let visible: Vec<_> = scene.overlays().iter().filter(|o| o.visible).collect();
    for overlay in visible {
        let _ = write!(
            svg,
            r#"<g class="overlay" stroke="{}" stroke-width="{}">"#,
            overlay.stroke_color().to_hex(),
            overlay.stroke_width(),
        );
        for line in overlay.lines(size) {
            let _ = write!(
                svg,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                line.p0.x, line.p0.y, line.p1.x, line.p1.y,
            );
        }
        svg.push_str("</g>");
    }

    if view_transformed {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

fn write_shape(svg: &mut String, shape: &Shape) {
    match shape {
        Shape::Rectangle(rect) => write_rectangle(svg, rect),
        Shape::Path(path) => write_path(svg, path),
        Shape::Text(text) => write_text(svg, text),
        Shape::Image(image) => write_image(svg, image),
        Shape::Group(group) => write_group(svg, group),
    }
}

fn write_rectangle(svg: &mut String, rect: &Rectangle) {
    let r = rect.as_rect();
    let _ = write!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
    );
    if rect.corner_radius > 0.0 {
        let _ = write!(svg, r#" rx="{}""#, rect.corner_radius);
    }
    write_paint(svg, &rect.style);
    write_rotation(svg, rect.rotation, r);
    svg.push_str("/>");
}

fn write_path(svg: &mut String, path: &Path) {
    let _ = write!(svg, r#"<path d="{}""#, path.path.to_svg());
    write_paint(svg, &path.style);
    write_rotation(svg, path.rotation, path.bounds());
    svg.push_str("/>");
}

fn write_text(svg: &mut String, text: &Text) {
    let _ = write!(
        svg,
        r#"<text x="{}" font-family="{}" font-size="{}" font-weight="{}" font-style="{}""#,
        text.position.x,
        escape_xml(text.font_family.name()),
        text.font_size,
        text.font_weight.css(),
        text.font_style.css(),
    );
    write_paint(svg, &text.style);
    write_rotation(svg, text.rotation, text.bounds());
    svg.push('>');

    let line_advance = text.font_size * Text::LINE_HEIGHT;
    for (i, line) in text.lines().iter().enumerate() {
        let baseline = text.position.y + text.font_size + i as f64 * line_advance;
        let _ = write!(
            svg,
            r#"<tspan x="{}" y="{}">{}</tspan>"#,
            text.position.x,
            baseline,
            escape_xml(line),
        );
    }
    svg.push_str("</text>");
}

fn write_image(svg: &mut String, image: &Image) {
    let r = image.as_rect();
    let _ = write!(
        svg,
        r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none" xlink:href="{}""#,
        r.x0,
        r.y0,
        r.width(),
        r.height(),
        image.data_uri(),
    );
    if image.style.opacity < 1.0 {
        let _ = write!(svg, r#" opacity="{}""#, image.style.opacity);
    }
    write_rotation(svg, image.rotation, r);
    svg.push_str("/>");
}

fn write_group(svg: &mut String, group: &Group) {
    svg.push_str("<g");
    let opacity = group.style().opacity;
    if opacity < 1.0 {
        let _ = write!(svg, r#" opacity="{opacity}""#);
    }
    write_rotation(svg, group.rotation, group.bounds());
    svg.push('>');
    for child in group.children() {
        write_shape(svg, child);
    }
    svg.push_str("</g>");
}

fn write_paint(svg: &mut String, style: &ShapeStyle) {
    match style.fill_color {
        Some(fill) => {
            let _ = write!(
                svg,
                r#" fill="{}"{}"#,
                fill.to_hex(),
                opacity_attr("fill-opacity", fill.alpha())
            );
        }
        None => svg.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = style.stroke_color.filter(|_| style.stroke_width > 0.0) {
        let _ = write!(
            svg,
            r#" stroke="{}" stroke-width="{}"{}"#,
            stroke.to_hex(),
            style.stroke_width,
            opacity_attr("stroke-opacity", stroke.alpha()),
        );
    }
    if style.opacity < 1.0 {
        let _ = write!(svg, r#" opacity="{}""#, style.opacity);
    }
}

/// Rotation about the center of the unrotated bounds.
fn write_rotation(svg: &mut String, radians: f64, bounds: Rect) {
    if radians == 0.0 {
        return;
    }
    let center = bounds.center();
    let _ = write!(
        svg,
        r#" transform="rotate({} {} {})""#,
        radians.to_degrees(),
        center.x,
        center.y,
    );
}

fn opacity_attr(name: &str, alpha: f64) -> String {
    if alpha < 1.0 {
        format!(r#" {name}="{alpha}""#)
    } else {
        String::new()
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
