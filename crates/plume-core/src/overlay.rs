//! Persistent guide objects drawn over the canvas but never exported.

use crate::shapes::SerializableColor;
use kurbo::{Line, ParamCurveNearest, Point, Rect, Size};

/// Stroke width of the canvas border guide.
pub const BORDER_STROKE_WIDTH: f64 = 2.0;

/// Stroke width of grid lines.
pub const GRID_STROKE_WIDTH: f64 = 1.0;

/// Closest the grid lines are ever drawn.
pub const MIN_GRID_SPACING: f64 = 1.0;

/// Which overlay an [`Overlay`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Rectangle outlining the canvas. Not selectable.
    Border,
    /// Evenly spaced guide lines.
    Grid,
}

/// A guide object owned by the scene.
///
/// Overlays never take part in snapshots, selection or export, but they do
/// participate in right-click hit-testing so that clicks on them can be
/// ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub kind: OverlayKind,
    pub visible: bool,
    /// Line spacing in pixels. Only meaningful for the grid.
    pub spacing: f64,
}

impl Overlay {
    /// The border guide, visible by default.
    pub fn border() -> Self {
        Self {
            kind: OverlayKind::Border,
            visible: true,
            spacing: 0.0,
        }
    }

    /// The grid, hidden by default.
    pub fn grid(spacing: f64) -> Self {
        Self {
            kind: OverlayKind::Grid,
            visible: false,
            spacing,
        }
    }

    pub fn stroke_color(&self) -> SerializableColor {
        match self.kind {
            OverlayKind::Border => SerializableColor::black(),
            OverlayKind::Grid => SerializableColor::new(0xcc, 0xcc, 0xcc, 0xff),
        }
    }

    pub fn stroke_width(&self) -> f64 {
        match self.kind {
            OverlayKind::Border => BORDER_STROKE_WIDTH,
            OverlayKind::Grid => GRID_STROKE_WIDTH,
        }
    }

    /// Line segments making up this overlay for a canvas of `size`.
    pub fn lines(&self, size: Size) -> Vec<Line> {
        match self.kind {
            OverlayKind::Border => {
                let rect = size.to_rect();
                vec![
                    Line::new((rect.x0, rect.y0), (rect.x1, rect.y0)),
                    Line::new((rect.x1, rect.y0), (rect.x1, rect.y1)),
                    Line::new((rect.x1, rect.y1), (rect.x0, rect.y1)),
                    Line::new((rect.x0, rect.y1), (rect.x0, rect.y0)),
                ]
            }
            OverlayKind::Grid => grid_lines(size, self.spacing),
        }
    }

    /// Whether a world point lies on a visible part of this overlay.
    pub fn hit_test(&self, point: Point, size: Size, tolerance: f64) -> bool {
        if !self.visible {
            return false;
        }
        let reach = tolerance + self.stroke_width() / 2.0;
        let reach_sq = reach * reach;
        self.lines(size)
            .iter()
            .any(|line| line.nearest(point, 0.0).distance_sq <= reach_sq)
    }
}

/// Vertical and horizontal lines every `spacing` pixels, excluding the
/// canvas edges. Spacing below [`MIN_GRID_SPACING`] is raised to it.
fn grid_lines(size: Size, spacing: f64) -> Vec<Line> {
    let mut lines = Vec::new();
    if spacing.is_nan() || spacing <= 0.0 {
        return lines;
    }
    let spacing = spacing.max(MIN_GRID_SPACING);
    let bounds = Rect::from_origin_size(Point::ZERO, size);

    let mut x = spacing;
    while x < bounds.x1 {
        lines.push(Line::new((x, bounds.y0), (x, bounds.y1)));
        x += spacing;
    }
    let mut y = spacing;
    while y < bounds.y1 {
        lines.push(Line::new((bounds.x0, y), (bounds.x1, y)));
        y += spacing;
    }
    lines
}
