//! Render-target trait abstraction.

use kurbo::{BezPath, Point, Rect};
use peniko::Color;

/// Stroke parameters for outline drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeOptions {
    /// Stroke color.
    pub color: Color,
    /// Stroke width, in the coordinate space current at draw time.
    pub width: f64,
    /// Dash pattern as on/off lengths; `None` draws solid.
    pub dash: Option<[f64; 2]>,
}

impl StrokeOptions {
    /// A solid stroke.
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    /// A dashed stroke.
    pub fn dashed(color: Color, width: f64, dash: [f64; 2]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

/// Trait for 2D render targets.
///
/// The annotation engine draws through this capability set only; backends
/// decide how the commands reach pixels. Strokes use round caps and joins.
/// Text is positioned by the top-left corner of its first line.
///
/// Transforms compose: `translate`/`rotate`/`scale` apply to all subsequent
/// drawing until the matching `restore`. Callers must balance every `save`
/// with a `restore`.
pub trait RenderSurface {
    /// Erase the whole target and reset the transform stack.
    fn clear(&mut self);

    /// Push the current transform onto the stack.
    fn save(&mut self);

    /// Pop the transform stack, discarding transforms applied since the
    /// matching [`save`](RenderSurface::save).
    fn restore(&mut self);

    /// Translate subsequent drawing.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotate subsequent drawing, in radians.
    fn rotate(&mut self, angle: f64);

    /// Uniformly scale subsequent drawing.
    fn scale(&mut self, factor: f64);

    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, options: &StrokeOptions);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke a full circle outline.
    fn stroke_circle(&mut self, center: Point, radius: f64, options: &StrokeOptions);

    /// Fill a full circle.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath, options: &StrokeOptions);

    /// Draw a single line of text with its top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color);

    /// Measure the advance width of a single line of text.
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}
