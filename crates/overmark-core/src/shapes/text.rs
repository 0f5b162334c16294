//! Wrapped text block shape.

use super::{rotate_about, rotated_cover, scale_point_about, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use overmark_render::RenderSurface;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

/// Font size per unit of stroke width.
const FONT_SIZE_FACTOR: f64 = 5.0;
/// Line advance per unit of stroke width.
const LINE_HEIGHT_FACTOR: f64 = 6.0;
/// Wrap width for newly created text blocks.
pub const DEFAULT_WRAP_WIDTH: f64 = 200.0;
/// Narrowest a text block can be resized to.
pub const MIN_WRAP_WIDTH: f64 = 10.0;

/// A block of text anchored at its top-left corner and greedily wrapped to
/// a fixed width.
///
/// The wrapped height depends on text measurement, which only the render
/// surface can provide, so it is computed during drawing and cached. Until
/// the first draw, bounds fall back to a single line height.
#[derive(Debug, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner of the text box.
    pub origin: Point,
    /// The text content.
    pub content: String,
    /// Wrap width in world units.
    pub wrap_width: f64,
    /// Accumulated rotation in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties. The stroke width drives the font size.
    pub style: ShapeStyle,
    /// Height measured during the last draw.
    #[serde(skip)]
    wrapped_height: RwLock<Option<f64>>,
}

impl Text {
    pub fn new(origin: Point, content: String, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            content,
            wrap_width: DEFAULT_WRAP_WIDTH,
            rotation: 0.0,
            style,
            wrapped_height: RwLock::new(None),
        }
    }

    /// Font size in world units.
    pub fn font_size(&self) -> f64 {
        self.style.stroke_width * FONT_SIZE_FACTOR
    }

    /// Vertical advance per wrapped line.
    pub fn line_height(&self) -> f64 {
        self.style.stroke_width * LINE_HEIGHT_FACTOR
    }

    /// Height of the wrapped block as of the last draw, or a single line
    /// height before the first draw.
    pub fn wrapped_height(&self) -> f64 {
        self.wrapped_height
            .read()
            .ok()
            .and_then(|guard| *guard)
            .unwrap_or_else(|| self.line_height())
    }

    fn raw_bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.wrap_width,
            self.origin.y + self.wrapped_height(),
        )
    }
}

impl Clone for Text {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            origin: self.origin,
            content: self.content.clone(),
            wrap_width: self.wrap_width,
            rotation: self.rotation,
            style: self.style,
            wrapped_height: RwLock::new(self.wrapped_height.read().ok().and_then(|guard| *guard)),
        }
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Text keeps its anchor; drag endpoints do not reshape it.
    fn set_end(&mut self, _point: Point) {}

    fn bounds(&self) -> Rect {
        rotated_cover(self.raw_bounds(), self.rotation)
    }

    fn hit_test(&self, point: Point) -> bool {
        let local = rotate_about(point, self.bounds().center(), -self.rotation);
        let r = self.raw_bounds();
        local.x >= r.x0 && local.x <= r.x1 && local.y >= r.y0 && local.y <= r.y1
    }

    fn move_by(&mut self, delta: Vec2) {
        self.origin += delta;
    }

    fn rotate_around(&mut self, pivot: Point, angle: f64) {
        self.rotation += angle;
        self.origin = rotate_about(self.origin, pivot, angle);
    }

    fn scale_about(&mut self, pivot: Point, sx: f64, sy: f64) {
        self.origin = scale_point_about(self.origin, pivot, sx, sy);
        self.wrap_width = (self.wrap_width * sx).max(MIN_WRAP_WIDTH);
    }

    fn draw(&self, surface: &mut dyn RenderSurface, offset: Vec2) {
        let center = self.bounds().center() + offset;
        surface.save();
        surface.translate(center.x, center.y);
        surface.rotate(self.rotation);
        surface.translate(-center.x, -center.y);

        // Greedy word wrap: emit the pending line when the next word would
        // overflow the wrap width. Trailing spaces stay on the line, like a
        // typewriter carriage.
        let font_size = self.font_size();
        let line_height = self.line_height();
        let color = self.style.stroke();
        let x = self.origin.x + offset.x;
        let mut y = self.origin.y + offset.y;
        let mut line = String::new();
        let mut height = 0.0;
        for word in self.content.split(' ') {
            let test = format!("{line}{word} ");
            if surface.text_width(&test, font_size) > self.wrap_width && !line.is_empty() {
                surface.fill_text(&line, Point::new(x, y), font_size, color);
                line = format!("{word} ");
                y += line_height;
                height += line_height;
            } else {
                line = test;
            }
        }
        surface.fill_text(&line, Point::new(x, y), font_size, color);
        height += line_height;

        if let Ok(mut guard) = self.wrapped_height.write() {
            *guard = Some(height);
        }
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overmark_render::{DisplayCommand, DisplayList};

    #[test]
    fn test_bounds_before_first_draw_are_one_line() {
        let text = Text::new(Point::new(10.0, 20.0), "hello".into(), ShapeStyle::default());
        // default width 2.0 gives a 12.0 line height and 200.0 wrap width
        assert_eq!(text.bounds(), Rect::new(10.0, 20.0, 210.0, 32.0));
    }

    #[test]
    fn test_draw_wraps_and_caches_height() {
        let mut text = Text::new(Point::ZERO, "aaaa bbbb".into(), ShapeStyle::default());
        // the recording surface measures 5.0 per character at font size 10.0;
        // "aaaa bbbb " measures 50.0, so a 30.0 wrap width forces two lines
        text.wrap_width = 30.0;
        let mut list = DisplayList::new();
        text.draw(&mut list, Vec2::ZERO);

        let lines: Vec<_> = list
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DisplayCommand::FillText { text: line, origin, .. } => Some((line.clone(), *origin)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, "aaaa ");
        assert_eq!(lines[1].0, "bbbb ");
        assert_eq!(lines[1].1.y - lines[0].1.y, 12.0);
        assert_eq!(text.wrapped_height(), 24.0);
        assert_eq!(text.bounds().height(), 24.0);
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let text = Text::new(Point::ZERO, "hi there".into(), ShapeStyle::default());
        let mut list = DisplayList::new();
        text.draw(&mut list, Vec2::ZERO);
        let count = list
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, DisplayCommand::FillText { .. }))
            .count();
        assert_eq!(count, 1);
        assert_eq!(text.wrapped_height(), 12.0);
    }

    #[test]
    fn test_clone_carries_cached_height() {
        let mut text = Text::new(Point::ZERO, "aaaa bbbb".into(), ShapeStyle::default());
        text.wrap_width = 30.0;
        let mut list = DisplayList::new();
        text.draw(&mut list, Vec2::ZERO);
        let copy = text.clone();
        assert_eq!(copy.wrapped_height(), 24.0);
    }

    #[test]
    fn test_scale_clamps_wrap_width() {
        let mut text = Text::new(Point::ZERO, "x".into(), ShapeStyle::default());
        text.scale_about(Point::ZERO, 0.01, 0.01);
        assert_eq!(text.wrap_width, MIN_WRAP_WIDTH);
    }

    #[test]
    fn test_hit_test_uses_wrap_box() {
        let text = Text::new(Point::ZERO, "hello".into(), ShapeStyle::default());
        assert!(text.hit_test(Point::new(100.0, 6.0)));
        assert!(!text.hit_test(Point::new(100.0, 40.0)));
        assert!(!text.hit_test(Point::new(-1.0, 6.0)));
    }
}
