//! Rectangle shape.

use super::{rotate_about, rotated_cover, scale_point_about, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use overmark_render::{RenderSurface, StrokeOptions};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle dragged out between two corner anchors.
///
/// The anchors are stored as dragged, possibly inverted; geometry queries
/// normalize them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// First corner anchor.
    pub start: Point,
    /// Opposite corner anchor, updated while dragging.
    pub end: Point,
    /// Accumulated rotation in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    pub fn new(start: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end: start,
            rotation: 0.0,
            style,
        }
    }

    fn raw_bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

impl ShapeTrait for Rectangle {
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

    fn set_end(&mut self, point: Point) {
        self.end = point;
    }

    fn bounds(&self) -> Rect {
        rotated_cover(self.raw_bounds(), self.rotation)
    }

    fn hit_test(&self, point: Point) -> bool {
        let local = rotate_about(point, self.bounds().center(), -self.rotation);
        let r = self.raw_bounds();
        local.x >= r.x0 && local.x <= r.x1 && local.y >= r.y0 && local.y <= r.y1
    }

    fn move_by(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn rotate_around(&mut self, pivot: Point, angle: f64) {
        self.rotation += angle;
        self.start = rotate_about(self.start, pivot, angle);
        self.end = rotate_about(self.end, pivot, angle);
    }

    fn scale_about(&mut self, pivot: Point, sx: f64, sy: f64) {
        self.start = scale_point_about(self.start, pivot, sx, sy);
        self.end = scale_point_about(self.end, pivot, sx, sy);
    }

    fn draw(&self, surface: &mut dyn RenderSurface, offset: Vec2) {
        let center = self.bounds().center() + offset;
        surface.save();
        surface.translate(center.x, center.y);
        surface.rotate(self.rotation);
        surface.translate(-center.x, -center.y);
        surface.stroke_rect(
            Rect::from_points(self.start + offset, self.end + offset),
            &StrokeOptions::solid(self.style.stroke(), self.style.stroke_width),
        );
        surface.restore();
    }
}
