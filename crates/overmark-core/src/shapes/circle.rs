//! Circle shape.

use super::{rotate_about, rotated_cover, scale_point_about, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use overmark_render::{RenderSurface, StrokeOptions};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle anchored at its center; the drag endpoint sets the radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center anchor.
    pub center: Point,
    /// Point on the circumference, updated while dragging.
    pub edge: Point,
    /// Accumulated rotation in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(center: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            edge: center,
            rotation: 0.0,
            style,
        }
    }

    /// Current radius, derived from the edge anchor.
    pub fn radius(&self) -> f64 {
        self.center.distance(self.edge)
    }

    fn raw_bounds(&self) -> Rect {
        let r = self.radius();
        Rect::new(
            self.center.x - r,
            self.center.y - r,
            self.center.x + r,
            self.center.y + r,
        )
    }
}

impl ShapeTrait for Circle {
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
        self.edge = point;
    }

    fn bounds(&self) -> Rect {
        rotated_cover(self.raw_bounds(), self.rotation)
    }

    fn hit_test(&self, point: Point) -> bool {
        let local = rotate_about(point, self.bounds().center(), -self.rotation);
        local.distance(self.center) <= self.radius()
    }

    fn move_by(&mut self, delta: Vec2) {
        self.center += delta;
        self.edge += delta;
    }

    fn rotate_around(&mut self, pivot: Point, angle: f64) {
        self.rotation += angle;
        self.center = rotate_about(self.center, pivot, angle);
        self.edge = rotate_about(self.edge, pivot, angle);
    }

    fn scale_about(&mut self, pivot: Point, sx: f64, sy: f64) {
        self.center = scale_point_about(self.center, pivot, sx, sy);
        self.edge = scale_point_about(self.edge, pivot, sx, sy);
    }

    fn draw(&self, surface: &mut dyn RenderSurface, offset: Vec2) {
        let center = self.bounds().center() + offset;
        surface.save();
        surface.translate(center.x, center.y);
        surface.rotate(self.rotation);
        surface.translate(-center.x, -center.y);
        surface.stroke_circle(
            self.center + offset,
            self.radius(),
            &StrokeOptions::solid(self.style.stroke(), self.style.stroke_width),
        );
        surface.restore();
    }
}
