//! Straight line shape.

use super::{
    point_to_segment_dist, rotate_about, rotated_cover, scale_point_about, ShapeId, ShapeStyle,
    ShapeTrait,
};
use kurbo::{BezPath, Point, Rect, Vec2};
use overmark_render::{RenderSurface, StrokeOptions};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight segment between two endpoint anchors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// First endpoint.
    pub start: Point,
    /// Second endpoint, updated while dragging.
    pub end: Point,
    /// Accumulated rotation in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    pub fn new(start: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end: start,
            rotation: 0.0,
            style,
        }
    }

    /// Endpoint extent, padded by half the stroke width.
    fn raw_bounds(&self) -> Rect {
        let pad = self.style.stroke_width / 2.0;
        Rect::from_points(self.start, self.end).inflate(pad, pad)
    }
}

impl ShapeTrait for Line {
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
        point_to_segment_dist(local, self.start, self.end) <= self.style.stroke_width / 2.0
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
        let mut path = BezPath::new();
        path.move_to(self.start + offset);
        path.line_to(self.end + offset);
        surface.stroke_path(
            &path,
            &StrokeOptions::solid(self.style.stroke(), self.style.stroke_width),
        );
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_padded_by_half_width() {
        let mut line = Line::new(Point::ZERO, ShapeStyle::default());
        line.set_end(Point::new(10.0, 0.0));
        assert_eq!(line.bounds(), Rect::new(-1.0, -1.0, 11.0, 1.0));
    }

    #[test]
    fn test_hit_test_within_half_width() {
        let mut line = Line::new(Point::ZERO, ShapeStyle::default());
        line.set_end(Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 0.9)));
        assert!(!line.hit_test(Point::new(50.0, 1.5)));
        assert!(!line.hit_test(Point::new(110.0, 0.0)));
    }

    #[test]
    fn test_degenerate_line_hits_at_anchor() {
        let line = Line::new(Point::new(5.0, 5.0), ShapeStyle::default());
        assert!(line.hit_test(Point::new(5.0, 5.5)));
        assert!(!line.hit_test(Point::new(8.0, 5.0)));
    }

    #[test]
    fn test_rotate_around_moves_endpoints() {
        let mut line = Line::new(Point::new(10.0, 0.0), ShapeStyle::default());
        line.set_end(Point::new(20.0, 0.0));
        line.rotate_around(Point::ZERO, std::f64::consts::FRAC_PI_2);
        assert!(line.start.x.abs() < 1e-9);
        assert!((line.start.y - 10.0).abs() < 1e-9);
        assert!((line.end.y - 20.0).abs() < 1e-9);
    }
}
