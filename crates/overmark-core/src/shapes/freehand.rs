//! Freehand stroke shape.

use super::{
    point_to_segment_dist, rotate_about, rotated_cover, scale_point_about, ShapeId, ShapeStyle,
    ShapeTrait,
};
use kurbo::{BezPath, Point, Rect, Vec2};
use overmark_render::{RenderSurface, StrokeOptions};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke: an ordered polyline of world-space points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ShapeId,
    /// Points in draw order. Holds the anchor point from creation; needs
    /// two or more points to render.
    pub points: Vec<Point>,
    /// Accumulated rotation in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Freehand {
    /// Start a new stroke at `start`.
    pub fn new(start: Point, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            rotation: 0.0,
            style,
        }
    }

    /// Build a stroke from an existing run of points, e.g. a surviving
    /// piece of a stroke split by erasing.
    pub fn from_points(points: Vec<Point>, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            rotation: 0.0,
            style,
        }
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Unrotated point extent, padded by half the stroke width.
    fn raw_bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        let mut bounds = Rect::from_points(*first, *first);
        for point in &self.points[1..] {
            bounds.x0 = bounds.x0.min(point.x);
            bounds.y0 = bounds.y0.min(point.y);
            bounds.x1 = bounds.x1.max(point.x);
            bounds.y1 = bounds.y1.max(point.y);
        }
        let pad = self.style.stroke_width / 2.0;
        bounds.inflate(pad, pad)
    }
}

impl ShapeTrait for Freehand {
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
        self.points.push(point);
    }

    fn bounds(&self) -> Rect {
        rotated_cover(self.raw_bounds(), self.rotation)
    }

    fn hit_test(&self, point: Point) -> bool {
        let local = rotate_about(point, self.bounds().center(), -self.rotation);
        let reach = self.style.stroke_width / 2.0;
        self.points
            .windows(2)
            .any(|w| point_to_segment_dist(local, w[0], w[1]) <= reach)
    }

    fn move_by(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    fn rotate_around(&mut self, pivot: Point, angle: f64) {
        self.rotation += angle;
        for point in &mut self.points {
            *point = rotate_about(*point, pivot, angle);
        }
    }

    fn scale_about(&mut self, pivot: Point, sx: f64, sy: f64) {
        for point in &mut self.points {
            *point = scale_point_about(*point, pivot, sx, sy);
        }
    }

    fn draw(&self, surface: &mut dyn RenderSurface, offset: Vec2) {
        let center = self.bounds().center() + offset;
        surface.save();
        surface.translate(center.x, center.y);
        surface.rotate(self.rotation);
        surface.translate(-center.x, -center.y);
        if self.points.len() >= 2 {
            let mut path = BezPath::new();
            path.move_to(self.points[0] + offset);
            for point in &self.points[1..] {
                path.line_to(*point + offset);
            }
            surface.stroke_path(
                &path,
                &StrokeOptions::solid(self.style.stroke(), self.style.stroke_width),
            );
        }
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(points: &[(f64, f64)]) -> Freehand {
        Freehand::from_points(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            ShapeStyle::default(),
        )
    }

    #[test]
    fn test_new_starts_with_anchor() {
        let freehand = Freehand::new(Point::new(3.0, 4.0), ShapeStyle::default());
        assert_eq!(freehand.len(), 1);
        assert_eq!(freehand.points[0], Point::new(3.0, 4.0));
    }

    #[test]
    fn test_set_end_appends() {
        let mut freehand = Freehand::new(Point::ZERO, ShapeStyle::default());
        freehand.set_end(Point::new(10.0, 0.0));
        freehand.set_end(Point::new(20.0, 5.0));
        assert_eq!(freehand.len(), 3);
    }

    #[test]
    fn test_bounds_padded_by_half_width() {
        let freehand = stroke(&[(0.0, 0.0), (100.0, 50.0)]);
        let bounds = freehand.bounds();
        // default width 2.0 pads by 1.0 on every side
        assert!((bounds.x0 + 1.0).abs() < 1e-9);
        assert!((bounds.y0 + 1.0).abs() < 1e-9);
        assert!((bounds.x1 - 101.0).abs() < 1e-9);
        assert!((bounds.y1 - 51.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_within_half_width() {
        let freehand = stroke(&[(0.0, 0.0), (100.0, 0.0)]);
        assert!(freehand.hit_test(Point::new(50.0, 0.5)));
        assert!(!freehand.hit_test(Point::new(50.0, 5.0)));
    }

    #[test]
    fn test_single_point_never_hits() {
        let freehand = Freehand::new(Point::ZERO, ShapeStyle::default());
        assert!(!freehand.hit_test(Point::ZERO));
    }

    #[test]
    fn test_move_by_translates_every_point() {
        let mut freehand = stroke(&[(0.0, 0.0), (10.0, 0.0)]);
        freehand.move_by(Vec2::new(5.0, -3.0));
        assert_eq!(freehand.points[0], Point::new(5.0, -3.0));
        assert_eq!(freehand.points[1], Point::new(15.0, -3.0));
    }

    #[test]
    fn test_rotate_around_accumulates_and_moves_points() {
        let mut freehand = stroke(&[(10.0, 0.0), (20.0, 0.0)]);
        freehand.rotate_around(Point::ZERO, std::f64::consts::FRAC_PI_2);
        assert!((freehand.rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!(freehand.points[0].x.abs() < 1e-9);
        assert!((freehand.points[0].y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_follows_rotation() {
        // the point rotation and the accumulated angle compose at query
        // time, so an eighth turn here reads back as a quarter turn
        let mut freehand = stroke(&[(0.0, 0.0), (10.0, 0.0)]);
        let center = freehand.bounds().center();
        freehand.rotate_around(center, std::f64::consts::FRAC_PI_4);
        // the stroke now runs vertically through (5, 0)
        assert!(freehand.hit_test(Point::new(5.0, 4.0)));
        assert!(!freehand.hit_test(Point::new(1.0, 0.0)));
    }

    #[test]
    fn test_scale_about_remaps_points() {
        let mut freehand = stroke(&[(10.0, 10.0), (20.0, 10.0)]);
        freehand.scale_about(Point::ZERO, 2.0, 3.0);
        assert_eq!(freehand.points[0], Point::new(20.0, 30.0));
        assert_eq!(freehand.points[1], Point::new(40.0, 30.0));
    }
}
