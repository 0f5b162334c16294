//! Shape types for the annotation canvas.
//!
//! Every shape lives in world coordinates and knows how to hit-test,
//! transform, and draw itself onto a [`RenderSurface`]. The [`Shape`] enum
//! wraps the concrete kinds so collections and snapshots stay homogeneous.

mod circle;
mod freehand;
mod line;
mod rectangle;
mod text;

pub use circle::Circle;
pub use freehand::Freehand;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::Text;

use crate::selection::{self, HandleKind};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use overmark_render::RenderSurface;
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable RGBA color, stored as 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by all shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width in world units.
    pub stroke_width: f64,
}

impl ShapeStyle {
    pub fn new(stroke_color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            stroke_color,
            stroke_width,
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    point.distance(proj)
}

/// Rotate `point` around `pivot` by `angle` radians.
pub fn rotate_about(point: Point, pivot: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point::new(
        pivot.x + dx * cos - dy * sin,
        pivot.y + dx * sin + dy * cos,
    )
}

/// Axis-aligned cover of `rect` after rotating it about its own center.
///
/// The cover keeps the same center as the input, so rotation pivots derived
/// from either box agree.
pub fn rotated_cover(rect: Rect, angle: f64) -> Rect {
    if angle == 0.0 {
        return rect;
    }
    let center = rect.center();
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let mut cover = Rect::new(
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );
    for corner in corners {
        let p = rotate_about(corner, center, angle);
        cover.x0 = cover.x0.min(p.x);
        cover.y0 = cover.y0.min(p.y);
        cover.x1 = cover.x1.max(p.x);
        cover.y1 = cover.y1.max(p.y);
    }
    cover
}

/// Common behavior for all shape kinds.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Get the accumulated rotation in radians.
    fn rotation(&self) -> f64;

    /// Extend the shape with a new endpoint while it is being drawn.
    fn set_end(&mut self, point: Point);

    /// Get the axis-aligned bounding box in world coordinates, accounting
    /// for rotation.
    fn bounds(&self) -> Rect;

    /// Check whether a world-space point hits this shape.
    fn hit_test(&self, point: Point) -> bool;

    /// Translate the shape by a world-space delta.
    fn move_by(&mut self, delta: Vec2);

    /// Rotate the shape by `angle` radians around `pivot`.
    fn rotate_around(&mut self, pivot: Point, angle: f64);

    /// Scale the shape's geometry about `pivot` by per-axis factors.
    fn scale_about(&mut self, pivot: Point, sx: f64, sy: f64);

    /// Draw the shape onto `surface`, offset by a world-space delta.
    fn draw(&self, surface: &mut dyn RenderSurface, offset: Vec2);
}

/// Enum wrapper for all shape kinds (for collections and serialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Freehand(Freehand),
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Line),
    Text(Text),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Freehand(s) => s.id(),
            Shape::Rectangle(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Line(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Freehand(s) => s.style(),
            Shape::Rectangle(s) => s.style(),
            Shape::Circle(s) => s.style(),
            Shape::Line(s) => s.style(),
            Shape::Text(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Freehand(s) => s.style_mut(),
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Circle(s) => s.style_mut(),
            Shape::Line(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
        }
    }

    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Freehand(s) => s.rotation(),
            Shape::Rectangle(s) => s.rotation(),
            Shape::Circle(s) => s.rotation(),
            Shape::Line(s) => s.rotation(),
            Shape::Text(s) => s.rotation(),
        }
    }

    pub fn set_end(&mut self, point: Point) {
        match self {
            Shape::Freehand(s) => s.set_end(point),
            Shape::Rectangle(s) => s.set_end(point),
            Shape::Circle(s) => s.set_end(point),
            Shape::Line(s) => s.set_end(point),
            Shape::Text(s) => s.set_end(point),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Freehand(s) => s.bounds(),
            Shape::Rectangle(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Shape::Freehand(s) => s.hit_test(point),
            Shape::Rectangle(s) => s.hit_test(point),
            Shape::Circle(s) => s.hit_test(point),
            Shape::Line(s) => s.hit_test(point),
            Shape::Text(s) => s.hit_test(point),
        }
    }

    /// Tests the screen-space position against this shape's selection
    /// handles, returning the handle kind under the pointer if any.
    pub fn hit_test_handle(
        &self,
        screen: Point,
        viewport: &Viewport,
        handle_size: f64,
    ) -> Option<HandleKind> {
        selection::handle_at(self.bounds(), self.rotation(), screen, viewport, handle_size)
    }

    pub fn move_by(&mut self, delta: Vec2) {
        match self {
            Shape::Freehand(s) => s.move_by(delta),
            Shape::Rectangle(s) => s.move_by(delta),
            Shape::Circle(s) => s.move_by(delta),
            Shape::Line(s) => s.move_by(delta),
            Shape::Text(s) => s.move_by(delta),
        }
    }

    pub fn rotate_around(&mut self, pivot: Point, angle: f64) {
        match self {
            Shape::Freehand(s) => s.rotate_around(pivot, angle),
            Shape::Rectangle(s) => s.rotate_around(pivot, angle),
            Shape::Circle(s) => s.rotate_around(pivot, angle),
            Shape::Line(s) => s.rotate_around(pivot, angle),
            Shape::Text(s) => s.rotate_around(pivot, angle),
        }
    }

    pub fn scale_about(&mut self, pivot: Point, sx: f64, sy: f64) {
        match self {
            Shape::Freehand(s) => s.scale_about(pivot, sx, sy),
            Shape::Rectangle(s) => s.scale_about(pivot, sx, sy),
            Shape::Circle(s) => s.scale_about(pivot, sx, sy),
            Shape::Line(s) => s.scale_about(pivot, sx, sy),
            Shape::Text(s) => s.scale_about(pivot, sx, sy),
        }
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface, offset: Vec2) {
        match self {
            Shape::Freehand(s) => s.draw(surface, offset),
            Shape::Rectangle(s) => s.draw(surface, offset),
            Shape::Circle(s) => s.draw(surface, offset),
            Shape::Line(s) => s.draw(surface, offset),
            Shape::Text(s) => s.draw(surface, offset),
        }
    }
}

/// Scale `point` about `pivot` by per-axis factors. Shared by the concrete
/// `scale_about` implementations.
pub(crate) fn scale_point_about(point: Point, pivot: Point, sx: f64, sy: f64) -> Point {
    Point::new(
        pivot.x + (point.x - pivot.x) * sx,
        pivot.y + (point.y - pivot.y) * sy,
    )
}
