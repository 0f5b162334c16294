//! Selection handles: placement and hit-testing.
//!
//! A selected shape shows eight compass handles on its bounding box plus a
//! rotation knob floating above the top edge. Handle positions follow the
//! shape's rotation so the targets sit where the decoration is drawn.

use crate::shapes::rotate_about;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Screen-pixel gap between the top-mid handle and the rotation knob.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;

/// A drag target on the selection bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    Rotate,
}

impl HandleKind {
    /// The eight compass handles, in hit-test priority order.
    pub const COMPASS: [HandleKind; 8] = [
        HandleKind::NorthWest,
        HandleKind::North,
        HandleKind::NorthEast,
        HandleKind::East,
        HandleKind::SouthEast,
        HandleKind::South,
        HandleKind::SouthWest,
        HandleKind::West,
    ];

    /// Horizontal resize sign: +1 for east handles, -1 for west, 0 otherwise.
    pub fn sign_x(self) -> f64 {
        match self {
            HandleKind::NorthEast | HandleKind::East | HandleKind::SouthEast => 1.0,
            HandleKind::NorthWest | HandleKind::West | HandleKind::SouthWest => -1.0,
            HandleKind::North | HandleKind::South | HandleKind::Rotate => 0.0,
        }
    }

    /// Vertical resize sign: +1 for south handles, -1 for north, 0 otherwise.
    pub fn sign_y(self) -> f64 {
        match self {
            HandleKind::SouthWest | HandleKind::South | HandleKind::SouthEast => 1.0,
            HandleKind::NorthWest | HandleKind::North | HandleKind::NorthEast => -1.0,
            HandleKind::East | HandleKind::West | HandleKind::Rotate => 0.0,
        }
    }

    /// Unrotated anchor position on `bounds` for a compass handle.
    fn anchor(self, bounds: Rect) -> Point {
        let center = bounds.center();
        match self {
            HandleKind::NorthWest => Point::new(bounds.x0, bounds.y0),
            HandleKind::North => Point::new(center.x, bounds.y0),
            HandleKind::NorthEast => Point::new(bounds.x1, bounds.y0),
            HandleKind::East => Point::new(bounds.x1, center.y),
            HandleKind::SouthEast => Point::new(bounds.x1, bounds.y1),
            HandleKind::South => Point::new(center.x, bounds.y1),
            HandleKind::SouthWest => Point::new(bounds.x0, bounds.y1),
            HandleKind::West => Point::new(bounds.x0, center.y),
            HandleKind::Rotate => Point::new(center.x, bounds.y0),
        }
    }
}

/// World-space positions of the eight compass handles on `bounds`, rotated
/// about the bounds center.
pub fn compass_points(bounds: Rect, rotation: f64) -> [(HandleKind, Point); 8] {
    let center = bounds.center();
    HandleKind::COMPASS.map(|kind| (kind, rotate_about(kind.anchor(bounds), center, rotation)))
}

/// World-space position of the rotation knob.
///
/// The knob floats [`ROTATE_HANDLE_OFFSET`] screen pixels above the top-mid
/// handle, along the box's rotated up direction; the offset is divided by
/// the zoom so the screen gap stays constant.
pub fn rotate_handle_point(bounds: Rect, rotation: f64, zoom: f64) -> Point {
    let center = bounds.center();
    let lifted = HandleKind::Rotate.anchor(bounds) - Vec2::new(0.0, ROTATE_HANDLE_OFFSET / zoom);
    rotate_about(lifted, center, rotation)
}

/// Hit-test the handles of a selection box against a screen-space point.
///
/// Compass handles match within half of `handle_size` on each axis; the
/// rotation knob gets double that reach. The first compass match wins.
pub fn handle_at(
    bounds: Rect,
    rotation: f64,
    screen: Point,
    viewport: &Viewport,
    handle_size: f64,
) -> Option<HandleKind> {
    let half = handle_size / 2.0;
    for (kind, world) in compass_points(bounds, rotation) {
        let p = viewport.world_to_screen(world);
        if (screen.x - p.x).abs() <= half && (screen.y - p.y).abs() <= half {
            return Some(kind);
        }
    }

    let knob = viewport.world_to_screen(rotate_handle_point(bounds, rotation, viewport.zoom));
    if (screen.x - knob.x).abs() <= handle_size && (screen.y - knob.y).abs() <= handle_size {
        return Some(HandleKind::Rotate);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 100.0, 50.0);

    #[test]
    fn test_compass_order_and_positions() {
        let points = compass_points(BOUNDS, 0.0);
        assert_eq!(points[0], (HandleKind::NorthWest, Point::new(0.0, 0.0)));
        assert_eq!(points[1], (HandleKind::North, Point::new(50.0, 0.0)));
        assert_eq!(points[4], (HandleKind::SouthEast, Point::new(100.0, 50.0)));
        assert_eq!(points[7], (HandleKind::West, Point::new(0.0, 25.0)));
    }

    #[test]
    fn test_compass_points_follow_rotation() {
        let points = compass_points(BOUNDS, std::f64::consts::FRAC_PI_2);
        let (kind, nw) = points[0];
        assert_eq!(kind, HandleKind::NorthWest);
        assert!((nw.x - 75.0).abs() < 1e-9);
        assert!((nw.y + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_handle_at_compass_tolerance() {
        let viewport = Viewport::new();
        assert_eq!(
            handle_at(BOUNDS, 0.0, Point::new(3.0, -4.0), &viewport, HANDLE_SIZE),
            Some(HandleKind::NorthWest)
        );
        assert_eq!(
            handle_at(BOUNDS, 0.0, Point::new(103.0, 25.0), &viewport, HANDLE_SIZE),
            Some(HandleKind::East)
        );
        assert_eq!(
            handle_at(BOUNDS, 0.0, Point::new(50.0, 25.0), &viewport, HANDLE_SIZE),
            None
        );
    }

    #[test]
    fn test_rotate_knob_has_double_reach() {
        let viewport = Viewport::new();
        // knob sits 20px above the top-mid handle
        assert_eq!(
            handle_at(BOUNDS, 0.0, Point::new(58.0, -14.0), &viewport, HANDLE_SIZE),
            Some(HandleKind::Rotate)
        );
        assert_eq!(
            handle_at(BOUNDS, 0.0, Point::new(62.0, -20.0), &viewport, HANDLE_SIZE),
            None
        );
    }

    #[test]
    fn test_rotate_knob_gap_is_constant_on_screen() {
        let mut viewport = Viewport::new();
        viewport.zoom = 2.0;
        let knob = viewport.world_to_screen(rotate_handle_point(BOUNDS, 0.0, viewport.zoom));
        let top_mid = viewport.world_to_screen(Point::new(50.0, 0.0));
        assert!((top_mid.y - knob.y - ROTATE_HANDLE_OFFSET).abs() < 1e-9);
        assert_eq!(
            handle_at(BOUNDS, 0.0, knob, &viewport, HANDLE_SIZE),
            Some(HandleKind::Rotate)
        );
    }

    #[test]
    fn test_handle_at_rotated_box() {
        let viewport = Viewport::new();
        // after a quarter turn the north-west corner lands at (75, -25)
        assert_eq!(
            handle_at(
                BOUNDS,
                std::f64::consts::FRAC_PI_2,
                Point::new(75.0, -25.0),
                &viewport,
                HANDLE_SIZE
            ),
            Some(HandleKind::NorthWest)
        );
        // the unrotated corner position no longer matches anything
        assert_eq!(
            handle_at(
                BOUNDS,
                std::f64::consts::FRAC_PI_2,
                Point::new(0.0, 0.0),
                &viewport,
                HANDLE_SIZE
            ),
            None
        );
    }

    #[test]
    fn test_resize_signs() {
        assert_eq!(HandleKind::SouthEast.sign_x(), 1.0);
        assert_eq!(HandleKind::SouthEast.sign_y(), 1.0);
        assert_eq!(HandleKind::NorthWest.sign_x(), -1.0);
        assert_eq!(HandleKind::NorthWest.sign_y(), -1.0);
        assert_eq!(HandleKind::North.sign_x(), 0.0);
        assert_eq!(HandleKind::North.sign_y(), -1.0);
        assert_eq!(HandleKind::East.sign_y(), 0.0);
        assert_eq!(HandleKind::Rotate.sign_x(), 0.0);
    }
}
