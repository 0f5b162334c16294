//! Canvas state management: shape collection, selection, history, rendering.

use crate::overlay::OverlayScheduler;
use crate::selection::{self, HandleKind, HANDLE_SIZE};
use crate::shapes::{Freehand, Shape};
use crate::tools::OverlayMode;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Vec2};
use overmark_render::{RenderSurface, StrokeOptions};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 100;

/// Dash pattern for the selection decoration box.
const SELECTION_DASH: [f64; 2] = [6.0, 4.0];
/// Dash pattern for the marquee rectangle.
const MARQUEE_DASH: [f64; 2] = [4.0, 3.0];

fn accent_color() -> Color {
    // dodger blue
    Color::from_rgba8(30, 144, 255, 255)
}

fn marquee_color() -> Color {
    Color::from_rgba8(30, 144, 255, 230)
}

fn handle_border_color() -> Color {
    Color::from_rgba8(51, 51, 51, 255)
}

/// Errors from the snapshot import/export boundary.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to serialize canvas snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("invalid canvas snapshot: {0}")]
    Parse(#[source] serde_json::Error),
}

/// A snapshot of the shape collection for undo/redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CanvasSnapshot {
    shapes: Vec<Shape>,
}

/// Owns the ordered shape collection, the selection, the undo/redo history,
/// the viewport, and the render surface.
///
/// Every mutation that changes shape geometry or membership pushes an undo
/// snapshot first and triggers a redraw after; overlay expiry is the one
/// deliberate exception, so undoing never resurrects a shape that was only
/// ever meant to flash briefly.
pub struct CanvasManager {
    surface: Box<dyn RenderSurface>,
    /// Shapes in z-order (back to front).
    shapes: Vec<Shape>,
    /// Indices into `shapes` of the selected shapes, ascending, no duplicates.
    selection: Vec<usize>,
    /// Undo history stack.
    undo_stack: Vec<CanvasSnapshot>,
    /// Redo history stack.
    redo_stack: Vec<CanvasSnapshot>,
    /// Expiry deadlines for ephemeral shapes.
    overlays: OverlayScheduler,
    /// Pan/zoom transform.
    pub viewport: Viewport,
}

impl CanvasManager {
    /// Create an empty canvas drawing to `surface`.
    pub fn new(surface: Box<dyn RenderSurface>) -> Self {
        Self {
            surface,
            shapes: Vec::new(),
            selection: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            overlays: OverlayScheduler::new(),
            viewport: Viewport::new(),
        }
    }

    /// Shapes in z-order (back to front).
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shape at `index`, if valid.
    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// Indices of the selected shapes, ascending.
    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            shapes: self.shapes.clone(),
        }
    }

    /// Push a pre-mutation snapshot (call before making changes).
    fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.push_undo_snapshot(snapshot);
    }

    fn push_undo_snapshot(&mut self, snapshot: CanvasSnapshot) {
        self.undo_stack.push(snapshot);
        // Clear redo stack when new changes are made
        self.redo_stack.clear();
        // Limit undo history size
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Replace the shape collection wholesale: prune stale selection
    /// indices, drop pending expiry deadlines, and redraw.
    fn restore(&mut self, snapshot: CanvasSnapshot) {
        self.shapes = snapshot.shapes;
        self.prune_selection();
        self.overlays.cancel_all();
        self.redraw();
    }

    fn prune_selection(&mut self) {
        let len = self.shapes.len();
        self.selection.retain(|&index| index < len);
    }

    // ---- shape lifecycle ----

    /// Append a shape on top of the z-order.
    pub fn add_shape(&mut self, shape: Shape) {
        self.push_undo();
        self.shapes.push(shape);
        self.redraw();
    }

    /// Append a shape, scheduling it for expiry when `mode` is ephemeral.
    pub fn add_overlay_shape(&mut self, shape: Shape, mode: OverlayMode) {
        let id = shape.id();
        self.add_shape(shape);
        if mode == OverlayMode::Ephemeral {
            self.overlays.schedule(id, Instant::now());
        }
    }

    /// Remove every ephemeral shape whose deadline has passed, returning
    /// how many were removed. Takes no history snapshot, so expiry
    /// cannot be undone.
    pub fn expire_overlays(&mut self, now: Instant) -> usize {
        let due = self.overlays.drain_due(now);
        if due.is_empty() {
            return 0;
        }
        let old = std::mem::take(&mut self.shapes);
        let mut remap: Vec<Option<usize>> = Vec::with_capacity(old.len());
        let mut kept = Vec::with_capacity(old.len());
        for shape in old {
            if due.contains(&shape.id()) {
                remap.push(None);
            } else {
                remap.push(Some(kept.len()));
                kept.push(shape);
            }
        }
        let removed = remap.iter().filter(|slot| slot.is_none()).count();
        self.shapes = kept;
        self.selection = self
            .selection
            .iter()
            .filter_map(|&index| remap.get(index).copied().flatten())
            .collect();
        if removed > 0 {
            log::debug!("expired {removed} overlay shape(s)");
            self.redraw();
        }
        removed
    }

    /// Remove every shape, keeping it undoable.
    pub fn clear_all(&mut self) {
        self.push_undo();
        self.shapes.clear();
        self.selection.clear();
        self.overlays.cancel_all();
        log::debug!("canvas cleared");
        self.redraw();
    }

    // ---- history ----

    /// Undo the last change. Returns true if a snapshot was restored.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Redo the last undone change. Returns true if a snapshot was restored.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    // ---- selection ----

    /// Select the topmost shape hit at a world-space point. Replaces the
    /// selection; clears it when nothing is hit.
    pub fn select_at(&mut self, world: Point) -> Option<usize> {
        for index in (0..self.shapes.len()).rev() {
            if self.shapes[index].hit_test(world) {
                self.selection = vec![index];
                self.redraw();
                return Some(index);
            }
        }
        self.selection.clear();
        self.redraw();
        None
    }

    /// Select every shape whose bounds intersect `rect` (inclusive of
    /// touching edges). Replaces the selection and returns it.
    pub fn select_in_rect(&mut self, rect: Rect) -> Vec<usize> {
        let selected: Vec<usize> = (0..self.shapes.len())
            .filter(|&index| rects_intersect(rect, self.shapes[index].bounds()))
            .collect();
        self.selection = selected.clone();
        self.redraw();
        selected
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selection.clear();
        self.redraw();
    }

    /// Union of the selected shapes' bounds, or None when nothing is
    /// selected.
    pub fn group_bounds(&self) -> Option<Rect> {
        let mut bounds = self
            .selection
            .iter()
            .filter_map(|&index| self.shapes.get(index))
            .map(|shape| shape.bounds());
        let first = bounds.next()?;
        Some(bounds.fold(first, |acc, b| acc.union(b)))
    }

    /// Hit-test the selection handles at a screen-space point.
    ///
    /// A single selection uses the shape's rotated handle positions; a
    /// multi-selection uses the unrotated group box.
    pub fn handle_at(&self, screen: Point) -> Option<HandleKind> {
        match self.selection.as_slice() {
            [] => None,
            [index] => {
                let shape = self.shapes.get(*index)?;
                shape.hit_test_handle(screen, &self.viewport, HANDLE_SIZE)
            }
            _ => {
                let bounds = self.group_bounds()?;
                selection::handle_at(bounds, 0.0, screen, &self.viewport, HANDLE_SIZE)
            }
        }
    }

    // ---- selection transforms ----

    /// Translate every selected shape by a world-space delta.
    pub fn move_selected_by(&mut self, delta: Vec2) {
        if self.selection.is_empty() {
            return;
        }
        self.push_undo();
        for &index in &self.selection {
            if let Some(shape) = self.shapes.get_mut(index) {
                shape.move_by(delta);
            }
        }
        self.redraw();
    }

    /// Scale the selected shapes about the group bounds center, driven by a
    /// screen-space handle drag.
    ///
    /// The drag delta is read along the handle's outward direction, so
    /// dragging any handle away from the center grows the group. Edge
    /// handles scale a single axis; corner handles scale both.
    pub fn resize_selected(&mut self, handle: HandleKind, dx_screen: f64, dy_screen: f64) {
        if self.selection.is_empty() {
            return;
        }
        let Some(bounds) = self.group_bounds() else {
            return;
        };
        self.push_undo();

        let dx = dx_screen / self.viewport.zoom;
        let dy = dy_screen / self.viewport.zoom;
        let width = if bounds.width() == 0.0 {
            1.0
        } else {
            bounds.width()
        };
        let height = if bounds.height() == 0.0 {
            1.0
        } else {
            bounds.height()
        };
        let sx = 1.0 + handle.sign_x() * dx / width;
        let sy = 1.0 + handle.sign_y() * dy / height;
        let pivot = bounds.center();

        for &index in &self.selection {
            if let Some(shape) = self.shapes.get_mut(index) {
                shape.scale_about(pivot, sx, sy);
            }
        }
        self.redraw();
    }

    /// Rotate the selected shapes by `angle` radians about the group bounds
    /// center.
    pub fn rotate_selected(&mut self, angle: f64) {
        if self.selection.is_empty() {
            return;
        }
        let Some(bounds) = self.group_bounds() else {
            return;
        };
        self.push_undo();
        let pivot = bounds.center();
        for &index in &self.selection {
            if let Some(shape) = self.shapes.get_mut(index) {
                shape.rotate_around(pivot, angle);
            }
        }
        self.redraw();
    }

    /// Delete the selected shapes.
    pub fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.push_undo();
        let mut order = self.selection.clone();
        order.sort_unstable_by(|a, b| b.cmp(a));
        order.dedup();
        for index in order {
            if index < self.shapes.len() {
                self.shapes.remove(index);
            }
        }
        self.selection.clear();
        self.redraw();
    }

    // ---- erasing ----

    /// Erase a circular area at a world-space point.
    ///
    /// Freehand strokes lose the points inside the circle and are split
    /// into separate strokes around the gap; runs shorter than two points
    /// are discarded. Other shapes are removed whole when the circle
    /// reaches their bounds or the center falls inside them. Returns true
    /// (after one undo snapshot) if anything changed; a miss leaves every
    /// shape untouched, with its identity, and pushes nothing.
    pub fn erase_area(&mut self, center: Point, radius: f64) -> bool {
        let before = self.snapshot();
        let old = std::mem::take(&mut self.shapes);
        let mut kept: Vec<Shape> = Vec::with_capacity(old.len());
        let mut remap: Vec<Option<usize>> = Vec::with_capacity(old.len());
        let mut modified = false;

        for shape in old {
            match shape {
                Shape::Freehand(stroke) => {
                    let total = stroke.points.len();
                    let runs = split_outside_circle(&stroke.points, center, radius);
                    match runs.as_slice() {
                        [] => {
                            modified = true;
                            remap.push(None);
                        }
                        [single] if single.len() == total => {
                            // untouched: keep the original stroke, same identity
                            remap.push(Some(kept.len()));
                            kept.push(Shape::Freehand(stroke));
                        }
                        _ => {
                            modified = true;
                            remap.push(None);
                            for run in runs {
                                kept.push(Shape::Freehand(Freehand::from_points(
                                    run,
                                    stroke.style,
                                )));
                            }
                        }
                    }
                }
                other => {
                    let bounds = other.bounds();
                    let nearest = Point::new(
                        center.x.clamp(bounds.x0, bounds.x1),
                        center.y.clamp(bounds.y0, bounds.y1),
                    );
                    let touched = center.distance(nearest) <= radius || other.hit_test(center);
                    if touched {
                        modified = true;
                        remap.push(None);
                    } else {
                        remap.push(Some(kept.len()));
                        kept.push(other);
                    }
                }
            }
        }

        if !modified {
            // unchanged shapes were moved straight through
            self.shapes = kept;
            return false;
        }

        self.push_undo_snapshot(before);
        self.shapes = kept;
        self.selection = self
            .selection
            .iter()
            .filter_map(|&index| remap.get(index).copied().flatten())
            .collect();
        self.redraw();
        true
    }

    /// Remove every shape hit at a world-space point. Returns true (after
    /// one undo snapshot) if anything was removed.
    pub fn erase_shape_at(&mut self, world: Point) -> bool {
        let hit: Vec<usize> = (0..self.shapes.len())
            .filter(|&index| self.shapes[index].hit_test(world))
            .collect();
        if hit.is_empty() {
            return false;
        }
        self.push_undo();
        for &index in hit.iter().rev() {
            self.shapes.remove(index);
        }
        self.selection = self
            .selection
            .iter()
            .filter_map(|&index| {
                if hit.binary_search(&index).is_ok() {
                    None
                } else {
                    Some(index - hit.iter().filter(|&&h| h < index).count())
                }
            })
            .collect();
        self.redraw();
        true
    }

    // ---- viewport ----

    /// Pan the viewport by a screen-space delta and redraw.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
        self.redraw();
    }

    /// Zoom the viewport by a factor about a screen-space cursor and redraw.
    pub fn zoom_at(&mut self, cursor: Point, factor: f64) {
        self.viewport.zoom_at(cursor, factor);
        self.redraw();
    }

    // ---- snapshot import/export ----

    /// Serialize the shape collection to JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(&self.shapes).map_err(SnapshotError::Serialize)
    }

    /// Replace the shape collection from a JSON snapshot, keeping the swap
    /// undoable. Returns the number of shapes loaded.
    pub fn from_json(&mut self, data: &str) -> Result<usize, SnapshotError> {
        let shapes: Vec<Shape> = serde_json::from_str(data).map_err(SnapshotError::Parse)?;
        let count = shapes.len();
        self.push_undo();
        self.restore(CanvasSnapshot { shapes });
        log::info!("loaded canvas snapshot with {count} shape(s)");
        Ok(count)
    }

    // ---- rendering ----

    /// Redraw the whole canvas.
    pub fn redraw(&mut self) {
        self.redraw_with(None, None);
    }

    /// Redraw the whole canvas plus transient layers: an uncommitted shape
    /// preview (drawn in world space, above committed shapes) and a marquee
    /// rectangle given in world space but stroked in screen space.
    ///
    /// Frame order: clear, committed shapes, preview, marquee, selection
    /// decoration.
    pub fn redraw_with(&mut self, preview: Option<&Shape>, marquee: Option<Rect>) {
        self.surface.clear();

        self.surface.save();
        self.surface
            .translate(self.viewport.offset.x, self.viewport.offset.y);
        self.surface.scale(self.viewport.zoom);
        for shape in &self.shapes {
            shape.draw(self.surface.as_mut(), Vec2::ZERO);
        }
        if let Some(shape) = preview {
            shape.draw(self.surface.as_mut(), Vec2::ZERO);
        }
        self.surface.restore();

        if let Some(rect) = marquee {
            let p0 = self.viewport.world_to_screen(Point::new(rect.x0, rect.y0));
            let p1 = self.viewport.world_to_screen(Point::new(rect.x1, rect.y1));
            self.surface.stroke_rect(
                Rect::from_points(p0, p1),
                &StrokeOptions::dashed(marquee_color(), 1.0, MARQUEE_DASH),
            );
        }

        match self.selection.as_slice() {
            [] => {}
            [index] => {
                if let Some(shape) = self.shapes.get(*index) {
                    let bounds = shape.bounds();
                    let rotation = shape.rotation();
                    draw_selection_decoration(
                        self.surface.as_mut(),
                        &self.viewport,
                        bounds,
                        rotation,
                    );
                }
            }
            _ => {
                if let Some(bounds) = self.group_bounds() {
                    draw_selection_decoration(self.surface.as_mut(), &self.viewport, bounds, 0.0);
                }
            }
        }
    }
}

/// Inclusive rectangle intersection: touching edges count.
fn rects_intersect(a: Rect, b: Rect) -> bool {
    !(a.x1 < b.x0 || b.x1 < a.x0 || a.y1 < b.y0 || b.y1 < a.y0)
}

/// Split a polyline into maximal runs of points outside the erase circle.
/// Runs shorter than two points are dropped.
fn split_outside_circle(points: &[Point], center: Point, radius: f64) -> Vec<Vec<Point>> {
    let mut runs: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for &point in points {
        if point.distance(center) <= radius {
            if current.len() >= 2 {
                runs.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        } else {
            current.push(point);
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

/// Draw the dashed selection box and its handles in screen space.
///
/// The box is stroked inside a rotated transform about its own center; the
/// handles are filled at the same rotated positions the hit-test uses.
fn draw_selection_decoration(
    surface: &mut dyn RenderSurface,
    viewport: &Viewport,
    bounds: Rect,
    rotation: f64,
) {
    if bounds.width() <= 0.0 && bounds.height() <= 0.0 {
        return;
    }

    let p0 = viewport.world_to_screen(Point::new(bounds.x0, bounds.y0));
    let p1 = viewport.world_to_screen(Point::new(bounds.x1, bounds.y1));
    let screen_box = Rect::from_points(p0, p1);
    let center = screen_box.center();

    surface.save();
    surface.translate(center.x, center.y);
    surface.rotate(rotation);
    surface.translate(-center.x, -center.y);
    surface.stroke_rect(
        screen_box,
        &StrokeOptions::dashed(accent_color(), 1.0, SELECTION_DASH),
    );
    surface.restore();

    let half = HANDLE_SIZE / 2.0;
    let border = StrokeOptions::solid(handle_border_color(), 1.0);
    for (_, world) in selection::compass_points(bounds, rotation) {
        let p = viewport.world_to_screen(world);
        let handle_box = Rect::new(p.x - half, p.y - half, p.x + half, p.y + half);
        surface.fill_rect(handle_box, Color::WHITE);
        surface.stroke_rect(handle_box, &border);
    }

    let knob = viewport.world_to_screen(selection::rotate_handle_point(
        bounds,
        rotation,
        viewport.zoom,
    ));
    surface.fill_circle(knob, half, Color::WHITE);
    surface.stroke_circle(knob, half, &border);
}
