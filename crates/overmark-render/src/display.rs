//! Recording render target.
//!
//! [`DisplayList`] captures every surface call as a [`DisplayCommand`]. It is
//! the reference backend for headless hosts and the test suites: a frame can
//! be rendered and then inspected command by command. Text metrics use a flat
//! per-character advance so measurements are deterministic.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;

use crate::surface::{RenderSurface, StrokeOptions};

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.5;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    Clear,
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Rotate { angle: f64 },
    Scale { factor: f64 },
    StrokeRect {
        rect: Rect,
        options: StrokeOptions,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        options: StrokeOptions,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
    StrokePath {
        path: BezPath,
        options: StrokeOptions,
    },
    FillText {
        text: String,
        origin: Point,
        font_size: f64,
        color: Color,
    },
}

/// A render target that records commands instead of producing pixels.
///
/// `clear` truncates the recording, so after a full render pass the list
/// holds exactly one frame, starting with [`DisplayCommand::Clear`].
#[derive(Debug, Default, Clone)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded commands for the current frame.
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<DisplayCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderSurface for DisplayList {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DisplayCommand::Clear);
    }

    fn save(&mut self) {
        self.commands.push(DisplayCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DisplayCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(DisplayCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, angle: f64) {
        self.commands.push(DisplayCommand::Rotate { angle });
    }

    fn scale(&mut self, factor: f64) {
        self.commands.push(DisplayCommand::Scale { factor });
    }

    fn stroke_rect(&mut self, rect: Rect, options: &StrokeOptions) {
        self.commands.push(DisplayCommand::StrokeRect {
            rect,
            options: *options,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DisplayCommand::FillRect { rect, color });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, options: &StrokeOptions) {
        self.commands.push(DisplayCommand::StrokeCircle {
            center,
            radius,
            options: *options,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DisplayCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, options: &StrokeOptions) {
        self.commands.push(DisplayCommand::StrokePath {
            path: path.clone(),
            options: *options,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        self.commands.push(DisplayCommand::FillText {
            text: text.to_string(),
            origin,
            font_size,
            color,
        });
    }

    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * CHAR_WIDTH_FACTOR
    }
}

/// Shared handle so a caller can keep inspecting a list after handing it to
/// the engine as a boxed surface.
impl RenderSurface for Rc<RefCell<DisplayList>> {
    fn clear(&mut self) {
        self.borrow_mut().clear();
    }

    fn save(&mut self) {
        self.borrow_mut().save();
    }

    fn restore(&mut self) {
        self.borrow_mut().restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.borrow_mut().translate(dx, dy);
    }

    fn rotate(&mut self, angle: f64) {
        self.borrow_mut().rotate(angle);
    }

    fn scale(&mut self, factor: f64) {
        self.borrow_mut().scale(factor);
    }

    fn stroke_rect(&mut self, rect: Rect, options: &StrokeOptions) {
        self.borrow_mut().stroke_rect(rect, options);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.borrow_mut().fill_rect(rect, color);
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, options: &StrokeOptions) {
        self.borrow_mut().stroke_circle(center, radius, options);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.borrow_mut().fill_circle(center, radius, color);
    }

    fn stroke_path(&mut self, path: &BezPath, options: &StrokeOptions) {
        self.borrow_mut().stroke_path(path, options);
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        self.borrow_mut().fill_text(text, origin, font_size, color);
    }

    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.borrow().text_width(text, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut list = DisplayList::new();
        list.clear();
        list.save();
        list.translate(3.0, 4.0);
        list.restore();

        assert_eq!(
            list.commands(),
            &[
                DisplayCommand::Clear,
                DisplayCommand::Save,
                DisplayCommand::Translate { dx: 3.0, dy: 4.0 },
                DisplayCommand::Restore,
            ]
        );
    }

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut list = DisplayList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        list.clear();
        assert_eq!(list.commands(), &[DisplayCommand::Clear]);
    }

    #[test]
    fn test_text_width_is_deterministic_and_scales() {
        let list = DisplayList::new();
        let w1 = list.text_width("hello", 10.0);
        let w2 = list.text_width("hello", 10.0);
        assert!((w1 - w2).abs() < f64::EPSILON);
        assert!((w1 - 25.0).abs() < f64::EPSILON);
        assert!(list.text_width("hello", 20.0) > w1);
        assert!(list.text_width("", 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shared_handle_records_into_same_list() {
        let list = Rc::new(RefCell::new(DisplayList::new()));
        let mut handle = list.clone();
        handle.clear();
        handle.fill_circle(Point::new(1.0, 2.0), 5.0, Color::WHITE);

        assert_eq!(list.borrow().len(), 2);
        assert_eq!(list.borrow().commands()[0], DisplayCommand::Clear);
    }

    #[test]
    fn test_stroke_options_carry_dash() {
        let mut list = DisplayList::new();
        let options = StrokeOptions::dashed(Color::BLACK, 1.0, [6.0, 4.0]);
        list.stroke_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &options);

        match &list.commands()[0] {
            DisplayCommand::StrokeRect { options, .. } => {
                assert_eq!(options.dash, Some([6.0, 4.0]));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
