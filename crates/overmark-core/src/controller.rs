//! Pointer and keyboard state machine.
//!
//! Translates raw input events into [`CanvasManager`] operations according
//! to the active tool. The controller owns only transient interaction state;
//! all shape, selection, and history mutation goes through the manager.

use crate::canvas::CanvasManager;
use crate::input::{KeyEvent, MouseButton, PointerEvent};
use crate::selection::HandleKind;
use crate::shapes::{Circle, Freehand, Line, Rectangle, Shape, Text};
use crate::tools::{InteractionConfig, ToolKind};
use kurbo::{Point, Rect};

/// Paint-eraser radius in screen pixels when the configured stroke width is
/// not positive.
const DEFAULT_ERASE_RADIUS: f64 = 20.0;

/// What the pointer is currently doing. One state is active at a time; every
/// non-idle state ends on pointer-up.
#[derive(Debug, Clone)]
pub enum InteractionState {
    Idle,
    /// Extending an open freehand stroke.
    FreehandDrawing { shape: Shape },
    /// Dragging out a rectangle, circle, or line.
    ShapeDrawing { shape: Shape },
    /// Dragging the viewport.
    Panning { last_screen: Point },
    /// Erasing along the pointer path.
    PaintErasing { radius_screen: f64 },
    /// Dragging the selected shapes.
    MovingSelection { last_world: Point },
    /// Dragging a compass handle of the selection box.
    ResizingSelection {
        handle: HandleKind,
        last_screen: Point,
    },
    /// Dragging the rotation knob.
    RotatingSelection { last_angle: f64 },
    /// Dragging out a selection rectangle on empty space.
    MarqueeSelecting {
        start_world: Point,
        current_world: Point,
    },
}

/// Drives a [`CanvasManager`] from pointer and keyboard events.
///
/// The host passes the current tool and style configuration with every
/// pointer event; the controller snapshots it on pointer-down so a drag is
/// not affected by mid-gesture UI changes.
pub struct InteractionController {
    state: InteractionState,
    /// Configuration captured at the start of the current gesture.
    config: InteractionConfig,
    /// World position where the text tool asked for input.
    pending_text: Option<Point>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
            config: InteractionConfig::default(),
            pending_text: None,
        }
    }

    /// Current interaction state.
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Whether no gesture is in progress.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    /// Configuration captured at the start of the current gesture.
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Feed one pointer event, driving `canvas` according to `config`.
    pub fn handle_pointer(
        &mut self,
        canvas: &mut CanvasManager,
        event: &PointerEvent,
        config: &InteractionConfig,
    ) {
        match *event {
            PointerEvent::Down {
                position, button, ..
            } => {
                self.pointer_down(canvas, position, button, config);
            }
            PointerEvent::Move { position } => self.pointer_move(canvas, position),
            PointerEvent::Up { position } => self.pointer_up(canvas, position),
        }
    }

    fn pointer_down(
        &mut self,
        canvas: &mut CanvasManager,
        screen: Point,
        button: MouseButton,
        config: &InteractionConfig,
    ) {
        if button != MouseButton::Left {
            return;
        }
        self.config = *config;
        let world = canvas.viewport.screen_to_world(screen);

        match config.tool {
            ToolKind::Select => {
                if let Some(handle) = canvas.handle_at(screen) {
                    self.begin_handle_drag(canvas, handle, screen, world);
                } else if canvas.select_at(world).is_some() {
                    self.state = InteractionState::MovingSelection { last_world: world };
                } else {
                    self.state = InteractionState::MarqueeSelecting {
                        start_world: world,
                        current_world: world,
                    };
                }
            }
            ToolKind::Pan => {
                self.state = InteractionState::Panning {
                    last_screen: screen,
                };
            }
            ToolKind::EraserStroke => {
                // one-shot: delete everything under the pointer, stay idle
                canvas.erase_shape_at(world);
            }
            ToolKind::EraserPaint => {
                let radius_screen = if config.stroke_width > 0.0 {
                    config.stroke_width
                } else {
                    DEFAULT_ERASE_RADIUS
                };
                canvas.erase_area(world, radius_screen / canvas.viewport.zoom);
                self.state = InteractionState::PaintErasing { radius_screen };
            }
            ToolKind::Text => {
                // hand off to the host's text input; commit comes back
                // through commit_text
                self.pending_text = Some(world);
            }
            ToolKind::Freehand => {
                self.state = InteractionState::FreehandDrawing {
                    shape: Shape::Freehand(Freehand::new(world, config.style())),
                };
            }
            ToolKind::Rectangle => {
                self.state = InteractionState::ShapeDrawing {
                    shape: Shape::Rectangle(Rectangle::new(world, config.style())),
                };
            }
            ToolKind::Circle => {
                self.state = InteractionState::ShapeDrawing {
                    shape: Shape::Circle(Circle::new(world, config.style())),
                };
            }
            ToolKind::Line => {
                self.state = InteractionState::ShapeDrawing {
                    shape: Shape::Line(Line::new(world, config.style())),
                };
            }
        }
    }

    fn begin_handle_drag(
        &mut self,
        canvas: &mut CanvasManager,
        handle: HandleKind,
        screen: Point,
        world: Point,
    ) {
        if handle == HandleKind::Rotate {
            let Some(bounds) = canvas.group_bounds() else {
                return;
            };
            let center = bounds.center();
            let angle = (world.y - center.y).atan2(world.x - center.x);
            self.state = InteractionState::RotatingSelection { last_angle: angle };
        } else {
            self.state = InteractionState::ResizingSelection {
                handle,
                last_screen: screen,
            };
        }
    }

    fn pointer_move(&mut self, canvas: &mut CanvasManager, screen: Point) {
        let world = canvas.viewport.screen_to_world(screen);
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::FreehandDrawing { shape }
            | InteractionState::ShapeDrawing { shape } => {
                shape.set_end(world);
                canvas.redraw_with(Some(&*shape), None);
            }
            InteractionState::Panning { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                canvas.pan_by(delta);
            }
            InteractionState::PaintErasing { radius_screen } => {
                let radius = *radius_screen / canvas.viewport.zoom;
                canvas.erase_area(world, radius);
            }
            InteractionState::MovingSelection { last_world } => {
                let delta = world - *last_world;
                *last_world = world;
                canvas.move_selected_by(delta);
            }
            InteractionState::ResizingSelection {
                handle,
                last_screen,
            } => {
                let handle = *handle;
                let dx = screen.x - last_screen.x;
                let dy = screen.y - last_screen.y;
                *last_screen = screen;
                canvas.resize_selected(handle, dx, dy);
            }
            InteractionState::RotatingSelection { last_angle } => {
                // the pivot follows the current group bounds, which shift
                // as the rotation accumulates
                let Some(bounds) = canvas.group_bounds() else {
                    return;
                };
                let center = bounds.center();
                let angle = (world.y - center.y).atan2(world.x - center.x);
                let delta = angle - *last_angle;
                *last_angle = angle;
                canvas.rotate_selected(delta);
            }
            InteractionState::MarqueeSelecting {
                start_world,
                current_world,
            } => {
                *current_world = world;
                let rect = Rect::from_points(*start_world, world);
                canvas.redraw_with(None, Some(rect));
            }
        }
    }

    fn pointer_up(&mut self, canvas: &mut CanvasManager, _screen: Point) {
        let finished = std::mem::replace(&mut self.state, InteractionState::Idle);
        match finished {
            InteractionState::FreehandDrawing { shape }
            | InteractionState::ShapeDrawing { shape } => {
                canvas.add_overlay_shape(shape, self.config.overlay_mode);
            }
            InteractionState::MarqueeSelecting {
                start_world,
                current_world,
            } => {
                if current_world != start_world {
                    canvas.select_in_rect(Rect::from_points(start_world, current_world));
                } else {
                    // a plain click on empty space: selection was already
                    // cleared on pointer-down, just drop the marquee overlay
                    canvas.redraw();
                }
            }
            _ => {}
        }
    }

    /// Feed one key-down event.
    ///
    /// Bindings are global: undo/redo and delete work whatever the pointer
    /// is doing; Escape additionally aborts any gesture in progress without
    /// committing it.
    pub fn handle_key(&mut self, canvas: &mut CanvasManager, event: &KeyEvent) {
        if event.modifiers.command() {
            if event.key.eq_ignore_ascii_case("z") {
                canvas.undo();
                return;
            }
            if event.key.eq_ignore_ascii_case("y") {
                canvas.redo();
                return;
            }
        }
        match event.key.as_str() {
            "Delete" | "Backspace" => canvas.delete_selected(),
            "Escape" => {
                self.state = InteractionState::Idle;
                canvas.deselect();
            }
            _ => {}
        }
    }

    /// Take the pending text-input request, if the text tool was clicked.
    ///
    /// The host shows its input surface at the returned world position and
    /// calls [`commit_text`](Self::commit_text) when the user finishes.
    pub fn take_text_request(&mut self) -> Option<Point> {
        self.pending_text.take()
    }

    /// Commit text received back from the host's input surface.
    ///
    /// Styling comes from `config` as it stands now, not from the pointer
    /// gesture that requested the input. Whitespace-only content commits
    /// nothing.
    pub fn commit_text(
        &mut self,
        canvas: &mut CanvasManager,
        world: Point,
        content: &str,
        config: &InteractionConfig,
    ) {
        self.pending_text = None;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return;
        }
        let text = Text::new(world, trimmed.to_string(), config.style());
        canvas.add_overlay_shape(Shape::Text(text), config.overlay_mode);
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}
