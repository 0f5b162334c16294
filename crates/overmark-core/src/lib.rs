//! Overmark Core Library
//!
//! Backend-agnostic annotation engine: shape model, viewport transform,
//! selection and history management, and the pointer/keyboard state machine
//! that drives them. Rendering goes through the `overmark-render` surface
//! abstraction, so the engine runs identically under a GPU canvas, a test
//! recorder, or any other 2D backend.

pub mod canvas;
pub mod controller;
pub mod input;
pub mod overlay;
pub mod selection;
pub mod shapes;
pub mod tools;
pub mod viewport;

pub use canvas::{CanvasManager, SnapshotError};
pub use controller::{InteractionController, InteractionState};
pub use input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use overlay::{OverlayScheduler, OVERLAY_TTL};
pub use selection::{HandleKind, HANDLE_SIZE, ROTATE_HANDLE_OFFSET};
pub use shapes::{
    Circle, Freehand, Line, Rectangle, SerializableColor, Shape, ShapeId, ShapeStyle, ShapeTrait,
    Text,
};
pub use tools::{InteractionConfig, OverlayMode, ToolKind};
pub use viewport::Viewport;
