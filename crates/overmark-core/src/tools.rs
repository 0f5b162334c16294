//! Tool identifiers and per-interaction configuration.

use crate::shapes::{SerializableColor, ShapeStyle};
use serde::{Deserialize, Serialize};

/// The available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// Freehand stroke drawing.
    Freehand,
    /// Drag out a rectangle.
    Rectangle,
    /// Drag out a circle from its center.
    Circle,
    /// Drag out a straight line.
    Line,
    /// Place a text block (content arrives through the text handoff).
    Text,
    /// Select, move, resize, and rotate shapes.
    Select,
    /// Pan the viewport.
    Pan,
    /// Remove whole shapes under the cursor.
    EraserStroke,
    /// Erase a circular area, splitting freehand strokes.
    EraserPaint,
}

impl ToolKind {
    /// Whether pointer-down with this tool opens a drag-to-draw preview.
    pub fn draws_shapes(self) -> bool {
        matches!(
            self,
            ToolKind::Freehand | ToolKind::Rectangle | ToolKind::Circle | ToolKind::Line
        )
    }
}

/// Whether committed shapes persist or expire shortly after landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlayMode {
    /// Shapes stay until deleted.
    #[default]
    Persistent,
    /// Shapes are removed automatically shortly after commit.
    Ephemeral,
}

/// Tool and style settings captured at pointer-down.
///
/// The controller snapshots this at the start of each interaction, so host
/// UI changes mid-drag do not affect the shape being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// The active tool.
    pub tool: ToolKind,
    /// Stroke color for new shapes.
    pub stroke_color: SerializableColor,
    /// Stroke width for new shapes. Also sizes the paint eraser.
    pub stroke_width: f64,
    /// Whether committed shapes persist or expire.
    pub overlay_mode: OverlayMode,
}

impl InteractionConfig {
    pub fn new(tool: ToolKind) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }

    /// Style for shapes created under this configuration.
    pub fn style(&self) -> ShapeStyle {
        ShapeStyle::new(self.stroke_color, self.stroke_width)
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            tool: ToolKind::Freehand,
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            overlay_mode: OverlayMode::Persistent,
        }
    }
}
