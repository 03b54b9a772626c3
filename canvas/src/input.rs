//! Input model: tools, mouse buttons, keys, and the gesture state machine.
//!
//! This module defines the types consumed by the engine. `Tool` captures what
//! a pointer-down means at the time it happens. `GestureState` is the
//! transient gesture tracked between pointer-down and commit or abort; it is
//! never serialized and never survives a tool switch. `Interaction` is the
//! single message the host sends for everything the selection handles do.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementId;
use crate::geom::Point;
use crate::selection::TransformPayload;

/// Which tool is currently armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Freehand pen stroke.
    Draw,
    /// Drag out a rectangle.
    Rectangle,
    /// Drag out a circle.
    Circle,
    /// Drag out a straight line.
    Line,
    /// Drag out an arrow.
    Arrow,
    /// Click to insert a text element.
    Text,
}

impl Tool {
    /// The shape a drag with this tool produces, if it is a shape tool.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Line => Some(ShapeKind::Line),
            Self::Arrow => Some(ShapeKind::Arrow),
            Self::Select | Self::Draw | Self::Text => None,
        }
    }

    /// Whether this tool drags out a shape (rectangle, circle, line, arrow).
    #[must_use]
    pub fn is_shape(self) -> bool {
        self.shape_kind().is_some()
    }

    /// Whether this tool creates elements instead of selecting them.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        !matches!(self, Self::Select)
    }
}

/// Shapes created by a start/end drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Arrow,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the host (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently armed tool.
    pub tool: Tool,
    /// The id of the currently selected element, if any.
    pub selected_id: Option<ElementId>,
}

/// Transient gesture state. All points are logical.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Accumulating a freehand stroke as absolute logical points.
    PlacingFreehand {
        points: Vec<Point>,
    },
    /// Dragging out a new shape from `start` to `current`.
    PlacingShape {
        kind: ShapeKind,
        start: Point,
        current: Point,
    },
    /// Moving an existing element with the select tool.
    DraggingElement {
        /// Id of the element being dragged.
        id: ElementId,
        /// Pointer position at the previous event.
        last: Point,
    },
}

impl GestureState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// One message from the host's selection overlay or element nodes.
///
/// Every per-element callback (click, drag end, transform end) arrives as
/// this single shape and goes through `EngineCore::dispatch`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub id: ElementId,
    pub kind: InteractionKind,
}

/// What happened to the element, with display-space payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionKind {
    /// The element was clicked or tapped.
    Select,
    /// The element was dragged; `position` is the new display-space origin.
    Drag { position: Point },
    /// The transform handles were released.
    Transform(TransformPayload),
}
