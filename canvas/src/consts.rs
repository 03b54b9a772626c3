//! Shared numeric constants for the canvas crate.

// ── Canvas ──────────────────────────────────────────────────────

/// Logical canvas width. Every stored coordinate is in this space.
pub const CANVAS_WIDTH: f64 = 1080.0;

/// Logical canvas height.
pub const CANVAS_HEIGHT: f64 = 1920.0;

/// Height of the top safe zone, in logical units.
pub const SAFE_ZONE_TOP: f64 = 200.0;

/// Height of the bottom safe zone, in logical units.
pub const SAFE_ZONE_BOTTOM: f64 = 250.0;

/// Smallest display scale the viewport will report.
pub const MIN_SCALE: f64 = 0.01;

/// Device-pixel multiplier used when the canvas is flattened for export.
pub const EXPORT_PIXEL_RATIO: f64 = 2.0;

/// Canvas background colour for a fresh scene.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

// ── Gestures ────────────────────────────────────────────────────

/// A shape drag must exceed this extent on at least one axis to commit.
pub const MIN_SHAPE_DRAG: f64 = 5.0;

/// Minimum number of recorded points for a freehand stroke to commit.
pub const MIN_FREEHAND_POINTS: usize = 2;

/// Rotation applied by one rotate action, in degrees.
pub const ROTATE_STEP_DEG: f64 = 90.0;

// ── Commit clamps ───────────────────────────────────────────────

/// Minimum image and drawing extent per dimension.
pub const MIN_IMAGE_SIZE: f64 = 50.0;

/// Minimum rectangle extent per dimension.
pub const MIN_RECT_SIZE: f64 = 20.0;

/// Minimum circle radius.
pub const MIN_CIRCLE_RADIUS: f64 = 10.0;

/// Minimum text font size.
pub const MIN_FONT_SIZE: f64 = 12.0;

// ── Placement ───────────────────────────────────────────────────

/// Clearance added on every side of a box before overlap testing.
pub const PLACEMENT_MARGIN: f64 = 50.0;

/// Randomized placement attempts before falling back to corners.
pub const RANDOM_ATTEMPTS: usize = 50;

/// Smallest side of a randomly sampled placement.
pub const RANDOM_MIN_SIZE: f64 = 250.0;

/// Largest side of a randomly sampled placement.
pub const RANDOM_MAX_SIZE: f64 = 500.0;

/// Side of the square corner fallback boxes.
pub const CORNER_SIZE: f64 = 350.0;

/// Side of the square deterministic fallback box.
pub const FALLBACK_SIZE: f64 = 400.0;

// ── Element defaults ────────────────────────────────────────────

/// Stroke colour for newly drawn shapes and strokes.
pub const DEFAULT_STROKE: &str = "#64748b";

/// Fill for newly drawn rectangles and circles.
pub const DEFAULT_SHAPE_FILL: &str = "transparent";

/// Stroke width for newly drawn shapes and strokes.
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

/// Arrowhead length and width.
pub const DEFAULT_POINTER_SIZE: f64 = 10.0;

/// Font size for inserted text.
pub const DEFAULT_FONT_SIZE: f64 = 48.0;

/// Font family for inserted text.
pub const DEFAULT_FONT_FAMILY: &str = "Inter, sans-serif";

/// Fill colour for text inserted with the text tool.
pub const DEFAULT_TEXT_FILL: &str = "#000000";

/// Content of text inserted with the text tool.
pub const DEFAULT_TEXT: &str = "Text";

/// Fallback width and height for image property edits with no usable value.
pub const DEFAULT_IMAGE_SIZE: f64 = 400.0;

/// Fallback width and height for rectangle property edits.
pub const DEFAULT_RECT_SIZE: f64 = 100.0;

/// Fallback circle radius for property edits.
pub const DEFAULT_CIRCLE_RADIUS: f64 = 50.0;
