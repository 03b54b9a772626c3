//! Selection-side edits: baking handle transforms, direct actions, and
//! property-panel input.
//!
//! Everything here is a pure function from the current element (plus input)
//! to a [`PartialElement`]. The engine applies the partial to the scene and
//! reports it to the host, so every edit path shares the same merge rules.
//!
//! DESIGN
//! ======
//! Transform handles scale the node multiplicatively. Leaving that scale on
//! the stored element would compound across edits, so `bake_transform` folds
//! the magnitude into the size fields and hands back a unit scale carrying
//! only the ±1 flip flags. Rotation from the handles is absolute.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::{Deserialize, Serialize};

use crate::color::normalize_hex_input;
use crate::consts::{
    DEFAULT_CIRCLE_RADIUS, DEFAULT_FONT_SIZE, DEFAULT_IMAGE_SIZE, DEFAULT_RECT_SIZE, DEFAULT_STROKE_WIDTH,
    MIN_CIRCLE_RADIUS, MIN_FONT_SIZE, MIN_IMAGE_SIZE, MIN_RECT_SIZE, ROTATE_STEP_DEG,
};
use crate::doc::{Element, ElementKind, ElementType, PartialElement};
use crate::geom::Rect;
use crate::viewport::Viewport;

// =============================================================
// Transform baking
// =============================================================

/// Node state reported by the transform handles when the user lets go.
///
/// `x`/`y` are the node's display-space origin. `scale_x`/`scale_y` are the
/// handle multipliers relative to the stored geometry; a negative value means
/// the handle was dragged through the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformPayload {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
}

/// Fold a finished handle transform into the element's own geometry.
///
/// The result always carries unit flip flags (`±1`), an absolute rotation,
/// logical position, and size fields scaled and clamped to the per-type
/// minimums.
#[must_use]
pub fn bake_transform(element: &Element, payload: &TransformPayload, viewport: &Viewport) -> PartialElement {
    let sx = handle_factor(payload.scale_x);
    let sy = handle_factor(payload.scale_y);

    let mut partial = PartialElement {
        x: Some(viewport.to_logical(payload.x)),
        y: Some(viewport.to_logical(payload.y)),
        rotation: Some(payload.rotation),
        scale_x: Some(flip_after(element.scale_x, payload.scale_x)),
        scale_y: Some(flip_after(element.scale_y, payload.scale_y)),
        ..Default::default()
    };

    match &element.kind {
        ElementKind::Image { width, height, .. } | ElementKind::Rectangle { width, height, .. } => {
            let min = min_extent(element.element_type()).unwrap_or(0.0);
            partial.width = Some((width * sx).max(min));
            partial.height = Some((height * sy).max(min));
        }
        ElementKind::Circle { radius, .. } => {
            partial.radius = Some((radius * sx.max(sy)).max(MIN_CIRCLE_RADIUS));
        }
        ElementKind::Text { font_size, .. } => {
            partial.font_size = Some((font_size * sx).max(MIN_FONT_SIZE));
        }
        ElementKind::Line { points, .. } | ElementKind::Arrow { points, .. } => {
            partial.points = Some(scale_points(points, sx, sy));
        }
        ElementKind::Drawing { points, .. } => {
            let scaled = scale_points(points, sx, sy);
            partial.points = Some(clamp_points_extent(&scaled, MIN_IMAGE_SIZE));
        }
    }
    partial
}

/// Magnitude of a handle multiplier. Zero and non-finite values leave the
/// geometry untouched.
fn handle_factor(scale: f64) -> f64 {
    if scale.is_finite() && scale != 0.0 { scale.abs() } else { 1.0 }
}

fn flip_after(current: f64, handle_scale: f64) -> f64 {
    let sign = if current < 0.0 { -1.0 } else { 1.0 };
    if handle_scale < 0.0 { -sign } else { sign }
}

fn scale_points(points: &[f64], sx: f64, sy: f64) -> Vec<f64> {
    points.iter().enumerate().map(|(i, p)| if i % 2 == 0 { p * sx } else { p * sy }).collect()
}

/// Stretch a point list about its local origin so each non-degenerate axis
/// spans at least `min`.
fn clamp_points_extent(points: &[f64], min: f64) -> Vec<f64> {
    let Some(bounds) = Rect::bounding_points(points) else {
        return points.to_vec();
    };
    let stretch = |extent: f64| if extent > 0.0 && extent < min { min / extent } else { 1.0 };
    scale_points(points, stretch(bounds.width), stretch(bounds.height))
}

/// Smallest allowed width/height for box-like and freehand types.
#[must_use]
pub fn min_extent(element_type: ElementType) -> Option<f64> {
    match element_type {
        ElementType::Image | ElementType::Drawing => Some(MIN_IMAGE_SIZE),
        ElementType::Rectangle => Some(MIN_RECT_SIZE),
        ElementType::Text | ElementType::Circle | ElementType::Line | ElementType::Arrow => None,
    }
}

// =============================================================
// Direct actions
// =============================================================

/// Rotate a further 90° clockwise. Rotation accumulates without wrapping.
#[must_use]
pub fn rotate_step(element: &Element) -> PartialElement {
    PartialElement { rotation: Some(element.rotation + ROTATE_STEP_DEG), ..Default::default() }
}

#[must_use]
pub fn flip_horizontal(element: &Element) -> PartialElement {
    PartialElement { scale_x: Some(-element.scale_x), ..Default::default() }
}

#[must_use]
pub fn flip_vertical(element: &Element) -> PartialElement {
    PartialElement { scale_y: Some(-element.scale_y), ..Default::default() }
}

/// Apply a colour to the paint fields of the element.
///
/// Text, rectangle, and circle take it as `fill`; line and drawing as
/// `stroke`; an arrow gets both so its head matches its shaft. Images have no
/// paint and yield an empty partial.
#[must_use]
pub fn recolor(element: &Element, color: &str) -> PartialElement {
    let color = Some(color.to_owned());
    match element.element_type() {
        ElementType::Text | ElementType::Rectangle | ElementType::Circle => {
            PartialElement { fill: color, ..Default::default() }
        }
        ElementType::Line | ElementType::Drawing => PartialElement { stroke: color, ..Default::default() },
        ElementType::Arrow => PartialElement { fill: color.clone(), stroke: color, ..Default::default() },
        ElementType::Image => PartialElement::default(),
    }
}

// =============================================================
// Property panel
// =============================================================

/// A field the property panel can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyField {
    X,
    Y,
    Rotation,
    Width,
    Height,
    Radius,
    FontSize,
    StrokeWidth,
    Fill,
    Stroke,
}

impl PropertyField {
    /// Parse the snapshot field name (`"fontSize"`, `"strokeWidth"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "rotation" => Some(Self::Rotation),
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "radius" => Some(Self::Radius),
            "fontSize" => Some(Self::FontSize),
            "strokeWidth" => Some(Self::StrokeWidth),
            "fill" => Some(Self::Fill),
            "stroke" => Some(Self::Stroke),
            _ => None,
        }
    }
}

/// Current numeric value of `field`, or `None` if the element has no such field.
#[must_use]
pub fn read_property(element: &Element, field: PropertyField) -> Option<f64> {
    match (field, &element.kind) {
        (PropertyField::X, _) => Some(element.x),
        (PropertyField::Y, _) => Some(element.y),
        (PropertyField::Rotation, _) => Some(element.rotation),
        (PropertyField::Width, ElementKind::Image { width, .. } | ElementKind::Rectangle { width, .. }) => Some(*width),
        (PropertyField::Height, ElementKind::Image { height, .. } | ElementKind::Rectangle { height, .. }) => {
            Some(*height)
        }
        (PropertyField::Radius, ElementKind::Circle { radius, .. }) => Some(*radius),
        (PropertyField::FontSize, ElementKind::Text { font_size, .. }) => Some(*font_size),
        (
            PropertyField::StrokeWidth,
            ElementKind::Rectangle { stroke_width, .. }
            | ElementKind::Circle { stroke_width, .. }
            | ElementKind::Line { stroke_width, .. }
            | ElementKind::Arrow { stroke_width, .. }
            | ElementKind::Drawing { stroke_width, .. },
        ) => Some(*stroke_width),
        _ => None,
    }
}

/// Value used for a numeric field when the stored one is unusable.
fn property_default(element_type: ElementType, field: PropertyField) -> f64 {
    match field {
        PropertyField::Width | PropertyField::Height if element_type == ElementType::Image => DEFAULT_IMAGE_SIZE,
        PropertyField::Width | PropertyField::Height => DEFAULT_RECT_SIZE,
        PropertyField::Radius => DEFAULT_CIRCLE_RADIUS,
        PropertyField::FontSize => DEFAULT_FONT_SIZE,
        PropertyField::StrokeWidth => DEFAULT_STROKE_WIDTH,
        _ => 0.0,
    }
}

/// Turn raw panel text into an update for `field`.
///
/// Unparsable numbers fall back to the current value (or the field default if
/// the current one is not finite). Sizes snap up to the per-type minimum.
/// Colours take six hex digits with or without `#`; anything else leaves the
/// colour alone. Returns `None` when the element has no such field.
#[must_use]
pub fn edit_property(element: &Element, field: PropertyField, raw: &str) -> Option<PartialElement> {
    if matches!(field, PropertyField::Fill | PropertyField::Stroke) {
        return edit_paint(element, field, raw);
    }

    let current = read_property(element, field)?;
    let fallback = if current.is_finite() { current } else { property_default(element.element_type(), field) };
    let value = match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => fallback,
    };

    let mut partial = PartialElement::default();
    match field {
        PropertyField::X => partial.x = Some(value),
        PropertyField::Y => partial.y = Some(value),
        PropertyField::Rotation => partial.rotation = Some(value),
        PropertyField::Width => partial.width = Some(clamp_to_min(element, value)),
        PropertyField::Height => partial.height = Some(clamp_to_min(element, value)),
        PropertyField::Radius => partial.radius = Some(value.max(MIN_CIRCLE_RADIUS)),
        PropertyField::FontSize => partial.font_size = Some(value.max(MIN_FONT_SIZE)),
        PropertyField::StrokeWidth => partial.stroke_width = Some(value),
        PropertyField::Fill | PropertyField::Stroke => {}
    }
    Some(partial)
}

fn clamp_to_min(element: &Element, value: f64) -> f64 {
    value.max(min_extent(element.element_type()).unwrap_or(0.0))
}

fn edit_paint(element: &Element, field: PropertyField, raw: &str) -> Option<PartialElement> {
    let present = match field {
        PropertyField::Fill => element.kind.fill().is_some(),
        _ => element.kind.stroke().is_some(),
    };
    if !present {
        return None;
    }
    let color = normalize_hex_input(raw);
    Some(match field {
        PropertyField::Fill => PartialElement { fill: color, ..Default::default() },
        _ => PartialElement { stroke: color, ..Default::default() },
    })
}
