//! Scene model: elements, their per-type fields, and the ordered scene.
//!
//! This module defines what is on the canvas (`Element`, `ElementKind`), a
//! sparse-update type for incremental edits (`PartialElement`), the ordered
//! store that owns every live element (`Scene`), and the snapshot handed to
//! external consumers (`SceneSnapshot`).
//!
//! All geometry is stored in logical canvas units. The position of an element
//! in the scene vector is its z-order: index 0 is drawn first (back-most).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_BACKGROUND_COLOR, DEFAULT_POINTER_SIZE, DEFAULT_SHAPE_FILL,
    DEFAULT_STROKE, DEFAULT_STROKE_WIDTH, EXPORT_PIXEL_RATIO,
};
use crate::geom::{Point, Rect};

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Approximate glyph advance as a fraction of the font size, used for text bounds.
const TEXT_ADVANCE_FACTOR: f64 = 0.6;

/// Line height as a multiple of the font size, used for text bounds.
const TEXT_LINE_HEIGHT: f64 = 1.2;

/// Extra reach around thin point-list elements when hit-testing.
const STROKE_HIT_SLOP: f64 = 5.0;

/// Discriminant of an element, as it appears in the snapshot `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Image,
    Text,
    Rectangle,
    Circle,
    Line,
    Arrow,
    Drawing,
}

impl ElementType {
    /// Lowercase name used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Arrow => "arrow",
            Self::Drawing => "drawing",
        }
    }
}

/// Type-specific element fields.
///
/// Point lists are flat `x, y` sequences relative to the element origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    /// Raster asset. `src` is a URL or a `data:` URL.
    Image { width: f64, height: f64, src: String },
    /// Single-line text anchored at its top-left corner.
    Text { text: String, font_size: f64, font_family: String, fill: String },
    /// Rectangle anchored at its top-left corner.
    Rectangle { width: f64, height: f64, fill: String, stroke: String, stroke_width: f64 },
    /// Circle anchored at its centre.
    Circle { radius: f64, fill: String, stroke: String, stroke_width: f64 },
    /// Straight segment.
    Line { points: Vec<f64>, stroke: String, stroke_width: f64 },
    /// Segment with an arrowhead at its last point.
    Arrow {
        points: Vec<f64>,
        stroke: String,
        stroke_width: f64,
        fill: String,
        pointer_length: f64,
        pointer_width: f64,
    },
    /// Freehand stroke.
    Drawing { points: Vec<f64>, stroke: String, stroke_width: f64 },
}

impl ElementKind {
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Image { .. } => ElementType::Image,
            Self::Text { .. } => ElementType::Text,
            Self::Rectangle { .. } => ElementType::Rectangle,
            Self::Circle { .. } => ElementType::Circle,
            Self::Line { .. } => ElementType::Line,
            Self::Arrow { .. } => ElementType::Arrow,
            Self::Drawing { .. } => ElementType::Drawing,
        }
    }

    /// Rectangle with the default stroke and a transparent fill.
    #[must_use]
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::Rectangle {
            width,
            height,
            fill: DEFAULT_SHAPE_FILL.to_owned(),
            stroke: DEFAULT_STROKE.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    /// Circle with the default stroke and a transparent fill.
    #[must_use]
    pub fn circle(radius: f64) -> Self {
        Self::Circle {
            radius,
            fill: DEFAULT_SHAPE_FILL.to_owned(),
            stroke: DEFAULT_STROKE.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    #[must_use]
    pub fn line(points: Vec<f64>) -> Self {
        Self::Line { points, stroke: DEFAULT_STROKE.to_owned(), stroke_width: DEFAULT_STROKE_WIDTH }
    }

    /// Arrow whose head is filled with the stroke colour.
    #[must_use]
    pub fn arrow(points: Vec<f64>) -> Self {
        Self::Arrow {
            points,
            stroke: DEFAULT_STROKE.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            fill: DEFAULT_STROKE.to_owned(),
            pointer_length: DEFAULT_POINTER_SIZE,
            pointer_width: DEFAULT_POINTER_SIZE,
        }
    }

    #[must_use]
    pub fn drawing(points: Vec<f64>) -> Self {
        Self::Drawing { points, stroke: DEFAULT_STROKE.to_owned(), stroke_width: DEFAULT_STROKE_WIDTH }
    }

    /// The point list of line, arrow, and drawing elements.
    #[must_use]
    pub fn points(&self) -> Option<&[f64]> {
        match self {
            Self::Line { points, .. } | Self::Arrow { points, .. } | Self::Drawing { points, .. } => Some(points),
            _ => None,
        }
    }

    /// Fill colour, for the types that have one.
    #[must_use]
    pub fn fill(&self) -> Option<&str> {
        match self {
            Self::Text { fill, .. } | Self::Rectangle { fill, .. } | Self::Circle { fill, .. } | Self::Arrow { fill, .. } => {
                Some(fill)
            }
            _ => None,
        }
    }

    /// Stroke colour, for the types that have one.
    #[must_use]
    pub fn stroke(&self) -> Option<&str> {
        match self {
            Self::Rectangle { stroke, .. }
            | Self::Circle { stroke, .. }
            | Self::Line { stroke, .. }
            | Self::Arrow { stroke, .. }
            | Self::Drawing { stroke, .. } => Some(stroke),
            _ => None,
        }
    }
}

/// An element as stored in the scene and in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier for this element.
    pub id: ElementId,
    /// Origin x: top-left for boxes and point lists, centre for circles.
    pub x: f64,
    /// Origin y.
    pub y: f64,
    /// Clockwise rotation in degrees around the origin. Never wrapped.
    pub rotation: f64,
    /// Horizontal flip flag, `1.0` or `-1.0`.
    pub scale_x: f64,
    /// Vertical flip flag, `1.0` or `-1.0`.
    pub scale_y: f64,
    /// Type discriminant and type-specific fields.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// A fresh, unrotated, unflipped element at `(x, y)`.
    #[must_use]
    pub fn new(kind: ElementKind, x: f64, y: f64) -> Self {
        Self { id: Uuid::new_v4(), x, y, rotation: 0.0, scale_x: 1.0, scale_y: 1.0, kind }
    }

    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Unrotated logical bounding box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ElementKind::Image { width, height, .. } | ElementKind::Rectangle { width, height, .. } => {
                Rect::new(self.x, self.y, *width, *height)
            }
            ElementKind::Text { text, font_size, .. } => {
                #[allow(clippy::cast_precision_loss)]
                let chars = text.chars().count().max(1) as f64;
                Rect::new(self.x, self.y, chars * font_size * TEXT_ADVANCE_FACTOR, font_size * TEXT_LINE_HEIGHT)
            }
            ElementKind::Circle { radius, .. } => {
                Rect::new(self.x - radius, self.y - radius, radius * 2.0, radius * 2.0)
            }
            ElementKind::Line { points, .. } | ElementKind::Arrow { points, .. } | ElementKind::Drawing { points, .. } => {
                let local = Rect::bounding_points(points).unwrap_or_default();
                Rect::new(self.x + local.x, self.y + local.y, local.width, local.height)
            }
        }
    }

    /// Whether a logical point lies on the element, honouring rotation and flips.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let (sin, cos) = (-self.rotation).to_radians().sin_cos();
        let dx = pt.x - self.x;
        let dy = pt.y - self.y;
        let local_x = (dx * cos - dy * sin) * self.scale_x.signum();
        let local_y = (dx * sin + dy * cos) * self.scale_y.signum();
        let local = Point::new(self.x + local_x, self.y + local_y);

        let bounds = self.bounds();
        match self.kind {
            ElementKind::Circle { radius, .. } => (local.x - self.x).hypot(local.y - self.y) <= radius,
            ElementKind::Line { .. } | ElementKind::Arrow { .. } | ElementKind::Drawing { .. } => {
                bounds.expand(STROKE_HIT_SLOP).contains(local)
            }
            _ => bounds.contains(local),
        }
    }
}

/// Sparse update for an element. Only present fields are applied, and only
/// when they belong to the element's type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Flip flag; any non-zero value is reduced to its sign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    /// Flip flag; any non-zero value is reduced to its sign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
}

impl PartialElement {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `element`. Non-finite numbers, non-positive sizes, zero
    /// flip flags, and malformed point lists keep the previous value.
    pub fn apply_to(&self, element: &mut Element) {
        merge_finite(&mut element.x, self.x);
        merge_finite(&mut element.y, self.y);
        merge_finite(&mut element.rotation, self.rotation);
        merge_flip(&mut element.scale_x, self.scale_x);
        merge_flip(&mut element.scale_y, self.scale_y);

        match &mut element.kind {
            ElementKind::Image { width, height, src } => {
                merge_size(width, self.width);
                merge_size(height, self.height);
                merge_string(src, self.src.as_ref());
            }
            ElementKind::Text { text, font_size, font_family, fill } => {
                merge_string(text, self.text.as_ref());
                merge_size(font_size, self.font_size);
                merge_string(font_family, self.font_family.as_ref());
                merge_string(fill, self.fill.as_ref());
            }
            ElementKind::Rectangle { width, height, fill, stroke, stroke_width } => {
                merge_size(width, self.width);
                merge_size(height, self.height);
                merge_string(fill, self.fill.as_ref());
                merge_string(stroke, self.stroke.as_ref());
                merge_size(stroke_width, self.stroke_width);
            }
            ElementKind::Circle { radius, fill, stroke, stroke_width } => {
                merge_size(radius, self.radius);
                merge_string(fill, self.fill.as_ref());
                merge_string(stroke, self.stroke.as_ref());
                merge_size(stroke_width, self.stroke_width);
            }
            ElementKind::Line { points, stroke, stroke_width } | ElementKind::Drawing { points, stroke, stroke_width } => {
                merge_points(points, self.points.as_ref());
                merge_string(stroke, self.stroke.as_ref());
                merge_size(stroke_width, self.stroke_width);
            }
            ElementKind::Arrow { points, stroke, stroke_width, fill, .. } => {
                merge_points(points, self.points.as_ref());
                merge_string(stroke, self.stroke.as_ref());
                merge_size(stroke_width, self.stroke_width);
                merge_string(fill, self.fill.as_ref());
            }
        }
    }
}

fn merge_finite(target: &mut f64, incoming: Option<f64>) {
    if let Some(v) = incoming.filter(|v| v.is_finite()) {
        *target = v;
    }
}

fn merge_size(target: &mut f64, incoming: Option<f64>) {
    if let Some(v) = incoming.filter(|v| v.is_finite() && *v > 0.0) {
        *target = v;
    }
}

fn merge_flip(target: &mut f64, incoming: Option<f64>) {
    if let Some(v) = incoming.filter(|v| v.is_finite() && *v != 0.0) {
        *target = v.signum();
    }
}

fn merge_string(target: &mut String, incoming: Option<&String>) {
    if let Some(v) = incoming {
        target.clone_from(v);
    }
}

fn merge_points(target: &mut Vec<f64>, incoming: Option<&Vec<f64>>) {
    if let Some(v) = incoming.filter(|v| v.len() >= 2 && v.len() % 2 == 0 && v.iter().all(|p| p.is_finite())) {
        target.clone_from(v);
    }
}

/// Full scene state handed to external consumers after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Reference to the generated background, if one is loaded.
    pub background_reference: Option<String>,
    /// Canvas fill behind the background and elements.
    pub background_color: String,
    /// Elements in z-order, back-most first.
    pub elements: Vec<Element>,
}

impl SceneSnapshot {
    /// Pixel size of the flattened export raster.
    #[must_use]
    pub fn export_size() -> (f64, f64) {
        (CANVAS_WIDTH * EXPORT_PIXEL_RATIO, CANVAS_HEIGHT * EXPORT_PIXEL_RATIO)
    }
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Scene::new().snapshot()
    }
}

/// Ordered store of elements. Vector order is z-order.
#[derive(Debug, Clone)]
pub struct Scene {
    elements: Vec<Element>,
    background_reference: Option<String>,
    background_color: String,
}

impl Scene {
    /// Create an empty scene with no background.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new(), background_reference: None, background_color: DEFAULT_BACKGROUND_COLOR.to_owned() }
    }

    /// Append an element; it becomes the front-most.
    pub fn add(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Shallow-merge a partial update. Returns false if the element doesn't exist.
    pub fn update(&mut self, id: &ElementId, partial: &PartialElement) -> bool {
        let Some(element) = self.elements.iter_mut().find(|e| e.id == *id) else {
            return false;
        };
        partial.apply_to(element);
        true
    }

    /// Move an element to the tail (front-most). Returns false if absent.
    pub fn bring_to_front(&mut self, id: &ElementId) -> bool {
        let Some(element) = self.remove(id) else {
            return false;
        };
        self.elements.push(element);
        true
    }

    /// Move an element to the head (back-most). Returns false if absent.
    pub fn send_to_back(&mut self, id: &ElementId) -> bool {
        let Some(element) = self.remove(id) else {
            return false;
        };
        self.elements.insert(0, element);
        true
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn find(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Z-order position of an element.
    #[must_use]
    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == *id)
    }

    /// Elements in z-order, back-most first.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Unrotated bounds of every element, in z-order.
    #[must_use]
    pub fn bounds(&self) -> Vec<Rect> {
        self.elements.iter().map(Element::bounds).collect()
    }

    /// Drop every element and switch to a new background.
    pub fn reset(&mut self, background_reference: Option<String>) {
        self.elements.clear();
        self.background_reference = background_reference;
    }

    #[must_use]
    pub fn background_reference(&self) -> Option<&str> {
        self.background_reference.as_deref()
    }

    #[must_use]
    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn set_background_color(&mut self, color: String) {
        self.background_color = color;
    }

    /// Copy of the full scene for external consumers.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            background_reference: self.background_reference.clone(),
            background_color: self.background_color.clone(),
            elements: self.elements.clone(),
        }
    }

    /// Number of elements currently in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the scene contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
