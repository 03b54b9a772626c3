//! Fit-to-container scale and logical/display conversions.
//!
//! The canvas has a constant logical size. The host shows it inside a
//! container of arbitrary size, so every on-screen quantity is the logical
//! quantity multiplied by one uniform `scale`. The scale never exceeds 1:1.
//! Conversions apply to positions, sizes, stroke widths, font sizes, and every
//! point of a point list alike.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, MIN_SCALE, SAFE_ZONE_BOTTOM, SAFE_ZONE_TOP};
use crate::doc::{Element, ElementKind};
use crate::geom::{Point, Rect};

/// Current display scale for the fixed logical canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Viewport {
    /// `min(container_w / 1080, container_h / 1920, 1)`, floored at
    /// [`MIN_SCALE`] for empty or invalid containers.
    #[must_use]
    pub fn compute_scale(container_width: f64, container_height: f64) -> f64 {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(container_width) || !valid(container_height) {
            return MIN_SCALE;
        }
        let scale = (container_width / CANVAS_WIDTH).min(container_height / CANVAS_HEIGHT).min(1.0);
        scale.max(MIN_SCALE)
    }

    /// Viewport fitted to a container of the given display size.
    #[must_use]
    pub fn fit(container_width: f64, container_height: f64) -> Self {
        Self { scale: Self::compute_scale(container_width, container_height) }
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Convert a display-space length to logical units.
    #[must_use]
    pub fn to_logical(&self, display: f64) -> f64 {
        display / self.scale
    }

    /// Convert a logical length to display units.
    #[must_use]
    pub fn to_display(&self, logical: f64) -> f64 {
        logical * self.scale
    }

    /// Convert a display-space point (relative to the stage) to logical coordinates.
    #[must_use]
    pub fn point_to_logical(&self, display: Point) -> Point {
        Point::new(self.to_logical(display.x), self.to_logical(display.y))
    }

    /// Convert a logical point to display coordinates.
    #[must_use]
    pub fn point_to_display(&self, logical: Point) -> Point {
        Point::new(self.to_display(logical.x), self.to_display(logical.y))
    }

    #[must_use]
    pub fn rect_to_display(&self, logical: Rect) -> Rect {
        Rect::new(
            self.to_display(logical.x),
            self.to_display(logical.y),
            self.to_display(logical.width),
            self.to_display(logical.height),
        )
    }

    /// Display-space copy of an element for the host renderer. Flip flags and
    /// rotation are scale-free and pass through unchanged.
    #[must_use]
    pub fn element_to_display(&self, element: &Element) -> Element {
        self.map_element(element, |v| self.to_display(v))
    }

    /// Inverse of [`Viewport::element_to_display`].
    #[must_use]
    pub fn element_to_logical(&self, element: &Element) -> Element {
        self.map_element(element, |v| self.to_logical(v))
    }

    fn map_element(&self, element: &Element, f: impl Fn(f64) -> f64) -> Element {
        let mut out = element.clone();
        out.x = f(element.x);
        out.y = f(element.y);
        match &mut out.kind {
            ElementKind::Image { width, height, .. } => {
                *width = f(*width);
                *height = f(*height);
            }
            ElementKind::Text { font_size, .. } => *font_size = f(*font_size),
            ElementKind::Rectangle { width, height, stroke_width, .. } => {
                *width = f(*width);
                *height = f(*height);
                *stroke_width = f(*stroke_width);
            }
            ElementKind::Circle { radius, stroke_width, .. } => {
                *radius = f(*radius);
                *stroke_width = f(*stroke_width);
            }
            ElementKind::Arrow { points, stroke_width, pointer_length, pointer_width, .. } => {
                points.iter_mut().for_each(|p| *p = f(*p));
                *stroke_width = f(*stroke_width);
                *pointer_length = f(*pointer_length);
                *pointer_width = f(*pointer_width);
            }
            ElementKind::Line { points, stroke_width, .. } | ElementKind::Drawing { points, stroke_width, .. } => {
                points.iter_mut().for_each(|p| *p = f(*p));
                *stroke_width = f(*stroke_width);
            }
        }
        out
    }

    /// Display size of the whole canvas.
    #[must_use]
    pub fn stage_size(&self) -> (f64, f64) {
        (self.to_display(CANVAS_WIDTH), self.to_display(CANVAS_HEIGHT))
    }

    /// Top and bottom safe-zone bands in display space.
    #[must_use]
    pub fn safe_zone_guides(&self) -> (Rect, Rect) {
        let top = Rect::new(0.0, 0.0, CANVAS_WIDTH, SAFE_ZONE_TOP);
        let bottom = Rect::new(0.0, CANVAS_HEIGHT - SAFE_ZONE_BOTTOM, CANVAS_WIDTH, SAFE_ZONE_BOTTOM);
        (self.rect_to_display(top), self.rect_to_display(bottom))
    }
}
