//! Hit-testing logical pointer positions against the scene.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{ElementId, Scene};
use crate::geom::Point;

/// The top-most element under `logical_pt`, if any.
///
/// Elements are checked front to back, so the last one drawn wins.
#[must_use]
pub fn hit_test(logical_pt: Point, scene: &Scene) -> Option<ElementId> {
    scene.elements().iter().rev().find(|el| el.contains(logical_pt)).map(|el| el.id)
}

