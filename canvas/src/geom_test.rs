#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Point
// =============================================================

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), Point::new(0.0, 0.0));
}

// =============================================================
// Rect construction
// =============================================================

#[test]
fn from_corners_normalizes_any_drag_direction() {
    let a = Rect::from_corners(Point::new(100.0, 50.0), Point::new(20.0, 90.0));
    assert_eq!(a, Rect::new(20.0, 50.0, 80.0, 40.0));
}

#[test]
fn bounding_points_covers_all_pairs() {
    let r = Rect::bounding_points(&[10.0, 40.0, -5.0, 12.0, 30.0, 20.0]).unwrap();
    assert_eq!(r, Rect::new(-5.0, 12.0, 35.0, 28.0));
}

#[test]
fn bounding_points_ignores_trailing_odd_value() {
    let r = Rect::bounding_points(&[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(r, Rect::new(1.0, 2.0, 0.0, 0.0));
}

#[test]
fn bounding_points_empty_is_none() {
    assert!(Rect::bounding_points(&[]).is_none());
    assert!(Rect::bounding_points(&[7.0]).is_none());
}

// =============================================================
// Rect queries
// =============================================================

#[test]
fn expand_grows_every_side() {
    let r = Rect::new(100.0, 200.0, 50.0, 60.0).expand(10.0);
    assert_eq!(r, Rect::new(90.0, 190.0, 70.0, 80.0));
}

#[test]
fn intersects_overlapping_boxes() {
    let a = Rect::new(0.0, 0.0, 100.0, 100.0);
    let b = Rect::new(50.0, 50.0, 100.0, 100.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn intersects_needs_overlap_on_both_axes() {
    let a = Rect::new(0.0, 0.0, 100.0, 100.0);
    let beside = Rect::new(200.0, 50.0, 100.0, 100.0);
    let below = Rect::new(50.0, 200.0, 100.0, 100.0);
    assert!(!a.intersects(&beside));
    assert!(!a.intersects(&below));
}

#[test]
fn touching_edges_do_not_intersect() {
    let a = Rect::new(0.0, 0.0, 100.0, 100.0);
    let b = Rect::new(100.0, 0.0, 100.0, 100.0);
    assert!(!a.intersects(&b));
}

#[test]
fn contained_box_intersects() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    let inner = Rect::new(10.0, 10.0, 5.0, 5.0);
    assert!(outer.intersects(&inner));
}

#[test]
fn contains_is_inclusive() {
    let r = Rect::new(10.0, 10.0, 20.0, 20.0);
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(r.contains(Point::new(30.0, 30.0)));
    assert!(!r.contains(Point::new(30.1, 15.0)));
}

#[test]
fn rounded_rounds_each_component() {
    let r = Rect::new(1.4, 1.6, 10.5, 9.49).rounded();
    assert_eq!(r, Rect::new(1.0, 2.0, 11.0, 9.0));
}
