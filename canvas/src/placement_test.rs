#![allow(clippy::float_cmp)]

use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};
use proptest::strategy::Strategy as _;

use super::*;

const WIDE: f64 = 16.0 / 9.0;

fn hint(x: f64, y: f64, width: f64, height: f64) -> PlacementHint {
    PlacementHint { x: Some(x), y: Some(y), width: Some(width), height: Some(height) }
}

// =============================================================
// Geometry helpers
// =============================================================

#[test]
fn wide_aspect_keeps_width() {
    let r = adjust_for_aspect(Rect::new(10.0, 20.0, 400.0, 400.0), 2.0);
    assert_eq!(r, Rect::new(10.0, 20.0, 400.0, 200.0));
}

#[test]
fn tall_and_square_aspect_keep_height() {
    assert_eq!(adjust_for_aspect(Rect::new(0.0, 0.0, 400.0, 400.0), 0.5), Rect::new(0.0, 0.0, 200.0, 400.0));
    assert_eq!(adjust_for_aspect(Rect::new(0.0, 0.0, 300.0, 400.0), 1.0), Rect::new(0.0, 0.0, 400.0, 400.0));
}

#[test]
fn invalid_aspect_is_treated_as_square() {
    let r = Rect::new(0.0, 0.0, 300.0, 200.0);
    assert_eq!(adjust_for_aspect(r, f64::NAN), Rect::new(0.0, 0.0, 200.0, 200.0));
    assert_eq!(adjust_for_aspect(r, 0.0), Rect::new(0.0, 0.0, 200.0, 200.0));
}

#[test]
fn margin_applies_to_both_boxes() {
    let existing = [Rect::new(0.0, 0.0, 100.0, 100.0)];
    // 99 units of clearance is inside the combined 100-unit margin.
    assert!(overlaps_any(&Rect::new(199.0, 0.0, 50.0, 50.0), &existing));
    // Exactly 100 units leaves the expanded edges touching, which is clear.
    assert!(!overlaps_any(&Rect::new(200.0, 0.0, 50.0, 50.0), &existing));
}

#[test]
fn no_existing_boxes_never_overlaps() {
    assert!(!overlaps_any(&Rect::new(0.0, 0.0, 1080.0, 1920.0), &[]));
}

// =============================================================
// Hint validation
// =============================================================

#[test]
fn hint_missing_size_is_rejected() {
    let partial = PlacementHint { x: Some(-10.0), y: Some(50.0), width: None, height: None };
    assert_eq!(validate_hint(&partial, &[], 1.0), Err(HintRejection::MissingField("width")));
}

#[test]
fn hint_non_finite_is_rejected() {
    assert_eq!(validate_hint(&hint(f64::NAN, 0.0, 100.0, 100.0), &[], 1.0), Err(HintRejection::NonFinite("x")));
}

#[test]
fn hint_non_positive_size_is_rejected() {
    assert!(matches!(
        validate_hint(&hint(0.0, 0.0, 0.0, 100.0), &[], 1.0),
        Err(HintRejection::NonPositiveSize { .. })
    ));
}

#[test]
fn hint_overlapping_content_is_rejected() {
    let existing = [Rect::new(500.0, 1500.0, 300.0, 300.0)];
    assert_eq!(validate_hint(&hint(520.0, 1480.0, 200.0, 200.0), &existing, 1.0), Err(HintRejection::Overlaps));
}

#[test]
fn accepted_hint_is_aspect_adjusted() {
    let bounds = validate_hint(&hint(500.0, 1500.0, 300.0, 300.0), &[], 2.0);
    assert_eq!(bounds, Ok(Rect::new(500.0, 1500.0, 300.0, 150.0)));
}

// =============================================================
// Engine cascade
// =============================================================

#[test]
fn first_image_takes_slot_zero() {
    let mut engine = PlacementEngine::with_seed(1);
    let placed = engine.place(&[], None, 1.0);
    assert_eq!(placed.strategy, Strategy::Preset(0));
    assert_eq!(placed.bounds, Rect::new(100.0, 300.0, 350.0, 350.0));
    assert!(engine.is_claimed(0));
    assert_eq!(engine.insertion_count(), 1);
}

#[test]
fn second_image_moves_to_next_slot() {
    let mut engine = PlacementEngine::with_seed(1);
    let a = engine.place(&[], None, WIDE);
    assert_eq!(a.strategy, Strategy::Preset(0));
    assert_eq!(a.bounds, Rect::new(100.0, 300.0, 350.0, 197.0));

    let b = engine.place_with_index(&[a.bounds], None, 1.0, 0);
    assert_eq!(b.strategy, Strategy::Preset(1));
    assert_eq!(b.bounds, Rect::new(150.0, 700.0, 300.0, 300.0));
}

#[test]
fn overlapping_slot_is_skipped_even_when_unclaimed() {
    let mut engine = PlacementEngine::with_seed(1);
    let existing = [Rect::new(100.0, 300.0, 350.0, 350.0)];
    let placed = engine.place(&existing, None, 1.0);
    // Slot 1 sits within the margin below the existing box.
    assert_eq!(placed.strategy, Strategy::Preset(2));
}

#[test]
fn insertion_count_picks_starting_slot() {
    let mut engine = PlacementEngine::with_seed(1);
    let placed = engine.place_with_index(&[], None, 1.0, 17);
    assert_eq!(placed.strategy, Strategy::Preset(2));
}

#[test]
fn hint_wins_when_valid() {
    let mut engine = PlacementEngine::with_seed(1);
    let placed = engine.place(&[], Some(&hint(500.0, 1500.0, 300.0, 300.0)), 1.0);
    assert_eq!(placed.strategy, Strategy::Hint);
    assert!(!engine.is_claimed(0));
}

#[test]
fn hint_missing_size_falls_through_to_slots() {
    let mut engine = PlacementEngine::with_seed(1);
    let partial = PlacementHint { x: Some(-10.0), y: Some(50.0), width: None, height: None };
    let placed = engine.place(&[], Some(&partial), 1.0);
    assert_eq!(placed.strategy, Strategy::Preset(0));
}

#[test]
fn full_canvas_falls_back_to_index_position() {
    let mut engine = PlacementEngine::with_seed(1);
    let blocked = [Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT)];
    let placed = engine.place(&blocked, Some(&hint(10.0, 10.0, 100.0, 100.0)), 1.0);
    assert_eq!(placed.strategy, Strategy::Fallback);
    assert_eq!(placed.bounds, Rect::new(200.0, 300.0, 400.0, 400.0));
}

#[test]
fn fallback_position_wraps_with_index() {
    assert_eq!(fallback(1.0, 3).bounds, Rect::new(650.0, 900.0, 400.0, 400.0));
    assert_eq!(fallback(1.0, 5).bounds, Rect::new(320.0, 1300.0, 400.0, 400.0));
    assert_eq!(fallback(2.0, 0).bounds, Rect::new(200.0, 300.0, 400.0, 200.0));
}

#[test]
fn corners_are_tried_in_order() {
    let first = try_corners(&[], 1.0).map(|p| (p.strategy, p.bounds));
    assert_eq!(first, Some((Strategy::Corner(0), Rect::new(50.0, 200.0, 350.0, 350.0))));

    let blocked = [Rect::new(50.0, 200.0, 350.0, 350.0)];
    let second = try_corners(&blocked, 1.0).map(|p| (p.strategy, p.bounds));
    assert_eq!(second, Some((Strategy::Corner(1), Rect::new(680.0, 200.0, 350.0, 350.0))));
}

#[test]
fn lower_corners_sit_above_bottom_inset() {
    let corners = corner_slots();
    assert_eq!(corners[2], Rect::new(50.0, 1370.0, 350.0, 350.0));
    assert_eq!(corners[3], Rect::new(680.0, 1370.0, 350.0, 350.0));
}

#[test]
fn random_search_stays_in_sampling_window() {
    let mut engine = PlacementEngine::with_seed(7);
    for _ in 0..2000 {
        let placed = engine.try_random(&[], 1.0).map(|p| p.bounds);
        let Some(b) = placed else {
            panic!("random search on an empty canvas must succeed");
        };
        assert!((50.0..=530.0).contains(&b.x), "x out of range: {}", b.x);
        assert!((SAFE_ZONE_TOP..=1170.0).contains(&b.y), "y out of range: {}", b.y);
        assert!((250.0..=500.0).contains(&b.width), "size out of range: {}", b.width);
        assert_eq!(b.width, b.height);
        assert!(b.right() <= CANVAS_WIDTH, "box right {} leaves the canvas", b.right());
        assert!(
            b.bottom() <= CANVAS_HEIGHT - SAFE_ZONE_BOTTOM,
            "box bottom {} enters the bottom safe zone",
            b.bottom()
        );
    }
}

#[test]
fn seeded_engines_agree() {
    let blocked: Vec<Rect> = PRESET_SLOTS.iter().map(|&(x, y, w, h)| Rect::new(x, y, w, h)).collect();
    let mut a = PlacementEngine::with_seed(9);
    let mut b = PlacementEngine::with_seed(9);
    assert_eq!(a.place(&blocked, None, 1.0), b.place(&blocked, None, 1.0));
}

#[test]
fn reset_releases_claimed_slots() {
    let mut engine = PlacementEngine::with_seed(1);
    engine.place(&[], None, 1.0);
    engine.reset();
    assert_eq!(engine.insertion_count(), 0);
    assert!(!engine.is_claimed(0));
    assert_eq!(engine.place(&[], None, 1.0).strategy, Strategy::Preset(0));
}

// =============================================================
// Properties
// =============================================================

fn arb_rect() -> impl proptest::strategy::Strategy<Value = Rect> {
    (0.0f64..1000.0, 0.0f64..1800.0, 10.0f64..400.0, 10.0f64..400.0).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn arb_hint() -> impl proptest::strategy::Strategy<Value = Option<PlacementHint>> {
    proptest::option::of(
        (
            proptest::option::of(-100.0f64..1100.0),
            proptest::option::of(-100.0f64..1900.0),
            proptest::option::of(-50.0f64..600.0),
            proptest::option::of(-50.0f64..600.0),
        )
            .prop_map(|(x, y, width, height)| PlacementHint { x, y, width, height }),
    )
}

proptest! {
    #[test]
    fn accepted_placement_never_overlaps(
        existing in proptest::collection::vec(arb_rect(), 0..8),
        hint in arb_hint(),
        aspect in 0.25f64..4.0,
        seed in any::<u64>(),
        index in 0usize..40,
    ) {
        let mut engine = PlacementEngine::with_seed(seed);
        let placed = engine.place_with_index(&existing, hint.as_ref(), aspect, index);
        if placed.strategy != Strategy::Fallback {
            prop_assert!(!overlaps_any(&placed.bounds, &existing), "{:?} overlaps {:?}", placed, existing);
        }
    }

    #[test]
    fn aspect_adjustment_is_idempotent(
        w in 10u32..1000,
        h in 10u32..1000,
        aspect in 0.2f64..5.0,
    ) {
        let once = adjust_for_aspect(Rect::new(0.0, 0.0, f64::from(w), f64::from(h)), aspect).rounded();
        let twice = adjust_for_aspect(once, aspect).rounded();
        prop_assert_eq!(once, twice);
    }
}
