use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn tool_shape_kinds() {
    assert_eq!(Tool::Rectangle.shape_kind(), Some(ShapeKind::Rectangle));
    assert_eq!(Tool::Circle.shape_kind(), Some(ShapeKind::Circle));
    assert_eq!(Tool::Line.shape_kind(), Some(ShapeKind::Line));
    assert_eq!(Tool::Arrow.shape_kind(), Some(ShapeKind::Arrow));
    assert_eq!(Tool::Draw.shape_kind(), None);
    assert_eq!(Tool::Text.shape_kind(), None);
    assert_eq!(Tool::Select.shape_kind(), None);
}

#[test]
fn tool_is_shape_excludes_draw_and_text() {
    assert!(Tool::Rectangle.is_shape());
    assert!(Tool::Arrow.is_shape());
    assert!(!Tool::Draw.is_shape());
    assert!(!Tool::Text.is_shape());
}

#[test]
fn only_select_is_not_a_drawing_tool() {
    let variants = [Tool::Draw, Tool::Rectangle, Tool::Circle, Tool::Line, Tool::Arrow, Tool::Text];
    assert!(variants.iter().all(|t| t.is_drawing()));
    assert!(!Tool::Select.is_drawing());
}

#[test]
fn tool_all_variants_distinct() {
    let variants = [Tool::Select, Tool::Draw, Tool::Rectangle, Tool::Circle, Tool::Line, Tool::Arrow, Tool::Text];
    for (i, a) in variants.iter().enumerate() {
        for (j, b) in variants.iter().enumerate() {
            if i == j {
                assert_eq!(a, b);
            } else {
                assert_ne!(a, b);
            }
        }
    }
}

// =============================================================
// Key
// =============================================================

#[test]
fn key_matches_name_exactly() {
    let key = Key("Escape".into());
    assert!(key.is("Escape"));
    assert!(!key.is("escape"));
}

// =============================================================
// UiState / GestureState
// =============================================================

#[test]
fn ui_state_default() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Select);
    assert!(ui.selected_id.is_none());
}

#[test]
fn gesture_default_is_idle() {
    assert!(GestureState::default().is_idle());
}

#[test]
fn active_gestures_are_not_idle() {
    let freehand = GestureState::PlacingFreehand { points: vec![Point::new(1.0, 2.0)] };
    let shape = GestureState::PlacingShape {
        kind: ShapeKind::Circle,
        start: Point::new(0.0, 0.0),
        current: Point::new(10.0, 10.0),
    };
    assert!(!freehand.is_idle());
    assert!(!shape.is_idle());
}

#[test]
fn interaction_equality_includes_payload() {
    let id = uuid::Uuid::new_v4();
    let a = Interaction { id, kind: InteractionKind::Drag { position: Point::new(1.0, 1.0) } };
    let b = Interaction { id, kind: InteractionKind::Drag { position: Point::new(2.0, 1.0) } };
    assert_ne!(a, b);
    assert_eq!(a.clone(), a);
}
