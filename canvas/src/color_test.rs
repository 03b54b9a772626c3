use super::*;

// =============================================================
// parse_hex_rgb
// =============================================================

#[test]
fn parse_hex_rgb_accepts_short_and_long_forms() {
    assert_eq!(parse_hex_rgb("#abc"), Some((0xaa, 0xbb, 0xcc)));
    assert_eq!(parse_hex_rgb("#64748B"), Some((0x64, 0x74, 0x8b)));
    assert_eq!(parse_hex_rgb("  #ffffff "), Some((255, 255, 255)));
}

#[test]
fn parse_hex_rgb_rejects_invalid_values() {
    assert_eq!(parse_hex_rgb("64748b"), None);
    assert_eq!(parse_hex_rgb("#12"), None);
    assert_eq!(parse_hex_rgb("#zzzzzz"), None);
    assert_eq!(parse_hex_rgb("#ééé"), None);
}

#[test]
fn parse_hex_rgb_rejects_signed_pairs() {
    assert_eq!(parse_hex_rgb("#+f+f+f"), None);
    assert_eq!(parse_hex_rgb("#+a0000"), None);
}

// =============================================================
// normalize
// =============================================================

#[test]
fn normalize_hex_color_expands_and_lowercases() {
    assert_eq!(normalize_hex_color("#ABC", "#000000"), "#aabbcc");
}

#[test]
fn normalize_hex_color_uses_fallback() {
    assert_eq!(normalize_hex_color("red", "#ffffff"), "#ffffff");
}

#[test]
fn hex_input_accepts_six_digits_with_or_without_hash() {
    assert_eq!(normalize_hex_input("FF0000").as_deref(), Some("#ff0000"));
    assert_eq!(normalize_hex_input("#00ff00").as_deref(), Some("#00ff00"));
}

#[test]
fn hex_input_rejects_partial_entries() {
    assert_eq!(normalize_hex_input("#ff00"), None);
    assert_eq!(normalize_hex_input("ff00zz"), None);
    assert_eq!(normalize_hex_input(""), None);
}

#[test]
fn paint_accepts_transparent_keyword() {
    assert!(is_paint("transparent"));
    assert!(is_paint("#fff"));
    assert!(!is_paint("blue"));
}
