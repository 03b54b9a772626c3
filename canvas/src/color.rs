//! Hex colour normalization for fills, strokes, and the canvas background.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

/// Two hex digits as a byte. Anything else is `None`.
#[allow(clippy::cast_possible_truncation)]
fn hex_byte(pair: &str) -> Option<u8> {
    let mut digits = pair.chars().map(|c| c.to_digit(16));
    let (Some(Some(hi)), Some(Some(lo)), None) = (digits.next(), digits.next(), digits.next()) else {
        return None;
    };
    // Two nibbles never exceed 0xff.
    Some((hi * 16 + lo) as u8)
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = hex_byte(&hex[0..1].repeat(2))?;
            let g = hex_byte(&hex[1..2].repeat(2))?;
            let b = hex_byte(&hex[2..3].repeat(2))?;
            Some((r, g, b))
        }
        6 => {
            let r = hex_byte(&hex[0..2])?;
            let g = hex_byte(&hex[2..4])?;
            let b = hex_byte(&hex[4..6])?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Normalize a color to canonical lowercase `#rrggbb`, or `fallback` when
/// `value` does not parse.
#[must_use]
pub fn normalize_hex_color(value: &str, fallback: &str) -> String {
    match parse_hex_rgb(value) {
        Some((r, g, b)) => format!("#{r:02x}{g:02x}{b:02x}"),
        None => fallback.to_owned(),
    }
}

/// Text-field colour input: exactly six hex digits, `#` optional.
///
/// Returns `None` while the input is incomplete so the caller keeps the
/// previous colour.
#[must_use]
pub fn normalize_hex_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", digits.to_ascii_lowercase()))
}

/// Whether `value` is usable as a fill or stroke: a hex colour or the
/// `transparent` keyword.
#[must_use]
pub fn is_paint(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("transparent") || parse_hex_rgb(value).is_some()
}
