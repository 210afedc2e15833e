//! Deterministic avatar colors keyed by display name.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

/// Fixed avatar palette. Order is part of the name-to-color mapping.
pub const PALETTE: [&str; 8] = [
    "#c00000", "#0baf00", "#efa000", "#0d55c5", "#4490be", "#11c0bb", "#cf3838", "#9a5ada",
];

/// 32-bit rolling hash over UTF-16 code units: `hash = 31 * hash + unit`.
#[must_use]
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0_i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Palette color for `name`.
#[must_use]
pub fn color_for(name: &str) -> &'static str {
    // Remainder before absolute value, so i32::MIN cannot overflow.
    let len = PALETTE.len() as i32;
    let index = (name_hash(name) % len).unsigned_abs() as usize;
    PALETTE[index]
}

/// RGB channels of [`color_for`], for terminals that take 24-bit color.
#[must_use]
pub fn rgb_for(name: &str) -> (u8, u8, u8) {
    parse_hex_rgb(color_for(name)).unwrap_or((0x8a, 0x81, 0x78))
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex.get(0..1)?.repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex.get(1..2)?.repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex.get(2..3)?.repeat(2), 16).ok()?;
            Some((r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}
