//! Avatar helpers built on the shared name palette.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

pub use frames::palette::color_for;

/// Glyph shown inside a sender's avatar: the first character of the name.
pub fn avatar_glyph(name: &str) -> String {
    name.chars().next().map(String::from).unwrap_or_default()
}
