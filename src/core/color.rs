//! Color utilities
//!
//! The host stores colors as packed ABGR `u32` (alpha in the high byte, red in
//! the low byte). Config files use `#RRGGBB`.

const OPAQUE_WHITE: u32 = 0xFFFF_FFFF;

/// Parse hex color "#RRGGBB" into an opaque host ABGR value
///
/// Falls back to opaque white if the hex string is too short or not ASCII;
/// invalid component digits fall back to 255 per component.
///
/// # Examples
///
/// ```
/// use xbro_overlay::core::color::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#00FF00"), 0xFF00FF00);
/// assert_eq!(parse_hex_color("#FF0000"), 0xFF0000FF);
/// ```
pub fn parse_hex_color(hex: &str) -> u32 {
    let hex = hex.trim_start_matches('#');
    if hex.len() < 6 || !hex.is_ascii() {
        return OPAQUE_WHITE;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
    abgr(r, g, b)
}

/// Convert a host ABGR value back to hex "#RRGGBB" (ignoring alpha)
pub fn to_hex_color(abgr: u32) -> String {
    let r = abgr & 0xFF;
    let g = (abgr >> 8) & 0xFF;
    let b = (abgr >> 16) & 0xFF;
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

fn abgr(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (b as u32) << 16 | (g as u32) << 8 | r as u32
}
