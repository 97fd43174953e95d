//! 24-bit color helpers.
//!
//! Colors are plain `u32` values in 0xRRGGBB form. On the wire they are sent
//! low byte first, so 0xRRGGBB leaves as (BB, GG, RR).

/// Black, the content of controller memory before the first write.
pub const BLACK: u32 = 0x000000;

/// Builds a color from its channels.
#[inline]
pub fn from_rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Splits a color into its channels.
#[inline]
pub fn to_rgb(color: u32) -> (u8, u8, u8) {
    ((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

/// Exchanges the red and blue channels.
#[inline]
pub fn swap_red_blue(color: u32) -> u32 {
    let (r, g, b) = to_rgb(color);
    from_rgb(b, g, r)
}

/// Parses a hex color string (`#RRGGBB` or `RRGGBB`).
pub fn parse_hex_color(hex: &str) -> Option<u32> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(from_rgb(r, g, b))
}
