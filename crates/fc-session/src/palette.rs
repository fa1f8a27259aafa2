/// Display colors assigned to line cuts in creation order.
pub const LINECUT_COLORS: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9",
];

/// Palette entry for the `index`-th line cut, cycling.
pub fn linecut_color(index: usize) -> &'static str {
    LINECUT_COLORS[index % LINECUT_COLORS.len()]
}

/// Parses `#RRGGBB`.
pub fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some([byte(0)?, byte(2)?, byte(4)?])
}
