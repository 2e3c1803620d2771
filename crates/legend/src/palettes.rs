//! Built-in legend palettes.

use wafer_common::Color;

/// Eleven-step heat palette: white for zero, then one color per 10% band.
pub const HEAT: [u32; 11] = [
    0xffffff, //  0
    0xd5e5fa, //  0-10
    0x92b0ff, // 10-20
    0x6271fd, // 20-30
    0x009c95, // 30-40
    0x64ff00, // 40-50
    0xc5ff30, // 50-60
    0xf7c50c, // 60-70
    0xf18008, // 70-80
    0xff1800, // 80-90
    0x990000,
];

/// Rainbow palette with every hue repeated twice, for bin-code style legends.
pub const PAIRED_RAINBOW: [u32; 22] = [
    0xff4a00, 0xff4a00, 0xffae00, 0xffae00, 0xdcff00, 0xdcff00, 0x68ff00, 0x68ff00, 0x00ff7f,
    0x00ff7f, 0x009900, 0x009900, 0x00fff4, 0x00fff4, 0x0097ff, 0x0097ff, 0x0023ff, 0x0023ff,
    0x5100ff, 0x5100ff, 0xc500ff, 0xc500ff,
];

/// Palette for a pattern number: `0` is [`HEAT`], anything else [`PAIRED_RAINBOW`].
pub fn for_pattern(pattern: u32) -> Vec<Color> {
    let packed: &[u32] = if pattern == 0 { &HEAT } else { &PAIRED_RAINBOW };
    packed.iter().map(|&hex| Color::from_rgb_hex(hex)).collect()
}
