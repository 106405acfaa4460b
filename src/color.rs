//! Named RGB565 colors, value-compatible with the TFT_eSPI palette.
//!
//! The legacy API passes colors as raw `u16`; [`to_rgb565`] and
//! [`from_rgb565`] bridge to `embedded-graphics` colors.

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;

pub const TFT_BLACK: u16 = 0x0000;
pub const TFT_NAVY: u16 = 0x000F;
pub const TFT_DARKGREEN: u16 = 0x03E0;
pub const TFT_DARKCYAN: u16 = 0x03EF;
pub const TFT_MAROON: u16 = 0x7800;
pub const TFT_PURPLE: u16 = 0x780F;
pub const TFT_OLIVE: u16 = 0x7BE0;
pub const TFT_LIGHTGREY: u16 = 0xD69A;
pub const TFT_DARKGREY: u16 = 0x7BEF;
pub const TFT_BLUE: u16 = 0x001F;
pub const TFT_GREEN: u16 = 0x07E0;
pub const TFT_CYAN: u16 = 0x07FF;
pub const TFT_RED: u16 = 0xF800;
pub const TFT_MAGENTA: u16 = 0xF81F;
pub const TFT_YELLOW: u16 = 0xFFE0;
pub const TFT_WHITE: u16 = 0xFFFF;
pub const TFT_ORANGE: u16 = 0xFDA0;
pub const TFT_GREENYELLOW: u16 = 0xAFE5;
/// Same value as [`TFT_MAGENTA`] in the legacy palette.
pub const TFT_PINK: u16 = 0xF81F;

/// Every named color with its legacy name.
pub static PALETTE: &[(&str, u16)] = &[
    ("TFT_BLACK", TFT_BLACK),
    ("TFT_NAVY", TFT_NAVY),
    ("TFT_DARKGREEN", TFT_DARKGREEN),
    ("TFT_DARKCYAN", TFT_DARKCYAN),
    ("TFT_MAROON", TFT_MAROON),
    ("TFT_PURPLE", TFT_PURPLE),
    ("TFT_OLIVE", TFT_OLIVE),
    ("TFT_LIGHTGREY", TFT_LIGHTGREY),
    ("TFT_DARKGREY", TFT_DARKGREY),
    ("TFT_BLUE", TFT_BLUE),
    ("TFT_GREEN", TFT_GREEN),
    ("TFT_CYAN", TFT_CYAN),
    ("TFT_RED", TFT_RED),
    ("TFT_MAGENTA", TFT_MAGENTA),
    ("TFT_YELLOW", TFT_YELLOW),
    ("TFT_WHITE", TFT_WHITE),
    ("TFT_ORANGE", TFT_ORANGE),
    ("TFT_GREENYELLOW", TFT_GREENYELLOW),
    ("TFT_PINK", TFT_PINK),
];

pub fn to_rgb565(color: u16) -> Rgb565 {
    Rgb565::from(RawU16::new(color))
}

pub fn from_rgb565(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner()
}

/// Pack 8-bit channels into RGB565 (legacy `color565`).
pub const fn color565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn classic_sixteen_have_fixed_values() {
        let expected: [(u16, u16); 16] = [
            (TFT_BLACK, 0x0000),
            (TFT_NAVY, 0x000F),
            (TFT_DARKGREEN, 0x03E0),
            (TFT_DARKCYAN, 0x03EF),
            (TFT_MAROON, 0x7800),
            (TFT_PURPLE, 0x780F),
            (TFT_OLIVE, 0x7BE0),
            (TFT_LIGHTGREY, 0xD69A),
            (TFT_DARKGREY, 0x7BEF),
            (TFT_BLUE, 0x001F),
            (TFT_GREEN, 0x07E0),
            (TFT_CYAN, 0x07FF),
            (TFT_RED, 0xF800),
            (TFT_MAGENTA, 0xF81F),
            (TFT_YELLOW, 0xFFE0),
            (TFT_WHITE, 0xFFFF),
        ];
        for (constant, value) in expected {
            assert_eq!(constant, value);
        }
        assert_eq!(PALETTE.len(), 19);
        assert_eq!(TFT_PINK, TFT_MAGENTA);
    }

    #[test]
    fn conversion_preserves_raw_value() {
        for &(name, raw) in PALETTE {
            assert_eq!(from_rgb565(to_rgb565(raw)), raw, "{}", name);
        }
    }

    #[test]
    fn primaries_match_embedded_graphics() {
        assert_eq!(to_rgb565(TFT_RED), Rgb565::RED);
        assert_eq!(to_rgb565(TFT_GREEN), Rgb565::GREEN);
        assert_eq!(to_rgb565(TFT_BLUE), Rgb565::BLUE);
        assert_eq!(to_rgb565(TFT_WHITE), Rgb565::WHITE);
        assert_eq!(to_rgb565(TFT_BLACK), Rgb565::BLACK);
    }

    #[test]
    fn color565_packs_channels() {
        assert_eq!(color565(255, 255, 255), TFT_WHITE);
        assert_eq!(color565(255, 0, 0), TFT_RED);
        assert_eq!(color565(0, 255, 0), TFT_GREEN);
        assert_eq!(color565(0, 0, 255), TFT_BLUE);
        assert_eq!(color565(255, 165, 0), 0xFD20);
    }
}
