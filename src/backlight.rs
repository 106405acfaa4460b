/// Backlight control.
///
/// Brightness uses the legacy 0-255 scale. Implementations drive a PWM
/// channel at the board's backlight frequency; the firmware provides one
/// over the ESP32 LEDC peripheral.
use crate::error::Error;

pub trait Backlight {
    /// Apply a brightness level, 0 = off, 255 = full.
    fn set_level(&mut self, level: u8) -> Result<(), Error>;
}

/// 8-bit PWM duty for a brightness level.
pub const fn duty_for(level: u8, invert: bool) -> u8 {
    if invert {
        u8::MAX - level
    } else {
        level
    }
}
