/// Display Device capability.
///
/// Everything the legacy API surface needs from a graphics backend: draw
/// primitives, text cursor state, brightness and touch. [`crate::gfx::GfxDevice`]
/// is the implementation used on hardware; the compatibility shim only
/// ever talks to this trait.
///
/// Colors are raw RGB565. Coordinates are signed and never range-checked
/// here; clipping belongs to the draw target.
use crate::error::Error;

pub trait DisplayDevice {
    /// Bus attach and panel reset/init sequence.
    fn init(&mut self) -> Result<(), Error>;

    /// `rotation` is 0-7: quarter turns, plus 4 for mirrored.
    fn set_rotation(&mut self, rotation: u8) -> Result<(), Error>;
    fn rotation(&self) -> u8;

    /// Rotation-adjusted extent.
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn fill_screen(&mut self, color: u16) -> Result<(), Error>;
    fn draw_pixel(&mut self, x: i32, y: i32, color: u16) -> Result<(), Error>;
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) -> Result<(), Error>;
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), Error>;
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), Error>;
    fn draw_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) -> Result<(), Error>;
    fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) -> Result<(), Error>;
    fn draw_circle(&mut self, x: i32, y: i32, r: i32, color: u16) -> Result<(), Error>;
    fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: u16) -> Result<(), Error>;

    /// `bg: None` draws text with a transparent background.
    fn set_text_color(&mut self, fg: u16, bg: Option<u16>);
    fn set_text_size(&mut self, size: u8);
    fn set_cursor(&mut self, x: i32, y: i32);
    fn cursor(&self) -> (i32, i32);
    /// Draw text at the cursor and advance it.
    fn write_str(&mut self, text: &str) -> Result<(), Error>;

    fn set_brightness(&mut self, level: u8) -> Result<(), Error>;
    fn brightness(&self) -> u8;

    /// Screen position of the current touch, in the current rotation.
    fn get_touch(&mut self) -> Result<Option<(i32, i32)>, Error>;
}
