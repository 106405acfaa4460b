//! TFT_eSPI-compatible method surface.
//!
//! [`TftEspi`] forwards every call, in the same argument order, to the
//! [`DisplayDevice`] it holds. It keeps no state of its own. Two
//! arguments are transformed on the way through:
//!
//! - `set_rotation` wraps its argument modulo 8 instead of rejecting it;
//! - `get_touch` narrows the device's `i32` coordinates into the legacy
//!   `u16` outputs, clamping anything outside `0..=u16::MAX`.

use core::fmt;

use crate::device::DisplayDevice;
use crate::error::Error;

/// Pressure threshold argument accepted by the legacy `getTouch`.
pub const DEFAULT_TOUCH_THRESHOLD: u16 = 600;

/// Brightness applied by [`TftEspi::init`].
pub const INIT_BRIGHTNESS: u8 = 255;

pub struct TftEspi<D> {
    device: D,
}

impl<D: DisplayDevice> TftEspi<D> {
    pub fn new(device: D) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }

    /// Bring the display up and switch the backlight fully on.
    pub fn init(&mut self) -> Result<(), Error> {
        self.device.init()?;
        self.device.set_brightness(INIT_BRIGHTNESS)
    }

    pub fn set_rotation(&mut self, r: u8) -> Result<(), Error> {
        self.device.set_rotation(r % 8)
    }

    pub fn rotation(&self) -> u8 {
        self.device.rotation()
    }

    pub fn fill_screen(&mut self, color: u16) -> Result<(), Error> {
        self.device.fill_screen(color)
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: u16) -> Result<(), Error> {
        self.device.draw_pixel(x, y, color)
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) -> Result<(), Error> {
        self.device.draw_line(x0, y0, x1, y1, color)
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), Error> {
        self.device.draw_rect(x, y, w, h, color)
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), Error> {
        self.device.fill_rect(x, y, w, h, color)
    }

    pub fn draw_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) -> Result<(), Error> {
        self.device.draw_round_rect(x, y, w, h, r, color)
    }

    pub fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) -> Result<(), Error> {
        self.device.fill_round_rect(x, y, w, h, r, color)
    }

    pub fn draw_circle(&mut self, x: i32, y: i32, r: i32, color: u16) -> Result<(), Error> {
        self.device.draw_circle(x, y, r, color)
    }

    pub fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: u16) -> Result<(), Error> {
        self.device.fill_circle(x, y, r, color)
    }

    /// Text over a transparent background.
    pub fn set_text_color(&mut self, c: u16) {
        self.device.set_text_color(c, None);
    }

    /// Text with an opaque background.
    pub fn set_text_color_bg(&mut self, c: u16, bg: u16) {
        self.device.set_text_color(c, Some(bg));
    }

    pub fn set_text_size(&mut self, s: u8) {
        self.device.set_text_size(s);
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.device.set_cursor(x, y);
    }

    pub fn print(&mut self, value: impl fmt::Display) -> Result<(), Error> {
        self.print_fmt(format_args!("{}", value))
    }

    pub fn println(&mut self, value: impl fmt::Display) -> Result<(), Error> {
        self.print_fmt(format_args!("{}\n", value))
    }

    /// `printf` equivalent: `tft.print_fmt(format_args!("{:3}%", pct))`.
    pub fn print_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Error> {
        let mut sink = DeviceWriter {
            device: &mut self.device,
            error: None,
        };
        let result = fmt::write(&mut sink, args);
        match (sink.error, result) {
            (Some(err), _) => Err(err),
            (None, Err(_)) => Err(Error::Format),
            (None, Ok(())) => Ok(()),
        }
    }

    /// Legacy touch read. `threshold` is accepted for call compatibility;
    /// pressure filtering is the touch driver's job.
    ///
    /// On a touch, `x` and `y` receive the screen position and `true` is
    /// returned; otherwise they are left untouched.
    pub fn get_touch(&mut self, x: &mut u16, y: &mut u16, _threshold: u16) -> Result<bool, Error> {
        match self.touch()? {
            Some((tx, ty)) => {
                *x = tx;
                *y = ty;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Touch position narrowed to the legacy 16-bit contract.
    pub fn touch(&mut self) -> Result<Option<(u16, u16)>, Error> {
        Ok(self
            .device
            .get_touch()?
            .map(|(x, y)| (narrow_coordinate(x), narrow_coordinate(y))))
    }

    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), Error> {
        self.device.set_brightness(brightness)
    }

    pub fn brightness(&self) -> u8 {
        self.device.brightness()
    }

    pub fn width(&self) -> i16 {
        self.device.width() as i16
    }

    pub fn height(&self) -> i16 {
        self.device.height() as i16
    }
}

/// Clamp a device coordinate into `u16`.
pub fn narrow_coordinate(value: i32) -> u16 {
    match u16::try_from(value) {
        Ok(v) => v,
        Err(_) => {
            log::warn!("touch coordinate {} clamped to 16 bits", value);
            value.clamp(0, i32::from(u16::MAX)) as u16
        }
    }
}

struct DeviceWriter<'a, D> {
    device: &'a mut D,
    error: Option<Error>,
}

impl<D: DisplayDevice> fmt::Write for DeviceWriter<'_, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.device.write_str(s).map_err(|err| {
            self.error = Some(err);
            fmt::Error
        })
    }
}

/// `write!(tft, ...)` support. Device errors surface as `fmt::Error`; use
/// [`TftEspi::print_fmt`] to keep them.
impl<D: DisplayDevice> fmt::Write for TftEspi<D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.device.write_str(s).map_err(|_| fmt::Error)
    }
}
