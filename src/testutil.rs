//! Host-side doubles for the hardware seams.

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::backlight::Backlight;
use crate::board::BoardConfig;
use crate::color::from_rgb565;
use crate::device::DisplayDevice;
use crate::error::Error;
use crate::gfx::GfxDevice;
use crate::panel::{effective_rotation, Panel};
use crate::touch::{RawPoint, TouchSensor};

/// In-memory panel. Pixels start at 0 (black); writes outside the current
/// extent are dropped.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u16>,
    pub init_count: u32,
    pub rotation: u8,
    /// Mounting offset combined with `rotation`, as on the real panel
    pub offset_rotation: u8,
    /// Reject drawing until `init()` has run, like the real panel
    pub require_init: bool,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
            init_count: 0,
            rotation: 0,
            offset_rotation: 0,
            require_init: false,
        }
    }

    fn index(&self, p: Point) -> Option<usize> {
        let size = self.size();
        if p.x < 0 || p.y < 0 || p.x as u32 >= size.width || p.y as u32 >= size.height {
            return None;
        }
        Some(p.y as usize * size.width as usize + p.x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u16> {
        self.index(Point::new(x, y)).map(|i| self.pixels[i])
    }

    pub fn fill(&mut self, color: u16) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }

    pub fn count(&self, color: u16) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    pub fn count_inside(&self, area: Rectangle, color: u16) -> usize {
        area.points()
            .filter(|&p| self.index(p).is_some_and(|i| self.pixels[i] == color))
            .count()
    }

    pub fn count_outside(&self, area: Rectangle, color: u16) -> usize {
        self.count(color) - self.count_inside(area, color)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        if effective_rotation(self.rotation, self.offset_rotation) & 1 == 1 {
            Size::new(self.height, self.width)
        } else {
            Size::new(self.width, self.height)
        }
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        if self.require_init && self.init_count == 0 {
            return Err(Error::NotInitialized);
        }
        for Pixel(p, c) in pixels {
            if let Some(i) = self.index(p) {
                self.pixels[i] = from_rgb565(c);
            }
        }
        Ok(())
    }
}

impl Panel for FrameBuffer {
    fn init(&mut self) -> Result<(), Error> {
        self.init_count += 1;
        Ok(())
    }

    fn set_rotation(&mut self, rotation: u8) -> Result<(), Error> {
        self.rotation = rotation & 7;
        Ok(())
    }
}

/// Backlight that remembers every level it was given.
#[derive(Debug, Default)]
pub struct RecordingBacklight {
    pub levels: Vec<u8>,
}

impl Backlight for RecordingBacklight {
    fn set_level(&mut self, level: u8) -> Result<(), Error> {
        self.levels.push(level);
        Ok(())
    }
}

/// Touch sensor that replays canned readings, then reports no touch.
#[derive(Debug, Default)]
pub struct ScriptedTouch {
    readings: VecDeque<Option<RawPoint>>,
}

impl ScriptedTouch {
    pub fn new(readings: &[Option<RawPoint>]) -> Self {
        Self {
            readings: readings.iter().copied().collect(),
        }
    }
}

impl TouchSensor for ScriptedTouch {
    fn read_raw(&mut self) -> Result<Option<RawPoint>, Error> {
        Ok(self.readings.pop_front().flatten())
    }
}

/// Framebuffer-backed device for `cfg`, not yet initialized.
pub fn device(cfg: BoardConfig) -> GfxDevice<FrameBuffer, RecordingBacklight, ScriptedTouch> {
    let mut fb = FrameBuffer::new(u32::from(cfg.panel.width), u32::from(cfg.panel.height));
    fb.offset_rotation = cfg.panel.offset_rotation;
    GfxDevice::new(cfg, fb, RecordingBacklight::default(), ScriptedTouch::default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Init,
    Rotation(u8),
    Brightness(u8),
    FillScreen(u16),
    Pixel(i32, i32, u16),
    Line(i32, i32, i32, i32, u16),
    Rect(i32, i32, i32, i32, u16),
    FillRect(i32, i32, i32, i32, u16),
    RoundRect(i32, i32, i32, i32, i32, u16),
    FillRoundRect(i32, i32, i32, i32, i32, u16),
    Circle(i32, i32, i32, u16),
    FillCircle(i32, i32, i32, u16),
    TextColor(u16, Option<u16>),
    TextSize(u8),
    Cursor(i32, i32),
}

/// `DisplayDevice` that logs calls instead of drawing. Text is collected
/// into `text`; `fail_next` makes the next fallible call return that error.
pub struct RecordingDevice {
    pub calls: Vec<Call>,
    pub text: String,
    pub touch: Option<(i32, i32)>,
    pub extent: (i32, i32),
    pub fail_next: Option<Error>,
    rotation: u8,
    brightness: u8,
    cursor: (i32, i32),
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            text: String::new(),
            touch: None,
            extent: (240, 320),
            fail_next: None,
            rotation: 0,
            brightness: 0,
            cursor: (0, 0),
        }
    }
}

impl RecordingDevice {
    fn record(&mut self, call: Call) -> Result<(), Error> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl DisplayDevice for RecordingDevice {
    fn init(&mut self) -> Result<(), Error> {
        self.record(Call::Init)
    }

    fn set_rotation(&mut self, rotation: u8) -> Result<(), Error> {
        self.record(Call::Rotation(rotation))?;
        self.rotation = rotation;
        Ok(())
    }

    fn rotation(&self) -> u8 {
        self.rotation
    }

    fn width(&self) -> i32 {
        self.extent.0
    }

    fn height(&self) -> i32 {
        self.extent.1
    }

    fn fill_screen(&mut self, color: u16) -> Result<(), Error> {
        self.record(Call::FillScreen(color))
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: u16) -> Result<(), Error> {
        self.record(Call::Pixel(x, y, color))
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) -> Result<(), Error> {
        self.record(Call::Line(x0, y0, x1, y1, color))
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), Error> {
        self.record(Call::Rect(x, y, w, h, color))
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), Error> {
        self.record(Call::FillRect(x, y, w, h, color))
    }

    fn draw_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) -> Result<(), Error> {
        self.record(Call::RoundRect(x, y, w, h, r, color))
    }

    fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) -> Result<(), Error> {
        self.record(Call::FillRoundRect(x, y, w, h, r, color))
    }

    fn draw_circle(&mut self, x: i32, y: i32, r: i32, color: u16) -> Result<(), Error> {
        self.record(Call::Circle(x, y, r, color))
    }

    fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: u16) -> Result<(), Error> {
        self.record(Call::FillCircle(x, y, r, color))
    }

    fn set_text_color(&mut self, fg: u16, bg: Option<u16>) {
        self.calls.push(Call::TextColor(fg, bg));
    }

    fn set_text_size(&mut self, size: u8) {
        self.calls.push(Call::TextSize(size));
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.calls.push(Call::Cursor(x, y));
        self.cursor = (x, y);
    }

    fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    fn write_str(&mut self, text: &str) -> Result<(), Error> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.text.push_str(text);
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), Error> {
        self.record(Call::Brightness(level))?;
        self.brightness = level;
        Ok(())
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn get_touch(&mut self) -> Result<Option<(i32, i32)>, Error> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        Ok(self.touch)
    }
}
