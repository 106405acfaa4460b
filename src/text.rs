//! Legacy-style text output: a cursor, a fixed-cell font, integer scaling.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use crate::color::{self, TFT_WHITE};

pub const FONT: &MonoFont<'static> = &FONT_6X10;

/// Cursor and style shared by `print`-family calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextState {
    pub cursor: Point,
    pub fg: u16,
    /// `None` draws glyphs over whatever is already on screen
    pub bg: Option<u16>,
    pub size: u8,
    pub wrap: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            cursor: Point::zero(),
            fg: TFT_WHITE,
            bg: None,
            size: 1,
            wrap: true,
        }
    }
}

impl TextState {
    /// Size 0 is treated as 1.
    pub fn set_size(&mut self, size: u8) {
        self.size = size.max(1);
    }

    pub fn char_width(&self) -> i32 {
        (FONT.character_size.width + FONT.character_spacing) as i32 * i32::from(self.size)
    }

    pub fn line_height(&self) -> i32 {
        FONT.character_size.height as i32 * i32::from(self.size)
    }

    fn newline(&mut self) {
        self.cursor.x = 0;
        self.cursor.y = self.cursor.y.saturating_add(self.line_height());
    }

    /// Whether the glyph cell at the cursor overlaps `area`.
    fn cell_visible(&self, area: &Rectangle) -> bool {
        let (x, y) = (i64::from(self.cursor.x), i64::from(self.cursor.y));
        let left = i64::from(area.top_left.x);
        let top = i64::from(area.top_left.y);
        x + i64::from(self.char_width()) > left
            && y + i64::from(self.line_height()) > top
            && x < left + i64::from(area.size.width)
            && y < top + i64::from(area.size.height)
    }

    /// Draw `text` at the cursor, advancing it. `width` is the current
    /// screen width, used for wrapping. The cursor saturates at the `i32`
    /// limits; glyphs outside `target` are skipped.
    pub fn write<D>(&mut self, target: &mut D, text: &str, width: i32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut style = MonoTextStyleBuilder::new()
            .font(FONT)
            .text_color(color::to_rgb565(self.fg));
        if let Some(bg) = self.bg {
            style = style.background_color(color::to_rgb565(bg));
        }
        let style = style.build();

        let mut buf = [0u8; 4];
        for ch in text.chars() {
            match ch {
                '\n' => {
                    self.newline();
                    continue;
                }
                '\r' => continue,
                _ => {}
            }
            if self.wrap
                && self.cursor.x > 0
                && self.cursor.x.saturating_add(self.char_width()) > width
            {
                self.newline();
            }
            if self.cell_visible(&target.bounding_box()) {
                let glyph = ch.encode_utf8(&mut buf);
                let mut scaled = Scaled {
                    target: &mut *target,
                    origin: self.cursor,
                    scale: u32::from(self.size),
                };
                Text::with_baseline(glyph, Point::zero(), style, Baseline::Top).draw(&mut scaled)?;
            }
            self.cursor.x = self.cursor.x.saturating_add(self.char_width());
        }
        Ok(())
    }
}

/// Draw target that magnifies every pixel into a `scale`×`scale` block
/// placed relative to `origin`.
pub struct Scaled<'a, D> {
    pub target: &'a mut D,
    pub origin: Point,
    pub scale: u32,
}

impl<D: DrawTarget> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        let outer = self.target.bounding_box();
        let scale = self.scale.max(1);
        let top_left = (outer.top_left - self.origin) / scale as i32;
        Rectangle::new(top_left, outer.size / scale + Size::new(1, 1))
    }
}

impl<D: DrawTarget> DrawTarget for Scaled<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let origin = self.origin;
        if self.scale <= 1 {
            return self
                .target
                .draw_iter(pixels.into_iter().map(|Pixel(p, c)| Pixel(origin + p, c)));
        }
        let scale = self.scale;
        for Pixel(p, c) in pixels {
            let block = Rectangle::new(origin + p * scale as i32, Size::new_equal(scale));
            self.target.fill_solid(&block, c)?;
        }
        Ok(())
    }
}
