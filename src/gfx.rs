//! Graphics adapter: a [`DisplayDevice`] built from a panel, a backlight and
//! a touch sensor.
//!
//! `GfxDevice` holds the drivers and the board description it was built
//! from. It keeps the state a legacy display object keeps (rotation, text
//! cursor and colors, brightness) and renders every primitive through
//! `embedded-graphics` on the panel.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, CornerRadii, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
    StrokeAlignment,
};

use crate::backlight::Backlight;
use crate::board::BoardConfig;
use crate::color::to_rgb565;
use crate::device::DisplayDevice;
use crate::error::Error;
use crate::panel::{effective_rotation, Panel};
use crate::text::TextState;
use crate::touch::{rotate_point, Calibration, TouchSensor};

pub struct GfxDevice<P, L, T> {
    config: BoardConfig,
    panel: P,
    light: L,
    touch: T,
    calibration: Option<Calibration>,
    rotation: u8,
    brightness: u8,
    text: TextState,
}

impl<P, L, T> GfxDevice<P, L, T>
where
    P: Panel,
    L: Backlight,
    T: TouchSensor,
{
    pub fn new(config: BoardConfig, panel: P, light: L, touch: T) -> Self {
        Self {
            calibration: config.touch.as_ref().map(Calibration::from_config),
            config,
            panel,
            light,
            touch,
            rotation: 0,
            brightness: 0,
            text: TextState::default(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn text(&self) -> &TextState {
        &self.text
    }

    pub fn set_text_wrap(&mut self, wrap: bool) {
        self.text.wrap = wrap;
    }

    pub fn release(self) -> (P, L, T) {
        (self.panel, self.light, self.touch)
    }

    fn stroke(color: u16) -> PrimitiveStyle<Rgb565> {
        PrimitiveStyleBuilder::new()
            .stroke_color(to_rgb565(color))
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build()
    }

    fn fill(color: u16) -> PrimitiveStyle<Rgb565> {
        PrimitiveStyle::with_fill(to_rgb565(color))
    }

    /// Light every on-screen pixel for which `inside` holds.
    fn draw_where(&mut self, color: u16, inside: impl Fn(i64, i64) -> bool) -> Result<(), Error> {
        let color = to_rgb565(color);
        let area = Rectangle::new(Point::zero(), self.size());
        self.panel.draw_iter(
            area.points()
                .filter(|p| inside(i64::from(p.x), i64::from(p.y)))
                .map(|p| Pixel(p, color)),
        )
    }

    fn round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, style: Style) -> Result<(), Error> {
        let (Some(xs), Some(ys)) = (span(x, w), span(y, h)) else {
            return Ok(());
        };
        let shorter = (xs.1 - xs.0 + 1).min(ys.1 - ys.0 + 1);
        let radius = i64::from(r.max(0)).min(shorter / 2);
        if radius > DIRECT_LIMIT {
            return self.draw_where(style.color(), |px, py| match style {
                Style::Fill(_) => in_round_rect(px, py, xs, ys, radius),
                Style::Stroke(_) => {
                    in_round_rect(px, py, xs, ys, radius)
                        && !in_round_rect(px, py, (xs.0 + 1, xs.1 - 1), (ys.0 + 1, ys.1 - 1), radius - 1)
                }
            });
        }
        // Moved edges keep their corner arcs off screen, and each visible
        // side stays at least 2 * radius long so the radius is not confined
        let size = self.size();
        let margin = 2 * radius + 1;
        let (Some((cx, cw)), Some((cy, ch))) = (
            clip_span(xs, size.width, margin),
            clip_span(ys, size.height, margin),
        ) else {
            return Ok(());
        };
        let shape = RoundedRectangle::new(
            Rectangle::new(Point::new(cx, cy), Size::new(cw, ch)),
            CornerRadii::new(Size::new_equal(radius as u32)),
        );
        match style {
            Style::Fill(color) => shape.into_styled(Self::fill(color)).draw(&mut self.panel),
            Style::Stroke(color) => shape.into_styled(Self::stroke(color)).draw(&mut self.panel),
        }
    }

    fn circle(&mut self, x: i32, y: i32, r: i32, style: Style) -> Result<(), Error> {
        if r < 0 {
            return Ok(());
        }
        let size = self.size();
        let (cx, cy, r) = (i64::from(x), i64::from(y), i64::from(r));
        if cx + r < 0 || cy + r < 0 || cx - r >= i64::from(size.width) || cy - r >= i64::from(size.height) {
            return Ok(());
        }
        if r > DIRECT_LIMIT {
            // Compared at twice the resolution: inside when |2d| < diameter
            let within = move |px: i64, py: i64, diameter: i64| {
                let (dx, dy) = (i128::from(2 * (px - cx)), i128::from(2 * (py - cy)));
                dx * dx + dy * dy < i128::from(diameter) * i128::from(diameter)
            };
            return self.draw_where(style.color(), move |px, py| match style {
                Style::Fill(_) => within(px, py, 2 * r + 1),
                Style::Stroke(_) => within(px, py, 2 * r + 1) && !within(px, py, 2 * r - 1),
            });
        }
        let shape = Circle::with_center(Point::new(x, y), 2 * r as u32 + 1);
        match style {
            Style::Fill(color) => shape.into_styled(Self::fill(color)).draw(&mut self.panel),
            Style::Stroke(color) => shape.into_styled(Self::stroke(color)).draw(&mut self.panel),
        }
    }
}

/// Beyond this many pixels, curves are rasterized against the screen
/// instead of through `embedded-graphics`, whose primitives work in `i32`
/// and square their extents.
const DIRECT_LIMIT: i64 = 1 << 10;

#[derive(Debug, Clone, Copy)]
enum Style {
    Fill(u16),
    Stroke(u16),
}

impl Style {
    fn color(self) -> u16 {
        match self {
            Style::Fill(c) | Style::Stroke(c) => c,
        }
    }
}

/// Inclusive range covered by a legacy `start, len` pair. Negative lengths
/// grow towards smaller coordinates; zero covers nothing.
fn span(start: i32, len: i32) -> Option<(i64, i64)> {
    let (start, len) = (i64::from(start), i64::from(len));
    match len {
        0 => None,
        l if l > 0 => Some((start, start + l - 1)),
        l => Some((start + l + 1, start)),
    }
}

/// Limit `span` to `-margin ..= extent - 1 + margin`, as a start and length.
fn clip_span((lo, hi): (i64, i64), extent: u32, margin: i64) -> Option<(i32, u32)> {
    let lo = lo.max(-margin);
    let hi = hi.min(i64::from(extent) - 1 + margin);
    (lo <= hi).then(|| (lo as i32, (hi - lo + 1) as u32))
}

/// Rectangle for legacy `x, y, w, h` arguments, clipped to `screen` grown
/// by `margin` on every side. `None` when nothing of it remains.
pub fn normalize_rect(x: i32, y: i32, w: i32, h: i32, screen: Size, margin: i64) -> Option<Rectangle> {
    let (x, w) = clip_span(span(x, w)?, screen.width, margin)?;
    let (y, h) = clip_span(span(y, h)?, screen.height, margin)?;
    Some(Rectangle::new(Point::new(x, y), Size::new(w, h)))
}

fn in_round_rect(px: i64, py: i64, xs: (i64, i64), ys: (i64, i64), r: i64) -> bool {
    if px < xs.0 || px > xs.1 || py < ys.0 || py > ys.1 {
        return false;
    }
    let r = r.max(0);
    // Distance past the straight part of the nearest corner
    let dx = i128::from((xs.0 + r - px).max(px - (xs.1 - r)).max(0));
    let dy = i128::from((ys.0 + r - py).max(py - (ys.1 - r)).max(0));
    dx * dx + dy * dy <= i128::from(r) * i128::from(r)
}

/// Cut a segment down to the box `lo ..= hi` (Liang-Barsky). Endpoints
/// are rounded to the nearest pixel.
fn clip_line(p0: (i64, i64), p1: (i64, i64), lo: (i64, i64), hi: (i64, i64)) -> Option<(Point, Point)> {
    // Parameters along the segment, as (numerator, positive denominator)
    fn before(a: (i128, i128), b: (i128, i128)) -> bool {
        a.0 * b.1 < b.0 * a.1
    }
    fn at(start: i64, delta: i64, (n, d): (i128, i128)) -> i32 {
        let scaled = 2 * (i128::from(start) * d + i128::from(delta) * n) + d;
        scaled.div_euclid(2 * d) as i32
    }

    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let mut enter = (0i128, 1i128);
    let mut leave = (1i128, 1i128);
    for (p, q) in [
        (-dx, p0.0 - lo.0),
        (dx, hi.0 - p0.0),
        (-dy, p0.1 - lo.1),
        (dy, hi.1 - p0.1),
    ] {
        let (p, q) = (i128::from(p), i128::from(q));
        if p == 0 {
            if q < 0 {
                return None;
            }
        } else if p < 0 {
            let t = (-q, -p);
            if before(enter, t) {
                enter = t;
            }
        } else {
            let t = (q, p);
            if before(t, leave) {
                leave = t;
            }
        }
    }
    if before(leave, enter) {
        return None;
    }
    Some((
        Point::new(at(p0.0, dx, enter), at(p0.1, dy, enter)),
        Point::new(at(p0.0, dx, leave), at(p0.1, dy, leave)),
    ))
}

impl<P, L, T> DisplayDevice for GfxDevice<P, L, T>
where
    P: Panel,
    L: Backlight,
    T: TouchSensor,
{
    fn init(&mut self) -> Result<(), Error> {
        self.panel.init()?;
        self.panel.set_rotation(self.rotation)?;
        log::info!(
            "Display {} ready ({}x{}, rotation {})",
            self.config.name,
            self.width(),
            self.height(),
            self.rotation
        );
        Ok(())
    }

    fn set_rotation(&mut self, rotation: u8) -> Result<(), Error> {
        self.rotation = rotation & 7;
        log::debug!("rotation -> {}", self.rotation);
        self.panel.set_rotation(self.rotation)
    }

    fn rotation(&self) -> u8 {
        self.rotation
    }

    fn width(&self) -> i32 {
        self.size().width as i32
    }

    fn height(&self) -> i32 {
        self.size().height as i32
    }

    fn fill_screen(&mut self, color: u16) -> Result<(), Error> {
        self.panel.clear(to_rgb565(color))
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: u16) -> Result<(), Error> {
        Pixel(Point::new(x, y), to_rgb565(color)).draw(&mut self.panel)
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) -> Result<(), Error> {
        let mut ends = (Point::new(x0, y0), Point::new(x1, y1));
        let far = |v: i32| i64::from(v).abs() > DIRECT_LIMIT;
        if far(x0) || far(y0) || far(x1) || far(y1) {
            let size = self.size();
            let hi = (i64::from(size.width), i64::from(size.height));
            let p0 = (i64::from(x0), i64::from(y0));
            let p1 = (i64::from(x1), i64::from(y1));
            match clip_line(p0, p1, (-1, -1), hi) {
                Some(clipped) => ends = clipped,
                None => return Ok(()),
            }
        }
        Line::new(ends.0, ends.1)
            .into_styled(PrimitiveStyle::with_stroke(to_rgb565(color), 1))
            .draw(&mut self.panel)
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), Error> {
        // Clipped edges land one pixel off screen
        match normalize_rect(x, y, w, h, self.size(), 1) {
            Some(area) => area.into_styled(Self::stroke(color)).draw(&mut self.panel),
            None => Ok(()),
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) -> Result<(), Error> {
        match normalize_rect(x, y, w, h, self.size(), 0) {
            Some(area) => self.panel.fill_solid(&area, to_rgb565(color)),
            None => Ok(()),
        }
    }

    fn draw_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) -> Result<(), Error> {
        self.round_rect(x, y, w, h, r, Style::Stroke(color))
    }

    fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) -> Result<(), Error> {
        self.round_rect(x, y, w, h, r, Style::Fill(color))
    }

    fn draw_circle(&mut self, x: i32, y: i32, r: i32, color: u16) -> Result<(), Error> {
        self.circle(x, y, r, Style::Stroke(color))
    }

    fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: u16) -> Result<(), Error> {
        self.circle(x, y, r, Style::Fill(color))
    }

    fn set_text_color(&mut self, fg: u16, bg: Option<u16>) {
        self.text.fg = fg;
        self.text.bg = bg;
    }

    fn set_text_size(&mut self, size: u8) {
        self.text.set_size(size);
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.text.cursor = Point::new(x, y);
    }

    fn cursor(&self) -> (i32, i32) {
        (self.text.cursor.x, self.text.cursor.y)
    }

    fn write_str(&mut self, text: &str) -> Result<(), Error> {
        let width = self.width();
        self.text.write(&mut self.panel, text, width)
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), Error> {
        self.light.set_level(level)?;
        self.brightness = level;
        log::debug!("brightness -> {}", level);
        Ok(())
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn get_touch(&mut self) -> Result<Option<(i32, i32)>, Error> {
        let Some(calibration) = self.calibration else {
            return Ok(None);
        };
        let Some(raw) = self.touch.read_raw()? else {
            return Ok(None);
        };
        let panel = &self.config.panel;
        let (x, y) = calibration.map(raw, panel.width, panel.height);
        let offset = self.config.touch.map_or(0, |t| t.offset_rotation);
        let rotation = effective_rotation(self.rotation, offset);
        Ok(Some(rotate_point(
            x,
            y,
            rotation,
            i32::from(panel.width),
            i32::from(panel.height),
        )))
    }
}

impl<P, L, T> OriginDimensions for GfxDevice<P, L, T>
where
    P: Panel,
{
    /// Extent after the panel's mounting offset is applied.
    fn size(&self) -> Size {
        let rotation = effective_rotation(self.rotation, self.config.panel.offset_rotation);
        let (w, h) = self.config.rotated_size(rotation);
        Size::new(u32::from(w), u32::from(h))
    }
}

/// Direct `embedded-graphics` drawing alongside the legacy calls.
impl<P, L, T> DrawTarget for GfxDevice<P, L, T>
where
    P: Panel,
{
    type Color = Rgb565;
    type Error = Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.panel.draw_iter(pixels)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.panel.fill_contiguous(area, colors)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.panel.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.panel.clear(color)
    }
}
