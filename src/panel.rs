//! Panel seam over `mipidsi`.
//!
//! A [`Panel`] is an `embedded-graphics` draw target that can also run its
//! controller bring-up and change orientation. [`MipidsiPanel`] pushes a
//! [`PanelConfig`] into a `mipidsi::Builder` when `init()` runs; drawing
//! before that fails with [`Error::NotInitialized`].
//!
//! mipidsi has no pixel read-back path, so `readable`, `dummy_read_pixel`
//! and `dummy_read_bits` are carried in the config but not consumed here.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use mipidsi::interface::Interface;
use mipidsi::models::ST7789;
use mipidsi::options::{ColorInversion, ColorOrder, Orientation, Rotation};
use mipidsi::{Builder, Display};

use crate::board::PanelConfig;
use crate::error::Error;

pub trait Panel: DrawTarget<Color = Rgb565, Error = Error> {
    /// Reset the controller and run its init sequence.
    fn init(&mut self) -> Result<(), Error>;

    /// Reorient the panel; `rotation` is 0-3 plain, 4-7 mirrored.
    fn set_rotation(&mut self, rotation: u8) -> Result<(), Error>;
}

/// Combine a requested rotation with the panel's mounting offset.
///
/// The quarter-turn parts add modulo 4; the mirror bits toggle.
pub const fn effective_rotation(rotation: u8, offset: u8) -> u8 {
    ((rotation.wrapping_add(offset)) & 3) | ((rotation ^ offset) & 4)
}

/// mipidsi orientation for a 0-7 rotation.
pub fn orientation(rotation: u8) -> Orientation {
    let quarter = match rotation & 3 {
        0 => Rotation::Deg0,
        1 => Rotation::Deg90,
        2 => Rotation::Deg180,
        _ => Rotation::Deg270,
    };
    let orientation = Orientation::new().rotate(quarter);
    if rotation & 4 != 0 {
        orientation.flip_horizontal()
    } else {
        orientation
    }
}

/// ST7789 software reset.
const SWRESET: u8 = 0x01;

/// Reset line for panels whose RST pin is tied to the board reset.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnwiredReset;

impl ErrorType for UnwiredReset {
    type Error = Infallible;
}

impl OutputPin for UnwiredReset {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// ST7789 panel driven through mipidsi.
pub struct MipidsiPanel<DI, RST, D>
where
    DI: Interface<Word = u8>,
    RST: OutputPin,
    D: DelayNs,
{
    config: PanelConfig,
    parts: Option<(DI, RST)>,
    display: Option<Display<DI, ST7789, RST>>,
    delay: D,
    rotation: u8,
    soft_reset: bool,
}

impl<DI, RST, D> MipidsiPanel<DI, RST, D>
where
    DI: Interface<Word = u8>,
    RST: OutputPin,
    D: DelayNs,
{
    /// Panel with a wired reset line, pulsed by `init()`.
    pub fn new(config: PanelConfig, di: DI, rst: RST, delay: D) -> Self {
        Self {
            config,
            parts: Some((di, rst)),
            display: None,
            delay,
            rotation: 0,
            soft_reset: false,
        }
    }

    fn display(&mut self) -> Result<&mut Display<DI, ST7789, RST>, Error> {
        self.display.as_mut().ok_or(Error::NotInitialized)
    }

    fn orientation(&self) -> Orientation {
        orientation(effective_rotation(self.rotation, self.config.offset_rotation))
    }
}

impl<DI, D> MipidsiPanel<DI, UnwiredReset, D>
where
    DI: Interface<Word = u8>,
    D: DelayNs,
{
    /// Panel without a reset line; `init()` sends a software reset.
    pub fn without_reset(config: PanelConfig, di: DI, delay: D) -> Self {
        Self {
            soft_reset: true,
            ..Self::new(config, di, UnwiredReset, delay)
        }
    }
}

impl<DI, RST, D> Panel for MipidsiPanel<DI, RST, D>
where
    DI: Interface<Word = u8>,
    RST: OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), Error> {
        // Re-init of an already running panel only refreshes orientation
        let Some((mut di, rst)) = self.parts.take() else {
            let orientation = self.orientation();
            return self
                .display()?
                .set_orientation(orientation)
                .map_err(|_| Error::Bus);
        };

        // The model init waits out the reset before its first command
        if self.soft_reset {
            di.send_command(SWRESET, &[]).map_err(|_| Error::PanelInit)?;
        }

        let cfg = &self.config;
        let inversion = if cfg.invert {
            ColorInversion::Inverted
        } else {
            ColorInversion::Normal
        };
        let order = if cfg.rgb_order {
            ColorOrder::Bgr
        } else {
            ColorOrder::Rgb
        };

        let display = Builder::new(ST7789, di)
            .display_size(cfg.width, cfg.height)
            .display_offset(cfg.offset_x, cfg.offset_y)
            .invert_colors(inversion)
            .color_order(order)
            .orientation(self.orientation())
            .reset_pin(rst)
            .init(&mut self.delay)
            .map_err(|_| Error::PanelInit)?;

        log::info!(
            "ST7789 initialized ({}x{}, invert={}, offset {},{})",
            cfg.width,
            cfg.height,
            cfg.invert,
            cfg.offset_x,
            cfg.offset_y
        );
        self.display = Some(display);
        Ok(())
    }

    fn set_rotation(&mut self, rotation: u8) -> Result<(), Error> {
        self.rotation = rotation & 7;
        let orientation = self.orientation();
        match self.display.as_mut() {
            Some(display) => display.set_orientation(orientation).map_err(|_| Error::Bus),
            // Applied by init()
            None => Ok(()),
        }
    }
}

impl<DI, RST, D> OriginDimensions for MipidsiPanel<DI, RST, D>
where
    DI: Interface<Word = u8>,
    RST: OutputPin,
    D: DelayNs,
{
    fn size(&self) -> Size {
        let (w, h) = (u32::from(self.config.width), u32::from(self.config.height));
        if effective_rotation(self.rotation, self.config.offset_rotation) & 1 == 1 {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }
}

impl<DI, RST, D> DrawTarget for MipidsiPanel<DI, RST, D>
where
    DI: Interface<Word = u8>,
    RST: OutputPin,
    D: DelayNs,
{
    type Color = Rgb565;
    type Error = Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display()?.draw_iter(pixels).map_err(|_| Error::Bus)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.display()?
            .fill_contiguous(area, colors)
            .map_err(|_| Error::Bus)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.display()?
            .fill_solid(area, color)
            .map_err(|_| Error::Bus)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.display()?.clear(color).map_err(|_| Error::Bus)
    }
}
