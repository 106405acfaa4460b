//! Resistive touch input.
//!
//! [`Xpt2046`] samples raw 12-bit positions from the controller over its own
//! SPI device; [`Calibration`] maps those samples onto panel pixels using
//! the board's raw-ADC edge bounds.

use embedded_hal::digital::InputPin;
use embedded_hal::spi::SpiDevice;

use crate::board::TouchConfig;
use crate::error::Error;

/// Control bytes: start bit, channel select, 12-bit differential, PENIRQ on.
const CMD_X: u8 = 0b1_001_0_0_00;
const CMD_Y: u8 = 0b1_101_0_0_00;
const CMD_Z1: u8 = 0b1_011_0_0_00;
const CMD_Z2: u8 = 0b1_100_0_0_00;

/// Pressure below which a contact is treated as noise.
pub const Z_THRESHOLD: u16 = 400;

/// Position samples averaged per reading.
pub const SAMPLES: u32 = 3;

const ADC_MAX: u16 = 4095;

/// Raw controller reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPoint {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

pub trait TouchSensor {
    /// `Ok(None)` when nothing is pressing the panel.
    fn read_raw(&mut self) -> Result<Option<RawPoint>, Error>;
}

/// Touch-absent boards.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTouch;

impl TouchSensor for NoTouch {
    fn read_raw(&mut self) -> Result<Option<RawPoint>, Error> {
        Ok(None)
    }
}

/// XPT2046 raw sampler.
///
/// `irq` is the controller's PENIRQ output, low while the panel is pressed.
pub struct Xpt2046<SPI, IRQ> {
    spi: SPI,
    irq: IRQ,
}

impl<SPI, IRQ> Xpt2046<SPI, IRQ>
where
    SPI: SpiDevice,
    IRQ: InputPin,
{
    pub fn new(spi: SPI, irq: IRQ) -> Self {
        Self { spi, irq }
    }

    pub fn release(self) -> (SPI, IRQ) {
        (self.spi, self.irq)
    }

    fn channel(&mut self, cmd: u8) -> Result<u16, Error> {
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &[cmd, 0, 0])
            .map_err(|_| Error::Touch)?;
        Ok((((u16::from(rx[1]) << 8) | u16::from(rx[2])) >> 3) & ADC_MAX)
    }

    fn average(&mut self, cmd: u8) -> Result<u16, Error> {
        let mut sum = 0u32;
        for _ in 0..SAMPLES {
            sum += u32::from(self.channel(cmd)?);
        }
        Ok((sum / SAMPLES) as u16)
    }

    /// Contact pressure; larger is firmer.
    pub fn pressure(&mut self) -> Result<u16, Error> {
        let z1 = self.channel(CMD_Z1)?;
        let z2 = self.channel(CMD_Z2)?;
        Ok((z1 + ADC_MAX).saturating_sub(z2))
    }
}

impl<SPI, IRQ> TouchSensor for Xpt2046<SPI, IRQ>
where
    SPI: SpiDevice,
    IRQ: InputPin,
{
    fn read_raw(&mut self) -> Result<Option<RawPoint>, Error> {
        if self.irq.is_high().map_err(|_| Error::Touch)? {
            return Ok(None);
        }
        let z = self.pressure()?;
        if z < Z_THRESHOLD {
            return Ok(None);
        }
        let x = self.average(CMD_X)?;
        let y = self.average(CMD_Y)?;
        Ok(Some(RawPoint { x, y, z }))
    }
}

/// Linear map from raw ADC bounds to native-orientation panel pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub x_min: u16,
    pub x_max: u16,
    pub y_min: u16,
    pub y_max: u16,
}

impl Calibration {
    pub const fn from_config(cfg: &TouchConfig) -> Self {
        Self {
            x_min: cfg.x_min,
            x_max: cfg.x_max,
            y_min: cfg.y_min,
            y_max: cfg.y_max,
        }
    }

    /// Panel position for a raw sample, clamped to `0..width`, `0..height`.
    ///
    /// `x_min` maps to column 0 and `x_max` to the last column, so reversed
    /// bounds flip the axis.
    pub fn map(&self, raw: RawPoint, width: u16, height: u16) -> (i32, i32) {
        (
            scale(raw.x, self.x_min, self.x_max, width),
            scale(raw.y, self.y_min, self.y_max, height),
        )
    }
}

fn scale(raw: u16, from: u16, to: u16, extent: u16) -> i32 {
    let last = i32::from(extent).saturating_sub(1).max(0);
    let span = i32::from(to) - i32::from(from);
    if span == 0 {
        return 0;
    }
    let pos = (i32::from(raw) - i32::from(from)) * last / span;
    pos.clamp(0, last)
}

/// Rotate a native-orientation point into the coordinate space of
/// `rotation` (0-3 plain, 4-7 mirrored). `width`/`height` are native.
pub fn rotate_point(x: i32, y: i32, rotation: u8, width: i32, height: i32) -> (i32, i32) {
    let (rx, ry, rw) = match rotation & 3 {
        0 => (x, y, width),
        1 => (y, width - 1 - x, height),
        2 => (width - 1 - x, height - 1 - y, width),
        _ => (height - 1 - y, x, height),
    };
    if rotation & 4 != 0 {
        (rw - 1 - rx, ry)
    } else {
        (rx, ry)
    }
}
