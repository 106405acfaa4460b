//! Hardware description for supported boards.
//!
//! Both revisions of the Sunton ESP32-2432S028 share one `BoardConfig`
//! record; the preset in use is selected at compile time via feature flags,
//! the same way pin assignments are selected for the firmware.

use core::fmt;

use crate::error::Error;
use crate::resources::{Owner, Resource, ResourceLedger};

/// Highest SPI write clock the ST7789 on these boards accepts.
pub const MAX_WRITE_FREQ_HZ: u32 = 80_000_000;

/// ESP32 SPI peripheral available to user code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiHost {
    /// SPI2
    Hspi,
    /// SPI3
    Vspi,
}

impl fmt::Display for SpiHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiHost::Hspi => f.write_str("HSPI"),
            SpiHost::Vspi => f.write_str("VSPI"),
        }
    }
}

/// Display SPI bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiBusConfig {
    pub host: SpiHost,
    pub mode: u8,
    pub freq_write_hz: u32,
    pub freq_read_hz: u32,
    pub pin_sclk: u8,
    pub pin_mosi: u8,
    pub pin_miso: Option<u8>,
    pub pin_dc: Option<u8>,
    /// Let the SPI driver pick a DMA channel
    pub dma: bool,
}

/// Panel geometry and controller quirks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub pin_cs: Option<u8>,
    pub pin_rst: Option<u8>,
    pub pin_busy: Option<u8>,
    /// Native (rotation 0) width
    pub width: u16,
    /// Native (rotation 0) height
    pub height: u16,
    pub offset_x: u16,
    pub offset_y: u16,
    /// Added to every requested rotation
    pub offset_rotation: u8,
    pub dummy_read_pixel: u8,
    pub dummy_read_bits: u8,
    pub readable: bool,
    /// Panel needs color inversion for correct output
    pub invert: bool,
    /// Red and blue are swapped relative to the controller default
    pub rgb_order: bool,
    pub dlen_16bit: bool,
    pub bus_shared: bool,
}

/// PWM backlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacklightConfig {
    pub pin: u8,
    /// Backlight is lit when the pin is low
    pub invert: bool,
    pub freq_hz: u32,
    pub pwm_channel: u8,
}

/// Resistive touch controller on its own SPI bus.
///
/// Calibration bounds are raw 12-bit ADC readings at the panel edges in
/// native orientation. A bound pair may be reversed (`x_min > x_max`) when
/// the touch layer is mounted mirrored relative to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchConfig {
    pub host: SpiHost,
    pub freq_hz: u32,
    pub pin_sclk: u8,
    pub pin_mosi: u8,
    pub pin_miso: u8,
    pub pin_cs: u8,
    pub pin_int: Option<u8>,
    pub bus_shared: bool,
    pub offset_rotation: u8,
    pub x_min: u16,
    pub x_max: u16,
    pub y_min: u16,
    pub y_max: u16,
}

/// Complete hardware description of one display board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub name: &'static str,
    pub bus: SpiBusConfig,
    pub panel: PanelConfig,
    pub backlight: BacklightConfig,
    pub touch: Option<TouchConfig>,
}

const CYD_BACKLIGHT: BacklightConfig = BacklightConfig {
    pin: 21,
    invert: false,
    freq_hz: 12_000,
    pwm_channel: 7,
};

impl BoardConfig {
    /// ESP32-2432S028R: ST7789 on HSPI, XPT2046 touch on VSPI.
    pub const ESP32_2432S028R: BoardConfig = BoardConfig {
        name: "esp32_2432s028r",
        bus: SpiBusConfig {
            host: SpiHost::Hspi,
            mode: 0,
            freq_write_hz: 80_000_000,
            freq_read_hz: 16_000_000,
            pin_sclk: 14,
            pin_mosi: 13,
            pin_miso: Some(12),
            pin_dc: Some(2),
            dma: true,
        },
        panel: PanelConfig {
            pin_cs: Some(15),
            pin_rst: None,
            pin_busy: None,
            width: 240,
            height: 320,
            offset_x: 0,
            offset_y: 0,
            offset_rotation: 0,
            dummy_read_pixel: 16,
            dummy_read_bits: 1,
            readable: true,
            invert: true,
            rgb_order: false,
            dlen_16bit: false,
            // Display and touch have separate buses
            bus_shared: false,
        },
        backlight: CYD_BACKLIGHT,
        touch: Some(TouchConfig {
            host: SpiHost::Vspi,
            freq_hz: 1_000_000,
            pin_sclk: 25,
            pin_mosi: 32,
            pin_miso: 39,
            pin_cs: 33,
            pin_int: Some(36),
            bus_shared: false,
            offset_rotation: 0,
            x_min: 3800,
            x_max: 240,
            y_min: 200,
            y_max: 3700,
        }),
    };

    /// ESP32-2432S028 without touch: same wiring, slower write clock.
    pub const ESP32_2432S028: BoardConfig = BoardConfig {
        name: "esp32_2432s028",
        bus: SpiBusConfig {
            host: SpiHost::Hspi,
            mode: 0,
            freq_write_hz: 40_000_000,
            freq_read_hz: 16_000_000,
            pin_sclk: 14,
            pin_mosi: 13,
            pin_miso: Some(12),
            pin_dc: Some(2),
            dma: true,
        },
        panel: PanelConfig {
            pin_cs: Some(15),
            pin_rst: None,
            pin_busy: None,
            width: 240,
            height: 320,
            offset_x: 0,
            offset_y: 0,
            offset_rotation: 0,
            dummy_read_pixel: 8,
            dummy_read_bits: 1,
            readable: true,
            invert: false,
            rgb_order: false,
            dlen_16bit: false,
            bus_shared: false,
        },
        backlight: CYD_BACKLIGHT,
        touch: None,
    };

    pub const fn has_touch(&self) -> bool {
        self.touch.is_some()
    }

    /// Panel extent for a rotation; odd rotations are landscape.
    pub const fn rotated_size(&self, rotation: u8) -> (u16, u16) {
        if rotation & 1 == 1 {
            (self.panel.height, self.panel.width)
        } else {
            (self.panel.width, self.panel.height)
        }
    }

    /// Claim every pin, SPI host and PWM channel this board uses.
    ///
    /// Fails on the first collision, on an output routed to an input-only
    /// GPIO, or on a write clock above [`MAX_WRITE_FREQ_HZ`].
    pub fn claim_resources(&self) -> Result<ResourceLedger, Error> {
        if self.bus.freq_write_hz > MAX_WRITE_FREQ_HZ {
            return Err(Error::FrequencyTooHigh {
                hz: self.bus.freq_write_hz,
            });
        }

        let mut ledger = ResourceLedger::new();

        let bus = &self.bus;
        let display_shared = self.panel.bus_shared;
        ledger.claim_bus(Resource::SpiHost(bus.host), Owner::DisplayBus, display_shared)?;
        ledger.claim_output(bus.pin_sclk, Owner::DisplayBus, display_shared)?;
        ledger.claim_output(bus.pin_mosi, Owner::DisplayBus, display_shared)?;
        if let Some(miso) = bus.pin_miso {
            ledger.claim_bus(Resource::Gpio(miso), Owner::DisplayBus, display_shared)?;
        }
        if let Some(dc) = bus.pin_dc {
            ledger.claim_output(dc, Owner::DisplayBus, false)?;
        }

        let panel = &self.panel;
        for pin in [panel.pin_cs, panel.pin_rst].into_iter().flatten() {
            ledger.claim_output(pin, Owner::Panel, false)?;
        }
        if let Some(busy) = panel.pin_busy {
            ledger.claim(Resource::Gpio(busy), Owner::Panel)?;
        }

        ledger.claim_output(self.backlight.pin, Owner::Backlight, false)?;
        ledger.claim(Resource::PwmChannel(self.backlight.pwm_channel), Owner::Backlight)?;

        if let Some(touch) = &self.touch {
            let shared = touch.bus_shared;
            ledger.claim_bus(Resource::SpiHost(touch.host), Owner::Touch, shared)?;
            ledger.claim_output(touch.pin_sclk, Owner::Touch, shared)?;
            ledger.claim_output(touch.pin_mosi, Owner::Touch, shared)?;
            ledger.claim_bus(Resource::Gpio(touch.pin_miso), Owner::Touch, shared)?;
            ledger.claim_output(touch.pin_cs, Owner::Touch, false)?;
            if let Some(int) = touch.pin_int {
                ledger.claim(Resource::Gpio(int), Owner::Touch)?;
            }
        }

        log::info!(
            "Board {}: {} hardware resources claimed",
            self.name,
            ledger.len()
        );
        Ok(ledger)
    }
}

#[cfg(feature = "board-2432s028r")]
mod hw {
    use super::BoardConfig;

    pub const BOARD: BoardConfig = BoardConfig::ESP32_2432S028R;
    pub const BOARD_NAME: &str = "esp32_2432s028r";
    pub const HAS_TOUCH: bool = true;
}

#[cfg(all(feature = "board-2432s028", not(feature = "board-2432s028r")))]
mod hw {
    use super::BoardConfig;

    pub const BOARD: BoardConfig = BoardConfig::ESP32_2432S028;
    pub const BOARD_NAME: &str = "esp32_2432s028";
    pub const HAS_TOUCH: bool = false;
}

// Host builds without a board feature still get a usable preset.
#[cfg(not(any(feature = "board-2432s028r", feature = "board-2432s028")))]
mod hw {
    use super::BoardConfig;

    pub const BOARD: BoardConfig = BoardConfig::ESP32_2432S028R;
    pub const BOARD_NAME: &str = "unknown";
    pub const HAS_TOUCH: bool = true;
}

pub use hw::*;
