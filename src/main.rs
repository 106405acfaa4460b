//! cyd-tft firmware: brings up the ESP32-2432S028 display stack and runs a
//! touch demo through the TFT_eSPI-style API.
//!
//! Peripheral wiring is fixed per board feature; the constant checks below
//! keep it in step with the selected `BoardConfig`.

#![no_std]
#![no_main]

use esp_backtrace as _;

esp_bootloader_esp_idf::esp_app_desc!();

use embassy_time::{Duration, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::delay::Delay;
use esp_hal::gpio::{DriveMode, Level, Output, OutputConfig};
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, config::Duty, TimerIFace};
use esp_hal::ledc::{Ledc, LowSpeed};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use mipidsi::interface::SpiInterface;
use static_cell::StaticCell;

use cyd_tft::backlight::{duty_for, Backlight};
use cyd_tft::board::{self, BOARD};
use cyd_tft::color::{TFT_BLACK, TFT_BLUE, TFT_DARKGREY, TFT_GREEN, TFT_RED, TFT_WHITE, TFT_YELLOW};
use cyd_tft::error::Error;
use cyd_tft::gfx::GfxDevice;
use cyd_tft::panel::MipidsiPanel;
use cyd_tft::{DisplayDevice, TftEspi, DEFAULT_TOUCH_THRESHOLD};

// The peripherals taken below are hard-wired; fail the build if the
// selected preset disagrees.
const _: () = {
    assert!(BOARD.bus.pin_sclk == 14);
    assert!(BOARD.bus.pin_mosi == 13);
    assert!(matches!(BOARD.bus.pin_miso, Some(12)));
    assert!(matches!(BOARD.bus.pin_dc, Some(2)));
    assert!(matches!(BOARD.panel.pin_cs, Some(15)));
    assert!(BOARD.panel.pin_rst.is_none());
    assert!(BOARD.backlight.pin == 21);
    assert!(BOARD.backlight.pwm_channel == 7);
};

#[cfg(feature = "board-2432s028r")]
const _: () = {
    let Some(touch) = BOARD.touch else {
        panic!("touch board without touch config");
    };
    assert!(touch.pin_sclk == 25);
    assert!(touch.pin_mosi == 32);
    assert!(touch.pin_miso == 39);
    assert!(touch.pin_cs == 33);
    assert!(matches!(touch.pin_int, Some(36)));
};

static PANEL_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();
static BACKLIGHT_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

/// Backlight on an LEDC low-speed channel, 8-bit duty.
struct LedcBacklight {
    channel: channel::Channel<'static, LowSpeed>,
    invert: bool,
}

impl Backlight for LedcBacklight {
    fn set_level(&mut self, level: u8) -> Result<(), Error> {
        let duty = duty_for(level, self.invert);
        // LEDC takes percent; round to nearest
        let pct = ((u16::from(duty) * 100 + 127) / 255) as u8;
        self.channel.set_duty(pct).map_err(|_| Error::Backlight)
    }
}

#[esp_rtos::main]
async fn main(_spawner: embassy_executor::Spawner) {
    esp_println::logger::init_logger_from_env();

    let peripherals = esp_hal::init(esp_hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_int = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_int.software_interrupt0);

    log::info!("cyd-tft starting on {}", board::BOARD_NAME);

    if let Err(e) = BOARD.claim_resources() {
        panic!("board configuration rejected: {}", e);
    }

    // ── Panel: ST7789 on HSPI (SPI2) ────────────────────────────────────
    let spi_config = SpiConfig::default()
        .with_frequency(Rate::from_hz(BOARD.bus.freq_write_hz))
        .with_mode(Mode::_0);
    let spi = Spi::new(peripherals.SPI2, spi_config)
        .unwrap()
        .with_sck(peripherals.GPIO14)
        .with_mosi(peripherals.GPIO13)
        .with_miso(peripherals.GPIO12);
    let cs = Output::new(peripherals.GPIO15, Level::High, OutputConfig::default());
    let spi_device = ExclusiveDevice::new_no_delay(spi, cs).unwrap();
    let dc = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());
    let di = SpiInterface::new(spi_device, dc, PANEL_BUFFER.init([0u8; 512]));
    let panel = MipidsiPanel::without_reset(BOARD.panel, di, Delay::new());

    // ── Backlight: LEDC channel 7 on GPIO21 ─────────────────────────────
    let ledc = Ledc::new(peripherals.LEDC);
    let bl_timer = BACKLIGHT_TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
    bl_timer
        .configure(timer::config::Config {
            duty: Duty::Duty8Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_hz(BOARD.backlight.freq_hz),
        })
        .unwrap();
    let mut bl_channel = ledc.channel(channel::Number::Channel7, peripherals.GPIO21);
    bl_channel
        .configure(channel::config::Config {
            timer: &*bl_timer,
            duty_pct: 0,
            drive_mode: DriveMode::PushPull,
        })
        .unwrap();
    let light = LedcBacklight {
        channel: bl_channel,
        invert: BOARD.backlight.invert,
    };

    // ── Touch: XPT2046 on VSPI (SPI3) ───────────────────────────────────
    #[cfg(feature = "board-2432s028r")]
    let touch = {
        use esp_hal::gpio::{Input, InputConfig};

        let Some(cfg) = BOARD.touch else {
            unreachable!()
        };
        let spi_config = SpiConfig::default()
            .with_frequency(Rate::from_hz(cfg.freq_hz))
            .with_mode(Mode::_0);
        let spi = Spi::new(peripherals.SPI3, spi_config)
            .unwrap()
            .with_sck(peripherals.GPIO25)
            .with_mosi(peripherals.GPIO32)
            .with_miso(peripherals.GPIO39);
        let cs = Output::new(peripherals.GPIO33, Level::High, OutputConfig::default());
        let irq = Input::new(peripherals.GPIO36, InputConfig::default());
        cyd_tft::touch::Xpt2046::new(ExclusiveDevice::new_no_delay(spi, cs).unwrap(), irq)
    };
    #[cfg(not(feature = "board-2432s028r"))]
    let touch = cyd_tft::touch::NoTouch;

    let mut tft = TftEspi::new(GfxDevice::new(BOARD, panel, light, touch));
    if let Err(e) = tft.init() {
        panic!("display init failed: {}", e);
    }
    tft.set_rotation(1).unwrap();

    draw_splash(&mut tft).unwrap();
    Timer::after(Duration::from_secs(2)).await;
    draw_frame(&mut tft).unwrap();

    log::info!(
        "Demo running ({}x{}, touch {})",
        tft.width(),
        tft.height(),
        if board::HAS_TOUCH { "on" } else { "off" }
    );

    let (mut x, mut y) = (0u16, 0u16);
    let mut last: Option<(u16, u16)> = None;
    loop {
        match tft.get_touch(&mut x, &mut y, DEFAULT_TOUCH_THRESHOLD) {
            Ok(true) => {
                if last != Some((x, y)) {
                    let drawn = tft
                        .fill_circle(i32::from(x), i32::from(y), 3, TFT_YELLOW)
                        .and_then(|()| show_position(&mut tft, x, y));
                    if let Err(e) = drawn {
                        log::error!("draw failed: {}", e);
                    }
                    last = Some((x, y));
                }
            }
            Ok(false) => last = None,
            Err(e) => log::error!("touch read failed: {}", e),
        }
        Timer::after(Duration::from_millis(20)).await;
    }
}

fn draw_splash<D: DisplayDevice>(tft: &mut TftEspi<D>) -> Result<(), Error> {
    let (w, h) = (i32::from(tft.width()), i32::from(tft.height()));
    tft.fill_screen(TFT_BLACK)?;
    tft.fill_round_rect(20, 20, w - 40, h - 40, 12, TFT_BLUE)?;
    tft.draw_round_rect(20, 20, w - 40, h - 40, 12, TFT_WHITE)?;
    tft.set_text_color_bg(TFT_WHITE, TFT_BLUE);
    tft.set_text_size(3);
    tft.set_cursor(w / 2 - 63, h / 2 - 24);
    tft.println("CYD TFT")?;
    tft.set_text_size(1);
    tft.set_cursor(w / 2 - 45, h / 2 + 12);
    tft.print_fmt(format_args!("{} {}x{}", board::BOARD_NAME, w, h))
}

fn draw_frame<D: DisplayDevice>(tft: &mut TftEspi<D>) -> Result<(), Error> {
    let (w, h) = (i32::from(tft.width()), i32::from(tft.height()));
    tft.fill_screen(TFT_BLACK)?;
    tft.fill_rect(0, 0, w, 14, TFT_DARKGREY)?;
    tft.set_text_color(TFT_WHITE);
    tft.set_text_size(1);
    tft.set_cursor(2, 2);
    tft.print(if board::HAS_TOUCH { "Touch to draw" } else { "No touch panel" })?;
    tft.draw_rect(0, 16, w, h - 16, TFT_GREEN)?;
    tft.draw_line(0, 16, w - 1, h - 1, TFT_RED)?;
    tft.draw_circle(w / 2, (h + 16) / 2, 30, TFT_WHITE)
}

fn show_position<D: DisplayDevice>(tft: &mut TftEspi<D>, x: u16, y: u16) -> Result<(), Error> {
    let w = i32::from(tft.width());
    tft.set_text_color_bg(TFT_WHITE, TFT_DARKGREY);
    tft.set_cursor(w - 66, 2);
    tft.print_fmt(format_args!("{:3},{:3}", x, y))
}
