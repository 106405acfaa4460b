//! cyd-tft: TFT_eSPI-style display API for the Sunton ESP32-2432S028
//! ("Cheap Yellow Display") boards.
//!
//! Sketch-style code written against the TFT_eSPI call set runs unchanged
//! through [`TftEspi`], which forwards to a [`DisplayDevice`]. The device
//! used on hardware is [`gfx::GfxDevice`]: an ST7789 panel driven by
//! `mipidsi`, an LEDC backlight, and an optional XPT2046 resistive touch
//! controller, all described by one [`board::BoardConfig`].
//!
//! The crate is organized in two layers:
//! - **Library** (this crate): `board`, `resources`, `color`, `device`,
//!   `gfx`, `panel`, `text`, `touch`, `backlight`, `compat`. `no_std`, no
//!   allocator, generic over `embedded-hal` traits, testable on the host
//!   with `cargo test`.
//! - **Firmware** (`src/main.rs`, `firmware` feature): binds the drivers to
//!   ESP32 peripherals and runs a demo loop.

#![cfg_attr(not(test), no_std)]

pub mod backlight;
pub mod board;
pub mod color;
pub mod compat;
pub mod device;
pub mod error;
pub mod gfx;
pub mod panel;
pub mod resources;
pub mod text;
pub mod touch;

#[cfg(test)]
mod testutil;

pub use compat::{TftEspi, DEFAULT_TOUCH_THRESHOLD};
pub use device::DisplayDevice;
pub use error::Error;
