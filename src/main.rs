//! LP3944 bring-up firmware: main entry point
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  ESP-IDF I2cDriver ──▶ HalBus ──▶ Lp3944      │
//! │  PinDriver (reset) ─────────────▶ Lp3944      │
//! │  Ets (settle delays) ───────────▶ Lp3944      │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Wiring: SDA = GPIO14, SCL = GPIO15, LP3944 RST = GPIO21 (active low).
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use lp3944::{DimChannel, DriverConfig, HalBus, LedState, Lp3944};

/// Time each chaser step is held.
const STEP_MS: u32 = 250;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("LP3944 bring-up v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    let config = DriverConfig::default();
    config.validate()?;

    let peripherals = Peripherals::take()?;
    let i2c_config = I2cConfig::new().baudrate(Hertz(config.bus.frequency_hz));
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio14,
        peripherals.pins.gpio15,
        &i2c_config,
    )?;
    let reset_pin = PinDriver::output(peripherals.pins.gpio21)?;

    // ── 3. Chip lifecycle ─────────────────────────────────────
    let mut leds = Lp3944::new(HalBus::new(i2c), Ets, reset_pin, config);
    leds.init()?;
    leds.reset()?;
    info!("LP3944 ready, inputs=0b{:08b}", leds.read_inputs()?);

    // ── 4. Static outputs ─────────────────────────────────────
    leds.configure_channel(DimChannel::Dim0, 1000, 50)?;
    leds.configure_channel(DimChannel::Dim1, 400, 25)?;
    leds.set_leds(&[
        (0, LedState::On),
        (1, DimChannel::Dim0.led_state()),
        (2, DimChannel::Dim1.led_state()),
    ])?;

    // ── 5. Chaser on LED3..LED7 ───────────────────────────────
    let mut current = 3u8;
    loop {
        let next = if current == 7 { 3 } else { current + 1 };
        if let Err(e) = leds.set_leds(&[(current, LedState::Off), (next, LedState::On)]) {
            warn!("chaser step {} -> {} failed: {}", current, next, e);
        }
        current = next;
        FreeRtos::delay_ms(STEP_MS);
    }
}
