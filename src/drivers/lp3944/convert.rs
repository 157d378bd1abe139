//! Human-unit conversions for the dim channel registers.
//!
//! Duty cycle: `PWM = round(percent * 256 / 100)`, saturated at 255.
//! Dim period: `PSC = (period_ms * 160 / 1000) - 1`, i.e. the chip runs the
//! period as `(PSC + 1) / 160` seconds.  Requests shorter than one prescaler
//! step (0..=6 ms) land on the shortest period the chip has, PSC = 0.

use crate::error::{Error, Quantity, Result};

pub const MAX_DUTY_PERCENT: u8 = 100;
pub const MAX_DIM_PERIOD_MS: u16 = 1600;

/// Prescaler ticks per second.
const PRESCALER_HZ: u32 = 160;

pub fn duty_cycle_register(percentage: u8) -> Result<u8> {
    if percentage > MAX_DUTY_PERCENT {
        return Err(Error::OutOfRange {
            quantity: Quantity::DutyCycle,
            value: u16::from(percentage),
            max: u16::from(MAX_DUTY_PERCENT),
        });
    }
    let scaled = (u16::from(percentage) * 256 + 50) / 100;
    Ok(scaled.min(u16::from(u8::MAX)) as u8)
}

pub fn dim_period_register(period_ms: u16) -> Result<u8> {
    if period_ms > MAX_DIM_PERIOD_MS {
        return Err(Error::OutOfRange {
            quantity: Quantity::DimPeriod,
            value: period_ms,
            max: MAX_DIM_PERIOD_MS,
        });
    }
    let ticks = u32::from(period_ms) * PRESCALER_HZ / 1000;
    Ok(ticks.saturating_sub(1) as u8)
}

/// Period in ms the chip actually runs for a prescaler value.
pub fn dim_period_ms(register: u8) -> u16 {
    ((u32::from(register) + 1) * 1000 / PRESCALER_HZ) as u16
}
